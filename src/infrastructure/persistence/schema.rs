// src/infrastructure/persistence/schema.rs
use crate::domain::errors::{DomainError, DomainResult};

pub const DEFAULT_TABLE: &str = "oauth_code";
pub const DEFAULT_CODE_COLUMN: &str = "code";
pub const DEFAULT_CONTEXT_COLUMN: &str = "authentication";

const MAX_IDENTIFIER_LEN: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${index}"),
            Self::Sqlite => "?".to_string(),
        }
    }

    const fn blob_type(self) -> &'static str {
        match self {
            Self::Postgres => "BYTEA",
            Self::Sqlite => "BLOB",
        }
    }
}

/// Table and column names for relational backends.
///
/// Deployments can rename everything, but only to plain identifiers: each name
/// is validated and then quoted, so the statements derived from it cannot be
/// altered beyond the names themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSchema {
    table: String,
    code_column: String,
    context_column: String,
}

impl Default for CodeSchema {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.into(),
            code_column: DEFAULT_CODE_COLUMN.into(),
            context_column: DEFAULT_CONTEXT_COLUMN.into(),
        }
    }
}

impl CodeSchema {
    pub fn new(
        table: impl Into<String>,
        code_column: impl Into<String>,
        context_column: impl Into<String>,
    ) -> DomainResult<Self> {
        let table = table.into();
        let code_column = code_column.into();
        let context_column = context_column.into();

        validate_table(&table)?;
        validate_identifier(&code_column)?;
        validate_identifier(&context_column)?;
        if code_column == context_column {
            return Err(DomainError::Validation(
                "code and context columns must differ".into(),
            ));
        }

        Ok(Self {
            table,
            code_column,
            context_column,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn code_column(&self) -> &str {
        &self.code_column
    }

    pub fn context_column(&self) -> &str {
        &self.context_column
    }

    pub fn statements(&self, dialect: Dialect) -> Statements {
        let table = quote_path(&self.table);
        let code = quote(&self.code_column);
        let context = quote(&self.context_column);

        Statements {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {table} ({code} TEXT PRIMARY KEY, {context} {} NOT NULL)",
                dialect.blob_type()
            ),
            insert: format!(
                "INSERT INTO {table} ({code}, {context}) VALUES ({}, {})",
                dialect.placeholder(1),
                dialect.placeholder(2)
            ),
            take: format!(
                "DELETE FROM {table} WHERE {code} = {} RETURNING {context}",
                dialect.placeholder(1)
            ),
        }
    }
}

/// The full statement surface a relational backend issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statements {
    pub create_table: String,
    pub insert: String,
    /// Single-statement fetch-and-delete.
    pub take: String,
}

fn validate_table(name: &str) -> DomainResult<()> {
    let mut parts = name.split('.');
    let first = parts.next().unwrap_or_default();
    validate_identifier(first)?;
    if let Some(second) = parts.next() {
        validate_identifier(second)?;
    }
    if parts.next().is_some() {
        return Err(DomainError::Validation(format!(
            "table name `{name}` may have at most one schema qualifier"
        )));
    }
    Ok(())
}

fn validate_identifier(name: &str) -> DomainResult<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_start || !valid_rest || name.len() > MAX_IDENTIFIER_LEN {
        return Err(DomainError::Validation(format!(
            "`{name}` is not a valid SQL identifier"
        )));
    }
    Ok(())
}

fn quote(identifier: &str) -> String {
    format!("\"{identifier}\"")
}

fn quote_path(path: &str) -> String {
    path.split('.').map(quote).collect::<Vec<_>>().join(".")
}
