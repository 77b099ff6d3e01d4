// src/config.rs
use crate::infrastructure::persistence::redis_store::DEFAULT_KEY_PREFIX;
use crate::infrastructure::persistence::schema::{
    CodeSchema, DEFAULT_CODE_COLUMN, DEFAULT_CONTEXT_COLUMN, DEFAULT_TABLE,
};
use crate::infrastructure::security::code_generator::{DEFAULT_CODE_BYTES, RandomCodeGenerator};
use std::{env, fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Postgres,
    Sqlite,
    Redis,
}

impl BackendKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
            Self::Redis => "redis",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            "redis" => Ok(Self::Redis),
            other => Err(ConfigError::Invalid(format!(
                "unknown VERIFICATION_CODE_BACKEND `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub(crate) backend: BackendKind,
    pub(crate) database_url: Option<String>,
    pub(crate) database_max_connections: u32,
    pub(crate) redis_url: Option<String>,
    pub(crate) redis_key_prefix: String,
    pub(crate) schema: CodeSchema,
    pub(crate) code_bytes: usize,
    pub(crate) auto_migrate: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_max_connections() -> u32 {
    16
}

impl AppConfig {
    /// Build configuration from environment variables. Uses sensible defaults
    /// for optional values and validates required keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("VERIFICATION_CODE_BACKEND")
            .map(|v| v.parse::<BackendKind>())
            .transpose()?
            .unwrap_or(BackendKind::Memory);

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let redis_url = lookup("REDIS_URL").filter(|v| !v.trim().is_empty());

        match backend {
            BackendKind::Postgres | BackendKind::Sqlite if database_url.is_none() => {
                return Err(ConfigError::Missing("DATABASE_URL"));
            }
            BackendKind::Redis if redis_url.is_none() => {
                return Err(ConfigError::Missing("REDIS_URL"));
            }
            _ => {}
        }

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ConfigError::Invalid(format!("DATABASE_MAX_CONNECTIONS must be a positive integer, got `{v}`"))
                })?,
            None => default_max_connections(),
        };

        let schema = CodeSchema::new(
            lookup("VERIFICATION_CODE_TABLE").unwrap_or_else(|| DEFAULT_TABLE.into()),
            lookup("VERIFICATION_CODE_COLUMN").unwrap_or_else(|| DEFAULT_CODE_COLUMN.into()),
            lookup("VERIFICATION_CONTEXT_COLUMN").unwrap_or_else(|| DEFAULT_CONTEXT_COLUMN.into()),
        )
        .map_err(|err| ConfigError::Invalid(err.to_string()))?;

        let code_bytes = match lookup("VERIFICATION_CODE_BYTES") {
            Some(v) => v.parse::<usize>().map_err(|_| {
                ConfigError::Invalid(format!("VERIFICATION_CODE_BYTES must be an integer, got `{v}`"))
            })?,
            None => DEFAULT_CODE_BYTES,
        };
        // Reject lengths the generator would refuse before anything connects.
        RandomCodeGenerator::new(code_bytes).map_err(|err| ConfigError::Invalid(err.to_string()))?;

        let redis_key_prefix =
            lookup("REDIS_KEY_PREFIX").unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string());

        let auto_migrate = lookup("VERIFICATION_CODE_AUTO_MIGRATE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        Ok(Self {
            backend,
            database_url,
            database_max_connections,
            redis_url,
            redis_key_prefix,
            schema,
            code_bytes,
            auto_migrate,
        })
    }

    pub const fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub const fn database_max_connections(&self) -> u32 {
        self.database_max_connections
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    pub fn redis_key_prefix(&self) -> &str {
        &self.redis_key_prefix
    }

    pub const fn schema(&self) -> &CodeSchema {
        &self.schema
    }

    pub const fn code_bytes(&self) -> usize {
        self.code_bytes
    }

    /// Whether relational backends create their table at startup.
    pub const fn auto_migrate(&self) -> bool {
        self.auto_migrate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_memory_backend() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.backend(), BackendKind::Memory);
        assert_eq!(cfg.code_bytes(), DEFAULT_CODE_BYTES);
        assert_eq!(cfg.schema(), &CodeSchema::default());
        assert_eq!(cfg.redis_key_prefix(), DEFAULT_KEY_PREFIX);
        assert!(cfg.auto_migrate());
    }

    #[test]
    fn relational_backend_requires_database_url() {
        let err = config(&[("VERIFICATION_CODE_BACKEND", "postgres")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn redis_backend_requires_redis_url() {
        let err = config(&[("VERIFICATION_CODE_BACKEND", "redis")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("REDIS_URL")));
    }

    #[test]
    fn custom_schema_names_are_applied() {
        let cfg = config(&[
            ("VERIFICATION_CODE_BACKEND", "sqlite"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("VERIFICATION_CODE_TABLE", "grant_codes"),
            ("VERIFICATION_CODE_COLUMN", "value"),
            ("VERIFICATION_CONTEXT_COLUMN", "payload"),
        ])
        .unwrap();
        assert_eq!(cfg.schema().table(), "grant_codes");
        assert_eq!(cfg.schema().code_column(), "value");
        assert_eq!(cfg.schema().context_column(), "payload");
    }

    #[test]
    fn rejects_unsafe_table_name() {
        let err = config(&[("VERIFICATION_CODE_TABLE", "codes; drop table x")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_weak_code_length() {
        let err = config(&[("VERIFICATION_CODE_BYTES", "4")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(config(&[("VERIFICATION_CODE_BACKEND", "mongo")]).is_err());
    }

    #[test]
    fn auto_migrate_can_be_disabled() {
        let cfg = config(&[("VERIFICATION_CODE_AUTO_MIGRATE", "false")]).unwrap();
        assert!(!cfg.auto_migrate());
    }
}
