// src/infrastructure/persistence/postgres.rs
use super::error::map_sqlx;
use super::schema::{CodeSchema, Dialect, Statements};
use crate::application::ApplicationResult;
use crate::application::ports::persistence::VerificationCodeBackend;
use crate::domain::{ContextBlob, VerificationCode};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PostgresVerificationCodeBackend {
    pool: PgPool,
    statements: Statements,
}

impl PostgresVerificationCodeBackend {
    pub fn new(pool: PgPool, schema: &CodeSchema) -> Self {
        Self {
            pool,
            statements: schema.statements(Dialect::Postgres),
        }
    }

    /// Create the code table if it does not exist yet.
    pub async fn ensure_schema(&self) -> ApplicationResult<()> {
        sqlx::query(&self.statements.create_table)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }
}

#[async_trait]
impl VerificationCodeBackend for PostgresVerificationCodeBackend {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn put(&self, code: &VerificationCode, blob: &ContextBlob) -> ApplicationResult<()> {
        sqlx::query(&self.statements.insert)
            .bind(code.as_str())
            .bind(blob.as_bytes())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn get_and_delete(&self, code: &VerificationCode) -> ApplicationResult<Option<ContextBlob>> {
        // A single DELETE ... RETURNING: the row lock taken by the delete makes
        // concurrent callers with the same code see zero rows.
        let bytes = sqlx::query_scalar::<_, Vec<u8>>(&self.statements.take)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(bytes.map(ContextBlob::new))
    }
}
