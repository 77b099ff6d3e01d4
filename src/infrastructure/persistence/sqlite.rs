// src/infrastructure/persistence/sqlite.rs
use super::error::map_sqlx;
use super::schema::{CodeSchema, Dialect, Statements};
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::persistence::VerificationCodeBackend;
use crate::domain::{ContextBlob, VerificationCode};
use async_trait::async_trait;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct SqliteVerificationCodeBackend {
    pool: SqlitePool,
    statements: Statements,
}

impl SqliteVerificationCodeBackend {
    pub fn new(pool: SqlitePool, schema: &CodeSchema) -> Self {
        Self {
            pool,
            statements: schema.statements(Dialect::Sqlite),
        }
    }

    pub async fn ensure_schema(&self) -> ApplicationResult<()> {
        sqlx::query(&self.statements.create_table)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }
}

#[async_trait]
impl VerificationCodeBackend for SqliteVerificationCodeBackend {
    fn name(&self) -> &'static str {
        "sqlite"
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
        // SQLite serializes writers, so the delete either removes the row for
        // this caller or finds nothing. Step the statement to completion so the
        // delete is finished before the row is handed back.
        let rows = sqlx::query_scalar::<_, Vec<u8>>(&self.statements.take)
            .bind(code.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        match rows.len() {
            0 | 1 => Ok(rows.into_iter().next().map(ContextBlob::new)),
            n => Err(ApplicationError::storage_integrity(format!(
                "{n} rows shared one verification code"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn backend() -> SqliteVerificationCodeBackend {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let backend = SqliteVerificationCodeBackend::new(pool, &CodeSchema::default());
        backend.ensure_schema().await.unwrap();
        backend
    }

    #[tokio::test]
    async fn duplicate_primary_key_maps_to_duplicate_code() {
        let backend = backend().await;
        let code = VerificationCode::new("collide").unwrap();
        backend.put(&code, &ContextBlob::new(b"one".to_vec())).await.unwrap();

        let err = backend
            .put(&code, &ContextBlob::new(b"two".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::DuplicateCode));
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let backend = backend().await;
        backend.ensure_schema().await.unwrap();
    }
}
