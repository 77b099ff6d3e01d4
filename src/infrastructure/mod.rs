// src/infrastructure/mod.rs
pub mod database;
pub mod persistence;
pub mod security;

use crate::application::{
    error::ApplicationError,
    ports::{CodeGeneratorPort, VerificationCodeBackendPort},
    services::VerificationCodeService,
};
use crate::config::{AppConfig, BackendKind, ConfigError};
use persistence::{
    InMemoryVerificationCodeBackend, PostgresVerificationCodeBackend, RedisVerificationCodeBackend,
    SqliteVerificationCodeBackend, map_sqlx,
};
use security::RandomCodeGenerator;
use std::sync::Arc;
use thiserror::Error;

/// Failure to assemble a service from configuration.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Backend(#[from] ApplicationError),
}

pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Connect the backend selected by `config`, creating the code table first for
/// relational backends when auto-migration is on.
pub async fn build_backend(
    config: &AppConfig,
) -> BootstrapResult<Arc<VerificationCodeBackendPort>> {
    let backend: Arc<VerificationCodeBackendPort> = match config.backend() {
        BackendKind::Memory => Arc::new(InMemoryVerificationCodeBackend::new()),
        BackendKind::Postgres => {
            let url = required(config.database_url(), "DATABASE_URL")?;
            let pool = database::init_postgres_pool(url, config.database_max_connections())
                .await
                .map_err(map_sqlx)?;
            let backend = PostgresVerificationCodeBackend::new(pool, config.schema());
            if config.auto_migrate() {
                backend.ensure_schema().await?;
            }
            Arc::new(backend)
        }
        BackendKind::Sqlite => {
            let url = required(config.database_url(), "DATABASE_URL")?;
            let pool = database::init_sqlite_pool(url, config.database_max_connections())
                .await
                .map_err(map_sqlx)?;
            let backend = SqliteVerificationCodeBackend::new(pool, config.schema());
            if config.auto_migrate() {
                backend.ensure_schema().await?;
            }
            Arc::new(backend)
        }
        BackendKind::Redis => {
            let url = required(config.redis_url(), "REDIS_URL")?;
            let backend = RedisVerificationCodeBackend::from_url(url, config.redis_key_prefix())?;
            backend.ping().await?;
            Arc::new(backend)
        }
    };

    tracing::info!(backend = backend.name(), "verification code backend ready");
    Ok(backend)
}

pub async fn build_service(config: &AppConfig) -> BootstrapResult<VerificationCodeService> {
    let generator = RandomCodeGenerator::new(config.code_bytes())
        .map_err(|err| ConfigError::Invalid(err.to_string()))?;
    let generator: Arc<CodeGeneratorPort> = Arc::new(generator);
    let backend = build_backend(config).await?;
    Ok(VerificationCodeService::new(generator, backend))
}

fn required<'a>(value: Option<&'a str>, key: &'static str) -> Result<&'a str, ConfigError> {
    value.ok_or(ConfigError::Missing(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> AppConfig {
        AppConfig::from_lookup(|_| None).unwrap()
    }

    #[tokio::test]
    async fn unusable_code_length_is_a_config_error() {
        let mut config = memory_config();
        config.code_bytes = 4;

        let err = build_service(&config).await.err().unwrap();
        assert!(matches!(err, BootstrapError::Config(ConfigError::Invalid(_))));
    }

    #[tokio::test]
    async fn missing_connection_settings_are_config_errors() {
        let mut config = memory_config();
        config.backend = BackendKind::Redis;
        let err = build_backend(&config).await.err().unwrap();
        assert!(matches!(err, BootstrapError::Config(ConfigError::Missing("REDIS_URL"))));

        config.backend = BackendKind::Sqlite;
        let err = build_backend(&config).await.err().unwrap();
        assert!(matches!(err, BootstrapError::Config(ConfigError::Missing("DATABASE_URL"))));
    }

    #[tokio::test]
    async fn default_config_builds_a_memory_service() {
        let service = build_service(&memory_config()).await.unwrap();
        assert_eq!(service.backend_name(), "memory");
    }
}
