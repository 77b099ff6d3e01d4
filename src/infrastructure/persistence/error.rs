// src/infrastructure/persistence/error.rs
use crate::application::error::ApplicationError;

const PG_UNIQUE_VIOLATION: &str = "23505";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

pub fn map_sqlx(err: sqlx::Error) -> ApplicationError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if db_err.is_unique_violation() {
                return ApplicationError::DuplicateCode;
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    PG_UNIQUE_VIOLATION | SQLITE_CONSTRAINT_PRIMARYKEY | SQLITE_CONSTRAINT_UNIQUE => {
                        return ApplicationError::DuplicateCode;
                    }
                    _ => {}
                }
            }

            ApplicationError::storage_integrity(db_err.message().to_string())
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => ApplicationError::backend_unavailable(err.to_string()),
        _ => ApplicationError::storage_integrity(err.to_string()),
    }
}

pub fn map_redis(err: &redis::RedisError) -> ApplicationError {
    if err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_timeout()
    {
        ApplicationError::backend_unavailable(err.to_string())
    } else {
        ApplicationError::storage_integrity(err.to_string())
    }
}

pub fn map_pool(err: &deadpool_redis::PoolError) -> ApplicationError {
    ApplicationError::backend_unavailable(err.to_string())
}
