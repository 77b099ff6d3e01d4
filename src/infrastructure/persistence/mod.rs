// src/infrastructure/persistence/mod.rs
mod error;
pub mod memory;
pub mod postgres;
pub mod redis_store;
pub mod schema;
pub mod sqlite;

pub use error::{map_pool, map_redis, map_sqlx};
pub use memory::InMemoryVerificationCodeBackend;
pub use postgres::PostgresVerificationCodeBackend;
pub use redis_store::RedisVerificationCodeBackend;
pub use schema::{CodeSchema, Dialect, Statements};
pub use sqlite::SqliteVerificationCodeBackend;
