// src/infrastructure/persistence/redis_store.rs
use super::error::{map_pool, map_redis};
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::persistence::VerificationCodeBackend;
use crate::domain::{ContextBlob, VerificationCode};
use async_trait::async_trait;
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};

pub const DEFAULT_KEY_PREFIX: &str = "verification_code:";

// Fetch-and-delete in one script so no other client can run between the GET
// and the DEL. Works on servers that predate GETDEL.
const TAKE_SCRIPT: &str = r"
    local value = redis.call('GET', KEYS[1])
    if value then
        redis.call('DEL', KEYS[1])
    end
    return value
";

#[derive(Clone)]
pub struct RedisVerificationCodeBackend {
    pool: Pool,
    key_prefix: String,
}

impl RedisVerificationCodeBackend {
    /// Create a new Redis backed code store from a redis URL (e.g. redis://:password@host:6379/0)
    pub fn from_url(url: &str, key_prefix: impl Into<String>) -> ApplicationResult<Self> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| ApplicationError::backend_unavailable(err.to_string()))?;

        Ok(Self::new(pool, key_prefix))
    }

    pub fn new(pool: Pool, key_prefix: impl Into<String>) -> Self {
        Self {
            pool,
            key_prefix: key_prefix.into(),
        }
    }

    fn key(&self, code: &VerificationCode) -> String {
        format!("{}{}", self.key_prefix, code.as_str())
    }

    async fn connection(&self) -> ApplicationResult<Connection> {
        self.pool.get().await.map_err(|err| map_pool(&err))
    }

    /// Round-trip a PING to verify the pool can reach the server.
    pub async fn ping(&self) -> ApplicationResult<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|err| map_redis(&err))?;
        Ok(())
    }
}

#[async_trait]
impl VerificationCodeBackend for RedisVerificationCodeBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn put(&self, code: &VerificationCode, blob: &ContextBlob) -> ApplicationResult<()> {
        let mut conn = self.connection().await?;

        // SET NX replies nil when the key already exists.
        let reply: Option<String> = redis::cmd("SET")
            .arg(self.key(code))
            .arg(blob.as_bytes())
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(|err| map_redis(&err))?;

        match reply {
            Some(_) => Ok(()),
            None => Err(ApplicationError::DuplicateCode),
        }
    }

    async fn get_and_delete(&self, code: &VerificationCode) -> ApplicationResult<Option<ContextBlob>> {
        let mut conn = self.connection().await?;

        let value: Option<Vec<u8>> = redis::cmd("EVAL")
            .arg(TAKE_SCRIPT)
            .arg(1)
            .arg(self.key(code))
            .query_async(&mut conn)
            .await
            .map_err(|err| map_redis(&err))?;

        Ok(value.map(ContextBlob::new))
    }
}
