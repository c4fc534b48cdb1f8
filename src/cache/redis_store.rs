//! Redis cache backend.
//!
//! The connection is established lazily on first use and then shared through
//! a reconnecting [`ConnectionManager`], so the service boots even when Redis
//! is down.

use std::time::Duration;

use ::redis::{AsyncCommands, Client, RedisError, aio::ConnectionManager};
use async_trait::async_trait;
use tokio::sync::OnceCell;

use super::error::CacheError;
use super::store::CacheStore;

pub struct RedisStore {
    client: Client,
    connection: OnceCell<ConnectionManager>,
}

impl RedisStore {
    /// Parse the connection URL without connecting.
    pub fn open(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url).map_err(|err| {
            CacheError::unavailable(format!("invalid redis url `{url}`: {err}"))
        })?;
        Ok(Self {
            client,
            connection: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let manager = self
            .connection
            .get_or_try_init(|| self.client.get_connection_manager())
            .await?;
        Ok(manager.clone())
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _: String = ::redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

impl From<RedisError> for CacheError {
    fn from(err: RedisError) -> Self {
        if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
            CacheError::unavailable(err.to_string())
        } else {
            CacheError::backend(err.to_string())
        }
    }
}
