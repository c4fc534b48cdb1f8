//! Storage backend seam for the cache adapter.

use std::time::Duration;

use async_trait::async_trait;

use super::error::CacheError;

/// A key → string store with per-key expiry.
///
/// Implementations report failures honestly; swallowing them is the
/// adapter's job.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Short backend label used in logs.
    fn backend(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}
