//! In-process cache backend.
//!
//! Bounded LRU map whose entries carry their own deadline. Expired entries
//! are dropped lazily on read.

use std::{
    num::NonZeroUsize,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use lru::LruCache;
use tokio::time::Instant;
use tracing::warn;

use super::error::CacheError;
use super::store::CacheStore;

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

pub struct MemoryStore {
    entries: Mutex<LruCache<String, MemoryEntry>>,
}

impl MemoryStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.guard("len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A panic while holding the lock leaves the map usable; recover it.
    fn guard(&self, op: &'static str) -> MutexGuard<'_, LruCache<String, MemoryEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!(
                target: "content_service::cache",
                op,
                "recovered poisoned memory cache lock"
            );
            poisoned.into_inner()
        })
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.guard("get");
        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.guard("set_ex").put(key.to_string(), entry);
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
