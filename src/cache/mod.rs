//! Content Service Cache
//!
//! Read-through / write-through cache sitting in front of the catalog
//! queries. Entries are JSON blobs keyed by a string and expire purely by
//! TTL; there is no invalidation API.
//!
//! - **Redis**: shared external store, the production backend
//! - **Memory**: bounded in-process LRU with per-entry expiry
//!
//! Every failure (backend down, timeout, undecodable payload) collapses into a
//! miss inside [`CacheAdapter`], so a cache fault can never fail a request.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! backend = "redis"
//! host = "redis"
//! port = 6379
//! timeout_ms = 5000
//! ```

mod adapter;
mod config;
mod error;
mod keys;
mod memory;
mod redis_store;
mod store;

pub use adapter::{CacheAdapter, CacheHealth, CacheLookup};
pub(crate) use config::defaults;
pub use config::{CacheBackendKind, CacheConfig};
pub use error::CacheError;
pub use keys::CacheKey;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use store::CacheStore;
