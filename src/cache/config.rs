//! Cache configuration.
//!
//! Resolved from the `[cache]` settings section.

use std::{num::NonZeroUsize, str::FromStr, time::Duration};

use serde::Deserialize;

/// Defaults shared with the settings loader.
pub(crate) mod defaults {
    pub(crate) const HOST: &str = "redis";
    pub(crate) const PORT: u16 = 6379;
    pub(crate) const TIMEOUT_MS: u64 = 5000;
    pub(crate) const MEMORY_CAPACITY: usize = 1024;
    pub(crate) const LIST_TTL_SECS: u64 = 300;
    pub(crate) const DETAIL_TTL_SECS: u64 = 600;
    pub(crate) const GENRES_TTL_SECS: u64 = 3600;
}

/// Which store backs the cache adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    #[default]
    Redis,
    Memory,
}

impl CacheBackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBackendKind::Redis => "redis",
            CacheBackendKind::Memory => "memory",
        }
    }
}

impl FromStr for CacheBackendKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackendKind::Redis),
            "memory" => Ok(CacheBackendKind::Memory),
            other => Err(format!(
                "unknown cache backend `{other}` (expected redis|memory)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// When false the adapter has no store and every lookup is a miss.
    pub enabled: bool,
    pub backend: CacheBackendKind,
    pub host: String,
    pub port: u16,
    /// Upper bound for any single cache round trip.
    pub timeout: Duration,
    /// Maximum entries held by the memory backend.
    pub memory_capacity: NonZeroUsize,
    pub list_ttl: Duration,
    pub detail_ttl: Duration,
    pub genres_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheBackendKind::Redis,
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            timeout: Duration::from_millis(defaults::TIMEOUT_MS),
            memory_capacity: NonZeroUsize::new(defaults::MEMORY_CAPACITY)
                .unwrap_or(NonZeroUsize::MIN),
            list_ttl: Duration::from_secs(defaults::LIST_TTL_SECS),
            detail_ttl: Duration::from_secs(defaults::DETAIL_TTL_SECS),
            genres_ttl: Duration::from_secs(defaults::GENRES_TTL_SECS),
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            backend: settings.backend,
            host: settings.host.clone(),
            port: settings.port,
            timeout: settings.timeout,
            memory_capacity: settings.memory_capacity,
            list_ttl: settings.list_ttl,
            detail_ttl: settings.detail_ttl,
            genres_ttl: settings.genres_ttl,
        }
    }
}

impl CacheConfig {
    /// In-process cache for tests and single-node development.
    pub fn memory() -> Self {
        Self {
            backend: CacheBackendKind::Memory,
            ..Default::default()
        }
    }

    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/0", self.host, self.port)
    }
}
