//! Degrading read-through adapter over a [`CacheStore`].

use std::{future::Future, sync::Arc, time::Duration};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::application::metrics::ServiceMetrics;

use super::config::{CacheBackendKind, CacheConfig};
use super::error::CacheError;
use super::keys::CacheKey;
use super::memory::MemoryStore;
use super::redis_store::RedisStore;
use super::store::CacheStore;

const TARGET: &str = "content_service::cache";

/// Outcome of a cache read. Backend faults are already folded into `Miss`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
}

impl<T> CacheLookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }
}

/// Connectivity as reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheHealth {
    Disconnected,
    Healthy,
    Unhealthy,
}

impl CacheHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheHealth::Disconnected => "disconnected",
            CacheHealth::Healthy => "healthy",
            CacheHealth::Unhealthy => "unhealthy",
        }
    }
}

#[derive(Clone)]
pub struct CacheAdapter {
    store: Option<Arc<dyn CacheStore>>,
    timeout: Duration,
    metrics: Arc<ServiceMetrics>,
}

impl CacheAdapter {
    pub fn new(store: Arc<dyn CacheStore>, timeout: Duration, metrics: Arc<ServiceMetrics>) -> Self {
        Self {
            store: Some(store),
            timeout,
            metrics,
        }
    }

    /// Adapter without a backend: every read misses, every write is dropped.
    pub fn disabled(metrics: Arc<ServiceMetrics>) -> Self {
        Self {
            store: None,
            timeout: Duration::ZERO,
            metrics,
        }
    }

    /// Build the adapter described by `config`.
    ///
    /// An unusable backend configuration downgrades to [`CacheAdapter::disabled`]
    /// instead of failing startup.
    pub fn from_config(config: &CacheConfig, metrics: Arc<ServiceMetrics>) -> Self {
        if !config.enabled {
            debug!(target: TARGET, "cache disabled by configuration");
            return Self::disabled(metrics);
        }

        let store: Arc<dyn CacheStore> = match config.backend {
            CacheBackendKind::Memory => Arc::new(MemoryStore::new(config.memory_capacity)),
            CacheBackendKind::Redis => match RedisStore::open(&config.redis_url()) {
                Ok(store) => Arc::new(store),
                Err(err) => {
                    warn!(
                        target: TARGET,
                        error = %err,
                        host = %config.host,
                        port = config.port,
                        "redis cache unusable; continuing without cache"
                    );
                    return Self::disabled(metrics);
                }
            },
        };

        Self::new(store, config.timeout, metrics)
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    pub fn backend(&self) -> Option<&'static str> {
        self.store.as_deref().map(|store| store.backend())
    }

    /// Look up `key`, recording exactly one hit or miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> CacheLookup<T> {
        let lookup = self.try_get(key).await;
        if lookup.is_hit() {
            self.metrics.record_cache_hit();
        } else {
            self.metrics.record_cache_miss();
        }
        lookup
    }

    async fn try_get<T: DeserializeOwned>(&self, key: &CacheKey) -> CacheLookup<T> {
        let Some(store) = self.store.as_deref() else {
            return CacheLookup::Miss;
        };

        let rendered = key.render();
        let raw = match self.bounded("get", store.get(&rendered)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheLookup::Miss,
            Err(err) => {
                warn!(
                    target: TARGET,
                    backend = store.backend(),
                    key = key.kind(),
                    error = %err,
                    "cache get failed; treating as miss"
                );
                return CacheLookup::Miss;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => CacheLookup::Hit(value),
            Err(err) => {
                warn!(
                    target: TARGET,
                    backend = store.backend(),
                    key = key.kind(),
                    error = %CacheError::from(err),
                    "cached payload undecodable; treating as miss"
                );
                CacheLookup::Miss
            }
        }
    }

    /// Best-effort write. Failures are logged and dropped.
    pub async fn set<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let Some(store) = self.store.as_deref() else {
            return;
        };

        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    target: TARGET,
                    key = key.kind(),
                    error = %CacheError::from(err),
                    "cache payload not serializable; skipping write"
                );
                return;
            }
        };

        let rendered = key.render();
        if let Err(err) = self
            .bounded("set_ex", store.set_ex(&rendered, payload, ttl))
            .await
        {
            warn!(
                target: TARGET,
                backend = store.backend(),
                key = key.kind(),
                error = %err,
                "cache set failed; write dropped"
            );
        }
    }

    pub async fn health(&self) -> CacheHealth {
        let Some(store) = self.store.as_deref() else {
            return CacheHealth::Disconnected;
        };
        match self.bounded("ping", store.ping()).await {
            Ok(()) => CacheHealth::Healthy,
            Err(err) => {
                debug!(
                    target: TARGET,
                    backend = store.backend(),
                    error = %err,
                    "cache ping failed"
                );
                CacheHealth::Unhealthy
            }
        }
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = Result<T, CacheError>>,
    ) -> Result<T, CacheError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout {
                op,
                timeout_ms: self.timeout.as_millis(),
            }),
        }
    }
}
