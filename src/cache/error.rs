use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation `{op}` timed out after {timeout_ms} ms")]
    Timeout { op: &'static str, timeout_ms: u128 },
    #[error("cache backend error: {0}")]
    Backend(String),
    #[error("cache payload could not be encoded or decoded: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
