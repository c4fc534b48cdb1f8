//! Repository traits describing content storage adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::ContentRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Read access to the content catalog.
///
/// `list_all` returns an owned snapshot in store order; callers may filter and
/// sort it freely without affecting the store.
#[async_trait]
pub trait ContentRepo: Send + Sync {
    async fn list_all(&self) -> Result<Vec<ContentRecord>, RepoError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<ContentRecord>, RepoError>;

    async fn count(&self) -> Result<usize, RepoError>;
}
