//! In-process content store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::repos::{ContentRepo, RepoError};
use crate::domain::catalog::{seed_catalog, validate_catalog};
use crate::domain::entities::ContentRecord;
use crate::domain::error::DomainError;

/// Immutable catalog shared by every request.
///
/// Readers get owned copies, so filtering and sorting downstream can never
/// reorder the store.
#[derive(Clone)]
pub struct InMemoryContentStore {
    records: Arc<[ContentRecord]>,
}

impl InMemoryContentStore {
    pub fn new(records: Vec<ContentRecord>) -> Result<Self, DomainError> {
        validate_catalog(&records)?;
        Ok(Self {
            records: records.into(),
        })
    }

    pub fn seeded() -> Result<Self, DomainError> {
        Self::new(seed_catalog())
    }
}

#[async_trait]
impl ContentRepo for InMemoryContentStore {
    async fn list_all(&self) -> Result<Vec<ContentRecord>, RepoError> {
        Ok(self.records.to_vec())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<ContentRecord>, RepoError> {
        Ok(self.records.iter().find(|record| record.id == id).cloned())
    }

    async fn count(&self) -> Result<usize, RepoError> {
        Ok(self.records.len())
    }
}
