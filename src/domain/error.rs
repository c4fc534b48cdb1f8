use thiserror::Error;

/// Catalog invariant violations detected when a store is built.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("content id must be positive")]
    ZeroId,
    #[error("duplicate content id {id}")]
    DuplicateId { id: u64 },
    #[error("content {id} is invalid: {reason}")]
    InvalidRecord { id: u64, reason: &'static str },
}

impl DomainError {
    pub fn invalid_record(id: u64, reason: &'static str) -> Self {
        Self::InvalidRecord { id, reason }
    }
}
