use common::storage::StoreError;
use thiserror::Error;

use crate::cascade::CascadeError;
use crate::codec::DecodeError;
use crate::entity::EntityRef;

/// Errors returned by repositories and the cascade coordinator.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Input failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(EntityRef),

    /// A referenced entity does not exist.
    #[error("referenced {0} does not exist")]
    ForeignKey(EntityRef),

    /// The key is already taken.
    #[error("{0} already exists")]
    Conflict(String),

    #[error(transparent)]
    Cascade(#[from] CascadeError),

    /// The store returned an item this version cannot read.
    #[error("corrupt item: {0}")]
    Decode(#[from] DecodeError),

    /// Transport failure or timeout. Safe to retry.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for RepoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConditionFailed(key) => RepoError::Conflict(format!("item {key}")),
            StoreError::Unavailable(msg) => RepoError::StoreUnavailable(msg),
            StoreError::InvalidItem(msg) => RepoError::Internal(msg),
            other => RepoError::StoreUnavailable(other.to_string()),
        }
    }
}
