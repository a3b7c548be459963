//! Error taxonomy shared by all registries.

use thiserror::Error;

use crate::storage::{is_integrity_violation, is_unique_violation};

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("A bird with identifier '{0}' already exists")]
    DuplicateIdentifier(String),

    #[error("Cage number '{0}' already exists")]
    DuplicateCageNumber(String),

    #[error("{0}")]
    DuplicateUser(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("Bird has already been sold")]
    AlreadySold,

    #[error("{0}")]
    InUse(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Maps a storage write failure, turning a UNIQUE violation into `duplicate`
    /// and a foreign key or CHECK violation into `integrity`.
    pub fn from_write(
        err: anyhow::Error,
        duplicate: impl FnOnce() -> DomainError,
        integrity: impl FnOnce() -> DomainError,
    ) -> Self {
        if is_unique_violation(&err) {
            duplicate()
        } else if is_integrity_violation(&err) {
            integrity()
        } else {
            DomainError::Internal(err)
        }
    }
}
