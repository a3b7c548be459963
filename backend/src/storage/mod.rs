//! # Storage Module
//!
//! Persistence for birds, cages, nests and users.
//!
//! The domain layer only sees the traits in [`traits`]; the SQLite
//! implementation lives in [`sqlite`]. Uniqueness of bird identifiers, cage
//! numbers, national ids and emails is enforced by the database itself, and
//! repositories surface those failures as typed errors so services can report
//! them the same way as their own pre-checks.

pub mod sqlite;
pub mod traits;

pub use sqlite::DbConnection;
pub use traits::{
    BirdListing, BirdStorage, CageStorage, Connection, NestStorage, SoldTotals, UserStorage,
};

/// A write was rejected by a UNIQUE constraint
#[derive(Debug, thiserror::Error)]
#[error("unique constraint violated: {0}")]
pub struct UniqueViolation(pub String);

/// A write or delete was rejected by a foreign key or CHECK constraint
#[derive(Debug, thiserror::Error)]
#[error("integrity constraint violated: {0}")]
pub struct IntegrityViolation(pub String);

pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<UniqueViolation>().is_some()
}

pub fn is_integrity_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<IntegrityViolation>().is_some()
}
