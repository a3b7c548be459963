//! SQLite implementation of the storage traits, built on `sqlx`.

mod bird_repository;
mod cage_repository;
mod connection;
mod nest_repository;
mod user_repository;

pub use bird_repository::BirdRepository;
pub use cage_repository::CageRepository;
pub use connection::DbConnection;
pub use nest_repository::NestRepository;
pub use user_repository::UserRepository;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

use super::{IntegrityViolation, UniqueViolation};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Translate constraint failures into the typed storage errors
pub(crate) fn map_write_error(err: sqlx::Error) -> anyhow::Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return UniqueViolation(db_err.message().to_string()).into();
        }
        if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
            return IntegrityViolation(db_err.message().to_string()).into();
        }
    }
    err.into()
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .with_context(|| format!("Corrupt date in database: {}", value))
}

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Corrupt timestamp in database: {}", value))
}
