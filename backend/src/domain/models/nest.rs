use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::cage::CageDetails;
use crate::domain::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestStatus {
    Active,
    Completed,
    Cancelled,
}

impl NestStatus {
    pub fn parse(input: &str) -> DomainResult<Self> {
        match input.trim().to_lowercase().as_str() {
            "active" => Ok(NestStatus::Active),
            "completed" => Ok(NestStatus::Completed),
            "cancelled" => Ok(NestStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "Nest status must be active, completed or cancelled (got '{}')",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NestStatus::Active => "active",
            NestStatus::Completed => "completed",
            NestStatus::Cancelled => "cancelled",
        }
    }
}

/// A clutch recorded for a cage.
///
/// `cage_id` is the authoritative reference; `cage_number` is a display copy
/// refreshed from the cage whenever the nest is read.
#[derive(Debug, Clone, PartialEq)]
pub struct Nest {
    pub id: String,
    pub cage_id: String,
    pub cage_number: String,
    pub number_of_eggs: u32,
    pub fertilized_eggs: u32,
    pub extracted_eggs: u32,
    pub birds_exited: u32,
    pub exclusion_date: NaiveDate,
    pub first_bird_exit_date: Option<NaiveDate>,
    pub status: NestStatus,
    pub notes: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Nest {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NestDetails {
    pub nest: Nest,
    pub cage: CageDetails,
}
