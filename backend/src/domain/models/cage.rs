use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::bird::Bird;
use crate::domain::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CageStatus {
    Active,
    Inactive,
}

impl CageStatus {
    pub fn parse(input: &str) -> DomainResult<Self> {
        match input.trim().to_lowercase().as_str() {
            "active" => Ok(CageStatus::Active),
            "inactive" => Ok(CageStatus::Inactive),
            other => Err(DomainError::validation(format!(
                "Cage status must be active or inactive (got '{}')",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CageStatus::Active => "active",
            CageStatus::Inactive => "inactive",
        }
    }
}

/// A persisted breeding pair
#[derive(Debug, Clone, PartialEq)]
pub struct Cage {
    pub id: String,
    pub cage_number: String,
    pub male_id: String,
    pub female_id: String,
    pub species: String,
    pub status: CageStatus,
    pub notes: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cage {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// A cage with its male and female resolved
#[derive(Debug, Clone, PartialEq)]
pub struct CageDetails {
    pub cage: Cage,
    pub male: Bird,
    pub female: Bird,
}
