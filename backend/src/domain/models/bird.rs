use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use uuid::Uuid;

use crate::domain::error::{DomainError, DomainResult};

pub const DEFAULT_STATUS: &str = "active";
pub const SOLD_STATUS: &str = "sold";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Case-insensitive parse; a missing or blank value means `Unknown`.
    pub fn normalize(input: Option<&str>) -> DomainResult<Self> {
        let value = match input.map(str::trim) {
            None | Some("") => return Ok(Gender::Unknown),
            Some(value) => value.to_lowercase(),
        };
        match value.as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "unknown" => Ok(Gender::Unknown),
            other => Err(DomainError::validation(format!(
                "Gender must be one of male, female, unknown (got '{}')",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared identity of an external buyer
#[derive(Debug, Clone, PartialEq)]
pub struct BuyerInfo {
    pub national_id: String,
    pub full_name: String,
    pub phone: String,
}

/// Where a bird stands in the sale/transfer state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    ListedForSale,
    Sold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub id: String,
    pub identifier: String,
    pub species: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub status: String,
    pub ring: Option<String>,
    pub details: Option<String>,
    pub sold: bool,
    pub for_sale: bool,
    pub asking_price: Option<f64>,
    pub sold_date: Option<DateTime<Utc>>,
    pub sold_price: Option<f64>,
    pub buyer_info: Option<BuyerInfo>,
    pub owner_id: String,
    pub seller_id: Option<String>,
    pub mother_id: Option<String>,
    pub father_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bird {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.sold {
            Lifecycle::Sold
        } else if self.for_sale {
            Lifecycle::ListedForSale
        } else {
            Lifecycle::Active
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_normalization_is_case_insensitive() {
        assert_eq!(Gender::normalize(Some("Male")).unwrap(), Gender::Male);
        assert_eq!(Gender::normalize(Some(" FEMALE ")).unwrap(), Gender::Female);
        assert_eq!(Gender::normalize(Some("unknown")).unwrap(), Gender::Unknown);
        assert_eq!(Gender::normalize(None).unwrap(), Gender::Unknown);
        assert_eq!(Gender::normalize(Some("")).unwrap(), Gender::Unknown);
    }

    #[test]
    fn test_gender_rejects_other_values() {
        let err = Gender::normalize(Some("hen")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
