//! Field validators applied on create and re-run on every update.

use chrono::{DateTime, NaiveDate};

use super::error::{DomainError, DomainResult};

/// Trimmed, non-empty text
pub fn required_text(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trimmed text; blank input becomes `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
pub fn parse_date(field: &str, value: &str) -> DomainResult<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| {
            DomainError::validation(format!(
                "{} must be a date (YYYY-MM-DD or RFC 3339), got '{}'",
                field, value
            ))
        })
}

pub fn optional_date(field: &str, value: Option<String>) -> DomainResult<Option<NaiveDate>> {
    match optional_text(value) {
        Some(v) => parse_date(field, &v).map(Some),
        None => Ok(None),
    }
}

pub fn non_negative_count(field: &str, value: i64) -> DomainResult<u32> {
    if value < 0 {
        return Err(DomainError::validation(format!("{} cannot be negative", field)));
    }
    u32::try_from(value).map_err(|_| DomainError::validation(format!("{} is too large", field)))
}

pub fn non_negative_amount(field: &str, value: f64) -> DomainResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_date("birthDate", "2024-03-01").unwrap(), expected);
        assert_eq!(parse_date("birthDate", "2024-03-01T10:00:00Z").unwrap(), expected);
        assert!(parse_date("birthDate", "01/03/2024").is_err());
        assert!(parse_date("birthDate", "  ").is_err());
    }

    #[test]
    fn test_counts_and_amounts() {
        assert_eq!(non_negative_count("numberOfEggs", 0).unwrap(), 0);
        assert!(non_negative_count("numberOfEggs", -1).is_err());
        assert!(non_negative_amount("price", -0.5).is_err());
        assert!(non_negative_amount("price", f64::NAN).is_err());
        assert_eq!(non_negative_amount("price", 12.5).unwrap(), 12.5);
    }

    #[test]
    fn test_text_helpers() {
        assert_eq!(required_text("species", "  Canary ").unwrap(), "Canary");
        assert!(required_text("species", "   ").is_err());
        assert_eq!(optional_text(Some("   ".to_string())), None);
        assert_eq!(optional_text(Some(" R-12 ".to_string())), Some("R-12".to_string()));
    }
}
