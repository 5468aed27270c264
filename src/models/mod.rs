// Wire-format contracts shared by the insight service and the dashboard client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum accepted length for the name/location fields, after trimming.
pub const FIELD_MAX_LEN: usize = 100;

/// Field-level validation failure for form/body fields
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{0} must be at most 100 characters")]
    TooLong(&'static str),
}

/// Validate a single name/location field. Returns the trimmed value.
///
/// Used both by the service (request validation) and by the client
/// (pre-flight form validation), so the two sides can never disagree
/// on what a well-formed field is.
pub fn validate_field(field: &'static str, value: &str) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required(field));
    }
    if trimmed.chars().count() > FIELD_MAX_LEN {
        return Err(FieldError::TooLong(field));
    }
    Ok(trimmed.to_string())
}

/// A business lookup request. Ephemeral; constructed per request and never
/// persisted anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessQuery {
    pub name: String,
    pub location: String,
}

/// The canonical result record. Either fully populated or absent; no code
/// path constructs a partial record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessInsight {
    pub name: String,
    pub location: String,
    pub rating: f64,
    pub reviews: u32,
    pub headline: String,
    /// RFC 3339 timestamp of when the record was synthesized
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_field_trims() {
        let result = validate_field("name", "  Joe's Pizza  ");
        assert_eq!(result, Ok("Joe's Pizza".to_string()));
    }

    #[test]
    fn test_validate_field_rejects_blank() {
        assert_eq!(validate_field("name", ""), Err(FieldError::Required("name")));
        assert_eq!(
            validate_field("name", "   \t "),
            Err(FieldError::Required("name"))
        );
    }

    #[test]
    fn test_validate_field_rejects_oversized() {
        let long = "x".repeat(FIELD_MAX_LEN + 1);
        assert_eq!(
            validate_field("location", &long),
            Err(FieldError::TooLong("location"))
        );
    }

    #[test]
    fn test_validate_field_accepts_max_length() {
        let max = "x".repeat(FIELD_MAX_LEN);
        assert!(validate_field("name", &max).is_ok());
    }

    #[test]
    fn test_insight_deserialization_requires_all_fields() {
        let partial = r#"{"name":"Joe's Pizza","location":"Austin","rating":4.5}"#;
        assert!(serde_json::from_str::<BusinessInsight>(partial).is_err());

        let full = r#"{
            "name":"Joe's Pizza",
            "location":"Austin",
            "rating":4.5,
            "reviews":156,
            "headline":"h",
            "timestamp":"2025-01-01T00:00:00Z"
        }"#;
        let insight: BusinessInsight = serde_json::from_str(full).expect("full record parses");
        assert_eq!(insight.reviews, 156);
    }

    #[test]
    fn test_insight_deserialization_ignores_extra_keys() {
        // Server responses carry a `success` flag the client does not model
        let body = r#"{
            "name":"n","location":"l","rating":4.1,"reviews":45,
            "headline":"h","timestamp":"t","success":true
        }"#;
        assert!(serde_json::from_str::<BusinessInsight>(body).is_ok());
    }
}
