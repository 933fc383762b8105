//! Validation utilities for VitalSim Core
//!
//! Range checks shared by the configuration surface, the device catalog and
//! the settings loader. Limits come from `config::constants` so the same
//! bounds are enforced everywhere.

use crate::config::constants::limits::{MAX_PROBABILITY, MIN_PROBABILITY};
use std::fmt;

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value out of valid range
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },
    /// Value is NaN or infinite
    NotFinite { field: String, value: f64 },
    /// Required text or collection is empty
    Empty { field: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::OutOfRange { field, value, min, max } => {
                write!(f, "Field '{}' value '{}' is out of range [{}, {}]", field, value, min, max)
            }
            ValidationError::NotFinite { field, value } => {
                write!(f, "Field '{}' value '{}' is not a finite number", field, value)
            }
            ValidationError::Empty { field } => write!(f, "Field '{}' must not be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate that a numeric value lies in `[min, max]`
pub fn validate_range<T>(field: &str, value: T, min: T, max: T) -> ValidationResult<T>
where
    T: PartialOrd + fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(value)
}

/// Validate a probability-like fraction in `[0, 1]`
pub fn validate_fraction(field: &str, value: f64) -> ValidationResult<f64> {
    validate_finite(field, value)?;
    validate_range(field, value, MIN_PROBABILITY, MAX_PROBABILITY)
}

/// Reject NaN and infinities
pub fn validate_finite(field: &str, value: f64) -> ValidationResult<f64> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Reject empty or whitespace-only identifiers
pub fn validate_non_empty(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_range_bounds_inclusive() {
        assert_eq!(validate_range("tick", 1u32, 1, 3600), Ok(1));
        assert_eq!(validate_range("tick", 3600u32, 1, 3600), Ok(3600));
        assert!(validate_range("tick", 0u32, 1, 3600).is_err());
        assert!(validate_range("tick", 3601u32, 1, 3600).is_err());
    }

    #[test]
    fn test_validate_fraction() {
        assert!(validate_fraction("p", 0.0).is_ok());
        assert!(validate_fraction("p", 1.0).is_ok());
        assert!(validate_fraction("p", -0.01).is_err());
        assert!(matches!(
            validate_fraction("p", f64::NAN),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_error_display_names_field() {
        let err = validate_range("duration_minutes", 2000u32, 1, 1440).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("duration_minutes"));
        assert!(msg.contains("2000"));
        assert!(msg.contains("1440"));
    }

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty("patient_id", "patient-1").is_ok());
        assert!(validate_non_empty("patient_id", "   ").is_err());
    }
}
