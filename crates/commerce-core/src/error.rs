//! # Error Types
//!
//! Domain-level error types for commerce-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  commerce-core errors (this file)                                       │
//! │  └── ValidationError  - Input and query-parameter failures              │
//! │                                                                         │
//! │  commerce-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  commerce-service errors                                                │
//! │  └── ServiceError     - What callers see (NotFound, Conflict, ...)      │
//! │                                                                         │
//! │  Flow: ValidationError ─┐                                               │
//! │                         ├──► ServiceError ──► ErrorCode ──► Caller      │
//! │        DbError ─────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Uniqueness is not checked here. Duplicate names, usernames and emails are
//! rejected by the storage layer and surface as conflicts.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any SQL runs, both for inbound payloads and for named-query
/// parameters such as price bounds or a top-N limit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (malformed UUID, email, phone...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Lower bound of a range is above its upper bound.
    #[error("{field} range is inverted: {min} > {max}")]
    InvertedRange { field: String, min: i64, max: i64 },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::InvertedRange { field, .. } => field,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TooLong {
            field: "first_name".to_string(),
            max: 32,
        };
        assert_eq!(err.to_string(), "first_name must be at most 32 characters");

        let err = ValidationError::InvertedRange {
            field: "price".to_string(),
            min: 500,
            max: 100,
        };
        assert_eq!(err.to_string(), "price range is inverted: 500 > 100");
    }

    #[test]
    fn test_field_accessor() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.field(), "quantity");
    }
}
