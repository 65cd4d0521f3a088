//! # Validation Module
//!
//! Input validation rules for Commerce Manager.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Payload deserialization (serde)                               │
//! │  └── Types and required JSON fields                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Lengths, formats, numeric bounds                                   │
//! │  └── Named-query parameters (price range, top-N limit)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── UNIQUE (category name, username, email)                            │
//! │  └── Foreign keys (ON DELETE RESTRICT)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes.

use crate::error::ValidationError;
use crate::MAX_PHONE_DIGITS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required, length-bounded text field.
///
/// ## Example
/// ```rust
/// use commerce_core::validation::validate_name;
///
/// assert!(validate_name("name", "Beverages", 64).is_ok());
/// assert!(validate_name("name", "   ", 64).is_err());
/// assert!(validate_name("name", &"x".repeat(65), 64).is_err());
/// ```
pub fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a required text field with no length bound.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@`
/// - Non-empty local part and domain
/// - No whitespace
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_required("email", email)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(invalid("must look like local@domain")),
    }
}

/// Validates a phone number: 1 to 10 ASCII digits.
///
/// ## Example
/// ```rust
/// use commerce_core::validation::validate_phone;
///
/// assert!(validate_phone("3001234567").is_ok());
/// assert!(validate_phone("300-123").is_err());
/// assert!(validate_phone("30012345678").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    validate_required("phone", phone)?;

    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if phone.len() > MAX_PHONE_DIGITS {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: MAX_PHONE_DIGITS,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a non-negative integer amount (price, stock, sale total).
///
/// ## Example
/// ```rust
/// use commerce_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("price", 0).is_ok());
/// assert!(validate_non_negative("price", -1).is_err());
/// ```
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a sale line quantity (> 0).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates an inclusive price range used by the price filter.
///
/// ## Rules
/// - Both bounds `>= 0`
/// - `min <= max`
pub fn validate_price_range(min: i64, max: i64) -> ValidationResult<()> {
    validate_non_negative("min_price", min)?;
    validate_non_negative("max_price", max)?;

    if min > max {
        return Err(ValidationError::InvertedRange {
            field: "price".to_string(),
            min,
            max,
        });
    }

    Ok(())
}

/// Validates a best-seller limit against the configured cap.
///
/// Zero is accepted and yields an empty ranking.
pub fn validate_top_limit(limit: i64, max: i64) -> ValidationResult<()> {
    if limit < 0 || limit > max {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 0,
            max,
        });
    }
    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a hyphenated UUID string.
///
/// ## Example
/// ```rust
/// use commerce_core::validation::validate_uuid;
///
/// assert!(validate_uuid("product_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("product_id", "not-a-uuid").is_err());
/// assert!(validate_uuid("product_id", "550E8400-E29B-41D4-A716-446655440000").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let parsed = uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    // Stored ids are lowercase hyphenated; any other spelling could never match.
    if parsed.hyphenated().to_string() != id {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a lowercase hyphenated UUID".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Antioquia", 64).is_ok());
        assert!(validate_name("name", "", 64).is_err());
        assert!(validate_name("name", "   ", 64).is_err());
        assert!(validate_name("first_name", &"a".repeat(33), 32).is_err());
        // Characters, not bytes.
        assert!(validate_name("first_name", &"é".repeat(32), 32).is_ok());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("ana.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana@").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email("ana @example.com").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("1").is_ok());
        assert!(validate_phone("3001234567").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("30012345678").is_err());
        assert!(validate_phone("+573001234").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_price_range() {
        assert!(validate_price_range(0, 0).is_ok());
        assert!(validate_price_range(100, 500).is_ok());
        assert!(matches!(
            validate_price_range(500, 100),
            Err(ValidationError::InvertedRange { .. })
        ));
        assert!(matches!(
            validate_price_range(-1, 100),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_top_limit() {
        assert!(validate_top_limit(0, 100).is_ok());
        assert!(validate_top_limit(100, 100).is_ok());
        assert!(validate_top_limit(101, 100).is_err());
        assert!(validate_top_limit(-1, 100).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("id", "").is_err());
        assert!(validate_uuid("id", "123").is_err());
    }

    #[test]
    fn test_validate_uuid_requires_canonical_form() {
        for id in [
            "550E8400-E29B-41D4-A716-446655440000",
            "550e8400e29b41d4a716446655440000",
            "{550e8400-e29b-41d4-a716-446655440000}",
            "urn:uuid:550e8400-e29b-41d4-a716-446655440000",
        ] {
            let err = validate_uuid("id", id).unwrap_err();
            let ValidationError::InvalidFormat { reason, .. } = &err else {
                panic!("{id}: expected InvalidFormat, got {err:?}");
            };
            assert!(reason.contains("lowercase"), "{id}: {reason}");
        }
    }
}
