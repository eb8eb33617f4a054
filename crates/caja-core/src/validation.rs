//! # Validation Module
//!
//! Input validation utilities for Caja.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI (caja-cli)                                               │
//! │  └── Text → integers (`1000=2`, `--amount 350`)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Denomination membership, non-negative counts                      │
//! │  └── Text limits, non-negative amounts                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (count >= 0)                                                │
//! │  └── Foreign key on denomination                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caja_core::validation::{validate_amount, validate_payee};
//!
//! validate_amount("declared amount", 350).unwrap();
//! validate_payee("Papeleria Lopez").unwrap();
//! assert!(validate_amount("amount", -1).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_DESCRIPTION_LEN, MAX_PAYEE_LEN, MAX_PIECES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a bill count for one denomination.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (denomination unused)
/// - At most [`MAX_PIECES`]
pub fn validate_count(denomination: i64, count: i64) -> ValidationResult<()> {
    if count < 0 {
        return Err(ValidationError::Negative {
            field: format!("count of {}", denomination),
            value: count,
        });
    }

    if count > MAX_PIECES {
        return Err(ValidationError::OutOfRange {
            field: format!("count of {}", denomination),
            min: 0,
            max: MAX_PIECES,
        });
    }

    Ok(())
}

/// Validates a monetary amount in whole currency units.
///
/// ## Example
/// ```rust
/// use caja_core::validation::validate_amount;
///
/// assert!(validate_amount("amount", 0).is_ok());
/// assert!(validate_amount("amount", 640).is_ok());
/// assert!(validate_amount("amount", -5).is_err());
/// ```
pub fn validate_amount(field: &str, amount: i64) -> ValidationResult<()> {
    if amount < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value: amount,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates the payee of an expense.
///
/// ## Rules
/// - At most 100 characters after trimming
/// - May be empty
pub fn validate_payee(payee: &str) -> ValidationResult<()> {
    validate_max_len("payee", payee, MAX_PAYEE_LEN)
}

/// Validates the description of an expense.
///
/// ## Rules
/// - At most 200 characters after trimming
/// - May be empty
pub fn validate_description(description: &str) -> ValidationResult<()> {
    validate_max_len("description", description, MAX_DESCRIPTION_LEN)
}

fn validate_max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a movement id (UUID string format).
///
/// ## Example
/// ```rust
/// use caja_core::validation::validate_movement_id;
///
/// assert!(validate_movement_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_movement_id("not-a-uuid").is_err());
/// ```
pub fn validate_movement_id(id: &str) -> ValidationResult<()> {
    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_count() {
        assert!(validate_count(100, 0).is_ok());
        assert!(validate_count(100, 12).is_ok());
        assert!(matches!(
            validate_count(100, -1),
            Err(ValidationError::Negative { value: -1, .. })
        ));
        assert!(validate_count(1, MAX_PIECES).is_ok());
        assert!(matches!(
            validate_count(1, MAX_PIECES + 1),
            Err(ValidationError::OutOfRange { max: MAX_PIECES, .. })
        ));
        assert!(validate_count(1000, i64::MAX).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("amount", 0).is_ok());
        assert!(validate_amount("amount", 1_000_000).is_ok());
        assert!(validate_amount("amount", -1).is_err());
    }

    #[test]
    fn test_validate_text_limits() {
        assert!(validate_payee("").is_ok());
        assert!(validate_payee(&"a".repeat(100)).is_ok());
        assert!(validate_payee(&"a".repeat(101)).is_err());

        assert!(validate_description(&"ñ".repeat(200)).is_ok());
        assert!(validate_description(&"ñ".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_movement_id() {
        assert!(validate_movement_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_movement_id("").is_err());
        assert!(validate_movement_id("123").is_err());
    }
}
