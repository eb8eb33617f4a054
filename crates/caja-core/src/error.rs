//! # Error Types
//!
//! Domain-specific error types for caja-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  caja-core errors (this file)                                          │
//! │  ├── CoreError        - Ledger rule violations, missing movements      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  caja-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CliError → Terminal     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is recoverable: the operation that produced it changed nothing.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Applying a delta would drive a denomination below zero.
    ///
    /// ## User Workflow
    /// ```text
    /// Expense uses {100: 2}
    ///      │
    ///      ▼
    /// Drawer holds: 100 × 1
    ///      │
    ///      ▼
    /// InsufficientStock { denomination: 100, available: 1, requested: 2 }
    ///      │
    ///      ▼
    /// Operator sees: "Not enough bills of 100: available 1, requested 2"
    /// ```
    #[error("Not enough bills of {denomination}: available {available}, requested {requested}")]
    InsufficientStock {
        denomination: i64,
        available: i64,
        requested: i64,
    },

    /// Applying a delta would push a denomination past [`crate::MAX_PIECES`].
    #[error("Too many bills of {denomination}: holding {available}, adding {added} exceeds {max}")]
    StockLimit {
        denomination: i64,
        available: i64,
        added: i64,
        max: i64,
    },

    /// A movement id does not exist (or is not of the expected kind).
    #[error("{kind} not found: {id}")]
    MovementNotFound { kind: String, id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a MovementNotFound error.
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::MovementNotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the boundary, before any inventory is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A key is not part of the denomination set.
    #[error("{value} is not a recognized denomination")]
    UnknownDenomination { value: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. a `denomination=count` pair that does not parse).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The same key appears twice.
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            denomination: 100,
            available: 1,
            requested: 2,
        };
        assert_eq!(
            err.to_string(),
            "Not enough bills of 100: available 1, requested 2"
        );

        let err = CoreError::not_found("Deposit", "abc");
        assert_eq!(err.to_string(), "Deposit not found: abc");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::UnknownDenomination { value: 3 };
        assert_eq!(err.to_string(), "3 is not a recognized denomination");

        let err = ValidationError::Negative {
            field: "count of 50".to_string(),
            value: -1,
        };
        assert_eq!(err.to_string(), "count of 50 must not be negative (got -1)");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::UnknownDenomination { value: 7 };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
