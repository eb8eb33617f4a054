//! # CLI Error Type
//!
//! Unified error type for subcommands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Caja                                   │
//! │                                                                         │
//! │  caja expense --bill 100=2 ...                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Subcommand handler                                              │  │
//! │  │  CliResult<()>                                                   │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage fault? ──── DbError::QueryFailed("...") ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Ledger rule? ────── CoreError::InsufficientStock ─ CliError ──►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr:  error[INSUFFICIENT_STOCK]: Not enough bills of 100: ...      │
//! │  exit:    4                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With `--json` the same error is printed to stdout as
//! `{"code": "INSUFFICIENT_STOCK", "message": "..."}`.

use std::fmt;
use std::process::ExitCode;

use caja_core::{CoreError, ValidationError};
use caja_db::DbError;
use serde::Serialize;

/// Error returned from subcommands.
#[derive(Debug, Clone, Serialize)]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes, one exit status each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Movement id does not exist (exit 3)
    NotFound,

    /// Input rejected before anything was touched (exit 2)
    ValidationError,

    /// Drawer lacks the bills an operation needs (exit 4)
    InsufficientStock,

    /// Storage failed (exit 5)
    DatabaseError,

    /// Configuration could not be resolved (exit 6)
    ConfigError,

    /// Anything else (exit 1)
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Process exit status for this code.
    pub fn exit_status(&self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::InsufficientStock => 4,
            ErrorCode::DatabaseError => 5,
            ErrorCode::ConfigError => 6,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ConfigError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code.exit_status())
    }
}

/// Converts storage errors.
impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => CliError::from(core),
            DbError::NotFound { entity, id } => {
                CliError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { field, value } => CliError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                CliError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConnectionFailed(e) => CliError::new(
                ErrorCode::DatabaseError,
                format!("Database connection failed: {}", e),
            ),
            DbError::MigrationFailed(e) => CliError::new(
                ErrorCode::DatabaseError,
                format!("Database migration failed: {}", e),
            ),
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                CliError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Corrupt(e) => {
                CliError::new(ErrorCode::DatabaseError, format!("Stored data is corrupt: {}", e))
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts ledger rule errors.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock { .. } => {
                CliError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::StockLimit { .. } => CliError::validation(err.to_string()),
            CoreError::MovementNotFound { .. } => {
                CliError::new(ErrorCode::NotFound, err.to_string())
            }
            CoreError::Validation(e) => CliError::from(e),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("Could not encode output: {}", err))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for subcommands.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_keeps_core_message() {
        let err: CliError = DbError::from(CoreError::InsufficientStock {
            denomination: 100,
            available: 1,
            requested: 2,
        })
        .into();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Not enough bills of 100: available 1, requested 2");
        assert_eq!(err.code.exit_status(), 4);
    }

    #[test]
    fn test_not_found_maps_from_both_layers() {
        let core: CliError = DbError::from(CoreError::not_found("Deposit", "abc")).into();
        let db: CliError = DbError::NotFound {
            entity: "Movement".to_string(),
            id: "abc".to_string(),
        }
        .into();

        assert_eq!(core.code, ErrorCode::NotFound);
        assert_eq!(db.code, ErrorCode::NotFound);
        assert_eq!(core.message, "Deposit not found: abc");
    }

    #[test]
    fn test_stock_limit_is_a_validation_failure() {
        let err: CliError = DbError::from(CoreError::StockLimit {
            denomination: 1,
            available: 5,
            added: 1,
            max: 5,
        })
        .into();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.starts_with("Too many bills of 1"));
    }

    #[test]
    fn test_json_shape() {
        let err = CliError::validation("bad");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "bad");
    }

    #[test]
    fn test_display() {
        let err = CliError::config("no home directory");
        assert_eq!(err.to_string(), "error[CONFIG_ERROR]: no home directory");
    }
}
