//! # Application Error Type
//!
//! Every command returns [`AppResult`]. The menu prints `message` and goes
//! back to the prompt; only startup errors end the process.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ─► CoreError ─┐                                        │
//! │  sqlx::Error ─────► DbError ───┤                                        │
//! │  io::Error ───────► SinkError ─┼──► AppError { code, message }          │
//! │  toml / io ───────► ConfigError┘         │                              │
//! │                                          ▼                              │
//! │                            menu: "❌ {message}"  (loop continues)       │
//! │                            main: exit status 1   (startup only)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use shopkeep_core::{CoreError, ValidationError};
use shopkeep_db::DbError;

use crate::config::ConfigError;
use crate::sink::SinkError;

/// Error surfaced to the operator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message, printed after "❌ "
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product, bill or customer does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Not enough units on the shelf
    InsufficientStock,

    /// Customer phone already registered
    AlreadyExists,

    /// Ledger row exists but its receipt does not
    DocumentMissing,

    /// Receipt could not be written, read or shown
    DocumentError,

    /// Business rule other than the above
    BusinessLogic,

    DatabaseError,

    ConfigError,

    /// Operator input ended (Ctrl-D / closed pipe)
    InputClosed,

    Io,

    Internal,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }

    pub fn input_closed() -> Self {
        AppError::new(ErrorCode::InputClosed, "Input closed")
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(name) => AppError::not_found("Product", &name),
            CoreError::BillNotFound(query) => AppError::not_found("Bill", &query),
            CoreError::InsufficientStock {
                product,
                available,
                requested,
            } => AppError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Not enough stock available! {}: {} left, {} requested",
                    product, available, requested
                ),
            ),
            CoreError::CustomerExists { phone } => AppError::new(
                ErrorCode::AlreadyExists,
                format!("Customer already exists: {}", phone),
            ),
            CoreError::EmptySale => AppError::new(ErrorCode::BusinessLogic, "No items in cart"),
            CoreError::SaleTooLarge { max } => AppError::new(
                ErrorCode::BusinessLogic,
                format!("A sale cannot have more than {} lines", max),
            ),
            CoreError::BillSequenceExhausted => {
                tracing::error!("Bill number sequence exhausted");
                AppError::internal("Bill numbers exhausted")
            }
            CoreError::Validation(e) => AppError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Rule(core) => core.into(),
            DbError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => AppError::new(
                ErrorCode::AlreadyExists,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::CheckViolation(e) => {
                tracing::error!("Check constraint failed: {}", e);
                AppError::validation("Value rejected by the database")
            }
            DbError::ConnectionFailed(e) => {
                AppError::new(ErrorCode::DatabaseError, format!("Database connection failed: {}", e))
            }
            DbError::MigrationFailed(e) => {
                AppError::new(ErrorCode::DatabaseError, format!("Database migration failed: {}", e))
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                AppError::new(ErrorCode::DatabaseError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database is busy")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<SinkError> for AppError {
    fn from(err: SinkError) -> Self {
        tracing::error!(error = %err, "Receipt sink failed");
        AppError::new(ErrorCode::DocumentError, err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorCode::Io, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
