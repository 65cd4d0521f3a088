//! # Service Error Type
//!
//! Unified error type returned by every service operation.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Commerce Manager                       │
//! │                                                                         │
//! │  Caller                      Service Layer                              │
//! │  ──────                      ─────────────                              │
//! │                                                                         │
//! │  catalog.create_category(new)                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │  ServiceResult<T>                                                │   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  Payload invalid? ── ValidationError ───────► Validation         │   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  Row missing?  ───── DbError::NotFound ─────► NotFound           │   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  Constraint hit? ─── Unique / ForeignKey ───► Conflict           │   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  Anything else ──── DbError::* ─────────────► Storage            │   │
//! │  │  Hashing failed ─── argon2 error ───────────► Internal           │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  match err.code() {                                                     │
//! │    ErrorCode::NotFound => ...,                                          │
//! │    ErrorCode::Conflict => ...,                                          │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use commerce_core::ValidationError;
use commerce_db::DbError;

/// Error returned by service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The addressed row, or a parent it references, does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A unique or foreign-key constraint rejected the write.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Caller input failed validation before any storage access.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Any other storage failure. Never retried here.
    #[error("Storage error: {0}")]
    Storage(DbError),

    /// A failure inside the service itself, such as password hashing.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Machine-readable error codes.
///
/// ## Serialization
/// ```json
/// { "code": "NOT_FOUND", "message": "Product not found: 6f1c..." }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    Conflict,
    ValidationError,
    StorageError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable view of a [`ServiceError`] for external callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl ServiceError {
    /// Creates a not found error.
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::Internal {
            message: message.into(),
        }
    }

    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::NotFound { .. } => ErrorCode::NotFound,
            ServiceError::Conflict { .. } => ErrorCode::Conflict,
            ServiceError::Validation(_) => ErrorCode::ValidationError,
            ServiceError::Storage(_) => ErrorCode::StorageError,
            ServiceError::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Builds the `{ code, message }` body.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// Converts database errors to service errors.
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            DbError::UniqueViolation { field } => {
                warn!(field = %field, "Unique constraint rejected write");
                ServiceError::Conflict {
                    message: format!("{field} already exists"),
                }
            }
            DbError::ForeignKeyViolation { message } => {
                warn!(message = %message, "Foreign key constraint rejected write");
                ServiceError::Conflict {
                    message: "Row is still referenced by dependent rows".to_string(),
                }
            }
            other => {
                error!(error = %other, "Storage operation failed");
                ServiceError::Storage(other)
            }
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
