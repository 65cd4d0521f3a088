//! # Storage Errors
//!
//! What can go wrong below the service layer, with SQLite constraint
//! failures split out so the service can report them as conflicts.
//!
//! ```text
//! sqlx::Error
//!   ├── RowNotFound ............................ NotFound
//!   ├── Database(kind = UniqueViolation) ....... UniqueViolation { field }
//!   ├── Database(kind = ForeignKeyViolation) ... ForeignKeyViolation
//!   ├── Database(kind = CheckViolation) ........ CheckViolation
//!   ├── Database(other) ........................ QueryFailed
//!   ├── PoolTimedOut ........................... PoolExhausted
//!   ├── PoolClosed ............................. ConnectionFailed
//!   └── anything else .......................... Internal
//! ```
//!
//! `commerce-service` turns `UniqueViolation` and `ForeignKeyViolation` into
//! `Conflict`, keeps `NotFound`, and reports the rest as storage failures.

use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// Update or delete matched no row.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the write.
    ///
    /// `field` is the `table.column` SQLite names, e.g. `users.email` or
    /// `categories.name`.
    #[error("{field} is already taken")]
    UniqueViolation { field: String },

    /// A RESTRICT foreign key rejected a delete, or an insert referenced a
    /// parent that disappeared after it was resolved.
    #[error("Row is still referenced: {message}")]
    ForeignKeyViolation { message: String },

    /// Negative stock, non-positive quantity and the like. Validation
    /// normally catches these first.
    #[error("Row rejected by CHECK constraint: {message}")]
    CheckViolation { message: String },

    #[error("Could not open database: {0}")]
    ConnectionFailed(String),

    #[error("Schema migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected the statement for a non-constraint reason.
    #[error("Statement failed: {0}")]
    QueryFailed(String),

    #[error("Timed out waiting for a pooled connection")]
    PoolExhausted,

    #[error("Unexpected storage error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    fn from_database(err: &dyn DatabaseError) -> Self {
        let message = err.message().to_string();
        match err.kind() {
            ErrorKind::UniqueViolation => {
                // "UNIQUE constraint failed: users.email"
                let field = message
                    .rsplit_once(": ")
                    .map(|(_, column)| column.to_string())
                    .unwrap_or_else(|| message.clone());
                DbError::UniqueViolation { field }
            }
            ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
            ErrorKind::CheckViolation => DbError::CheckViolation { message },
            _ => DbError::QueryFailed(message),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "?"),
            sqlx::Error::Database(db_err) => DbError::from_database(db_err.as_ref()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => {
                DbError::ConnectionFailed("connection pool has been closed".to_string())
            }
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("Store", "north");
        assert_eq!(err.to_string(), "Store north does not exist");
    }
}
