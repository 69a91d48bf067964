//! Error types for the database client

use thiserror::Error;

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// Error with database transaction
    #[error("Database transaction error: {0}")]
    TransactionError(String),

    /// Error decoding a row into a domain value
    #[error("Database decode error: {0}")]
    DecodeError(String),
}

impl DbError {
    /// Whether the failed statement may succeed on a clean retry.
    ///
    /// Covers SQLite lock contention and the serialization-failure class
    /// (SQLSTATE 40001) reported by server backends.
    pub fn is_retryable(&self) -> bool {
        match self {
            DbError::SqlxError(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some("40001")
                    || db_err.message().contains("database is locked")
            }
            DbError::QueryError(message) | DbError::TransactionError(message) => {
                message.contains("database is locked") || message.contains("40001")
            }
            _ => false,
        }
    }

    /// Whether the failure was a UNIQUE constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DbError::SqlxError(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some("23505")
                    || db_err.message().contains("UNIQUE constraint failed")
            }
            DbError::QueryError(message) => {
                message.contains("UNIQUE constraint failed") || message.contains("23505")
            }
            _ => false,
        }
    }
}
