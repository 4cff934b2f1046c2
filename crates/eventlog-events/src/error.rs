//! Error types for event store operations.

use eventlog_types::FieldErrors;

/// Errors that can occur during event store operations.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// A database operation failed.
    #[error("event database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No event exists with the given id.
    #[error("event not found: {0}")]
    NotFound(i64),

    /// The submitted fields failed validation. Nothing was written.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
}
