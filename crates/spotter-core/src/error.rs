//! Error types for spotter-core

use thiserror::Error;

/// Result type alias using spotter-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in spotter-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A session draft is missing required fields
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Record store read or write failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The acting user does not own the record
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A destructive call was issued without explicit confirmation
    #[error("Confirmation required before {0}")]
    ConfirmationRequired(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reasons a session draft cannot be committed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("session date is required")]
    MissingDate,
    #[error("body part is required")]
    MissingBodyPart,
    #[error("session needs at least one participant")]
    NoParticipants,
    #[error("participant #{0} has no selected user")]
    MissingParticipant(usize),
    #[error("no active user profile")]
    NoActiveUser,
}
