//! Error types for docvault.

use thiserror::Error;

/// Result type alias using docvault's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for docvault operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document not found
    #[error("Document not found: {0}")]
    DocumentNotFound(uuid::Uuid),

    /// Caller lacks rights to the record or operation
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Invalid input rejected before any I/O
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Object-storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Upload targeted a container that should already exist but does not.
    /// Signals a skipped or silently failed allocation step.
    #[error("Expected existing container: {0}")]
    MissingContainer(String),

    /// Metadata attachment failed after the blob itself was written
    #[error("Metadata attachment failed for {0}: {1}")]
    MetadataAttachment(String, String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
