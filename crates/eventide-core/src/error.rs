//! Error types for eventide-core

use thiserror::Error;
use uuid::Uuid;

/// Core error type shared by the stores
#[derive(Debug, Error)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Event not found (or owned by another user)
    #[error("event not found: {0}")]
    EventNotFound(Uuid),

    /// User not found
    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    /// Username already taken
    #[error("username already exists: {0}")]
    UsernameTaken(String),

    /// Invalid stored data (corrupt row, bad UUID, malformed JSON column)
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
