//! Common error types for memerank

use thiserror::Error;

/// Common result type for memerank operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the memerank service
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rating outside the accepted 1-5 range
    #[error("Invalid rating: {0} (must be between 1 and 5)")]
    InvalidRating(u8),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
