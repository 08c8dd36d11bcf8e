//! Error types for sadhana-core

use thiserror::Error;

/// Main error type for the sadhana-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Session not found
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Another session is still running
    #[error("session already in progress: {0}")]
    SessionInProgress(String),

    /// Session was already completed and can no longer change
    #[error("session already completed: {0}")]
    SessionAlreadyCompleted(String),

    /// Session record failed validation at the store boundary
    #[error("invalid session: {0}")]
    InvalidSession(String),
}

/// Result type alias for sadhana-core
pub type Result<T> = std::result::Result<T, Error>;
