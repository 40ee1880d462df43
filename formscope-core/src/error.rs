//! Error types for formscope-core

use thiserror::Error;

/// Main error type for the formscope-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Cache store error
    #[error("cache store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for formscope-core
pub type Result<T> = std::result::Result<T, Error>;
