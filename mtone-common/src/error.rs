//! Common error types for mtone

use thiserror::Error;

/// Common result type for mtone operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the mtone crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or parameter value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested file or entry not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parse/serialize error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
