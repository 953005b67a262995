//! Error types for mtone-eval

use thiserror::Error;

/// Main error type for mtone-eval
#[derive(Error, Debug)]
pub enum Error {
    /// Manifest, results CSV or config error from the shared layer
    #[error(transparent)]
    Common(#[from] mtone_common::Error),

    /// Report export/import errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using mtone-eval Error
pub type Result<T> = std::result::Result<T, Error>;
