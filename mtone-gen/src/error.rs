//! Error types for mtone-gen

use thiserror::Error;

/// Main error type for mtone-gen
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration, manifest or other shared-layer error
    #[error(transparent)]
    Common(#[from] mtone_common::Error),

    /// WAV encoding errors
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Contour table export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using mtone-gen Error
pub type Result<T> = std::result::Result<T, Error>;
