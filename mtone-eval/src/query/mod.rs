//! Model query seam
//!
//! [`ToneQuerier`] sends one audio clip plus [`TONE_PROMPT`] to one model and
//! returns the raw reply text. The batch runner only depends on this trait;
//! [`http::HttpQuerier`] is the production implementation.

pub mod http;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub use http::{HttpQuerier, Provider};

/// Instruction text sent with every clip
pub const TONE_PROMPT: &str = "In Mandarin Chinese, syllables can have one of four lexical tones based on pitch contour (we ignore the 5th, neutral tone):
- Tone 1: flat, relatively high pitch
- Tone 2: rising pitch
- Tone 3: pitch dips then rises
- Tone 4: pitch falls from high to low

Listen to the attached audio. It is a single syllable with one of these four pitch contours.

Reply with:
1) The pinyin you heard, including the tone number (e.g. cai1, ma2, lü3).
2) The tone number alone: 1, 2, 3, or 4.";

/// Model query errors
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Failed to read audio {path}: {source}")]
    Audio {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported model id '{0}' (expected openai/<model> or gemini/<model>)")]
    UnsupportedModel(String),

    #[error("No API key configured for {0}")]
    MissingApiKey(&'static str),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Sends one clip to one model
#[async_trait]
pub trait ToneQuerier: Send + Sync {
    /// Raw reply text; an empty string when the model answered with no text
    async fn query(&self, model: &str, audio_path: &Path) -> Result<String, QueryError>;
}
