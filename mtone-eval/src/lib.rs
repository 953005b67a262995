//! # mtone-eval
//!
//! Evaluates how well audio-capable models perceive Mandarin tone:
//! - [`classifier`]: free-text model response → tone label + pinyin
//! - [`scoring`]: confusion matrix and precision/recall/F1 per model
//! - [`report`]: text report, macro-F1 leaderboard, JSON export
//! - [`query`]: model-query seam and the OpenAI-compatible HTTP client
//! - [`runner`]: batch evaluation over models × manifest entries

pub mod classifier;
pub mod error;
pub mod query;
pub mod report;
pub mod runner;
pub mod scoring;

pub use classifier::{classify, Classification};
pub use error::{Error, Result};
pub use query::{QueryError, ToneQuerier};
pub use scoring::{ConfusionMatrix, ModelScore, ToneMetrics};
