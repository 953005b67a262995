//! # mtone Common Library
//!
//! Shared code for the Mandarin tone perception tools including:
//! - The `Tone` label type (exactly four lexical tones)
//! - Error types
//! - Configuration loading and synthesis parameter validation
//! - Fade curve shapes
//! - Manifest (audio filename → ground-truth tone)
//! - Classification record CSV interchange
//! - Tracing initialization

pub mod config;
pub mod error;
pub mod fade_curves;
pub mod logging;
pub mod manifest;
pub mod params;
pub mod record;
pub mod tone;

pub use error::{Error, Result};
pub use fade_curves::FadeCurve;
pub use manifest::Manifest;
pub use params::SynthesisParams;
pub use record::ClassificationRecord;
pub use tone::Tone;
