//! # mtone-gen
//!
//! Synthesizes parametric reference clips for the four Mandarin tones:
//! - [`contour`]: F0 curve per tone (pure functions of the time axis)
//! - [`waveform`]: phase-continuous sine synthesis, fade shaping, int16 quantization
//! - [`wav`]: 16-bit mono PCM output
//! - [`generator`]: writes `tone1.wav`..`tone4.wav` plus the manifest

pub mod contour;
pub mod error;
pub mod generator;
pub mod waveform;
pub mod wav;

pub use error::{Error, Result};
