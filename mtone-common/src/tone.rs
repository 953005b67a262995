//! Mandarin lexical tone labels
//!
//! Exactly four tones are modelled. There is no neutral (fifth) tone.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One of the four Mandarin lexical tones
///
/// Serialized as its number (1-4) so manifests and reports stay readable:
/// `{"tone1.wav": 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tone {
    /// Tone 1: flat, relatively high pitch
    One,
    /// Tone 2: rising pitch
    Two,
    /// Tone 3: pitch dips then rises
    Three,
    /// Tone 4: pitch falls from high to low
    Four,
}

impl Tone {
    /// All tones in numeric order
    pub const ALL: [Tone; 4] = [Tone::One, Tone::Two, Tone::Three, Tone::Four];

    /// Tone number (1-4)
    pub fn number(&self) -> u8 {
        match self {
            Tone::One => 1,
            Tone::Two => 2,
            Tone::Three => 3,
            Tone::Four => 4,
        }
    }

    /// Zero-based index into 4-element tables (confusion matrix rows/columns)
    pub fn index(&self) -> usize {
        self.number() as usize - 1
    }

    /// Parse a predicted-tone label
    ///
    /// Accepts exactly "1".."4" after trimming surrounding whitespace.
    /// Anything else (including the empty "no classification" label) is `None`.
    pub fn from_label(label: &str) -> Option<Tone> {
        match label.trim() {
            "1" => Some(Tone::One),
            "2" => Some(Tone::Two),
            "3" => Some(Tone::Three),
            "4" => Some(Tone::Four),
            _ => None,
        }
    }

    /// Short description of the pitch contour
    pub fn description(&self) -> &'static str {
        match self {
            Tone::One => "High level (flat)",
            Tone::Two => "Rising",
            Tone::Three => "Dipping then rising",
            Tone::Four => "Falling",
        }
    }

    /// Canonical synthetic audio filename for this tone (`tone1.wav` .. `tone4.wav`)
    pub fn wav_filename(&self) -> String {
        format!("tone{}.wav", self.number())
    }
}

impl TryFrom<u8> for Tone {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Tone::One),
            2 => Ok(Tone::Two),
            3 => Ok(Tone::Three),
            4 => Ok(Tone::Four),
            other => Err(Error::InvalidInput(format!(
                "tone must be 1-4, got {}",
                other
            ))),
        }
    }
}

impl TryFrom<i64> for Tone {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .map_err(|_| Error::InvalidInput(format!("tone must be 1-4, got {}", value)))
            .and_then(Tone::try_from)
    }
}

impl From<Tone> for u8 {
    fn from(tone: Tone) -> u8 {
        tone.number()
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}
