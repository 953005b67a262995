//! Synthesis parameters
//!
//! Parameters arrive in layers (TOML `[synthesis]` section, legacy JSON params
//! file, command-line flags). Each layer is a [`SynthesisOverrides`] with every
//! field optional; layers are merged and then resolved once into an immutable
//! [`SynthesisParams`] value that is passed to the contour model and waveform
//! synthesizer.
//!
//! Validation is driven by [`SynthesisParams::metadata`]: one entry per
//! parameter with its default (taken from the `DEFAULT_*` constants), valid
//! range and description. `resolve` checks every value against it and
//! `mtone-gen --list-params` prints it.

use crate::fade_curves::FadeCurve;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Typical syllable length (ms)
pub const DEFAULT_DURATION_MS: u32 = 280;
/// Output sample rate (Hz)
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;
/// Upper end of the tone band (Hz)
pub const DEFAULT_F0_HIGH: f64 = 220.0;
/// Width of the tone band (Hz); `f0_low = f0_high - range_hz` unless given
pub const DEFAULT_RANGE_HZ: f64 = 40.0;
/// Peak amplitude before int16 conversion
pub const DEFAULT_AMPLITUDE: f64 = 0.8;
/// Fade-in/fade-out length (ms)
pub const DEFAULT_FADE_MS: f64 = 10.0;

/// Validation metadata for one synthesis parameter
///
/// Integer parameters are checked through their `f64` value.
pub struct ParamMetadata {
    pub key: &'static str,
    pub default: f64,
    pub description: &'static str,
    pub validation_range: &'static str,
    pub validator: fn(f64) -> bool,
}

impl ParamMetadata {
    /// Reject `value` with a message naming the key and valid range
    pub fn check(&self, value: f64) -> Result<()> {
        if (self.validator)(value) {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "{}: value {} out of range {}",
                self.key, value, self.validation_range
            )))
        }
    }
}

/// Resolved, immutable synthesis parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SynthesisParams {
    pub duration_ms: u32,
    pub sample_rate: u32,
    pub f0_high: f64,
    pub f0_low: f64,
    pub amplitude: f64,
    pub fade_ms: f64,
    pub fade_curve: FadeCurve,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            sample_rate: DEFAULT_SAMPLE_RATE,
            f0_high: DEFAULT_F0_HIGH,
            f0_low: DEFAULT_F0_HIGH - DEFAULT_RANGE_HZ,
            amplitude: DEFAULT_AMPLITUDE,
            fade_ms: DEFAULT_FADE_MS,
            fade_curve: FadeCurve::Linear,
        }
    }
}

impl SynthesisParams {
    /// Midpoint of the band; tone 3 starts here
    pub fn f0_mid(&self) -> f64 {
        (self.f0_high + self.f0_low) / 2.0
    }

    /// Band width in Hz
    pub fn range_hz(&self) -> f64 {
        self.f0_high - self.f0_low
    }

    /// Number of samples per clip: `floor(duration_ms × sample_rate / 1000)`
    pub fn num_samples(&self) -> usize {
        (self.duration_ms as u64 * self.sample_rate as u64 / 1000) as usize
    }

    /// Fade length in samples for a buffer of `n_samples`
    ///
    /// Capped at half the buffer so the two ramps never overlap.
    pub fn fade_samples(&self, n_samples: usize) -> usize {
        let fade_len = (self.fade_ms * self.sample_rate as f64 / 1000.0).floor() as usize;
        fade_len.min(n_samples / 2)
    }

    /// Metadata for all validated synthesis parameters
    ///
    /// ```rust
    /// # use mtone_common::params::SynthesisParams;
    /// let amp = SynthesisParams::metadata()
    ///     .iter()
    ///     .find(|m| m.key == "amplitude")
    ///     .unwrap();
    /// assert!(amp.check(0.8).is_ok());
    /// assert!(amp.check(0.0).is_err());
    /// ```
    pub fn metadata() -> &'static [ParamMetadata] {
        &[
            ParamMetadata {
                key: "duration_ms",
                default: DEFAULT_DURATION_MS as f64,
                description: "Clip length per tone (ms)",
                validation_range: "[1, 60000]",
                validator: |v| (1.0..=60000.0).contains(&v),
            },
            ParamMetadata {
                key: "sample_rate",
                default: DEFAULT_SAMPLE_RATE as f64,
                description: "Output sample rate (Hz)",
                validation_range: "[8000, 192000]",
                validator: |v| (8000.0..=192000.0).contains(&v),
            },
            ParamMetadata {
                key: "f0_high",
                default: DEFAULT_F0_HIGH,
                description: "Upper end of the tone band (Hz)",
                validation_range: "[20.0, 2000.0]",
                validator: |v| (20.0..=2000.0).contains(&v),
            },
            ParamMetadata {
                key: "range_hz",
                default: DEFAULT_RANGE_HZ,
                description: "Width of the tone band (Hz); f0_low = f0_high - range_hz",
                validation_range: "[0.0, 1000.0]",
                validator: |v| (0.0..=1000.0).contains(&v),
            },
            ParamMetadata {
                key: "amplitude",
                default: DEFAULT_AMPLITUDE,
                description: "Peak amplitude before int16 conversion",
                validation_range: "(0.0, 1.0]",
                validator: |v| v > 0.0 && v <= 1.0,
            },
            ParamMetadata {
                key: "fade_ms",
                default: DEFAULT_FADE_MS,
                description: "Fade-in/fade-out length (ms)",
                validation_range: "[0.0, 1000.0]",
                validator: |v| (0.0..=1000.0).contains(&v),
            },
        ]
    }

    /// Human-readable table of every parameter with its default and valid range
    pub fn describe_params() -> String {
        let mut out = format!(
            "{:<12} {:>8}  {:<16} {}\n",
            "parameter", "default", "range", "description"
        );
        for meta in Self::metadata() {
            out.push_str(&format!(
                "{:<12} {:>8}  {:<16} {}\n",
                meta.key, meta.default, meta.validation_range, meta.description
            ));
        }
        out
    }

    fn check(key: &str, value: f64) -> Result<()> {
        Self::metadata()
            .iter()
            .find(|m| m.key == key)
            .ok_or_else(|| Error::Config(format!("unknown synthesis parameter: {}", key)))?
            .check(value)
    }
}

/// One layer of synthesis parameter overrides
///
/// Deserialized directly from the TOML `[synthesis]` section; also built from
/// the legacy JSON params file and from CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynthesisOverrides {
    pub duration_ms: Option<u32>,
    pub sample_rate: Option<u32>,
    pub f0_high: Option<f64>,
    pub f0_low: Option<f64>,
    pub range_hz: Option<f64>,
    pub amplitude: Option<f64>,
    pub fade_ms: Option<f64>,
    pub fade_curve: Option<FadeCurve>,
}

impl SynthesisOverrides {
    /// Layer `other` on top of `self`; values set in `other` win
    pub fn merge(self, other: SynthesisOverrides) -> SynthesisOverrides {
        SynthesisOverrides {
            duration_ms: other.duration_ms.or(self.duration_ms),
            sample_rate: other.sample_rate.or(self.sample_rate),
            f0_high: other.f0_high.or(self.f0_high),
            f0_low: other.f0_low.or(self.f0_low),
            range_hz: other.range_hz.or(self.range_hz),
            amplitude: other.amplitude.or(self.amplitude),
            fade_ms: other.fade_ms.or(self.fade_ms),
            fade_curve: other.fade_curve.or(self.fade_curve),
        }
    }

    /// Apply defaults, derive `f0_low` when absent, and validate every value
    pub fn resolve(&self) -> Result<SynthesisParams> {
        let duration_ms = self.duration_ms.unwrap_or(DEFAULT_DURATION_MS);
        let sample_rate = self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
        let f0_high = self.f0_high.unwrap_or(DEFAULT_F0_HIGH);
        let range_hz = self.range_hz.unwrap_or(DEFAULT_RANGE_HZ);
        let amplitude = self.amplitude.unwrap_or(DEFAULT_AMPLITUDE);
        let fade_ms = self.fade_ms.unwrap_or(DEFAULT_FADE_MS);

        SynthesisParams::check("duration_ms", duration_ms as f64)?;
        SynthesisParams::check("sample_rate", sample_rate as f64)?;
        SynthesisParams::check("f0_high", f0_high)?;
        SynthesisParams::check("range_hz", range_hz)?;
        SynthesisParams::check("amplitude", amplitude)?;
        SynthesisParams::check("fade_ms", fade_ms)?;

        let f0_low = self.f0_low.unwrap_or(f0_high - range_hz);
        if !(f0_low.is_finite() && f0_low > 0.0 && f0_low <= f0_high) {
            return Err(Error::Config(format!(
                "f0_low: value {} must be in (0, f0_high={}]",
                f0_low, f0_high
            )));
        }

        Ok(SynthesisParams {
            duration_ms,
            sample_rate,
            f0_high,
            f0_low,
            amplitude,
            fade_ms,
            fade_curve: self.fade_curve.unwrap_or_default(),
        })
    }
}

/// Legacy params override file
///
/// Written by an external pitch-analysis step, e.g.
/// `{"DURATION_MS": 300, "F0_HIGH": 240.0, "RANGE_HZ": 50.0}`. All keys optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyParamsFile {
    #[serde(rename = "DURATION_MS")]
    pub duration_ms: Option<f64>,
    #[serde(rename = "RANGE_HZ")]
    pub range_hz: Option<f64>,
    #[serde(rename = "F0_HIGH")]
    pub f0_high: Option<f64>,
    #[serde(rename = "F0_LOW")]
    pub f0_low: Option<f64>,
}

impl LegacyParamsFile {
    /// Load the JSON params file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Convert to an override layer
    ///
    /// `DURATION_MS` is truncated to whole milliseconds.
    pub fn into_overrides(self) -> SynthesisOverrides {
        SynthesisOverrides {
            duration_ms: self.duration_ms.map(|d| d.max(0.0) as u32),
            range_hz: self.range_hz,
            f0_high: self.f0_high,
            f0_low: self.f0_low,
            ..Default::default()
        }
    }
}
