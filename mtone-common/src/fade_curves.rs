//! Fade curve shapes for click-free clip edges
//!
//! Synthetic tone clips are tapered at both ends so the first and last samples
//! sit at zero. The reference shape is a straight linear ramp; an S-curve is
//! available for listeners who prefer a softer onset.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fade ramp shape
///
/// Both shapes map position 0.0 → 0.0 and 1.0 → 1.0 on fade-in, and mirror on fade-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FadeCurve {
    /// Linear: v(t) = t
    #[default]
    Linear,

    /// S-Curve: v(t) = 0.5 × (1 - cos(π × t))
    SCurve,
}

impl FadeCurve {
    /// Gain multiplier at `position` through a fade-in (0.0 = start, 1.0 = end)
    pub fn calculate_fade_in(&self, position: f64) -> f64 {
        let t = position.clamp(0.0, 1.0);

        match self {
            FadeCurve::Linear => t,
            FadeCurve::SCurve => 0.5 * (1.0 - (std::f64::consts::PI * t).cos()),
        }
    }

    /// Gain multiplier at `position` through a fade-out (1.0 at start, 0.0 at end)
    pub fn calculate_fade_out(&self, position: f64) -> f64 {
        self.calculate_fade_in(1.0 - position.clamp(0.0, 1.0))
    }

    /// Canonical config value
    pub fn to_config_string(&self) -> &'static str {
        match self {
            FadeCurve::Linear => "linear",
            FadeCurve::SCurve => "s_curve",
        }
    }

    /// Get all available fade curve variants
    pub fn all_variants() -> &'static [FadeCurve] {
        &[FadeCurve::Linear, FadeCurve::SCurve]
    }
}

/// Accepts `linear`, and `s_curve` / `scurve` / `s-curve` / `cosine` for the S-curve
impl FromStr for FadeCurve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(FadeCurve::Linear),
            "cosine" | "scurve" | "s-curve" | "s_curve" => Ok(FadeCurve::SCurve),
            other => Err(format!("unknown fade curve '{}' (expected linear or s_curve)", other)),
        }
    }
}

impl std::fmt::Display for FadeCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FadeCurve::Linear => "Linear",
            FadeCurve::SCurve => "S-Curve",
        };
        write!(f, "{}", name)
    }
}
