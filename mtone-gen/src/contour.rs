//! Tone contour model
//!
//! Maps a time axis to a fundamental-frequency curve (Hz, one value per
//! sample) for each tone. All ramps are affine in normalized progress; no
//! easing is applied.
//!
//! | Tone | Shape |
//! |------|-------|
//! | 1 | constant at `f0_high` |
//! | 2 | `f0_low` → `f0_high` |
//! | 3 | `f0_mid` → `f0_low` over the first ⌊n/2⌋ samples, then `f0_low` → `f0_high` |
//! | 4 | `f0_high` → `f0_low` |

use mtone_common::{SynthesisParams, Tone};

/// Sample instants in seconds: `i / sample_rate` for `i in 0..num_samples`
pub fn time_axis(params: &SynthesisParams) -> Vec<f64> {
    let sample_rate = params.sample_rate as f64;
    (0..params.num_samples())
        .map(|i| i as f64 / sample_rate)
        .collect()
}

/// F0 curve for `tone` over the time axis `t`
///
/// Output length always equals `t.len()`. Values stay within
/// `[params.f0_low, params.f0_high]`.
pub fn contour(tone: Tone, t: &[f64], params: &SynthesisParams) -> Vec<f64> {
    match tone {
        Tone::One => level(t, params),
        Tone::Two => rising(t, params),
        Tone::Three => dipping(t, params),
        Tone::Four => falling(t, params),
    }
}

fn level(t: &[f64], params: &SynthesisParams) -> Vec<f64> {
    vec![params.f0_high; t.len()]
}

fn rising(t: &[f64], params: &SynthesisParams) -> Vec<f64> {
    progress(t)
        .into_iter()
        .map(|p| lerp(params.f0_low, params.f0_high, p, params))
        .collect()
}

fn dipping(t: &[f64], params: &SynthesisParams) -> Vec<f64> {
    // Odd lengths give the rising half the extra sample.
    let n = t.len();
    let split = n / 2;

    let fall = linspace_unit(split)
        .into_iter()
        .map(|p| lerp(params.f0_mid(), params.f0_low, p, params));
    let rise = linspace_unit(n - split)
        .into_iter()
        .map(|p| lerp(params.f0_low, params.f0_high, p, params));

    fall.chain(rise).collect()
}

fn falling(t: &[f64], params: &SynthesisParams) -> Vec<f64> {
    progress(t)
        .into_iter()
        .map(|p| lerp(params.f0_high, params.f0_low, p, params))
        .collect()
}

/// Normalized progress `(t - t0) / (t_end - t0)`
///
/// Degenerate axes (empty, single sample, or non-increasing span) count as
/// fully progressed: every sample gets 1.0.
fn progress(t: &[f64]) -> Vec<f64> {
    match (t.first(), t.last()) {
        (Some(&t0), Some(&t_end)) if t_end > t0 => {
            let span = t_end - t0;
            t.iter().map(|&ti| (ti - t0) / span).collect()
        }
        _ => vec![1.0; t.len()],
    }
}

/// `n` evenly spaced points from 0.0 to 1.0 inclusive; a single point is `[0.0]`
fn linspace_unit(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (n - 1) as f64;
            (0..n).map(|i| i as f64 / last).collect()
        }
    }
}

/// `from + (to - from) · p`, held inside the configured band against rounding
fn lerp(from: f64, to: f64, p: f64, params: &SynthesisParams) -> f64 {
    (from + (to - from) * p).clamp(params.f0_low, params.f0_high)
}
