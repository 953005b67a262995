//! Waveform synthesis from an F0 curve
//!
//! The carrier phase at sample `i` is the discrete integral of angular
//! frequency, `2π · Σ_{k≤i} F0[k] / sample_rate`, so the sine stays
//! phase-continuous even though F0 changes every sample. The signal is then
//! scaled to the peak amplitude, tapered at both ends, clipped to [-1, 1] and
//! truncated to int16.

use mtone_common::{FadeCurve, SynthesisParams};
use std::f64::consts::TAU;

/// Full-scale multiplier for int16 conversion
const I16_SCALE: f64 = 32767.0;

/// Synthesize a quantized mono buffer from an F0 curve
///
/// Output length always equals `f0.len()`.
pub fn synthesize(f0: &[f64], params: &SynthesisParams) -> Vec<i16> {
    let n = f0.len();
    let sample_rate = params.sample_rate as f64;
    let window = fade_window(n, params.fade_samples(n), params.fade_curve);

    let mut cumulative_hz = 0.0;
    f0.iter()
        .zip(window)
        .map(|(&hz, gain)| {
            cumulative_hz += hz;
            let phase = TAU * cumulative_hz / sample_rate;
            let sample = params.amplitude * phase.sin() * gain;
            quantize(sample)
        })
        .collect()
}

/// Gain window: ramp up over `fade_len` samples, hold at 1.0, ramp down over `fade_len`
///
/// `fade_len` is capped at `n / 2`. Each ramp includes both endpoints, so the
/// first and last samples are exactly 0.0 whenever `fade_len > 1`. A
/// one-sample ramp degenerates to its start value: `[0.0]` in, `[1.0]` out.
pub fn fade_window(n: usize, fade_len: usize, curve: FadeCurve) -> Vec<f64> {
    let fade_len = fade_len.min(n / 2);
    let positions = ramp_positions(fade_len);

    let mut window = Vec::with_capacity(n);
    window.extend(positions.iter().map(|&p| curve.calculate_fade_in(p)));
    window.resize(n - fade_len, 1.0);
    window.extend(positions.iter().map(|&p| curve.calculate_fade_out(p)));
    window
}

fn ramp_positions(len: usize) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (len - 1) as f64;
            (0..len).map(|i| i as f64 / last).collect()
        }
    }
}

/// Clip to [-1, 1], scale to int16 and truncate toward zero
fn quantize(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * I16_SCALE) as i16
}
