//! Batch generation of the four reference clips
//!
//! Produces `tone1.wav` .. `tone4.wav` in one directory and the manifest that
//! maps each filename to its ground-truth tone.

use crate::contour::{contour, time_axis};
use crate::waveform::synthesize;
use crate::wav::write_wav;
use crate::Result;
use mtone_common::{Manifest, SynthesisParams, Tone};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Manifest filename written next to the clips
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// One rendered clip
#[derive(Debug, Clone)]
pub struct ToneClip {
    pub tone: Tone,
    pub filename: String,
    pub f0: Vec<f64>,
    pub samples: Vec<i16>,
}

/// Render a single tone with the given parameters
pub fn render_tone(tone: Tone, params: &SynthesisParams) -> ToneClip {
    let t = time_axis(params);
    let f0 = contour(tone, &t, params);
    let samples = synthesize(&f0, params);
    ToneClip {
        tone,
        filename: tone.wav_filename(),
        f0,
        samples,
    }
}

/// Write all four clips into `output_dir` and return the manifest
///
/// The directory is created if missing. The manifest itself is not written;
/// see [`write_manifest`].
pub fn generate_all(output_dir: &Path, params: &SynthesisParams) -> Result<Manifest> {
    std::fs::create_dir_all(output_dir)?;

    info!(
        duration_ms = params.duration_ms,
        sample_rate = params.sample_rate,
        f0_low = params.f0_low,
        f0_high = params.f0_high,
        fade_curve = %params.fade_curve,
        "Synthesizing tone clips"
    );

    let mut manifest = Manifest::new();
    for tone in Tone::ALL {
        let clip = render_tone(tone, params);
        let path = output_dir.join(&clip.filename);
        write_wav(&path, &clip.samples, params.sample_rate)?;
        debug!(tone = %tone, samples = clip.samples.len(), path = %path.display(), "Wrote clip");
        manifest.insert(clip.filename, tone);
    }

    Ok(manifest)
}

/// Save the manifest as `manifest.json` in `output_dir`
pub fn write_manifest(output_dir: &Path, manifest: &Manifest) -> Result<()> {
    manifest.save(&output_dir.join(MANIFEST_FILENAME))?;
    Ok(())
}

/// One line per clip, in evaluation order: file name, tone and contour shape
pub fn summarize_manifest(manifest: &Manifest) -> String {
    manifest
        .entries_by_tone()
        .into_iter()
        .map(|(file, tone)| format!("  {}  tone {}: {}\n", file, tone, tone.description()))
        .collect()
}

/// One row of the contour table: time and F0 of every tone at that instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContourRow {
    pub time_ms: f64,
    pub tone1: f64,
    pub tone2: f64,
    pub tone3: f64,
    pub tone4: f64,
}

/// F0 of all four tones against time, for external plotting
pub fn contour_table(params: &SynthesisParams) -> Vec<ContourRow> {
    let t = time_axis(params);
    let curves: Vec<Vec<f64>> = Tone::ALL
        .iter()
        .map(|&tone| contour(tone, &t, params))
        .collect();

    t.iter()
        .enumerate()
        .map(|(i, &seconds)| ContourRow {
            time_ms: seconds * 1000.0,
            tone1: curves[0][i],
            tone2: curves[1][i],
            tone3: curves[2][i],
            tone4: curves[3][i],
        })
        .collect()
}

/// Write the contour table as CSV (`time_ms,tone1,tone2,tone3,tone4`)
pub fn write_contour_csv(path: &Path, params: &SynthesisParams) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in contour_table(params) {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
