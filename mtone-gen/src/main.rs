//! Tone clip generator (mtone-gen)
//!
//! Writes `tone1.wav` .. `tone4.wav` and `manifest.json` for the evaluation
//! runner. Synthesis parameters are layered: built-in defaults, then the TOML
//! `[synthesis]` section, then `--params-json`, then individual flags.
//!
//! **Usage:**
//! ```bash
//! mtone-gen --output-dir synthetic_tones \
//!     [--params-json results/suggested_tone_params.json] [--contours contours.csv]
//! mtone-gen --list-params
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use mtone_common::config::TomlConfig;
use mtone_common::params::{LegacyParamsFile, SynthesisOverrides, SynthesisParams};
use mtone_common::FadeCurve;
use mtone_gen::generator::{
    generate_all, summarize_manifest, write_contour_csv, write_manifest, MANIFEST_FILENAME,
};
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for mtone-gen
#[derive(Parser, Debug)]
#[command(name = "mtone-gen")]
#[command(about = "Synthesize reference clips for the four Mandarin tones")]
#[command(version)]
struct Args {
    /// Directory for the WAV files and manifest
    #[arg(short, long, default_value = "synthetic_tones", env = "MTONE_TONES_DIR")]
    output_dir: PathBuf,

    /// TOML config file (overrides MTONE_CONFIG and the platform default)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Legacy JSON params file (DURATION_MS, RANGE_HZ, F0_HIGH, F0_LOW)
    #[arg(long, value_name = "FILE")]
    params_json: Option<PathBuf>,

    /// Print every synthesis parameter with its default and valid range, then exit
    #[arg(long)]
    list_params: bool,

    /// Also export the F0 contour table as CSV
    #[arg(long, value_name = "FILE")]
    contours: Option<PathBuf>,

    /// Clip length (ms)
    #[arg(long)]
    duration_ms: Option<u32>,

    /// Sample rate (Hz)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Upper end of the tone band (Hz)
    #[arg(long)]
    f0_high: Option<f64>,

    /// Lower end of the tone band (Hz); defaults to f0_high - range_hz
    #[arg(long)]
    f0_low: Option<f64>,

    /// Width of the tone band (Hz)
    #[arg(long)]
    range_hz: Option<f64>,

    /// Peak amplitude, 0-1
    #[arg(long)]
    amplitude: Option<f64>,

    /// Fade-in/fade-out length (ms)
    #[arg(long)]
    fade_ms: Option<f64>,

    /// Fade shape: linear or s_curve
    #[arg(long)]
    fade_curve: Option<FadeCurve>,
}

impl Args {
    fn overrides(&self) -> SynthesisOverrides {
        SynthesisOverrides {
            duration_ms: self.duration_ms,
            sample_rate: self.sample_rate,
            f0_high: self.f0_high,
            f0_low: self.f0_low,
            range_hz: self.range_hz,
            amplitude: self.amplitude,
            fade_ms: self.fade_ms,
            fade_curve: self.fade_curve,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list_params {
        print!("{}", SynthesisParams::describe_params());
        return Ok(());
    }

    let config = TomlConfig::load_resolved(args.config.as_deref())
        .context("Failed to load configuration")?;
    mtone_common::logging::init_tracing(&config.logging.level);

    let mut layers = config.synthesis.clone();
    if let Some(path) = &args.params_json {
        let legacy = LegacyParamsFile::load(path)
            .with_context(|| format!("Failed to read params file {}", path.display()))?;
        info!("Applying params overrides from {}", path.display());
        layers = layers.merge(legacy.into_overrides());
    }
    let params = layers
        .merge(args.overrides())
        .resolve()
        .context("Invalid synthesis parameters")?;

    let manifest = generate_all(&args.output_dir, &params)
        .with_context(|| format!("Failed to write clips to {}", args.output_dir.display()))?;
    write_manifest(&args.output_dir, &manifest).context("Failed to write manifest")?;

    if let Some(path) = &args.contours {
        write_contour_csv(path, &params)
            .with_context(|| format!("Failed to write contour table {}", path.display()))?;
        info!("Contour table: {}", path.display());
    }

    println!("Wrote {} WAVs to {}", manifest.len(), args.output_dir.display());
    print!("{}", summarize_manifest(&manifest));
    println!(
        "Manifest: {}",
        args.output_dir.join(MANIFEST_FILENAME).display()
    );
    Ok(())
}
