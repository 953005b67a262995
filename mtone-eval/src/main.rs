//! Tone perception evaluator (mtone-eval)
//!
//! **Usage:**
//! ```bash
//! # Query models with every clip in the manifest
//! mtone-eval run --audio-dir synthetic_tones --manifest synthetic_tones/manifest.json
//! mtone-eval run --models gemini/gemini-2.5-pro --append
//!
//! # Score a results CSV
//! mtone-eval analyze results/tone_eval.csv -o results/metrics.txt --json results/metrics.json
//! ```

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use mtone_common::config::TomlConfig;
use mtone_common::record::{merge_records, read_records, write_records};
use mtone_common::Manifest;
use mtone_eval::query::HttpQuerier;
use mtone_eval::report::{format_leaderboard, format_report, EvalReport};
use mtone_eval::runner::{default_output_path, plan_jobs, EvalRunner};
use mtone_eval::scoring::score_all;
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line arguments for mtone-eval
#[derive(Parser, Debug)]
#[command(name = "mtone-eval")]
#[command(about = "Measure how well audio models recognize Mandarin tones")]
#[command(version)]
struct Cli {
    /// TOML config file (overrides MTONE_CONFIG and the platform default)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send each clip to each model and save the classified replies as CSV
    Run(RunArgs),
    /// Confusion matrix, precision/recall/F1 and macro-F1 per model
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Directory containing the audio files
    #[arg(long, default_value = "synthetic_tones")]
    audio_dir: PathBuf,

    /// JSON manifest mapping file name to tone 1-4
    #[arg(long, default_value = "synthetic_tones/manifest.json")]
    manifest: PathBuf,

    /// Output CSV (default derived from the manifest name under results/)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Comma-separated model ids; replaces the configured model list
    #[arg(long, value_delimiter = ',')]
    models: Option<Vec<String>>,

    /// Merge into the existing output, replacing rows for re-run (model, file) pairs
    #[arg(long)]
    append: bool,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Results CSV from `mtone-eval run`
    csv: PathBuf,

    /// Write the text report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also export scores as JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Append the macro-F1 leaderboard to the report
    #[arg(long)]
    leaderboard: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = TomlConfig::load_resolved(cli.config.as_deref())
        .context("Failed to load configuration")?;
    mtone_common::logging::init_tracing(&config.logging.level);

    match cli.command {
        Command::Run(args) => run(args, &config).await,
        Command::Analyze(args) => analyze(args),
    }
}

async fn run(args: RunArgs, config: &TomlConfig) -> Result<()> {
    let manifest = Manifest::load(&args.manifest)
        .with_context(|| format!("Failed to read manifest {}", args.manifest.display()))?;

    let models: Vec<String> = args
        .models
        .unwrap_or_else(|| config.eval.models.clone())
        .into_iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    if models.is_empty() {
        bail!("No models selected");
    }

    let jobs = plan_jobs(&models, &manifest, &args.audio_dir);
    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.manifest));
    ensure_parent_dir(&output)?;

    let existing = if args.append && output.exists() {
        let rows = read_records(&output)
            .with_context(|| format!("Failed to read existing results {}", output.display()))?;
        let kept = rows
            .iter()
            .filter(|r| !jobs.iter().any(|j| j.key() == r.key()))
            .count();
        info!("Append mode: keeping {} existing rows, running {} new.", kept, jobs.len());
        rows
    } else {
        Vec::new()
    };

    let querier = HttpQuerier::new(&config.eval).context("Failed to create HTTP client")?;
    let new_rows = EvalRunner::new(querier).run(&jobs).await;
    let new_count = new_rows.len();

    let all_rows = merge_records(existing, new_rows);
    write_records(&output, &all_rows)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} rows to {} ({} new)",
        all_rows.len(),
        output.display(),
        new_count
    );
    Ok(())
}

fn analyze(args: AnalyzeArgs) -> Result<()> {
    if !args.csv.exists() {
        bail!("File not found: {}", args.csv.display());
    }

    let records = read_records(&args.csv)
        .with_context(|| format!("Failed to read results {}", args.csv.display()))?;
    let scores = score_all(&records);
    if scores.is_empty() {
        bail!("No model rows in CSV.");
    }

    let mut text = format_report(&args.csv, records.len(), &scores);
    if args.leaderboard {
        text.push_str("\n\n");
        text.push_str(&format_leaderboard(&scores));
    }

    match &args.output {
        Some(path) => {
            ensure_parent_dir(path)?;
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write report {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }

    if let Some(path) = &args.json {
        ensure_parent_dir(path)?;
        EvalReport::new(&args.csv, records.len(), scores)
            .export_json(path)
            .with_context(|| format!("Failed to export JSON {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}
