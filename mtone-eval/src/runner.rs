//! Batch evaluation runner
//!
//! Plans one job per (model, manifest entry) whose audio file exists, runs the
//! jobs one at a time through a [`ToneQuerier`], and classifies each reply into
//! a [`ClassificationRecord`]. A failed query still yields a record: empty
//! prediction and pinyin, with the error text as the raw response.

use crate::classifier::classify;
use crate::query::ToneQuerier;
use mtone_common::{ClassificationRecord, Manifest, Tone};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory for default result files
pub const RESULTS_DIR: &str = "results";

/// One query to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalJob {
    pub model: String,
    pub audio_file: String,
    pub audio_path: PathBuf,
    pub true_tone: Tone,
}

impl EvalJob {
    pub fn key(&self) -> (&str, &str) {
        (self.model.as_str(), self.audio_file.as_str())
    }
}

/// Models × manifest entries (ordered by tone, then file name)
///
/// Entries whose file is missing from `audio_dir` are skipped with a warning.
pub fn plan_jobs(models: &[String], manifest: &Manifest, audio_dir: &Path) -> Vec<EvalJob> {
    let entries: Vec<(&str, Tone)> = manifest
        .entries_by_tone()
        .into_iter()
        .filter(|(file, _)| {
            let exists = audio_dir.join(file).exists();
            if !exists {
                warn!("Skipping {}: not found in {}", file, audio_dir.display());
            }
            exists
        })
        .collect();

    models
        .iter()
        .flat_map(|model| {
            entries.iter().map(move |&(file, tone)| EvalJob {
                model: model.clone(),
                audio_file: file.to_string(),
                audio_path: audio_dir.join(file),
                true_tone: tone,
            })
        })
        .collect()
}

/// Default results CSV for a manifest path
///
/// `..15syllables..` → `results/tone_eval_15syllables.csv`,
/// `..cai..` → `results/tone_eval_cai.csv`, else `results/tone_eval.csv`.
pub fn default_output_path(manifest_path: &Path) -> PathBuf {
    let manifest = manifest_path.to_string_lossy();
    let name = if manifest.contains("15syllables") {
        "tone_eval_15syllables.csv"
    } else if manifest.contains("cai") {
        "tone_eval_cai.csv"
    } else {
        "tone_eval.csv"
    };
    Path::new(RESULTS_DIR).join(name)
}

/// Runs planned jobs through a querier
pub struct EvalRunner<Q> {
    querier: Q,
}

impl<Q: ToneQuerier> EvalRunner<Q> {
    pub fn new(querier: Q) -> Self {
        Self { querier }
    }

    /// Run one job; never fails
    pub async fn run_one(&self, job: &EvalJob) -> ClassificationRecord {
        match self.querier.query(&job.model, &job.audio_path).await {
            Ok(reply) => {
                let c = classify(Some(&reply));
                ClassificationRecord::new(
                    &job.model,
                    &job.audio_file,
                    job.true_tone,
                    c.tone_label(),
                    c.pinyin_label(),
                    &reply,
                )
            }
            Err(e) => {
                warn!(model = %job.model, audio_file = %job.audio_file, "Query failed: {}", e);
                ClassificationRecord::new(
                    &job.model,
                    &job.audio_file,
                    job.true_tone,
                    "",
                    "",
                    &e.to_string(),
                )
            }
        }
    }

    /// Run all jobs in order, logging `[i/total]` progress
    pub async fn run(&self, jobs: &[EvalJob]) -> Vec<ClassificationRecord> {
        let total = jobs.len();
        let mut records = Vec::with_capacity(total);
        for (idx, job) in jobs.iter().enumerate() {
            info!("[{}/{}] {} / {}", idx + 1, total, job.model, job.audio_file);
            records.push(self.run_one(job).await);
        }
        records
    }
}
