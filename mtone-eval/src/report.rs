//! Evaluation reports
//!
//! Three renderings of the same [`ModelScore`] list:
//! - [`format_report`]: per-model confusion matrix and P/R/F1 tables
//! - [`format_leaderboard`]: macro-F1 ranking with a random-chance line
//! - [`EvalReport`]: JSON export for downstream tooling

use crate::error::Result;
use crate::scoring::ModelScore;
use chrono::{DateTime, Utc};
use mtone_common::Tone;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Samples per tone in the reference training corpus (the model prior)
pub const BASELINE_COUNTS: [u64; 4] = [160_885, 179_606, 122_707, 253_441];

/// Macro-F1 of a classifier guessing uniformly among four tones
pub const RANDOM_CHANCE_F1: f64 = 0.25;

const RULE_WIDTH: usize = 60;
const BAR_WIDTH: usize = 40;

/// Baseline share of each tone in percent, rounded to one decimal
pub fn baseline_percentages() -> [f64; 4] {
    let total: u64 = BASELINE_COUNTS.iter().sum();
    BASELINE_COUNTS.map(|count| (1000.0 * count as f64 / total as f64).round() / 10.0)
}

/// Display name for a model id
pub fn short_name(model: &str) -> String {
    const KNOWN: [(&str, &str); 5] = [
        ("gemini-3-pro", "Gemini 3.0 Pro"),
        ("gemini-2.5-pro", "Gemini 2.5 Pro"),
        ("gemini-2.0-flash", "Gemini 2.0 Flash"),
        ("gpt-4o-audio", "GPT-4o Audio"),
        ("gpt-audio", "GPT Audio"),
    ];

    KNOWN
        .iter()
        .find(|(needle, _)| model.contains(needle))
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| model.rsplit('/').next().unwrap_or(model).to_string())
}

/// Matrix, per-tone table and macro-F1 for one model
pub fn format_model_report(score: &ModelScore) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        format!("\n{}", rule),
        format!("Model: {}", score.model),
        rule,
        "\nConfusion matrix (rows = true tone, cols = predicted tone):".to_string(),
        "        pred 1   pred 2   pred 3   pred 4".to_string(),
    ];

    for (truth, row) in Tone::ALL.iter().zip(score.matrix.counts()) {
        let cells: Vec<String> = row.iter().map(|v| format!("{:6}", v)).collect();
        lines.push(format!("true {}   {}", truth, cells.join("   ")));
    }

    lines.push("\nPer-tone metrics:".to_string());
    lines.push("Tone   Precision  Recall    F1".to_string());
    for m in &score.per_tone {
        lines.push(format!(
            "  {}    {:.4}     {:.4}     {:.4}",
            m.tone, m.precision, m.recall, m.f1
        ));
    }
    lines.push(format!("\nMacro F1: {:.4}", score.macro_f1));

    lines.join("\n")
}

/// Full text report
///
/// `source` is shown in the header; `total_rows` counts every row read,
/// including rows for which no tone could be scored.
pub fn format_report(source: &Path, total_rows: usize, scores: &[ModelScore]) -> String {
    let pct = baseline_percentages();
    let mut sections = vec![
        format!("Tone evaluation metrics (from {})", source.display()),
        format!("Total rows: {}", total_rows),
        String::new(),
        format!(
            "Note: Training-data baseline (TABLE II): T1 {:.1}%, T2 {:.1}%, T3 {:.1}%, T4 {:.1}%.",
            pct[0], pct[1], pct[2], pct[3]
        ),
        "A bias toward predicting 4 may reflect that prior as well as acoustic cues.".to_string(),
        String::new(),
    ];
    sections.extend(scores.iter().map(format_model_report));
    sections.join("\n")
}

/// Macro-F1 ranking, best first, with a random-chance reference line
///
/// ```text
/// Macro F1 by model
///   Gemini 2.5 Pro      0.62  #########################
///   Random (25%)        0.25  ----------
/// ```
pub fn format_leaderboard(scores: &[ModelScore]) -> String {
    let mut ranked: Vec<(String, f64)> = scores
        .iter()
        .map(|s| (short_name(&s.model), s.macro_f1))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let label_width = ranked
        .iter()
        .map(|(name, _)| name.chars().count())
        .chain(std::iter::once("Random (25%)".len()))
        .max()
        .unwrap_or(0);

    let mut output = String::from("Macro F1 by model\n");
    for (name, f1) in &ranked {
        output.push_str(&format!(
            "  {:<width$}  {:.2}  {}\n",
            name,
            f1,
            "#".repeat(bar_len(*f1)),
            width = label_width
        ));
    }
    output.push_str(&format!(
        "  {:<width$}  {:.2}  {}\n",
        "Random (25%)",
        RANDOM_CHANCE_F1,
        "-".repeat(bar_len(RANDOM_CHANCE_F1)),
        width = label_width
    ));
    output
}

fn bar_len(f1: f64) -> usize {
    (f1.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize
}

/// Serializable evaluation summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub generated_at: DateTime<Utc>,
    /// Results CSV the scores were computed from
    pub source: String,
    pub total_rows: usize,
    /// Training-data prior per tone, percent
    pub baseline_percent: [f64; 4],
    pub models: Vec<ModelScore>,
}

impl EvalReport {
    pub fn new(source: &Path, total_rows: usize, models: Vec<ModelScore>) -> Self {
        Self {
            generated_at: Utc::now(),
            source: source.display().to_string(),
            total_rows,
            baseline_percent: baseline_percentages(),
            models,
        }
    }

    /// Export report to JSON file
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Import report from JSON file
    pub fn import_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let report: EvalReport = serde_json::from_reader(file)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_model;
    use mtone_common::ClassificationRecord;

    fn score(model: &str, correct: usize) -> ModelScore {
        let records: Vec<_> = Tone::ALL
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                let pred = if i < correct { t.to_string() } else { String::new() };
                ClassificationRecord::new(model, t.wav_filename(), t, pred, "", "")
            })
            .collect();
        score_model(&records, model)
    }

    #[test]
    fn test_baseline_percentages() {
        assert_eq!(baseline_percentages(), [22.4, 25.1, 17.1, 35.4]);
    }

    #[test]
    fn test_short_names() {
        assert_eq!(short_name("gemini/gemini-3-pro-preview"), "Gemini 3.0 Pro");
        assert_eq!(short_name("gemini/gemini-2.5-pro"), "Gemini 2.5 Pro");
        assert_eq!(short_name("gemini/gemini-2.0-flash"), "Gemini 2.0 Flash");
        assert_eq!(short_name("openai/gpt-4o-audio-preview"), "GPT-4o Audio");
        assert_eq!(short_name("openai/gpt-audio-2025-08-28"), "GPT Audio");
        assert_eq!(short_name("acme/listener-1"), "listener-1");
        assert_eq!(short_name("bare"), "bare");
    }

    #[test]
    fn test_model_report_layout() {
        let text = format_model_report(&score("m", 4));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(60));
        assert_eq!(lines[2], "Model: m");
        assert_eq!(lines[6], "        pred 1   pred 2   pred 3   pred 4");
        assert_eq!(lines[7], "true 1        1        0        0        0");
        assert_eq!(lines[10], "true 4        0        0        0        1");
        assert_eq!(lines[13], "Tone   Precision  Recall    F1");
        assert_eq!(lines[14], "  1    1.0000     1.0000     1.0000");
        assert_eq!(*lines.last().unwrap(), "Macro F1: 1.0000");
    }

    #[test]
    fn test_report_header() {
        let scores = [score("a", 1), score("b", 2)];
        let text = format_report(Path::new("results/tone_eval.csv"), 8, &scores);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Tone evaluation metrics (from results/tone_eval.csv)");
        assert_eq!(lines[1], "Total rows: 8");
        assert_eq!(
            lines[3],
            "Note: Training-data baseline (TABLE II): T1 22.4%, T2 25.1%, T3 17.1%, T4 35.4%."
        );
        assert!(text.contains("Model: a"));
        assert!(text.find("Model: a") < text.find("Model: b"));
    }

    #[test]
    fn test_leaderboard_ranks_and_reference() {
        let scores = [
            score("openai/gpt-audio-1", 1),
            score("gemini/gemini-2.5-pro", 4),
        ];
        let board = format_leaderboard(&scores);
        let lines: Vec<&str> = board.lines().collect();

        assert_eq!(lines[0], "Macro F1 by model");
        assert!(lines[1].contains("Gemini 2.5 Pro"));
        assert!(lines[1].contains("1.00"));
        assert!(lines[2].contains("GPT Audio"));
        assert!(lines[3].contains("Random (25%)"));
        assert!(lines[3].contains("0.25"));
        assert!(lines[1].ends_with(&"#".repeat(40)));
    }

    #[test]
    fn test_json_export_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = EvalReport::new(Path::new("in.csv"), 4, vec![score("m", 3)]);
        report.export_json(&path).unwrap();

        let loaded = EvalReport::import_json(&path).unwrap();
        assert_eq!(loaded.source, "in.csv");
        assert_eq!(loaded.total_rows, 4);
        assert_eq!(loaded.models, report.models);
        assert_eq!(loaded.generated_at, report.generated_at);
    }
}
