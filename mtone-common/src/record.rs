//! Classification record interchange
//!
//! One record per (model, audio file) query attempt. This CSV format is the
//! only contract between the model-querying stage and the scoring engine:
//!
//! ```text
//! model,audio_file,true_tone,predicted_tone,heard_pinyin,raw_response
//! gemini/gemini-2.5-pro,tone3.wav,3,3,ma3,"1) ma3 2) 3"
//! ```
//!
//! Empty `predicted_tone` / `heard_pinyin` mean "absent".

use crate::{Result, Tone};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// CSV column order
pub const FIELDS: [&str; 6] = [
    "model",
    "audio_file",
    "true_tone",
    "predicted_tone",
    "heard_pinyin",
    "raw_response",
];

/// Sentinel stored when a CSV row's `true_tone` is not an integer; scoring skips it
pub const INVALID_TRUE_TONE: i64 = 0;

/// A single classification outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub model: String,
    pub audio_file: String,
    /// Ground truth; kept as a raw integer so malformed upstream rows survive a read
    pub true_tone: i64,
    /// "1".."4", or empty when no pattern matched
    pub predicted_tone: String,
    /// e.g. "cai4", or empty
    pub heard_pinyin: String,
    /// Raw model output with newlines collapsed to spaces
    pub raw_response: String,
    /// Original `true_tone` cell when it did not parse; written back unchanged
    #[serde(skip)]
    unparsed_true_tone: Option<String>,
}

impl ClassificationRecord {
    pub fn new(
        model: impl Into<String>,
        audio_file: impl Into<String>,
        true_tone: Tone,
        predicted_tone: impl Into<String>,
        heard_pinyin: impl Into<String>,
        raw_response: &str,
    ) -> Self {
        Self {
            model: model.into(),
            audio_file: audio_file.into(),
            true_tone: true_tone.number() as i64,
            predicted_tone: predicted_tone.into(),
            heard_pinyin: heard_pinyin.into(),
            raw_response: collapse_newlines(raw_response),
            unparsed_true_tone: None,
        }
    }

    /// `true_tone` as it appears in the CSV
    pub fn true_tone_text(&self) -> String {
        self.unparsed_true_tone
            .clone()
            .unwrap_or_else(|| self.true_tone.to_string())
    }

    /// Ground-truth tone, if in range
    pub fn truth(&self) -> Option<Tone> {
        Tone::try_from(self.true_tone).ok()
    }

    /// Predicted tone, if present and in range
    pub fn prediction(&self) -> Option<Tone> {
        Tone::from_label(&self.predicted_tone)
    }

    /// (model, audio_file) identity used when merging result files
    pub fn key(&self) -> (&str, &str) {
        (self.model.as_str(), self.audio_file.as_str())
    }
}

/// Replace CR/LF with spaces and trim
pub fn collapse_newlines(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}

/// Row as read from disk: every column optional text
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRow {
    model: String,
    audio_file: String,
    true_tone: String,
    predicted_tone: String,
    heard_pinyin: String,
    raw_response: String,
}

impl From<RawRow> for ClassificationRecord {
    fn from(row: RawRow) -> Self {
        let (true_tone, unparsed_true_tone) = match row.true_tone.trim().parse::<i64>() {
            Ok(n) => (n, None),
            Err(_) => {
                debug!(
                    model = %row.model,
                    audio_file = %row.audio_file,
                    value = %row.true_tone,
                    "Non-integer true_tone in results row"
                );
                (INVALID_TRUE_TONE, Some(row.true_tone))
            }
        };

        Self {
            model: row.model,
            audio_file: row.audio_file,
            true_tone,
            predicted_tone: row.predicted_tone,
            heard_pinyin: row.heard_pinyin,
            raw_response: row.raw_response,
            unparsed_true_tone,
        }
    }
}

/// Read all records from a results CSV
pub fn read_records(path: &Path) -> Result<Vec<ClassificationRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<RawRow>() {
        records.push(ClassificationRecord::from(row?));
    }
    Ok(records)
}

/// Write records (header first) to a results CSV, replacing the file
pub fn write_records(path: &Path, records: &[ClassificationRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(FIELDS)?;
    for record in records {
        writer.write_record([
            record.model.as_str(),
            record.audio_file.as_str(),
            record.true_tone_text().as_str(),
            record.predicted_tone.as_str(),
            record.heard_pinyin.as_str(),
            record.raw_response.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Append-mode merge
///
/// Existing rows whose (model, audio_file) key appears in `new` are dropped,
/// then all of `new` is appended.
pub fn merge_records(
    existing: Vec<ClassificationRecord>,
    new: Vec<ClassificationRecord>,
) -> Vec<ClassificationRecord> {
    let replaced: HashSet<(String, String)> = new
        .iter()
        .map(|r| (r.model.clone(), r.audio_file.clone()))
        .collect();

    let mut merged: Vec<ClassificationRecord> = existing
        .into_iter()
        .filter(|r| !replaced.contains(&(r.model.clone(), r.audio_file.clone())))
        .collect();
    merged.extend(new);
    merged
}
