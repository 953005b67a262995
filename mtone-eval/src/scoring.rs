//! Scoring engine
//!
//! Builds a 4×4 confusion matrix per model (rows = true tone, columns =
//! predicted tone) and derives per-tone precision/recall/F1 plus macro-F1.
//!
//! Only records with an in-range true tone and a present, in-range predicted
//! tone enter the matrix. Unclassified responses are excluded, not counted as
//! wrong. Every ratio with a zero denominator is defined as 0.0.

use mtone_common::{ClassificationRecord, Tone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::{Add, AddAssign};

/// Counts indexed `[true_tone - 1][predicted_tone - 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: [[u32; 4]; 4],
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the matrix for one model's records
    ///
    /// Records for other models, with an out-of-range true tone, or without a
    /// valid prediction are skipped. Accumulation is plain addition, so record
    /// order never matters.
    pub fn from_records<'a, I>(records: I, model: &str) -> Self
    where
        I: IntoIterator<Item = &'a ClassificationRecord>,
    {
        let mut matrix = Self::new();
        for record in records {
            if record.model != model {
                continue;
            }
            if let (Some(truth), Some(predicted)) = (record.truth(), record.prediction()) {
                matrix.record(truth, predicted);
            }
        }
        matrix
    }

    /// Count one (true, predicted) pair
    pub fn record(&mut self, truth: Tone, predicted: Tone) {
        self.counts[truth.index()][predicted.index()] += 1;
    }

    pub fn get(&self, truth: Tone, predicted: Tone) -> u32 {
        self.counts[truth.index()][predicted.index()]
    }

    /// Raw rows (true tone) × columns (predicted tone)
    pub fn counts(&self) -> &[[u32; 4]; 4] {
        &self.counts
    }

    /// Number of scored records
    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().sum()
    }

    pub fn true_positives(&self, tone: Tone) -> u32 {
        self.get(tone, tone)
    }

    /// Column sum excluding the diagonal
    pub fn false_positives(&self, tone: Tone) -> u32 {
        let k = tone.index();
        (0..4).filter(|&i| i != k).map(|i| self.counts[i][k]).sum()
    }

    /// Row sum excluding the diagonal
    pub fn false_negatives(&self, tone: Tone) -> u32 {
        let k = tone.index();
        (0..4).filter(|&j| j != k).map(|j| self.counts[k][j]).sum()
    }

    /// Precision, recall and F1 for one tone
    pub fn tone_metrics(&self, tone: Tone) -> ToneMetrics {
        let tp = self.true_positives(tone);
        let fp = self.false_positives(tone);
        let fn_ = self.false_negatives(tone);

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        ToneMetrics {
            tone,
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_,
            precision,
            recall,
            f1,
        }
    }

    /// Metrics for all four tones in order
    pub fn per_tone(&self) -> [ToneMetrics; 4] {
        Tone::ALL.map(|tone| self.tone_metrics(tone))
    }

    /// Unweighted mean of the four per-tone F1 values
    pub fn macro_f1(&self) -> f64 {
        self.per_tone().iter().map(|m| m.f1).sum::<f64>() / 4.0
    }
}

impl AddAssign for ConfusionMatrix {
    /// Elementwise addition; merges partial matrices built in parallel
    fn add_assign(&mut self, other: Self) {
        for (row, other_row) in self.counts.iter_mut().zip(other.counts.iter()) {
            for (cell, other_cell) in row.iter_mut().zip(other_row.iter()) {
                *cell += other_cell;
            }
        }
    }
}

impl Add for ConfusionMatrix {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

/// Per-tone metrics derived from one confusion matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneMetrics {
    pub tone: Tone,
    pub true_positives: u32,
    pub false_positives: u32,
    pub false_negatives: u32,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Complete score for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub model: String,
    pub matrix: ConfusionMatrix,
    pub per_tone: Vec<ToneMetrics>,
    pub macro_f1: f64,
    /// All records for this model, classified or not
    pub attempts: usize,
    /// Records that entered the matrix
    pub classified: usize,
}

/// Score one model
pub fn score_model(records: &[ClassificationRecord], model: &str) -> ModelScore {
    let matrix = ConfusionMatrix::from_records(records, model);
    ModelScore {
        model: model.to_string(),
        per_tone: matrix.per_tone().to_vec(),
        macro_f1: matrix.macro_f1(),
        attempts: records.iter().filter(|r| r.model == model).count(),
        classified: matrix.total() as usize,
        matrix,
    }
}

/// Distinct model identifiers, sorted
pub fn models(records: &[ClassificationRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.model.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Score every model present in `records`, sorted by model id
pub fn score_all(records: &[ClassificationRecord]) -> Vec<ModelScore> {
    models(records)
        .iter()
        .map(|model| score_model(records, model))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(model: &str, truth: Tone, predicted: &str) -> ClassificationRecord {
        ClassificationRecord::new(model, "clip.wav", truth, predicted, "", "")
    }

    #[test]
    fn test_metric_formulas() {
        let mut m = ConfusionMatrix::new();
        // true 1: 3 correct, 1 predicted as 4
        for _ in 0..3 {
            m.record(Tone::One, Tone::One);
        }
        m.record(Tone::One, Tone::Four);
        // true 4: 1 correct, 1 predicted as 1
        m.record(Tone::Four, Tone::Four);
        m.record(Tone::Four, Tone::One);

        let t1 = m.tone_metrics(Tone::One);
        assert_eq!((t1.true_positives, t1.false_positives, t1.false_negatives), (3, 1, 1));
        assert_eq!(t1.precision, 0.75);
        assert_eq!(t1.recall, 0.75);
        assert!((t1.f1 - 0.75).abs() < 1e-12);

        let t4 = m.tone_metrics(Tone::Four);
        assert_eq!(t4.precision, 0.5);
        assert_eq!(t4.recall, 0.5);

        let t2 = m.tone_metrics(Tone::Two);
        assert_eq!((t2.precision, t2.recall, t2.f1), (0.0, 0.0, 0.0));

        assert!((m.macro_f1() - (0.75 + 0.5) / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_classifier() {
        let records: Vec<_> = Tone::ALL
            .iter()
            .flat_map(|&t| (0..3).map(move |_| rec("m", t, &t.to_string())))
            .collect();
        let score = score_model(&records, "m");

        for truth in Tone::ALL {
            for predicted in Tone::ALL {
                let expected = if truth == predicted { 3 } else { 0 };
                assert_eq!(score.matrix.get(truth, predicted), expected);
            }
        }
        for m in &score.per_tone {
            assert_eq!((m.precision, m.recall, m.f1), (1.0, 1.0, 1.0));
        }
        assert_eq!(score.macro_f1, 1.0);
    }

    #[test]
    fn test_all_predictions_empty() {
        let records: Vec<_> = Tone::ALL.iter().map(|&t| rec("m", t, "")).collect();
        let score = score_model(&records, "m");

        assert_eq!(score.matrix, ConfusionMatrix::new());
        for m in &score.per_tone {
            assert_eq!((m.precision, m.recall, m.f1), (0.0, 0.0, 0.0));
            assert!(!m.f1.is_nan());
        }
        assert_eq!(score.macro_f1, 0.0);
        assert_eq!(score.attempts, 4);
        assert_eq!(score.classified, 0);
    }

    #[test]
    fn test_filters_model_and_invalid_values() {
        let mut bad_truth = rec("m", Tone::One, "1");
        bad_truth.true_tone = 9;
        let records = vec![
            rec("m", Tone::Two, "2"),
            rec("other", Tone::Two, "2"),
            rec("m", Tone::Three, "5"),
            rec("m", Tone::Three, "tone 3"),
            bad_truth,
        ];
        let matrix = ConfusionMatrix::from_records(&records, "m");
        assert_eq!(matrix.total(), 1);
        assert_eq!(matrix.get(Tone::Two, Tone::Two), 1);
    }

    #[test]
    fn test_order_independent() {
        let mut records = vec![
            rec("m", Tone::One, "1"),
            rec("m", Tone::Two, "3"),
            rec("m", Tone::Three, "3"),
            rec("m", Tone::Four, "1"),
            rec("m", Tone::Four, ""),
            rec("m", Tone::Two, "2"),
        ];
        let forward = score_model(&records, "m");
        records.reverse();
        let reversed = score_model(&records, "m");
        records.rotate_left(2);
        let rotated = score_model(&records, "m");

        assert_eq!(forward, reversed);
        assert_eq!(forward, rotated);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let records = vec![
            rec("m", Tone::One, "1"),
            rec("m", Tone::Two, "4"),
            rec("m", Tone::Three, "3"),
            rec("m", Tone::Four, "4"),
        ];
        let whole = ConfusionMatrix::from_records(&records, "m");
        let left = ConfusionMatrix::from_records(&records[..2], "m");
        let right = ConfusionMatrix::from_records(&records[2..], "m");
        assert_eq!(left + right, whole);
    }

    #[test]
    fn test_score_all_sorted_by_model() {
        let records = vec![rec("zeta", Tone::One, "1"), rec("alpha", Tone::One, "2")];
        let scores = score_all(&records);
        let names: Vec<_> = scores.iter().map(|s| s.model.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
