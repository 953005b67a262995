//! Results CSV → scores → report

use mtone_common::record::{read_records, write_records};
use mtone_common::{ClassificationRecord, Tone};
use mtone_eval::report::{format_leaderboard, format_report};
use mtone_eval::scoring::score_all;

fn rec(model: &str, truth: Tone, predicted: &str) -> ClassificationRecord {
    ClassificationRecord::new(model, truth.wav_filename(), truth, predicted, "", "")
}

#[test]
fn test_scores_survive_csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone_eval.csv");

    let mut records = Vec::new();
    for tone in Tone::ALL {
        records.push(rec("gemini/gemini-2.5-pro", tone, &tone.to_string()));
        // Always answers 4
        records.push(rec("openai/gpt-4o-audio-preview", tone, "4"));
    }
    records.push(rec("openai/gpt-4o-audio-preview", Tone::One, ""));
    write_records(&path, &records).unwrap();

    let loaded = read_records(&path).unwrap();
    let scores = score_all(&loaded);
    assert_eq!(scores.len(), 2);

    let gemini = &scores[0];
    assert_eq!(gemini.model, "gemini/gemini-2.5-pro");
    assert_eq!(gemini.macro_f1, 1.0);

    let gpt = &scores[1];
    assert_eq!(gpt.attempts, 5);
    assert_eq!(gpt.classified, 4);
    for truth in Tone::ALL {
        assert_eq!(gpt.matrix.get(truth, Tone::Four), 1);
    }
    // Tone 4: precision 1/4, recall 1 → F1 0.4; others 0
    assert!((gpt.macro_f1 - 0.1).abs() < 1e-12);

    let report = format_report(&path, loaded.len(), &scores);
    assert!(report.contains("Total rows: 9"));
    assert!(report.contains("Macro F1: 1.0000"));
    assert!(report.contains("Macro F1: 0.1000"));

    let board = format_leaderboard(&scores);
    let gemini_pos = board.find("Gemini 2.5 Pro").unwrap();
    let random_pos = board.find("Random (25%)").unwrap();
    let gpt_pos = board.find("GPT-4o Audio").unwrap();
    assert!(gemini_pos < random_pos);
    assert!(random_pos > gpt_pos);
}

#[test]
fn test_malformed_rows_are_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messy.csv");
    std::fs::write(
        &path,
        "model,audio_file,true_tone,predicted_tone,heard_pinyin,raw_response\n\
         m,a.wav,2,2,,ok\n\
         m,b.wav,two,2,,bad truth\n\
         m,c.wav,3,9,,bad prediction\n\
         m,d.wav,7,1,,out of range\n",
    )
    .unwrap();

    let records = read_records(&path).unwrap();
    assert_eq!(records.len(), 4);

    let scores = score_all(&records);
    assert_eq!(scores[0].attempts, 4);
    assert_eq!(scores[0].classified, 1);
    assert_eq!(scores[0].matrix.get(Tone::Two, Tone::Two), 1);
}
