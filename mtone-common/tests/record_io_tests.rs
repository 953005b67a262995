//! Classification record CSV round-trip and tolerance tests

use mtone_common::record::{merge_records, read_records, write_records, INVALID_TRUE_TONE};
use mtone_common::{ClassificationRecord, Tone};
use tempfile::TempDir;

#[test]
fn test_write_then_read_preserves_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.csv");

    let records = vec![
        ClassificationRecord::new("openai/a", "tone1.wav", Tone::One, "1", "ma1", "1) ma1\n2) 1"),
        ClassificationRecord::new(
            "openai/a",
            "tone2.wav",
            Tone::Two,
            "",
            "",
            "I, \"cannot\" hear it",
        ),
    ];
    write_records(&path, &records).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content
        .starts_with("model,audio_file,true_tone,predicted_tone,heard_pinyin,raw_response"));

    let loaded = read_records(&path).unwrap();
    assert_eq!(loaded, records);
    assert_eq!(loaded[0].raw_response, "1) ma1 2) 1");
}

#[test]
fn test_empty_record_set_still_has_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    write_records(&path, &[]).unwrap();

    assert_eq!(read_records(&path).unwrap().len(), 0);
    assert!(std::fs::read_to_string(&path).unwrap().contains("true_tone"));
}

#[test]
fn test_malformed_true_tone_is_kept_with_sentinel() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(
        &path,
        "model,audio_file,true_tone,predicted_tone,heard_pinyin,raw_response\n\
         m,a.wav,three,3,,x\n\
         m,b.wav,7,3,,x\n\
         m,c.wav,2,2,ma2,x\n",
    )
    .unwrap();

    let records = read_records(&path).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].true_tone, INVALID_TRUE_TONE);
    assert_eq!(records[0].truth(), None);
    assert_eq!(records[1].truth(), None);
    assert_eq!(records[2].truth(), Some(Tone::Two));
}

#[test]
fn test_append_rewrite_keeps_unparsed_true_tone_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.csv");
    std::fs::write(
        &path,
        "model,audio_file,true_tone,predicted_tone,heard_pinyin,raw_response\n\
         m,a.wav,three,3,,x\n\
         m,b.wav,,1,,y\n",
    )
    .unwrap();

    let existing = read_records(&path).unwrap();
    assert_eq!(existing[0].true_tone_text(), "three");
    let new = vec![ClassificationRecord::new("m", "c.wav", Tone::Four, "4", "", "z")];
    write_records(&path, &merge_records(existing, new)).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[1], "m,a.wav,three,3,,x");
    assert_eq!(lines[2], "m,b.wav,,1,,y");
    assert_eq!(lines[3], "m,c.wav,4,4,,z");
}

#[test]
fn test_missing_columns_default_to_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.csv");
    std::fs::write(&path, "model,audio_file,true_tone,predicted_tone\nm,a.wav,1,1\n").unwrap();

    let records = read_records(&path).unwrap();
    assert_eq!(records[0].heard_pinyin, "");
    assert_eq!(records[0].raw_response, "");
    assert_eq!(records[0].prediction(), Some(Tone::One));
}
