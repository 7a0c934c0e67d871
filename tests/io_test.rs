// Reading from disk, delimited input and output, and diagnostic renderings

use std::io::Write;

use humdrum_wasm::renderers::{self, FileSummary};
use humdrum_wasm::{ErrorKind, HumdrumError, HumdrumFile, ParseOptions, TokenId};
use tempfile::NamedTempFile;

const SCORE: &str = "!!!COM: Anonymous\n**kern\t**text\n*M2/4\t*\n=1\t=1\n4c\tla\n8d\t.\n8e\tlo\n*-\t*-\n";

#[test]
fn test_read_from_disk() {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(SCORE.as_bytes()).unwrap();

    let file = HumdrumFile::read(tmp.path()).unwrap();
    assert!(file.is_valid(), "{}", file.parse_error());
    assert_eq!(file.line_count(), 8);
    assert_eq!(file.to_string(), SCORE);
    assert_eq!(file.score_duration().to_string(), "2");
}

#[test]
fn test_read_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = HumdrumFile::read(dir.path().join("missing.krn")).unwrap_err();
    assert!(matches!(err, HumdrumError::Io(_)));
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_csv_input() {
    let csv = "!!!COM: Anonymous\n**kern,**text\n*M2/4,*\n=1,=1\n4c,la\n8d,.\n8e,lo\n*-,*-\n";
    let file = HumdrumFile::parse_csv(csv, ",");
    assert!(file.is_valid(), "{}", file.parse_error());
    assert_eq!(file.to_string(), SCORE);

    let semi = HumdrumFile::parse_with(
        "**kern;**text\n4c;\"a;b\"\n*-;*-\n",
        ParseOptions::csv(";"),
    );
    assert_eq!(semi.token_at(1, 1).map(|t| t.text()), Some("a;b"));
}

#[test]
fn test_csv_output_round_trip() {
    let file = HumdrumFile::parse(SCORE);
    let csv = renderers::to_csv(&file, ",");
    assert!(csv.contains("4c,la\n"));
    let reread = HumdrumFile::parse_csv(&csv, ",");
    assert_eq!(reread.to_string(), file.to_string());
}

#[test]
fn test_append_and_reanalyze() {
    let mut file = HumdrumFile::parse("**kern\n4c\n");
    assert_eq!(file.track_end_count(1), 0);
    file.append("4d");
    file.append("*-");
    assert!(file.analyze(), "{}", file.parse_error());
    assert_eq!(file.score_duration().to_string(), "2");
    assert_eq!(file.track_end(1, -1), Some(TokenId::new(3, 0)));
}

#[test]
fn test_edit_and_rebuild_text() {
    let mut file = HumdrumFile::parse(SCORE);
    if let Some(token) = file.token_mut(TokenId::new(4, 1)) {
        token.set_text("lu");
    }
    file.rebuild_line_text();
    assert_eq!(file.line(4).map(|l| l.text()), Some("4c\tlu"));
    assert_eq!(file.line(0).map(|l| l.text()), Some("!!!COM: Anonymous"));

    assert!(file.analyze(), "{}", file.parse_error());
    assert_eq!(file.token_at(4, 1).map(|t| t.text()), Some("lu"));
}

#[test]
fn test_info_renderings() {
    let file = HumdrumFile::parse(SCORE);
    let tracks = renderers::track_info(&file);
    let rows: Vec<&str> = tracks.lines().collect();
    assert_eq!(rows[0], "!!!COM: Anonymous");
    assert_eq!(rows[1], "**kern\t**text");
    assert_eq!(rows[2], "1\t2");

    let types = renderers::data_type_info(&file);
    assert_eq!(types.lines().nth(4), Some("kern\ttext"));

    let durations = renderers::duration_info(&file);
    assert_eq!(durations.lines().nth(4), Some("1\t1/2"));
    assert_eq!(durations.lines().nth(5), Some("1/2\t-1"));
    assert_eq!(durations.lines().nth(6), Some("1/2\t1/2"));
}

#[test]
fn test_summary_json() {
    let file = HumdrumFile::parse(SCORE);
    let json = renderers::to_summary_json(&file).unwrap();
    let summary: FileSummary = serde_json::from_str(&json).unwrap();
    assert!(summary.valid);
    assert_eq!(summary.line_count, 8);
    assert_eq!(summary.max_track, 2);
    assert_eq!(summary.tpq, 2);
    assert_eq!(summary.strands.len(), 2);
    assert!(summary.lines[0].tokens.is_empty());
    assert_eq!(summary.lines[4].tokens[1].data_type, "**text");

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["scoreDuration"]["numerator"], 2);
    assert_eq!(value["lines"][3]["kind"], "barline");
}

#[test]
fn test_invalid_file_summary() {
    let options = ParseOptions {
        quiet: true,
        ..ParseOptions::default()
    };
    let file = HumdrumFile::parse_with("4c\n*-\n", options);
    let summary = FileSummary::from(&file);
    assert!(!summary.valid);
    assert!(summary.error.contains("data found before exclusive interpretation"));
}
