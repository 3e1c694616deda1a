//! Integration tests for directory batch processing.

mod common;

use std::fs;

use tempfile::TempDir;
use unoutline::batch::{process_directory, BatchStatus};
use unoutline::{Error, OutlineExtractor, OutlineResult};

use common::{build_pdf, field_guide};

#[test]
fn test_batch_writes_one_json_per_pdf() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let out_dir = output.path().join("results");

    fs::write(input.path().join("guide.pdf"), build_pdf(&field_guide(), None)).unwrap();
    fs::write(
        input.path().join("Minutes.PDF"),
        build_pdf(&field_guide(), Some("Board Minutes")),
    )
    .unwrap();
    fs::write(input.path().join("corrupt.pdf"), b"%PDF-1.4 truncated").unwrap();
    fs::write(input.path().join("readme.txt"), b"ignored").unwrap();

    let report = process_directory(input.path(), &out_dir, &OutlineExtractor::new()).unwrap();
    assert_eq!(report.total(), 3);
    assert_eq!(report.successful + report.failed, 3);

    let names: Vec<String> = report
        .entries
        .iter()
        .map(|e| e.input.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["Minutes.PDF", "corrupt.pdf", "guide.pdf"]);

    let guide: OutlineResult =
        serde_json::from_str(&fs::read_to_string(out_dir.join("guide.json")).unwrap()).unwrap();
    assert_eq!(guide.title, "Field Guide to Valley Birds");
    assert_eq!(guide.outline.len(), 3);

    let minutes: OutlineResult =
        serde_json::from_str(&fs::read_to_string(out_dir.join("Minutes.json")).unwrap()).unwrap();
    assert_eq!(minutes.title, "Board Minutes");

    // A damaged file still produces a JSON document with no headings.
    let corrupt: OutlineResult =
        serde_json::from_str(&fs::read_to_string(out_dir.join("corrupt.json")).unwrap()).unwrap();
    assert!(corrupt.outline.is_empty());
    assert!(!fs::read_dir(&out_dir)
        .unwrap()
        .any(|e| e.unwrap().path().ends_with("readme.json")));
}

#[test]
fn test_batch_pretty_json_shape() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(input.path().join("guide.pdf"), build_pdf(&field_guide(), None)).unwrap();

    let report = process_directory(input.path(), output.path(), &OutlineExtractor::new()).unwrap();
    assert!(matches!(
        report.entries[0].status,
        BatchStatus::Success { headings: 3, .. }
    ));

    let json = fs::read_to_string(output.path().join("guide.json")).unwrap();
    assert!(json.starts_with("{\n  \"title\": \"Field Guide to Valley Birds\",\n  \"outline\": ["));
    assert!(json.contains("\"level\": \"H2\""));
}

#[test]
fn test_batch_input_errors() {
    let dir = TempDir::new().unwrap();
    let extractor = OutlineExtractor::new();

    let missing = process_directory(dir.path().join("input"), dir.path().join("output"), &extractor);
    assert!(matches!(missing, Err(Error::InputDirMissing(_))));

    fs::write(dir.path().join("notes.txt"), b"no pdfs here").unwrap();
    let empty = process_directory(dir.path(), dir.path().join("output"), &extractor);
    assert!(matches!(empty, Err(Error::NoInputFiles(_))));
    assert!(!dir.path().join("output").exists());
}
