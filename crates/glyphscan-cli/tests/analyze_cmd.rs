//! Integration tests for the `analyze` subcommand.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cmd() -> Command {
    Command::cargo_bin("glyphscan").unwrap()
}

fn glyph_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const OVERLAPPING: &str = r#"[
    {"char": "f", "page": 1, "bbox": [100.0, 700.0, 6.0, 12.0], "fontSize": 12.0},
    {"char": "i", "page": 1, "bbox": [103.0, 700.0, 6.0, 12.0], "fontSize": 12.0},
    {"char": "x", "page": 2, "bbox": [10.0, 10.0, 6.0, 12.0], "fontSize": 12.0}
]"#;

#[test]
fn text_report_with_statistics() {
    let file = glyph_file(OVERLAPPING);

    cmd()
        .arg("analyze")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ 1 overlaps on 1 page(s)"))
        .stdout(predicate::str::contains("Total unique characters: 2"))
        .stdout(predicate::str::contains("'f':   1 (50.00%)"));
}

#[test]
fn json_report_is_an_export_document() {
    let file = glyph_file(OVERLAPPING);

    let output = cmd()
        .args(["analyze", "--format", "json"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let export: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(export["total_overlaps"], 1);
    let entry = &export["overlaps_by_page"]["1"][0];
    assert_eq!(entry["char_a"], "f");
    assert_eq!(entry["char_b"], "i");
    assert_eq!(entry["overlap_percentage"]["percentage_of_union"], 33.33);
}

#[test]
fn union_threshold_flag_filters() {
    let file = glyph_file(OVERLAPPING);

    cmd()
        .args(["analyze", "--union-threshold", "50"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ No overlaps found"))
        .stdout(predicate::str::contains("Filtered 1 overlaps below union threshold 50%"));
}

#[test]
fn watermarks_filtered_unless_included() {
    let file = glyph_file(
        r#"[
        {"char": "P", "page": 1, "bbox": [0, 0, 30, 60], "fontSize": 60},
        {"char": "R", "page": 1, "bbox": [10, 0, 30, 60], "fontSize": 60}
    ]"#,
    );

    cmd()
        .arg("analyze")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(Filtered 2 watermark glyphs)"))
        .stdout(predicate::str::contains("✓ No overlaps found"));

    cmd()
        .args(["analyze", "--include-watermarks"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ 1 overlaps"));
}

#[test]
fn glyph_without_page_is_a_data_error() {
    let file = glyph_file(r#"[{"char": "a", "bbox": [0, 0, 5, 5], "fontSize": 10}]"#);

    cmd()
        .arg("analyze")
        .arg(file.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing a page number"));
}

#[test]
fn malformed_json_fails() {
    let file = glyph_file("{not json");

    cmd()
        .arg("analyze")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid glyph JSON"));
}
