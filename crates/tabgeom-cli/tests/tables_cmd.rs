//! Integration tests for the `tables` subcommand.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("tabgeom").unwrap()
}

#[test]
fn text_output_shows_each_table() {
    let dir = tempfile::tempdir().unwrap();
    let dump = common::three_page_dump(dir.path());

    cmd()
        .arg("tables")
        .arg(&dump)
        .assert()
        .success()
        .stdout(predicate::str::contains("--- Table 1 (page 1"))
        .stdout(predicate::str::contains("--- Table 2 (page 3"))
        .stdout(predicate::str::contains("| LIFE    | 10   | 1,200 |"));
}

#[test]
fn json_output_carries_records_and_skips() {
    let dir = tempfile::tempdir().unwrap();
    let dump = common::three_page_dump(dir.path());

    let output = cmd()
        .arg("tables")
        .arg(&dump)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tables = value["tables"].as_array().unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0]["page_number"], 1);
    assert_eq!(tables[0]["index_on_page"], 1);
    assert_eq!(tables[0]["column_count"], 3);
    assert_eq!(tables[0]["header_rows"], 1);
    assert_eq!(tables[0]["rows"][1][0], "LIFE");
    assert_eq!(tables[1]["rows"][1][1], "30");

    let skipped = value["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["page"], 2);
    assert_eq!(skipped[0]["reason"], "degenerate_column_set");
}

#[test]
fn csv_output_quotes_numbers_with_commas() {
    let dir = tempfile::tempdir().unwrap();
    let dump = common::three_page_dump(dir.path());

    cmd()
        .arg("tables")
        .arg(&dump)
        .args(["--format", "csv", "--pages", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Line,2023,2024\n"))
        .stdout(predicate::str::contains("LIFE,10,\"1,200\"\n"));
}

#[test]
fn page_selection_limits_output() {
    let dir = tempfile::tempdir().unwrap();
    let dump = common::three_page_dump(dir.path());

    cmd()
        .arg("tables")
        .arg(&dump)
        .args(["--pages", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tables found."));
}

#[test]
fn page_out_of_range_fails() {
    let dir = tempfile::tempdir().unwrap();
    let dump = common::three_page_dump(dir.path());

    cmd()
        .arg("tables")
        .arg(&dump)
        .args(["--pages", "9"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("exceeds document page count"));
}

#[test]
fn malformed_dump_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"pages\": [").unwrap();

    cmd()
        .arg("tables")
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: malformed page dump"));
}

#[test]
fn settings_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let dump = common::three_page_dump(dir.path());
    let settings = dir.path().join("settings.json");
    // No cluster can reach this support, so only the two drawn edges remain.
    std::fs::write(&settings, r#"{"min_column_support": 1000}"#).unwrap();

    let output = cmd()
        .arg("tables")
        .arg(&dump)
        .args(["--format", "json", "--pages", "1", "--settings"])
        .arg(&settings)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["tables"][0]["column_count"], 1);
}

#[test]
fn verbose_logs_go_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let dump = common::three_page_dump(dir.path());

    cmd()
        .arg("tables")
        .arg(&dump)
        .args(["--format", "json", "-v"])
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("column boundaries discovered"));
}
