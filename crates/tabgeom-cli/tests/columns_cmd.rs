//! Integration tests for the `columns` subcommand.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("tabgeom").unwrap()
}

#[test]
fn text_lists_drawn_and_inferred_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    let dump = common::three_page_dump(dir.path());

    cmd()
        .arg("columns")
        .arg(&dump)
        .args(["--pages", "1-2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 1: 2 drawn, 4 boundaries"))
        .stdout(predicate::str::contains("inferred support=5"))
        .stdout(predicate::str::contains("Page 2: 0 drawn, 0 boundaries (too few for a table)"));
}

#[test]
fn json_reports_positions_per_page() {
    let dir = tempfile::tempdir().unwrap();
    let dump = common::three_page_dump(dir.path());

    let output = cmd()
        .arg("columns")
        .arg(&dump)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let pages: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let pages = pages.as_array().unwrap();
    assert_eq!(pages.len(), 3);

    let xs: Vec<f64> = pages[0]["boundaries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["x"].as_f64().unwrap())
        .collect();
    assert_eq!(xs, vec![10.0, 42.0, 82.0, 120.0]);
    assert_eq!(pages[0]["boundaries"][1]["source"], "inferred");
    assert_eq!(pages[1]["usable"], false);
}
