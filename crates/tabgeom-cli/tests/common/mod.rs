//! Page-dump fixtures shared by the CLI integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::{Value, json};

fn word(text: &str, x0: f64, top: f64, x1: f64) -> Value {
    json!({"text": text, "x0": x0, "top": top, "x1": x1, "bottom": top + 8.0})
}

/// One bordered box: a header row and four label/value/value rows. The
/// two value columns share the box with no ruling between them.
pub fn insurance_page(page_number: usize, value: &str) -> Value {
    let mut words = vec![
        word("Line", 12.0, 30.0, 30.0),
        word("2023", 45.0, 30.0, 58.0),
        word("2024", 85.0, 30.0, 98.0),
    ];
    for (i, label) in ["LIFE", "PENSION", "HEALTH", "VAR.INS"].iter().enumerate() {
        let top = 45.0 + i as f64 * 12.0;
        words.push(word(label, 12.0, top, 35.0));
        words.push(word(value, 45.0, top, 55.0));
        words.push(word("1,200", 85.0, top, 98.0));
    }
    json!({
        "page_number": page_number,
        "words": words,
        "rects": [{"x0": 10.0, "top": 25.0, "x1": 120.0, "bottom": 100.0}]
    })
}

/// A page with a single stray word and no drawing.
pub fn blank_page(page_number: usize) -> Value {
    json!({"page_number": page_number, "words": [word("Notes", 200.0, 700.0, 230.0)]})
}

pub fn write_dump(dir: &Path, name: &str, pages: Vec<Value>) -> PathBuf {
    let path = dir.join(name);
    let dump = json!({"source": name.replace(".json", ".pdf"), "pages": pages});
    std::fs::write(&path, dump.to_string()).unwrap();
    path
}

/// Two insurance pages around a blank one.
pub fn three_page_dump(dir: &Path) -> PathBuf {
    write_dump(
        dir,
        "report.json",
        vec![insurance_page(1, "10"), blank_page(2), insurance_page(3, "30")],
    )
}
