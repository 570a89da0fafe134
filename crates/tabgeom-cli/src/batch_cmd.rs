use std::path::{Path, PathBuf};

use tabgeom::{Extraction, JsonDocument, TableExtractor};
use tracing::{info, warn};

use crate::cli::{BatchFormat, TuningArgs};
use crate::shared::{build_settings, tables_to_csv};

/// Counters printed at the end of a batch run.
#[derive(Debug, Default, PartialEq)]
struct Summary {
    files: usize,
    succeeded: usize,
    failed: usize,
    tables: usize,
}

pub fn run(
    dir: &Path,
    output: Option<&Path>,
    format: &BatchFormat,
    tuning: &TuningArgs,
) -> Result<(), i32> {
    if !dir.is_dir() {
        eprintln!("Error: directory not found: {}", dir.display());
        return Err(1);
    }

    let dumps = find_dumps(dir).map_err(|e| {
        eprintln!("Error: failed to list {}: {e}", dir.display());
        1
    })?;
    if dumps.is_empty() {
        println!("No page dumps found in {}", dir.display());
        return Ok(());
    }

    let out_dir = output.map_or_else(|| dir.join("tables"), Path::to_path_buf);
    std::fs::create_dir_all(&out_dir).map_err(|e| {
        eprintln!("Error: failed to create {}: {e}", out_dir.display());
        1
    })?;

    let extractor = TableExtractor::new(build_settings(tuning)?);
    let mut summary = Summary {
        files: dumps.len(),
        ..Summary::default()
    };

    for (i, path) in dumps.iter().enumerate() {
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        println!("[{}/{}] {name}", i + 1, dumps.len());

        match process_file(&extractor, path, &out_dir, format) {
            Ok(Some((extraction, written))) => {
                summary.succeeded += 1;
                summary.tables += extraction.tables.len();
                println!(
                    "      {} tables -> {}",
                    extraction.tables.len(),
                    written.display()
                );
            }
            Ok(None) => {
                summary.succeeded += 1;
                println!("      no tables found");
            }
            Err(message) => {
                summary.failed += 1;
                warn!(file = %path.display(), error = %message, "dump failed");
                println!("      error: {message}");
            }
        }
    }

    print_summary(&summary, &out_dir);
    if summary.succeeded == 0 {
        return Err(1);
    }
    Ok(())
}

/// `*.json` files directly inside `dir`, sorted by name.
fn find_dumps(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut dumps = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
            dumps.push(path);
        }
    }
    dumps.sort();
    Ok(dumps)
}

/// Extract one dump and write its output file.
///
/// Returns `Ok(None)` when the dump holds no tables; nothing is written then.
fn process_file(
    extractor: &TableExtractor,
    path: &Path,
    out_dir: &Path,
    format: &BatchFormat,
) -> Result<Option<(Extraction, PathBuf)>, String> {
    let doc = JsonDocument::from_path(path).map_err(|e| e.to_string())?;
    let extraction = extractor
        .extract_document(&doc)
        .map_err(|e| e.to_string())?;
    info!(
        file = %path.display(),
        pages = extraction.pages,
        tables = extraction.tables.len(),
        skipped = extraction.notes.len(),
        "dump processed"
    );
    if extraction.tables.is_empty() {
        return Ok(None);
    }

    let stem = path
        .file_stem()
        .map_or_else(|| "dump".to_string(), |s| s.to_string_lossy().into_owned());
    let target = out_dir.join(format!("{stem}_tables.{}", format.extension()));

    let body = match format {
        BatchFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "source": doc.source,
            "tables": extraction.tables,
            "skipped": extraction.notes,
        }))
        .map_err(|e| e.to_string())?,
        BatchFormat::Csv => tables_to_csv(&extraction.tables).map_err(|e| e.to_string())?,
    };
    std::fs::write(&target, body).map_err(|e| format!("failed to write {}: {e}", target.display()))?;

    Ok(Some((extraction, target)))
}

fn print_summary(summary: &Summary, out_dir: &Path) {
    println!();
    println!("Files processed: {}", summary.files);
    println!("Successful:      {}", summary.succeeded);
    println!("Errors:          {}", summary.failed);
    println!("Tables:          {}", summary.tables);
    println!("Output:          {}", out_dir.display());
}
