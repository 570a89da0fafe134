use std::io::{self, IsTerminal, Write};
use std::path::Path;

use tabgeom::{ExtractSettings, JsonDocument, Table};

use crate::cli::TuningArgs;
use crate::page_range::parse_page_range;

/// Open a page dump with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found
/// or is not a valid dump.
pub fn open_dump(file: &Path) -> Result<JsonDocument, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    JsonDocument::from_path(file).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })
}

/// Resolve an optional page range string into 0-indexed page indices.
///
/// If `pages` is `None`, returns all pages (0..page_count).
/// If `pages` is `Some`, parses the range string and validates against page_count.
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<usize>, i32> {
    match pages {
        Some(range) => parse_page_range(range, page_count).map_err(|e| {
            eprintln!("Error: {e}");
            1
        }),
        None => Ok((0..page_count).collect()),
    }
}

/// Build extraction settings from an optional settings file plus flag overrides.
pub fn build_settings(tuning: &TuningArgs) -> Result<ExtractSettings, i32> {
    let mut settings = match &tuning.settings {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                eprintln!("Error: failed to read settings {}: {e}", path.display());
                1
            })?;
            serde_json::from_str(&text).map_err(|e| {
                eprintln!("Error: invalid settings {}: {e}", path.display());
                1
            })?
        }
        None => ExtractSettings::default(),
    };

    if let Some(v) = tuning.row_tolerance {
        settings.row_tolerance = v;
    }
    if let Some(v) = tuning.column_tolerance {
        settings.column_cluster_tolerance = v;
    }
    if let Some(v) = tuning.packed_threshold {
        settings.packed_ratio_threshold = v;
    }
    if let Some(ref norm) = tuning.unicode_norm {
        settings.unicode_norm = norm.to_unicode_norm();
    }

    Ok(settings)
}

/// Render one table as CSV.
pub fn table_to_csv(table: &Table) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::<u8>::new());
    for row in &table.rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Render tables as CSV blocks separated by a blank line.
pub fn tables_to_csv(tables: &[Table]) -> Result<String, csv::Error> {
    let blocks = tables
        .iter()
        .map(table_to_csv)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(blocks.join("\n"))
}

/// A progress reporter that prints "Processing page N/M..." to stderr,
/// but only when stderr is connected to a TTY (terminal).
pub struct ProgressReporter {
    total: usize,
    is_tty: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter for `total` pages.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            is_tty: io::stderr().is_terminal(),
        }
    }

    /// Report progress for page `current` (1-indexed).
    pub fn report(&self, current: usize) {
        if self.is_tty {
            eprint!("\rProcessing page {}/{}...", current, self.total);
            let _ = io::stderr().flush();
        }
    }

    /// Clear the progress line (if TTY).
    pub fn finish(&self) {
        if self.is_tty {
            eprint!("\r{}\r", " ".repeat(40));
            let _ = io::stderr().flush();
        }
    }
}
