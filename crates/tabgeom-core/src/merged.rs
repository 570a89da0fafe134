//! Merged-cell heuristics.
//!
//! Two independent detections run over an assembled [`Grid`]:
//!
//! - **Header spans**: a header label followed by empty cells that have
//!   content beneath them spans those sub-columns
//!   ([`detect_header_spans`]).
//! - **Packed values**: data cells holding several numbers mean a column
//!   boundary was missed ([`detect_packed_values`]); the grid is then rebuilt
//!   from token positions and [`choose_better`] decides which to keep.
//!
//! Neither detection has ground truth. Wrong guesses degrade the grid
//! visually but never fail extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::grid::Grid;
use crate::settings::ExtractSettings;

/// A lone dash placeholder, or digits mixed with `,` `(` `)` `.` `-`.
static NUMERIC_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:-|[0-9,().\-]*[0-9][0-9,().\-]*)$").expect("static regex")
});

/// Whether `part` reads as a number in a financial table.
///
/// Accepts `1,234`, `(56)`, `7.5`, `-12`, and a lone `-` for "no value".
pub fn is_numeric_like(part: &str) -> bool {
    NUMERIC_LIKE.is_match(part)
}

/// Whether `text` is two or more whitespace-separated numeric-like parts.
pub fn is_packed_text(text: &str) -> bool {
    let mut parts = 0;
    for part in text.split_whitespace() {
        if !is_numeric_like(part) {
            return false;
        }
        parts += 1;
    }
    parts >= 2
}

/// A header cell spanning several sub-columns.
///
/// Rows and columns are 1-based; `end_col` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnGroup {
    pub row: usize,
    pub start_col: usize,
    pub end_col: usize,
    pub label: String,
}

impl ColumnGroup {
    /// Number of sub-columns covered.
    pub fn span(&self) -> usize {
        self.end_col + 1 - self.start_col
    }

    /// Whether two groups on the same row share a column.
    pub fn overlaps(&self, other: &ColumnGroup) -> bool {
        self.row == other.row && self.start_col <= other.end_col && other.start_col <= self.end_col
    }
}

/// Header rows and column groups detected at the top of a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderLayout {
    /// How many leading rows are header rows (at least 1).
    pub header_rows: usize,
    /// Detected spans, ordered by row then start column.
    pub groups: Vec<ColumnGroup>,
}

impl Default for HeaderLayout {
    fn default() -> Self {
        Self {
            header_rows: 1,
            groups: Vec::new(),
        }
    }
}

/// Detect header cells that span several sub-columns.
///
/// Scans the first [`header_scan_rows`](ExtractSettings::header_scan_rows)
/// rows. From each non-empty cell the span extends rightward while the next
/// cell is empty and at least one of the following
/// [`span_lookahead_rows`](ExtractSettings::span_lookahead_rows) rows has
/// text in that column. Scanning resumes after a span, so spans on one row
/// never overlap.
///
/// The header-row count is the deepest 1-based row holding a span, capped
/// at [`max_header_rows`](ExtractSettings::max_header_rows).
/// Grids with fewer than two rows report one header row and no groups.
pub fn detect_header_spans(grid: &Grid, settings: &ExtractSettings) -> HeaderLayout {
    let mut layout = HeaderLayout::default();
    let row_count = grid.row_count();
    if row_count < 2 {
        return layout;
    }

    let has_text = |row: usize, col: usize| !grid.text(row, col).trim().is_empty();
    let columns = grid.column_count();

    for row in 0..settings.header_scan_rows.min(row_count) {
        let below = (row + 1)..(row + 1 + settings.span_lookahead_rows).min(row_count);
        let mut col = 0;
        while col < columns {
            if !has_text(row, col) {
                col += 1;
                continue;
            }

            let mut next = col + 1;
            while next < columns
                && !has_text(row, next)
                && below.clone().any(|r| has_text(r, next))
            {
                next += 1;
            }

            if next - col > 1 {
                layout.groups.push(ColumnGroup {
                    row: row + 1,
                    start_col: col + 1,
                    end_col: next,
                    label: grid.text(row, col).trim().to_string(),
                });
                layout.header_rows = layout.header_rows.max(row + 1);
            }
            col = next;
        }
    }

    layout.header_rows = layout.header_rows.min(settings.max_header_rows);
    layout
}

/// Counts gathered by packed-value detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedReport {
    /// Non-empty cells examined.
    pub checked: usize,
    /// Examined cells holding two or more numeric-like parts.
    pub packed: usize,
}

impl PackedReport {
    /// Fraction of examined cells that are packed (0 when nothing was examined).
    pub fn ratio(&self) -> f64 {
        if self.checked == 0 {
            0.0
        } else {
            self.packed as f64 / self.checked as f64
        }
    }

    /// Whether the packed fraction exceeds `threshold`.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.checked > 0 && self.ratio() > threshold
    }
}

/// Count packed cells in the sampled data rows.
///
/// Samples rows `packed_sample_start..packed_sample_end` (0-based), skipping
/// the presumed header. Grids with fewer than three rows are not sampled.
pub fn detect_packed_values(grid: &Grid, settings: &ExtractSettings) -> PackedReport {
    let mut report = PackedReport::default();
    if grid.row_count() < 3 {
        return report;
    }

    let end = settings.packed_sample_end.min(grid.row_count());
    let start = settings.packed_sample_start.min(end);
    for row in &grid.rows()[start..end] {
        for cell in row.iter().filter(|c| !c.is_blank()) {
            report.checked += 1;
            if cell.packed {
                report.packed += 1;
            }
        }
    }

    report
}

/// Whether a grid looks like it is missing column boundaries.
pub fn has_packed_columns(grid: &Grid, settings: &ExtractSettings) -> bool {
    detect_packed_values(grid, settings).exceeds(settings.packed_ratio_threshold)
}

/// Result of comparing a naive grid with its position-driven rebuild.
#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
    /// No rebuild was available; the naive grid stands.
    Naive(Grid),
    /// The rebuild found strictly more columns and replaces the naive grid.
    Rebuilt(Grid),
    /// The rebuild did not add columns and was discarded.
    Regressed {
        naive: Grid,
        rebuilt_columns: usize,
    },
}

impl Choice {
    pub fn grid(&self) -> &Grid {
        match self {
            Choice::Naive(grid) | Choice::Rebuilt(grid) => grid,
            Choice::Regressed { naive, .. } => naive,
        }
    }

    pub fn into_grid(self) -> Grid {
        match self {
            Choice::Naive(grid) | Choice::Rebuilt(grid) => grid,
            Choice::Regressed { naive, .. } => naive,
        }
    }

    pub fn is_rebuilt(&self) -> bool {
        matches!(self, Choice::Rebuilt(_))
    }
}

/// Keep the rebuild only when it has strictly more columns than the naive grid.
///
/// A rebuild never reduces the column count of what is returned.
pub fn choose_better(naive: Grid, rebuilt: Option<Grid>) -> Choice {
    match rebuilt {
        None => Choice::Naive(naive),
        Some(rebuilt) if rebuilt.column_count() > naive.column_count() => Choice::Rebuilt(rebuilt),
        Some(rebuilt) => Choice::Regressed {
            rebuilt_columns: rebuilt.column_count(),
            naive,
        },
    }
}
