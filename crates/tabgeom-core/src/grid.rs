//! Word-to-grid assembly.
//!
//! Tokens inside a region are grouped into rows by vertical proximity, then
//! placed into columns either by the boundaries of a [`ColumnSet`]
//! ([`assemble_by_boundaries`]) or by clustering their horizontal centers
//! ([`assemble_by_positions`]). Both produce a rectangular [`Grid`].

use crate::cluster::{cluster_sorted, cluster_values};
use crate::columns::ColumnSet;
use crate::geometry::BBox;
use crate::merged::is_packed_text;
use crate::settings::ExtractSettings;
use crate::words::{Token, sort_reading_order};

/// One cell of an assembled grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Row index (0-based).
    pub row: usize,
    /// Column index (0-based).
    pub col: usize,
    /// Space-joined text of every token placed here; empty when unoccupied.
    pub text: String,
    /// The text looks like several numeric values packed into one cell.
    pub packed: bool,
}

impl Cell {
    fn new(row: usize, col: usize, text: String) -> Self {
        let packed = is_packed_text(&text);
        Self {
            row,
            col,
            text,
            packed,
        }
    }

    /// Whether the cell holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A rectangular grid of cells.
///
/// Every row has exactly [`column_count`](Grid::column_count) cells.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    columns: usize,
}

impl Grid {
    /// Build a grid from rows of text, padding short rows with empty cells.
    pub fn from_text_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let texts: Vec<Vec<String>> = rows
            .into_iter()
            .map(|r| r.into_iter().map(Into::into).collect())
            .collect();
        let columns = texts.iter().map(Vec::len).max().unwrap_or(0);

        let rows = texts
            .into_iter()
            .enumerate()
            .map(|(ri, mut row)| {
                row.resize(columns, String::new());
                row.into_iter()
                    .enumerate()
                    .map(|(ci, text)| Cell::new(ri, ci, text))
                    .collect()
            })
            .collect();

        Self { rows, columns }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Text at `(row, col)`, or `""` outside the grid.
    pub fn text(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|c| c.text.as_str())
            .unwrap_or("")
    }

    /// Copy out the cell texts row by row.
    pub fn to_strings(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| r.iter().map(|c| c.text.clone()).collect())
            .collect()
    }
}

/// Tokens lying entirely inside `region` grown by `margin`.
pub fn tokens_in_region<'a>(tokens: &'a [Token], region: &BBox, margin: f64) -> Vec<&'a Token> {
    tokens
        .iter()
        .filter(|t| region.encloses(&t.bbox, margin))
        .collect()
}

/// Group tokens into rows by the vertical gap between consecutive tops.
///
/// Rows come out top-to-bottom; tokens within each row left-to-right.
pub fn group_rows<'a>(mut tokens: Vec<&'a Token>, tolerance: f64) -> Vec<Vec<&'a Token>> {
    sort_reading_order(&mut tokens);
    let tops: Vec<f64> = tokens.iter().map(|t| t.bbox.top).collect();

    cluster_sorted(&tops, tolerance)
        .into_iter()
        .map(|cluster| {
            let mut row: Vec<&Token> = tokens[cluster.range()].to_vec();
            row.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
            row
        })
        .collect()
}

/// Assemble a grid by placing each token between the boundaries bracketing it.
///
/// Columns are the segments between consecutive boundaries inside the
/// region, plus an open segment left of the first boundary and one right of
/// the last. A token belongs to the segment containing its horizontal
/// center. The open segments only become columns when a token lands in them.
///
/// Returns `None` when fewer than
/// [`min_region_tokens`](ExtractSettings::min_region_tokens) tokens fall
/// inside the region.
pub fn assemble_by_boundaries(
    tokens: &[Token],
    region: &BBox,
    columns: &ColumnSet,
    settings: &ExtractSettings,
) -> Option<Grid> {
    let inside = tokens_in_region(tokens, region, settings.region_margin);
    if inside.len() < settings.min_region_tokens {
        return None;
    }

    let boundaries = columns
        .clipped_to(region.x0, region.x1, settings.region_margin)
        .positions();
    let segment_of = |t: &Token| boundaries.partition_point(|&b| b <= t.center_x());

    let rows = group_rows(inside, settings.row_tolerance);
    let segments = boundaries.len() + 1;
    let leading_used = rows.iter().flatten().any(|&t| segment_of(t) == 0);
    let trailing_used = rows.iter().flatten().any(|&t| segment_of(t) == segments - 1);

    let first = if leading_used { 0 } else { 1 };
    let last = if trailing_used { segments - 1 } else { segments - 2 };
    let width = last + 1 - first;

    let text_rows = rows.iter().map(|row| {
        let mut cells = vec![String::new(); width];
        for &token in row {
            push_text(&mut cells[segment_of(token) - first], &token.text);
        }
        cells
    });

    Some(Grid::from_text_rows(text_rows))
}

/// Assemble a grid from token coordinates alone.
///
/// Column centers come from clustering token horizontal centers with
/// [`center_cluster_tolerance`](ExtractSettings::center_cluster_tolerance).
/// Header labels are sparser and differently aligned than the data beneath
/// them, so the first
/// [`presumed_header_rows`](ExtractSettings::presumed_header_rows) rows are
/// left out unless that leaves fewer than
/// [`min_data_positions`](ExtractSettings::min_data_positions) centers.
/// Each token then goes to the nearest center.
///
/// Returns `None` for sparse regions and when fewer than two column centers
/// are found.
pub fn assemble_by_positions(tokens: &[Token], region: &BBox, settings: &ExtractSettings) -> Option<Grid> {
    let inside = tokens_in_region(tokens, region, settings.region_margin);
    if inside.len() < settings.min_region_tokens {
        return None;
    }

    let rows = group_rows(inside, settings.row_tolerance);

    let mut positions: Vec<f64> = rows
        .iter()
        .skip(settings.presumed_header_rows)
        .flatten()
        .map(|t| t.center_x())
        .collect();
    if positions.len() < settings.min_data_positions {
        positions = rows.iter().flatten().map(|t| t.center_x()).collect();
    }

    let centers: Vec<f64> = cluster_values(positions, settings.center_cluster_tolerance)
        .into_iter()
        .map(|c| c.mean)
        .collect();
    if centers.len() < 2 {
        return None;
    }

    let text_rows = rows.iter().map(|row| {
        let mut cells = vec![String::new(); centers.len()];
        for token in row {
            push_text(&mut cells[nearest_center(&centers, token.center_x())], &token.text);
        }
        cells
    });

    Some(Grid::from_text_rows(text_rows))
}

/// Index of the center closest to `x`; ties go to the leftmost.
fn nearest_center(centers: &[f64], x: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centers.iter().enumerate() {
        let d = (x - c).abs();
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

fn push_text(cell: &mut String, text: &str) {
    if !cell.is_empty() {
        cell.push(' ');
    }
    cell.push_str(text);
}
