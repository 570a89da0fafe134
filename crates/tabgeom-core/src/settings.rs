//! Tunable thresholds for table-geometry inference.
//!
//! The defaults reproduce the behavior the heuristics were tuned with on
//! real financial statements. None of them is derived from first
//! principles, so every value is exposed as a field.

use crate::unicode_norm::UnicodeNorm;

/// Configuration for the whole inference pipeline.
///
/// Distances are in page units (points for PDF sources).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtractSettings {
    /// A line whose horizontal extent is below this is a vertical edge candidate.
    pub vertical_line_max_width: f64,
    /// Maximum gap between sorted token left edges inside one column cluster.
    pub column_cluster_tolerance: f64,
    /// Absolute floor on the number of tokens a column cluster needs.
    pub min_column_support: usize,
    /// Fraction of the page's token count a column cluster needs.
    pub min_column_support_ratio: f64,
    /// Text clusters closer than this to a drawn edge add no inferred edge.
    pub drawn_edge_proximity: f64,
    /// Inferred edges are placed this far left of their cluster's mean.
    pub inferred_edge_offset: f64,
    /// Edges closer than this are the same edge in a [`ColumnSet`](crate::ColumnSet).
    pub edge_merge_tolerance: f64,
    /// Slack around a region when deciding which tokens belong to it.
    pub region_margin: f64,
    /// Regions with fewer tokens than this produce no table.
    pub min_region_tokens: usize,
    /// Maximum vertical gap between consecutive token tops in one row.
    pub row_tolerance: f64,
    /// Maximum gap between sorted token centers inside one column (position-driven).
    pub center_cluster_tolerance: f64,
    /// Leading rows ignored when computing column centers.
    pub presumed_header_rows: usize,
    /// Minimum token centers needed from data rows before falling back to all rows.
    pub min_data_positions: usize,
    /// How many leading rows are examined for header spans.
    pub header_scan_rows: usize,
    /// How many rows beneath a header row may justify extending a span.
    pub span_lookahead_rows: usize,
    /// Upper bound on the reported header-row count.
    pub max_header_rows: usize,
    /// First row index (0-based) sampled by packed-value detection.
    pub packed_sample_start: usize,
    /// Row index (0-based, exclusive) where packed-value sampling stops.
    pub packed_sample_end: usize,
    /// Fraction of packed cells above which a grid is flagged.
    pub packed_ratio_threshold: f64,
    /// Minimum length for a drawn edge to take part in region finding.
    pub edge_min_length: f64,
    /// Parallel edges closer than this are snapped together during region finding.
    pub snap_tolerance: f64,
    /// Collinear segments with gaps up to this are joined during region finding.
    pub join_tolerance: f64,
    /// Slack when testing whether a horizontal and vertical edge cross.
    pub intersection_tolerance: f64,
    /// Normalization applied to token text before assembly.
    pub unicode_norm: UnicodeNorm,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            vertical_line_max_width: 2.0,
            column_cluster_tolerance: 6.0,
            min_column_support: 3,
            min_column_support_ratio: 0.01,
            drawn_edge_proximity: 10.0,
            inferred_edge_offset: 3.0,
            edge_merge_tolerance: 1.0,
            region_margin: 2.0,
            min_region_tokens: 3,
            row_tolerance: 4.0,
            center_cluster_tolerance: 20.0,
            presumed_header_rows: 3,
            min_data_positions: 5,
            header_scan_rows: 3,
            span_lookahead_rows: 2,
            max_header_rows: 4,
            packed_sample_start: 2,
            packed_sample_end: 12,
            packed_ratio_threshold: 0.25,
            edge_min_length: 3.0,
            snap_tolerance: 3.0,
            join_tolerance: 3.0,
            intersection_tolerance: 3.0,
            unicode_norm: UnicodeNorm::None,
        }
    }
}

impl ExtractSettings {
    /// Minimum cluster support for a page with `token_count` tokens.
    ///
    /// This is `max(min_column_support, ratio × token_count)`; stray
    /// footnotes and page numbers never reach it.
    pub fn column_support_threshold(&self, token_count: usize) -> f64 {
        (self.min_column_support as f64).max(token_count as f64 * self.min_column_support_ratio)
    }
}
