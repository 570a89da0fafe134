//! Soft diagnostics for tabgeom.
//!
//! Table inference never fails hard. When a page or region yields no
//! table, or a heuristic decision is rolled back, a [`SkipNote`] records
//! what happened and extraction continues with the next unit of work.

use std::fmt;

/// Why a page or region produced no table, or a rebuild was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkipReason {
    /// Fewer tokens than the region minimum.
    InputTooSparse,
    /// Fewer than two column boundaries were found.
    DegenerateColumnSet,
    /// The position-driven rebuild did not gain columns and was discarded.
    MergeRebuildRegression,
}

impl SkipReason {
    /// Returns the string tag for this reason.
    pub fn as_str(&self) -> &str {
        match self {
            SkipReason::InputTooSparse => "INPUT_TOO_SPARSE",
            SkipReason::DegenerateColumnSet => "DEGENERATE_COLUMN_SET",
            SkipReason::MergeRebuildRegression => "MERGE_REBUILD_REGRESSION",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal diagnostic attached to a page or region.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkipNote {
    /// Page number (1-based).
    pub page: usize,
    /// Region index on the page (1-based); `None` for page-level notes.
    pub region: Option<usize>,
    pub reason: SkipReason,
}

impl SkipNote {
    pub fn page(page: usize, reason: SkipReason) -> Self {
        Self {
            page,
            region: None,
            reason,
        }
    }

    pub fn region(page: usize, region: usize, reason: SkipReason) -> Self {
        Self {
            page,
            region: Some(region),
            reason,
        }
    }
}

impl fmt::Display for SkipNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] page {}", self.reason, self.page)?;
        if let Some(region) = self.region {
            write!(f, " region {region}")?;
        }
        Ok(())
    }
}
