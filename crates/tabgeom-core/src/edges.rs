//! Vertical boundary candidates and the Edge Collector.
//!
//! An [`Edge`] is an x-position where one column may end and the next begin.
//! Drawn edges come from the page's vector graphics; inferred edges come
//! from text alignment (see [`crate::columns`]).

use std::collections::BTreeMap;

use crate::settings::ExtractSettings;
use crate::shapes::{Line, Rect};

/// Where an edge came from.
///
/// Ordered by confidence: a `Drawn` edge outranks an `Inferred` one when two
/// edges collapse into the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeSource {
    /// Derived from text alignment.
    Inferred,
    /// Taken from a drawn line or rectangle side.
    Drawn,
}

/// A vertical column-boundary candidate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Horizontal position.
    pub x: f64,
    /// Provenance.
    pub source: EdgeSource,
    /// How many primitives or tokens justify this edge.
    pub support: usize,
}

impl Edge {
    pub fn drawn(x: f64, support: usize) -> Self {
        Self {
            x,
            source: EdgeSource::Drawn,
            support,
        }
    }

    pub fn inferred(x: f64, support: usize) -> Self {
        Self {
            x,
            source: EdgeSource::Inferred,
            support,
        }
    }

    /// Whether `self` should survive over `other` when the two collapse.
    pub fn outranks(&self, other: &Edge) -> bool {
        (self.source, self.support) > (other.source, other.support)
    }
}

/// Collect drawn vertical edges from a page's lines and rectangles.
///
/// - A line whose horizontal extent is below
///   [`vertical_line_max_width`](ExtractSettings::vertical_line_max_width)
///   contributes its x-position.
/// - A rectangle contributes both its left and right sides.
///
/// Positions are rounded to the nearest integer; candidates that round to
/// the same value are one edge whose support is the number of contributing
/// primitives. The result is sorted ascending and empty when the page has
/// no vector graphics.
pub fn collect_vertical_edges(lines: &[Line], rects: &[Rect], settings: &ExtractSettings) -> Vec<Edge> {
    let mut support: BTreeMap<i64, usize> = BTreeMap::new();
    let mut add = |x: f64| {
        if x.is_finite() {
            *support.entry(x.round() as i64).or_default() += 1;
        }
    };

    for line in lines {
        if line.dx() < settings.vertical_line_max_width {
            add(line.x0);
        }
    }

    for rect in rects {
        let bbox = rect.bbox();
        add(bbox.x0);
        add(bbox.x1);
    }

    support
        .into_iter()
        .map(|(x, count)| Edge::drawn(x as f64, count))
        .collect()
}
