//! Column discovery: merge drawn edges with boundaries inferred from text.
//!
//! Sub-columns that share one bordered cell have no vertical line between
//! them, but their tokens still line up on a common left edge. Clustering
//! token left edges recovers those boundaries.

use crate::cluster::cluster_sorted;
use crate::edges::Edge;
use crate::settings::ExtractSettings;
use crate::words::Token;

/// An ordered, deduplicated list of column boundaries.
///
/// Invariant: positions are strictly increasing and adjacent edges are more
/// than the merge tolerance apart.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnSet {
    edges: Vec<Edge>,
}

impl ColumnSet {
    /// Build a column set from edges in any order.
    ///
    /// Edges within `merge_tolerance` of the edge kept before them collapse
    /// into one; the survivor is the higher-ranked edge (drawn over
    /// inferred, then higher support, then the earlier position).
    pub fn from_edges(mut edges: Vec<Edge>, merge_tolerance: f64) -> Self {
        edges.retain(|e| e.x.is_finite());
        edges.sort_by(|a, b| a.x.total_cmp(&b.x));

        let mut kept: Vec<Edge> = Vec::with_capacity(edges.len());
        for edge in edges {
            match kept.last_mut() {
                Some(last) if edge.x - last.x <= merge_tolerance => {
                    if edge.outranks(last) {
                        *last = edge;
                    }
                }
                _ => kept.push(edge),
            }
        }

        Self { edges: kept }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Boundary x-positions, ascending.
    pub fn positions(&self) -> Vec<f64> {
        self.edges.iter().map(|e| e.x).collect()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// At least two boundaries are needed to partition anything.
    pub fn is_usable(&self) -> bool {
        self.edges.len() >= 2
    }

    /// The boundaries falling inside `[x0 - margin, x1 + margin]`.
    pub fn clipped_to(&self, x0: f64, x1: f64, margin: f64) -> ColumnSet {
        ColumnSet {
            edges: self
                .edges
                .iter()
                .filter(|e| e.x >= x0 - margin && e.x <= x1 + margin)
                .cloned()
                .collect(),
        }
    }
}

/// Discover column boundaries from token left edges and drawn edges.
///
/// 1. Round every token's left edge and sort.
/// 2. Cluster with [`column_cluster_tolerance`](ExtractSettings::column_cluster_tolerance).
/// 3. Drop clusters below [`ExtractSettings::column_support_threshold`].
/// 4. A surviving cluster not near any drawn edge adds an inferred edge just
///    left of its mean.
/// 5. Union with the drawn edges and deduplicate.
///
/// The result may hold fewer than two edges; callers check
/// [`ColumnSet::is_usable`] and skip the page when it is not.
pub fn discover_columns(tokens: &[Token], drawn: &[Edge], settings: &ExtractSettings) -> ColumnSet {
    let mut lefts: Vec<f64> = tokens
        .iter()
        .map(|t| t.bbox.x0.round())
        .filter(|x| x.is_finite())
        .collect();
    lefts.sort_by(f64::total_cmp);

    let threshold = settings.column_support_threshold(tokens.len());
    let mut edges: Vec<Edge> = drawn.to_vec();

    for cluster in cluster_sorted(&lefts, settings.column_cluster_tolerance) {
        if (cluster.len as f64) < threshold {
            continue;
        }
        let near_drawn = drawn
            .iter()
            .any(|e| (cluster.mean - e.x).abs() < settings.drawn_edge_proximity);
        if !near_drawn {
            edges.push(Edge::inferred(
                cluster.mean - settings.inferred_edge_offset,
                cluster.len,
            ));
        }
    }

    ColumnSet::from_edges(edges, settings.edge_merge_tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::{EdgeSource, collect_vertical_edges};
    use crate::shapes::Rect;

    /// Rows of (label, first value, second value) with values centered at 50 and 90.
    fn insurance_tokens() -> Vec<Token> {
        let labels = ["LIFE", "PENSION", "HEALTH", "VAR.INS"];
        let mut tokens = Vec::new();
        for (i, label) in labels.iter().enumerate() {
            let top = 40.0 + i as f64 * 12.0;
            tokens.push(Token::new(*label, 12.0, top, 35.0, top + 8.0));
            tokens.push(Token::new("10", 45.0, top, 55.0, top + 8.0));
            tokens.push(Token::new("20", 85.0, top, 95.0, top + 8.0));
        }
        tokens
    }

    #[test]
    fn from_edges_sorts_and_merges_preferring_drawn() {
        let set = ColumnSet::from_edges(
            vec![
                Edge::inferred(50.5, 9),
                Edge::drawn(10.0, 1),
                Edge::drawn(50.0, 1),
            ],
            1.0,
        );
        assert_eq!(set.positions(), vec![10.0, 50.0]);
        assert_eq!(set.edges()[1].source, EdgeSource::Drawn);
    }

    #[test]
    fn from_edges_keeps_edges_beyond_tolerance() {
        let set = ColumnSet::from_edges(vec![Edge::drawn(10.0, 1), Edge::drawn(11.5, 1)], 1.0);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn adjacent_edges_exceed_merge_tolerance() {
        let edges = (0..20).map(|i| Edge::inferred(i as f64 * 0.7, 1)).collect();
        let set = ColumnSet::from_edges(edges, 1.0);
        for pair in set.positions().windows(2) {
            assert!(pair[1] - pair[0] > 1.0);
        }
    }

    #[test]
    fn clipped_to_keeps_edges_in_range() {
        let set = ColumnSet::from_edges(
            vec![Edge::drawn(0.0, 1), Edge::drawn(50.0, 1), Edge::drawn(612.0, 1)],
            1.0,
        );
        assert_eq!(set.clipped_to(40.0, 100.0, 2.0).positions(), vec![50.0]);
    }

    #[test]
    fn infers_subcolumns_inside_one_drawn_column() {
        let settings = ExtractSettings::default();
        let tokens = insurance_tokens();
        let drawn = collect_vertical_edges(&[], &[Rect::new(10.0, 30.0, 120.0, 100.0)], &settings);

        let set = discover_columns(&tokens, &drawn, &settings);

        assert_eq!(set.positions(), vec![10.0, 42.0, 82.0, 120.0]);
        let inferred: Vec<&Edge> = set
            .edges()
            .iter()
            .filter(|e| e.source == EdgeSource::Inferred)
            .collect();
        assert_eq!(inferred.len(), 2);
        assert_eq!(inferred[0].support, 4);
    }

    #[test]
    fn clusters_near_drawn_edges_add_nothing() {
        let settings = ExtractSettings::default();
        let tokens = insurance_tokens();
        let drawn = vec![Edge::drawn(10.0, 1), Edge::drawn(44.0, 1), Edge::drawn(84.0, 1)];
        let set = discover_columns(&tokens, &drawn, &settings);
        assert_eq!(set.positions(), vec![10.0, 44.0, 84.0]);
    }

    #[test]
    fn low_support_clusters_are_discarded() {
        let settings = ExtractSettings::default();
        let mut tokens = insurance_tokens();
        // A lone page number far to the right.
        tokens.push(Token::new("7", 300.0, 500.0, 305.0, 508.0));
        let set = discover_columns(&tokens, &[], &settings);
        assert!(set.positions().iter().all(|&x| x < 300.0));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn no_tokens_and_no_drawing_is_unusable() {
        let set = discover_columns(&[], &[], &ExtractSettings::default());
        assert!(set.is_empty());
        assert!(!set.is_usable());
    }

    #[test]
    fn discovery_is_deterministic() {
        let settings = ExtractSettings::default();
        let tokens = insurance_tokens();
        let rects = vec![Rect::new(10.0, 30.0, 120.0, 100.0)];
        let run = || {
            let drawn = collect_vertical_edges(&[], &rects, &settings);
            discover_columns(&tokens, &drawn, &settings)
        };
        assert_eq!(run(), run());
    }
}
