//! Region finding from ruling lines.
//!
//! When the page reader supplies no table boxes, bordered tables are located
//! from the drawing alone: horizontal and vertical segments are snapped,
//! joined, and intersected; each crossing closes the smallest box ruled on
//! all four sides below and right of it; cells sharing a side belong to the
//! same region.

use std::collections::BTreeMap;

use crate::cluster::cluster_sorted;
use crate::geometry::BBox;
use crate::settings::ExtractSettings;
use crate::shapes::{Line, Orientation, Rect};

/// An axis-aligned ruling segment.
///
/// Horizontal segments have `top == bottom`; vertical ones have `x0 == x1`.
#[derive(Debug, Clone, PartialEq)]
struct Segment {
    x0: f64,
    top: f64,
    x1: f64,
    bottom: f64,
    orientation: Orientation,
}

impl Segment {
    fn horizontal(y: f64, xa: f64, xb: f64) -> Self {
        Self {
            x0: xa.min(xb),
            top: y,
            x1: xa.max(xb),
            bottom: y,
            orientation: Orientation::Horizontal,
        }
    }

    fn vertical(x: f64, ya: f64, yb: f64) -> Self {
        Self {
            x0: x,
            top: ya.min(yb),
            x1: x,
            bottom: ya.max(yb),
            orientation: Orientation::Vertical,
        }
    }

    fn length(&self) -> f64 {
        (self.x1 - self.x0) + (self.bottom - self.top)
    }

    /// Position across the segment's direction.
    fn offset(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.top,
            _ => self.x0,
        }
    }

    /// Extent along the segment's direction.
    fn span(&self) -> (f64, f64) {
        match self.orientation {
            Orientation::Horizontal => (self.x0, self.x1),
            _ => (self.top, self.bottom),
        }
    }

    fn with_offset(&self, offset: f64) -> Self {
        match self.orientation {
            Orientation::Horizontal => Segment::horizontal(offset, self.x0, self.x1),
            _ => Segment::vertical(offset, self.top, self.bottom),
        }
    }

    fn with_span(&self, start: f64, end: f64) -> Self {
        match self.orientation {
            Orientation::Horizontal => Segment::horizontal(self.top, start, end),
            _ => Segment::vertical(self.x0, start, end),
        }
    }
}

/// Find bordered table regions from a page's lines and rectangles.
///
/// Returns region boxes ordered top-to-bottom, then left-to-right. Pages
/// without a closed grid of rulings yield no regions.
pub fn find_regions(lines: &[Line], rects: &[Rect], settings: &ExtractSettings) -> Vec<BBox> {
    let segments = ruling_segments(lines, rects, settings);
    let (horizontals, verticals): (Vec<Segment>, Vec<Segment>) = segments
        .into_iter()
        .partition(|s| s.orientation == Orientation::Horizontal);

    let horizontals = join_collinear(snap(horizontals, settings.snap_tolerance), settings.join_tolerance);
    let verticals = join_collinear(snap(verticals, settings.snap_tolerance), settings.join_tolerance);

    let points = intersections(&horizontals, &verticals, settings.intersection_tolerance);
    let cells = points_to_cells(&points);
    group_cells(cells)
}

/// Axis-aligned segments long enough to rule a table.
fn ruling_segments(lines: &[Line], rects: &[Rect], settings: &ExtractSettings) -> Vec<Segment> {
    let thin = settings.vertical_line_max_width;
    let mut segments = Vec::new();

    for line in lines {
        match line.orientation(thin) {
            Orientation::Horizontal => {
                segments.push(Segment::horizontal((line.top + line.bottom) / 2.0, line.x0, line.x1))
            }
            Orientation::Vertical => {
                segments.push(Segment::vertical((line.x0 + line.x1) / 2.0, line.top, line.bottom))
            }
            Orientation::Diagonal => {}
        }
    }

    for rect in rects {
        let b = rect.bbox();
        segments.push(Segment::horizontal(b.top, b.x0, b.x1));
        segments.push(Segment::horizontal(b.bottom, b.x0, b.x1));
        segments.push(Segment::vertical(b.x0, b.top, b.bottom));
        segments.push(Segment::vertical(b.x1, b.top, b.bottom));
    }

    segments.retain(|s| s.length() >= settings.edge_min_length && s.offset().is_finite());
    segments
}

/// Align parallel segments whose offsets are within `tolerance` to their mean.
fn snap(mut segments: Vec<Segment>, tolerance: f64) -> Vec<Segment> {
    segments.sort_by(|a, b| a.offset().total_cmp(&b.offset()));
    let offsets: Vec<f64> = segments.iter().map(Segment::offset).collect();

    let mut snapped = Vec::with_capacity(segments.len());
    for cluster in cluster_sorted(&offsets, tolerance) {
        for seg in &segments[cluster.range()] {
            snapped.push(seg.with_offset(cluster.mean));
        }
    }
    snapped
}

/// Merge segments on the same offset whose spans overlap or nearly touch.
fn join_collinear(mut segments: Vec<Segment>, tolerance: f64) -> Vec<Segment> {
    segments.sort_by(|a, b| {
        a.offset()
            .total_cmp(&b.offset())
            .then_with(|| a.span().0.total_cmp(&b.span().0))
    });

    let mut joined: Vec<Segment> = Vec::with_capacity(segments.len());
    for seg in segments {
        if let Some(last) = joined.last_mut() {
            let (start, end) = last.span();
            let (s, e) = seg.span();
            if last.offset() == seg.offset() && s <= end + tolerance {
                *last = last.with_span(start, end.max(e));
                continue;
            }
        }
        joined.push(seg);
    }
    joined
}

/// Grid key for a coordinate; three decimal places.
fn key(v: f64) -> i64 {
    (v * 1000.0).round() as i64
}

/// The segments passing through one crossing point.
#[derive(Debug, Default)]
struct Crossing {
    verticals: Vec<usize>,
    horizontals: Vec<usize>,
}

/// Crossing points keyed by `(x, y)` and ordered by x, then y.
type Crossings = BTreeMap<(i64, i64), Crossing>;

/// Crossing points of horizontal and vertical segments.
fn intersections(horizontals: &[Segment], verticals: &[Segment], tolerance: f64) -> Crossings {
    let mut points = Crossings::new();
    for (hi, h) in horizontals.iter().enumerate() {
        for (vi, v) in verticals.iter().enumerate() {
            if v.x0 >= h.x0 - tolerance
                && v.x0 <= h.x1 + tolerance
                && h.top >= v.top - tolerance
                && h.top <= v.bottom + tolerance
            {
                let crossing = points.entry((key(v.x0), key(h.top))).or_default();
                crossing.verticals.push(vi);
                crossing.horizontals.push(hi);
            }
        }
    }
    points
}

/// Whether one ruling segment runs between two crossings on the same x or y.
fn ruled_between(points: &Crossings, a: (i64, i64), b: (i64, i64)) -> bool {
    let (Some(pa), Some(pb)) = (points.get(&a), points.get(&b)) else {
        return false;
    };
    let shared = |xs: &[usize], ys: &[usize]| xs.iter().any(|i| ys.contains(i));
    if a.0 == b.0 {
        shared(&pa.verticals, &pb.verticals)
    } else if a.1 == b.1 {
        shared(&pa.horizontals, &pb.horizontals)
    } else {
        false
    }
}

/// The smallest ruled box hanging from each crossing.
///
/// From a top-left corner, walk down to each crossing joined to it by a
/// vertical ruling and right to each crossing joined by a horizontal one;
/// the first pair whose far corner is ruled to both closes a cell. Cells
/// may span crossings that other rows or other tables contribute.
fn points_to_cells(points: &Crossings) -> Vec<BBox> {
    let keys: Vec<(i64, i64)> = points.keys().copied().collect();
    let coord = |k: i64| k as f64 / 1000.0;

    let mut cells = Vec::new();
    for (i, &corner) in keys.iter().enumerate() {
        let rest = &keys[i + 1..];
        let right: Vec<(i64, i64)> = keys
            .iter()
            .copied()
            .filter(|p| p.1 == corner.1 && p.0 > corner.0 && ruled_between(points, corner, *p))
            .collect();
        let below = rest
            .iter()
            .copied()
            .filter(|p| p.0 == corner.0 && ruled_between(points, corner, *p));

        'search: for down in below {
            for &across in &right {
                let far = (across.0, down.1);
                if ruled_between(points, far, across) && ruled_between(points, far, down) {
                    cells.push(BBox::new(
                        coord(corner.0),
                        coord(corner.1),
                        coord(far.0),
                        coord(far.1),
                    ));
                    break 'search;
                }
            }
        }
    }
    cells
}

/// Union cells sharing a side and return each group's enclosing box.
fn group_cells(cells: Vec<BBox>) -> Vec<BBox> {
    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    let n = cells.len();
    let mut parent: Vec<usize> = (0..n).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            if share_side(&cells[i], &cells[j]) {
                let (ra, rb) = (find(&mut parent, i), find(&mut parent, j));
                if ra != rb {
                    parent[rb] = ra;
                }
            }
        }
    }

    let mut groups: BTreeMap<usize, BBox> = BTreeMap::new();
    for (i, cell) in cells.iter().enumerate() {
        let root = find(&mut parent, i);
        groups
            .entry(root)
            .and_modify(|b| *b = b.union(cell))
            .or_insert(*cell);
    }

    let mut regions: Vec<BBox> = groups.into_values().collect();
    regions.sort_by(|a, b| a.top.total_cmp(&b.top).then_with(|| a.x0.total_cmp(&b.x0)));
    regions
}

fn share_side(a: &BBox, b: &BBox) -> bool {
    let eps = 1e-6;
    let vertical = ((a.x1 - b.x0).abs() < eps || (a.x0 - b.x1).abs() < eps)
        && a.top < b.bottom + eps
        && b.top < a.bottom + eps;
    let horizontal = ((a.bottom - b.top).abs() < eps || (a.top - b.bottom).abs() < eps)
        && a.x0 < b.x1 + eps
        && b.x0 < a.x1 + eps;
    vertical || horizontal
}
