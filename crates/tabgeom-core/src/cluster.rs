//! One-dimensional gap clustering.
//!
//! Column discovery clusters x-positions and row assembly clusters
//! y-positions with the same rule: walk an ascending sequence and start a
//! new cluster whenever the gap to the previous value exceeds a tolerance.

/// A run of consecutive values from a sorted input.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Index of the first member in the sorted input.
    pub start: usize,
    /// Number of members.
    pub len: usize,
    /// Arithmetic mean of the members.
    pub mean: f64,
}

impl Cluster {
    /// Index range of the members in the sorted input.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Cluster an ascending sequence by maximum adjacent gap.
///
/// `values` must already be sorted ascending. A new cluster begins whenever
/// `values[i] - values[i - 1] > tolerance`, so a long chain of closely spaced
/// values stays one cluster even if its ends are far apart.
pub fn cluster_sorted(values: &[f64], tolerance: f64) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    if values.is_empty() {
        return clusters;
    }

    let mut cluster_start = 0;
    for i in 1..=values.len() {
        let end_of_cluster = i == values.len() || values[i] - values[i - 1] > tolerance;
        if end_of_cluster {
            let len = i - cluster_start;
            let sum: f64 = values[cluster_start..i].iter().sum();
            clusters.push(Cluster {
                start: cluster_start,
                len,
                mean: sum / len as f64,
            });
            cluster_start = i;
        }
    }

    clusters
}

/// Sort `values` ascending with a total order, then cluster them.
///
/// Convenience for callers that only need means and sizes.
pub fn cluster_values(mut values: Vec<f64>, tolerance: f64) -> Vec<Cluster> {
    values.sort_by(f64::total_cmp);
    cluster_sorted(&values, tolerance)
}
