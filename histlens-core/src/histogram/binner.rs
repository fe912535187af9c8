use crate::scale::Domain;

/// Keeps values inside the domain, both ends inclusive.
pub fn filter_to_domain(sample: &[f64], domain: &Domain) -> Vec<f64> {
    sample.iter().copied().filter(|&v| domain.contains(v)).collect()
}

/// Index of the bin holding `v`, or `None` when `v` lies outside the edges.
///
/// Bin `i` is `[edges[i], edges[i + 1])`; the final bin is closed so the maximum is kept.
/// A value sitting exactly on an interior edge goes to the upper bin.
pub fn bin_index(edges: &[f64], v: f64) -> Option<usize> {
    let bins = edges.len().checked_sub(1).filter(|&n| n > 0)?;
    if !(v >= edges[0] && v <= edges[bins]) {
        return None;
    }
    Some(edges[1..bins].partition_point(|&e| e <= v))
}

/// Raw per-bin counts for every sample value inside the edges.
pub fn bin_counts(sample: &[f64], edges: &[f64]) -> Vec<u64> {
    let mut counts = vec![0u64; edges.len().saturating_sub(1)];
    for &v in sample {
        if let Some(idx) = bin_index(edges, v) {
            counts[idx] += 1;
        }
    }
    counts
}
