/// Uniform bin edges over `[min, max]`: `bins + 1` values, the last pinned to `max`.
pub fn generate_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    if bins == 0 {
        return Vec::new();
    }
    let step = (max - min) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| min + i as f64 * step).collect();
    edges.push(max); // never min + bins * step, which can round past max
    edges
}

pub fn midpoints(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}

/// Width of the first bin; every bin shares it by construction.
pub fn bin_width(edges: &[f64]) -> Option<f64> {
    match edges {
        [a, b, ..] => Some(b - a),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_bins_over_ten() {
        assert_eq!(generate_edges(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn single_bin() {
        assert_eq!(generate_edges(-3.5, 7.25, 1), vec![-3.5, 7.25]);
    }

    #[test]
    fn last_edge_is_exact_max() {
        for bins in 1..200 {
            let edges = generate_edges(0.1, 0.7, bins);
            assert_eq!(edges.len(), bins + 1);
            assert_eq!(edges[0], 0.1);
            assert_eq!(*edges.last().unwrap(), 0.7);
            assert!(edges.windows(2).all(|w| w[0] <= w[1]), "bins={bins}");
        }
    }

    #[test]
    fn degenerate_range_repeats_min() {
        assert_eq!(generate_edges(4.0, 4.0, 3), vec![4.0; 4]);
    }

    #[test]
    fn zero_bins_is_empty() {
        assert!(generate_edges(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn midpoints_average_adjacent_edges() {
        let edges = generate_edges(0.0, 10.0, 5);
        assert_eq!(midpoints(&edges), vec![1.0, 3.0, 5.0, 7.0, 9.0]);
        assert!(midpoints(&[]).is_empty());
    }

    #[test]
    fn width_of_uniform_bins() {
        assert_eq!(bin_width(&[0.0, 2.0, 4.0]), Some(2.0));
        assert_eq!(bin_width(&[1.0]), None);
    }
}
