/// Raw counts, or a probability density when `enabled`.
///
/// The density satisfies `sum(counts[i] * bin_width) == 1` unless every count is zero,
/// in which case all zeros come back.
pub fn normalize(raw: &[u64], bin_width: f64, enabled: bool) -> Vec<f64> {
    if !enabled {
        return raw.iter().map(|&c| c as f64).collect();
    }
    let sum: u64 = raw.iter().sum();
    if sum == 0 {
        return vec![0.0; raw.len()];
    }
    // zero-width bins (degenerate domain) fall back to unit width
    let width = if bin_width > 0.0 { bin_width } else { 1.0 };
    let denom = sum as f64 * width;
    raw.iter().map(|&c| c as f64 / denom).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_passes_through() {
        assert_eq!(normalize(&[2, 0, 5], 3.0, false), vec![2.0, 0.0, 5.0]);
    }

    #[test]
    fn density_integrates_to_one() {
        let raw = [2, 2, 2, 2, 3];
        let density = normalize(&raw, 2.0, true);
        assert_eq!(density[0], 2.0 / 22.0);
        assert_eq!(density[4], 3.0 / 22.0);
        let area: f64 = density.iter().map(|d| d * 2.0).sum();
        assert!((area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn all_zero_guard() {
        assert_eq!(normalize(&[0, 0, 0], 0.5, true), vec![0.0; 3]);
        assert!(normalize(&[], 0.5, true).is_empty());
    }

    #[test]
    fn idempotent() {
        let raw = [7, 1, 0, 4];
        assert_eq!(normalize(&raw, 0.25, true), normalize(&raw, 0.25, true));
        assert_eq!(normalize(&raw, 0.25, false), normalize(&raw, 0.25, false));
    }

    #[test]
    fn zero_width_uses_unit_width() {
        assert_eq!(normalize(&[0, 4], 0.0, true), vec![0.0, 1.0]);
    }
}
