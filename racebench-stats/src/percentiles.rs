//! Percentiles
//!
//! Linear interpolation between closest ranks over an ascending slice. Callers
//! sort once and query several percentiles.

/// Sort a copy of `values` ascending (NaN-tolerant)
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Percentile `p` (0..=100) of an ascending slice. Empty input yields 0.
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted {
        [] => 0.0,
        [only] => *only,
        _ => {
            let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = (lo + 1).min(sorted.len() - 1);
            sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
        }
    }
}

/// Percentile `p` of unsorted values
pub fn compute_percentile(values: &[f64], p: f64) -> f64 {
    percentile_of_sorted(&sorted(values), p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert!((compute_percentile(&[5.0, 1.0, 3.0], 50.0) - 3.0).abs() < 1e-12);
        assert!((compute_percentile(&[4.0, 1.0, 3.0, 2.0], 50.0) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_bounds() {
        let s = sorted(&[10.0, 30.0, 20.0]);
        assert_eq!(percentile_of_sorted(&s, 0.0), 10.0);
        assert_eq!(percentile_of_sorted(&s, 100.0), 30.0);
        assert_eq!(percentile_of_sorted(&s, 250.0), 30.0);
    }

    #[test]
    fn test_quartiles_interpolate() {
        let s: Vec<f64> = (1..=5).map(f64::from).collect();
        assert!((percentile_of_sorted(&s, 25.0) - 2.0).abs() < 1e-12);
        assert!((percentile_of_sorted(&s, 75.0) - 4.0).abs() < 1e-12);
        assert!((percentile_of_sorted(&s, 10.0) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(compute_percentile(&[], 50.0), 0.0);
        assert_eq!(compute_percentile(&[42.0], 99.0), 42.0);
    }
}
