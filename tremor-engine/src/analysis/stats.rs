//! Series statistics
//!
//! Small helpers shared by aggregation and analysis. Empty input always
//! yields 0 rather than NaN.

/// Percentile used for tremor intensity
pub const TREMOR_INTENSITY_PERCENTILE: f64 = 0.95;

/// Arithmetic mean, 0 for an empty series
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Nearest-rank percentile of `values` at fraction `p`.
///
/// Sorts a copy and picks index `floor(p * n)` clamped to `n - 1`.
/// `p` is clamped to \[0, 1\]. Returns 0 for an empty series.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    let index = ((p * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);
    sorted[index]
}

/// 95th percentile of a velocity series
pub fn tremor_intensity(velocities: &[f64]) -> f64 {
    percentile(velocities, TREMOR_INTENSITY_PERCENTILE)
}

/// Count of values strictly above `threshold`
pub fn count_above(values: &[f64], threshold: f64) -> usize {
    values.iter().filter(|&&v| v > threshold).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(percentile(&[], 0.95), 0.0);
        assert_eq!(tremor_intensity(&[]), 0.0);
    }

    #[test]
    fn test_mean() {
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_index_rule() {
        // 20 values: floor(0.95 * 20) = 19 -> the maximum
        let values: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        assert_eq!(percentile(&values, 0.95), 20.0);

        // 10 values: floor(9.5) = 9
        let values: Vec<f64> = (1..=10).rev().map(|v| v as f64).collect();
        assert_eq!(percentile(&values, 0.95), 10.0);

        // 100 values: index 95 -> 96th smallest
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        assert_eq!(percentile(&values, 0.95), 96.0);
    }

    #[test]
    fn test_percentile_bounds() {
        let values = [3.0, 1.0, 2.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 1.0), 3.0);
        assert_eq!(percentile(&values, 7.0), 3.0);
        assert_eq!(percentile(&[5.0], 0.95), 5.0);
    }

    #[test]
    fn test_count_above() {
        assert_eq!(count_above(&[0.2, 0.5, 0.6, 1.2], 0.5), 2);
        assert_eq!(count_above(&[], 0.5), 0);
    }
}
