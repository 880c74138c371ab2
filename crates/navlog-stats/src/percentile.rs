//! Percentiles with linear interpolation between closest ranks

/// Finite values of `values`, sorted ascending
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// `p`-th percentile (0–100) of an already sorted slice.
///
/// The rank is `p/100 * (n - 1)`; values between ranks are interpolated.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Median of unsorted values; non-finite values are ignored
pub fn median(values: &[f64]) -> Option<f64> {
    percentile(&sorted_finite(values), 50.0)
}

/// Interquartile range (p75 - p25) of an already sorted slice
pub fn iqr(sorted: &[f64]) -> Option<f64> {
    Some(percentile(sorted, 75.0)? - percentile(sorted, 25.0)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[900.0, 950.0]), Some(925.0));
    }

    #[test]
    fn test_median_empty_and_non_finite() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[f64::NAN, f64::INFINITY]), None);
        assert_eq!(median(&[f64::NAN, 7.0]), Some(7.0));
    }

    #[test]
    fn test_median_order_invariant() {
        let a = [5.0, 1.0, 9.0, 3.0, 7.0, 2.0];
        let mut b = a;
        b.reverse();
        let mut c = a;
        c.sort_by(f64::total_cmp);
        assert_eq!(median(&a), median(&b));
        assert_eq!(median(&a), median(&c));
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        // rank = 0.25 * 3 = 0.75 -> 10 + 0.75 * 10
        assert_eq!(percentile(&sorted, 25.0), Some(17.5));
        assert_eq!(percentile(&sorted, 75.0), Some(32.5));
        assert_eq!(percentile(&sorted, 0.0), Some(10.0));
        assert_eq!(percentile(&sorted, 100.0), Some(40.0));
        assert_eq!(iqr(&sorted), Some(15.0));
    }

    #[test]
    fn test_single_value() {
        assert_eq!(percentile(&[42.0], 2.5), Some(42.0));
        assert_eq!(iqr(&[42.0]), Some(0.0));
    }
}
