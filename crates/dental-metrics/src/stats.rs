//! Descriptive statistics over plain value slices.

use serde::{Deserialize, Serialize};

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Quantile `q` in `[0, 1]` with linear interpolation between closest ranks.
///
/// `sorted` must be in ascending order.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Sort a copy of `values` ascending, dropping non-finite entries.
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Summary of one column: count, mean, extremes and quartiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Describe a column. `None` when it has no finite values.
pub fn describe(values: &[f64]) -> Option<Describe> {
    let sorted = sorted_finite(values);
    let first = *sorted.first()?;
    let last = *sorted.last()?;
    Some(Describe {
        count: sorted.len(),
        mean: mean(&sorted)?,
        min: first,
        q1: quantile_sorted(&sorted, 0.25)?,
        median: quantile_sorted(&sorted, 0.5)?,
        q3: quantile_sorted(&sorted, 0.75)?,
        max: last,
    })
}

/// True when every value equals the first one.
pub fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|value| value == first),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&sorted, 0.75), Some(3.25));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn describe_matches_column() {
        let summary = describe(&[0.0, 2.0, 0.0, 5.0, 1.0]).expect("describe");
        assert_eq!(summary.count, 5);
        assert!((summary.mean - 1.6).abs() < 1e-12);
        assert_eq!(summary.min, 0.0);
        assert_eq!(summary.median, 1.0);
        assert_eq!(summary.q3, 2.0);
        assert_eq!(summary.max, 5.0);
        assert!(describe(&[]).is_none());
    }

    #[test]
    fn constant_detection() {
        assert!(is_constant(&[5.0, 5.0, 5.0]));
        assert!(!is_constant(&[5.0, 4.0]));
        assert!(is_constant(&[]));
    }
}
