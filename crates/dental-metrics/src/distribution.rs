//! Histogram bins and box-plot statistics.

use serde::{Deserialize, Serialize};

use crate::stats::{quantile_sorted, sorted_finite};

/// Integer-valued columns with at most this many distinct values get one bin
/// per value.
const MAX_DISCRETE_BINS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Bin finite `values`.
///
/// Whole-number data with few distinct values is binned per value. Otherwise
/// `bins` equal-width bins are used, defaulting to Sturges' rule.
pub fn histogram(values: &[f64], bins: Option<u32>) -> Vec<Bin> {
    let sorted = sorted_finite(values);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    let whole = sorted.iter().all(|value| value.fract() == 0.0);
    if bins.is_none() && whole && max - min < MAX_DISCRETE_BINS as f64 {
        return discrete_bins(&sorted, min, max);
    }
    if min == max {
        return vec![Bin {
            start: min - 0.5,
            end: max + 0.5,
            count: sorted.len(),
        }];
    }
    let bin_count = bins
        .map(|count| count.max(1) as usize)
        .unwrap_or_else(|| sturges(sorted.len()));
    let width = (max - min) / bin_count as f64;
    let mut out: Vec<Bin> = (0..bin_count)
        .map(|index| Bin {
            start: min + width * index as f64,
            end: min + width * (index + 1) as f64,
            count: 0,
        })
        .collect();
    if let Some(last) = out.last_mut() {
        last.end = max;
    }
    for value in sorted {
        let index = (((value - min) / width) as usize).min(bin_count - 1);
        out[index].count += 1;
    }
    out
}

fn discrete_bins(sorted: &[f64], min: f64, max: f64) -> Vec<Bin> {
    let span = (max - min) as usize + 1;
    let mut out: Vec<Bin> = (0..span)
        .map(|offset| {
            let center = min + offset as f64;
            Bin {
                start: center - 0.5,
                end: center + 0.5,
                count: 0,
            }
        })
        .collect();
    for value in sorted {
        out[(value - min) as usize].count += 1;
    }
    out
}

fn sturges(count: usize) -> usize {
    ((count as f64).log2().ceil() as usize + 1).max(1)
}

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub count: usize,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    /// Values beyond 1.5 IQR from the quartiles.
    pub outliers: Vec<f64>,
}

/// Box statistics of finite `values`. `None` when there are none.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let sorted = sorted_finite(values);
    let q1 = quantile_sorted(&sorted, 0.25)?;
    let median = quantile_sorted(&sorted, 0.5)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;
    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|value| *value >= low_fence && *value <= high_fence)
        .collect();
    let outliers = sorted
        .iter()
        .copied()
        .filter(|value| *value < low_fence || *value > high_fence)
        .collect();
    Some(BoxStats {
        count: sorted.len(),
        lower_whisker: inside.first().copied().unwrap_or(q1),
        q1,
        median,
        q3,
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers,
    })
}

/// Box statistics of `ys` grouped by each distinct value of `xs`, ascending.
pub fn grouped_box_stats(xs: &[f64], ys: &[f64]) -> Vec<(f64, BoxStats)> {
    let mut pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (*x, *y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    pairs.sort_by(|left, right| left.0.total_cmp(&right.0));
    let mut groups = Vec::new();
    let mut start = 0;
    while start < pairs.len() {
        let key = pairs[start].0;
        let end = pairs[start..]
            .iter()
            .position(|(x, _)| *x != key)
            .map_or(pairs.len(), |offset| start + offset);
        let values: Vec<f64> = pairs[start..end].iter().map(|(_, y)| *y).collect();
        if let Some(stats) = box_stats(&values) {
            groups.push((key, stats));
        }
        start = end;
    }
    groups
}
