//! Trend overlays for scatter charts.

use serde::{Deserialize, Serialize};

use crate::stats::{is_constant, mean};

/// Share of points used for each local LOWESS fit.
pub const LOWESS_FRACTION: f64 = 2.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Ordinary least squares fit. `None` for fewer than two points or a
/// constant `x`.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let n = xs.len().min(ys.len());
    if n < 2 || is_constant(&xs[..n]) {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        sxy += (x - mean_x) * (y - mean_y);
        sxx += (x - mean_x) * (x - mean_x);
    }
    if !sxx.is_finite() || !sxy.is_finite() {
        return None;
    }
    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Locally weighted linear regression evaluated at each distinct `x`.
///
/// Uses tricube weights over the nearest `fraction * n` points, without
/// robustifying iterations. Output is sorted by `x`.
pub fn lowess(xs: &[f64], ys: &[f64], fraction: f64) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (*x, *y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if points.len() < 2 {
        return Vec::new();
    }
    points.sort_by(|left, right| left.0.total_cmp(&right.0));
    let n = points.len();
    let window = ((fraction * n as f64).ceil() as usize).clamp(2, n);

    let mut targets: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
    targets.dedup();

    targets
        .into_iter()
        .map(|target| (target, local_fit(&points, target, window)))
        .collect()
}

fn local_fit(points: &[(f64, f64)], target: f64, window: usize) -> f64 {
    let mut distances: Vec<f64> = points.iter().map(|(x, _)| (x - target).abs()).collect();
    distances.sort_by(f64::total_cmp);
    let radius = distances[window - 1];

    let mut sw = 0.0;
    let mut swx = 0.0;
    let mut swy = 0.0;
    let mut swxx = 0.0;
    let mut swxy = 0.0;
    for (x, y) in points {
        let weight = if radius > 0.0 {
            tricube((x - target).abs() / radius)
        } else if *x == target {
            1.0
        } else {
            0.0
        };
        if weight == 0.0 {
            continue;
        }
        sw += weight;
        swx += weight * x;
        swy += weight * y;
        swxx += weight * x * x;
        swxy += weight * x * y;
    }
    if sw == 0.0 {
        return f64::NAN;
    }
    let mean_x = swx / sw;
    let mean_y = swy / sw;
    let var_x = swxx / sw - mean_x * mean_x;
    if var_x.abs() < 1e-12 {
        return mean_y;
    }
    let slope = (swxy / sw - mean_x * mean_y) / var_x;
    mean_y + slope * (target - mean_x)
}

fn tricube(u: f64) -> f64 {
    if u >= 1.0 {
        0.0
    } else {
        let v = 1.0 - u * u * u;
        v * v * v
    }
}
