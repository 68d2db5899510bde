//! Resolution of chart descriptors into plot-ready data.
//!
//! Both render targets draw from the same [`PlotData`], so a chart looks the
//! same in the interactive view and in the document.

use serde::{Deserialize, Serialize};

use dental_ingest::format_numeric;
use dental_metrics::{
    Bin, BoxStats, CorrelationMatrix, LOWESS_FRACTION, box_stats, correlation_matrix,
    grouped_box_stats, histogram, linear_fit, lowess,
};
use dental_model::{ChartKind, ChartSpec, Dataset, Field, Trend};

use crate::error::RenderFailure;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSeries {
    pub field: Field,
    pub bins: Vec<Bin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Value of the colour field, when the chart has one.
    pub color: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGroup {
    pub label: String,
    pub stats: BoxStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PlotData {
    Histogram {
        series: Vec<HistogramSeries>,
    },
    Scatter {
        points: Vec<ScatterPoint>,
        /// Trend curve sorted by `x`; empty without a trend.
        trend: Vec<(f64, f64)>,
        color_range: Option<(f64, f64)>,
    },
    Box {
        groups: Vec<BoxGroup>,
    },
    Heatmap {
        matrix: CorrelationMatrix,
    },
}

/// Compute the data a chart needs from the dataset.
pub fn resolve(spec: &ChartSpec, dataset: &Dataset) -> Result<PlotData, RenderFailure> {
    if dataset.is_empty() {
        return Err(RenderFailure::NoData);
    }
    match spec.kind {
        ChartKind::Histogram => resolve_histogram(spec, dataset),
        ChartKind::Scatter => resolve_scatter(spec, dataset),
        ChartKind::Box => resolve_box(spec, dataset),
        ChartKind::Heatmap => {
            let (matrix, _) = correlation_matrix(dataset, &spec.x_fields());
            if matrix.cells.iter().flatten().all(Option::is_none) {
                return Err(RenderFailure::NoData);
            }
            Ok(PlotData::Heatmap { matrix })
        }
    }
}

fn resolve_histogram(spec: &ChartSpec, dataset: &Dataset) -> Result<PlotData, RenderFailure> {
    let fields = spec.x_fields();
    let columns: Vec<Vec<f64>> = fields.iter().map(|field| dataset.column(*field)).collect();
    let all: Vec<f64> = columns.iter().flatten().copied().collect();
    let edges = histogram(&all, spec.bins);
    if edges.is_empty() {
        return Err(RenderFailure::NoData);
    }
    let series = fields
        .into_iter()
        .zip(&columns)
        .map(|(field, values)| HistogramSeries {
            field,
            bins: count_into(&edges, values),
        })
        .collect();
    Ok(PlotData::Histogram { series })
}

/// Count `values` into the given bin edges. The last bin is closed.
///
/// A value goes to the last bin whose start does not exceed it, so rounding
/// in the edges never drops a value inside the overall range.
fn count_into(edges: &[Bin], values: &[f64]) -> Vec<Bin> {
    let mut bins: Vec<Bin> = edges.iter().map(|bin| Bin { count: 0, ..*bin }).collect();
    let (Some(first), Some(last)) = (bins.first().copied(), bins.last().copied()) else {
        return bins;
    };
    for value in values.iter().filter(|value| value.is_finite()) {
        if *value < first.start || *value > last.end {
            continue;
        }
        let index = bins
            .partition_point(|bin| bin.start <= *value)
            .saturating_sub(1);
        bins[index].count += 1;
    }
    bins
}

fn resolve_scatter(spec: &ChartSpec, dataset: &Dataset) -> Result<PlotData, RenderFailure> {
    let y_field = spec
        .y_field
        .ok_or_else(|| RenderFailure::Draw(format!("{} has no y field", spec.id)))?;
    let xs = dataset.column(spec.x_field);
    let ys = dataset.column(y_field);
    let colors = spec.color_field.map(|field| dataset.column(field));
    let points: Vec<ScatterPoint> = xs
        .iter()
        .zip(&ys)
        .enumerate()
        .filter(|(_, (x, y))| x.is_finite() && y.is_finite())
        .map(|(index, (x, y))| ScatterPoint {
            x: *x,
            y: *y,
            color: colors.as_ref().and_then(|values| values.get(index).copied()),
        })
        .collect();
    if points.is_empty() {
        return Err(RenderFailure::NoData);
    }
    let trend = match spec.trend {
        Trend::None => Vec::new(),
        Trend::Smoothed => lowess(&xs, &ys, LOWESS_FRACTION),
        Trend::Linear => match linear_fit(&xs, &ys) {
            Some(fit) => {
                let (min, max) = extent(points.iter().map(|point| point.x));
                vec![(min, fit.predict(min)), (max, fit.predict(max))]
            }
            None => Vec::new(),
        },
    };
    let color_range = colors
        .is_some()
        .then(|| extent(points.iter().filter_map(|point| point.color)));
    Ok(PlotData::Scatter {
        points,
        trend,
        color_range,
    })
}

fn resolve_box(spec: &ChartSpec, dataset: &Dataset) -> Result<PlotData, RenderFailure> {
    let groups: Vec<BoxGroup> = match spec.y_field {
        Some(y_field) => grouped_box_stats(&dataset.column(spec.x_field), &dataset.column(y_field))
            .into_iter()
            .map(|(key, stats)| BoxGroup {
                label: format_numeric(key),
                stats,
            })
            .collect(),
        None => spec
            .x_fields()
            .into_iter()
            .filter_map(|field| {
                box_stats(&dataset.column(field)).map(|stats| BoxGroup {
                    label: field.label().to_string(),
                    stats,
                })
            })
            .collect(),
    };
    if groups.is_empty() {
        return Err(RenderFailure::NoData);
    }
    Ok(PlotData::Box { groups })
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
        (min.min(value), max.max(value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_edges_close_last_bin() {
        let edges = vec![
            Bin {
                start: 0.0,
                end: 1.0,
                count: 0,
            },
            Bin {
                start: 1.0,
                end: 2.0,
                count: 0,
            },
        ];
        let bins = count_into(&edges, &[0.0, 1.0, 2.0, 5.0]);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 2);
    }

    #[test]
    fn extent_spans_values() {
        assert_eq!(extent([3.0, -1.0, 2.0].into_iter()), (-1.0, 3.0));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_value_is_counted(
                values in prop::collection::vec(0.0f64..500.0, 1..40),
                bins in 1u32..40,
            ) {
                let edges = histogram(&values, Some(bins));
                let counted: usize = count_into(&edges, &values).iter().map(|bin| bin.count).sum();
                prop_assert_eq!(counted, values.len());
            }
        }
    }
}
