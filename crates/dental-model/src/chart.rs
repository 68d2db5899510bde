//! Render-agnostic chart descriptors.

use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::selector::SelectorKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Histogram,
    Scatter,
    Box,
    Heatmap,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Histogram => "histogram",
            ChartKind::Scatter => "scatter",
            ChartKind::Box => "box",
            ChartKind::Heatmap => "heatmap",
        }
    }
}

/// Trend overlay drawn on scatter charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    #[default]
    None,
    /// Locally weighted regression.
    Smoothed,
    /// Ordinary least squares line.
    Linear,
}

/// Continuous colour scales for value-mapped colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScale {
    Viridis,
    Coolwarm,
}

/// Colour intent, resolved to concrete colours by each renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorHint {
    /// One `#rrggbb` colour for the whole chart.
    Solid(String),
    /// One `#rrggbb` colour per series, in series order.
    Palette(Vec<String>),
    Scale(ColorScale),
}

impl ColorHint {
    pub fn solid(hex: &str) -> Self {
        ColorHint::Solid(hex.to_string())
    }

    pub fn palette(hexes: &[&str]) -> Self {
        ColorHint::Palette(hexes.iter().map(|hex| (*hex).to_string()).collect())
    }

    /// Colour for series `index`, cycling through a palette.
    pub fn series_color(&self, index: usize) -> Option<&str> {
        match self {
            ColorHint::Solid(hex) => Some(hex),
            ColorHint::Palette(hexes) if !hexes.is_empty() => Some(&hexes[index % hexes.len()]),
            ColorHint::Palette(_) | ColorHint::Scale(_) => None,
        }
    }
}

/// Description of one chart's data mapping and style.
///
/// `series` holds extra fields that share the x axis: the second histogram of
/// a grouped histogram, further boxes of a side-by-side box plot, or the
/// remaining axes of a heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: String,
    pub kind: ChartKind,
    pub x_field: Field,
    pub y_field: Option<Field>,
    pub color_field: Option<Field>,
    pub series: Vec<Field>,
    pub bins: Option<u32>,
    pub trend: Trend,
    pub title: String,
    pub color_hint: ColorHint,
    /// Selectors that chose this variant. Empty for fixed charts.
    pub binding: Vec<SelectorKey>,
}

impl ChartSpec {
    /// All fields on the x axis: `x_field` followed by `series`.
    pub fn x_fields(&self) -> Vec<Field> {
        let mut fields = Vec::with_capacity(1 + self.series.len());
        fields.push(self.x_field);
        fields.extend(self.series.iter().copied());
        fields
    }

    pub fn is_selector_bound(&self) -> bool {
        !self.binding.is_empty()
    }

    pub fn depends_on(&self, key: SelectorKey) -> bool {
        self.binding.contains(&key)
    }
}
