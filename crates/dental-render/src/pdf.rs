//! Vector drawing of resolved charts onto PDF layers.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocumentReference, PdfLayerReference,
    Point, Polygon, Rgb,
};

use dental_model::{ChartKind, ChartSpec, ColorHint, ColorScale};

use crate::error::{RenderError, RenderFailure};
use crate::plot::PlotData;

const DEFAULT_SERIES: [&str; 4] = ["#636EFA", "#EF553B", "#00CC96", "#AB63FA"];
const TICKS: usize = 5;

#[derive(Clone)]
pub(crate) struct Fonts {
    pub regular: IndirectFontRef,
    pub bold: IndirectFontRef,
}

impl Fonts {
    pub fn load(doc: &PdfDocumentReference) -> Result<Self, RenderError> {
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|error| RenderError::Pdf(format!("font: {error}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|error| RenderError::Pdf(format!("font: {error}")))?;
        Ok(Self { regular, bold })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0.0, 0.0, 0.0);
    pub const GREY: RgbColor = RgbColor::new(0.55, 0.55, 0.55);
    pub const LIGHT: RgbColor = RgbColor::new(0.88, 0.88, 0.88);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(digits.get(range)?, 16)
                .ok()
                .map(|value| f32::from(value) / 255.0)
        };
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    fn darker(self) -> Self {
        Self::new(self.r * 0.7, self.g * 0.7, self.b * 0.7)
    }

    fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    fn to_pdf(self) -> Color {
        Color::Rgb(Rgb::new(self.r, self.g, self.b, None))
    }
}

/// Colour of `t` in `0..=1` on a continuous scale.
pub(crate) fn scale_color(scale: ColorScale, t: f64) -> RgbColor {
    let stops: &[RgbColor] = match scale {
        ColorScale::Viridis => &[
            RgbColor::new(0.267, 0.005, 0.329),
            RgbColor::new(0.231, 0.322, 0.545),
            RgbColor::new(0.129, 0.569, 0.549),
            RgbColor::new(0.369, 0.788, 0.384),
            RgbColor::new(0.993, 0.906, 0.144),
        ],
        ColorScale::Coolwarm => &[
            RgbColor::new(0.230, 0.299, 0.754),
            RgbColor::new(0.865, 0.865, 0.865),
            RgbColor::new(0.706, 0.016, 0.150),
        ],
    };
    let t = (if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 }) as f32;
    let scaled = t * (stops.len() - 1) as f32;
    let index = (scaled.floor() as usize).min(stops.len() - 2);
    stops[index].lerp(stops[index + 1], scaled - index as f32)
}

fn series_color(hint: &ColorHint, index: usize) -> RgbColor {
    hint.series_color(index)
        .and_then(RgbColor::from_hex)
        .or_else(|| RgbColor::from_hex(DEFAULT_SERIES[index % DEFAULT_SERIES.len()]))
        .unwrap_or(RgbColor::BLACK)
}

/// Thin wrapper over a page layer working in millimetres.
pub(crate) struct Canvas {
    layer: PdfLayerReference,
    fonts: Fonts,
}

impl Canvas {
    pub fn new(layer: PdfLayerReference, fonts: Fonts) -> Self {
        Self { layer, fonts }
    }

    pub fn text(&self, text: &str, size: f32, x: f32, y: f32) {
        self.layer.set_fill_color(RgbColor::BLACK.to_pdf());
        self.layer
            .use_text(text, size, Mm(x), Mm(y), &self.fonts.regular);
    }

    pub fn bold(&self, text: &str, size: f32, x: f32, y: f32) {
        self.layer.set_fill_color(RgbColor::BLACK.to_pdf());
        self.layer.use_text(text, size, Mm(x), Mm(y), &self.fonts.bold);
    }

    /// Text horizontally centred on `x`, using an average glyph width.
    pub fn centered(&self, text: &str, size: f32, x: f32, y: f32) {
        let width = text.chars().count() as f32 * size * 0.5 * 0.3528;
        self.text(text, size, x - width / 2.0, y);
    }

    pub fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, color: RgbColor) {
        let corners = [(x, y), (x + width, y), (x + width, y + height), (x, y + height)];
        self.layer.set_fill_color(color.to_pdf());
        self.layer.add_polygon(Polygon {
            rings: vec![
                corners
                    .iter()
                    .map(|(px, py)| (Point::new(Mm(*px), Mm(*py)), false))
                    .collect(),
            ],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    pub fn line(&self, points: &[(f32, f32)], color: RgbColor, thickness: f32) {
        if points.len() < 2 {
            return;
        }
        self.layer.set_outline_color(color.to_pdf());
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: points
                .iter()
                .map(|(x, y)| (Point::new(Mm(*x), Mm(*y)), false))
                .collect(),
            is_closed: false,
        });
    }

    pub fn rect_outline(&self, x: f32, y: f32, width: f32, height: f32, color: RgbColor) {
        self.line(
            &[(x, y), (x + width, y), (x + width, y + height), (x, y + height), (x, y)],
            color,
            0.6,
        );
    }

    pub fn marker(&self, x: f32, y: f32, color: RgbColor) {
        self.fill_rect(x - 0.7, y - 0.7, 1.4, 1.4, color);
    }
}

/// Drawing area on a page, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Frame {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Axis {
    min: f64,
    max: f64,
}

impl Axis {
    fn padded(min: f64, max: f64) -> Result<Self, RenderFailure> {
        if !min.is_finite() || !max.is_finite() {
            return Err(RenderFailure::Draw("axis range is not finite".to_string()));
        }
        if max - min < f64::EPSILON {
            return Ok(Self {
                min: min - 0.5,
                max: max + 0.5,
            });
        }
        let pad = (max - min) * 0.05;
        Ok(Self {
            min: min - pad,
            max: max + pad,
        })
    }

    fn exact(min: f64, max: f64) -> Result<Self, RenderFailure> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(RenderFailure::Draw("axis range is empty".to_string()));
        }
        Ok(Self { min, max })
    }

    fn map(&self, value: f64, start: f32, length: f32) -> f32 {
        start + ((value - self.min) / (self.max - self.min)) as f32 * length
    }

    fn ticks(&self) -> impl Iterator<Item = f64> + '_ {
        (0..TICKS).map(|index| self.min + (self.max - self.min) * index as f64 / (TICKS - 1) as f64)
    }
}

fn tick_label(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 100.0 {
        format!("{value:.0}")
    } else if magnitude >= 10.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

fn fold_extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .filter(|value| value.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
            (min.min(value), max.max(value))
        })
}

/// A chart whose axes have been checked and can be drawn without failing.
pub(crate) struct PreparedPlot<'a> {
    spec: &'a ChartSpec,
    plot: &'a PlotData,
    x: Option<Axis>,
    y: Option<Axis>,
}

/// Validate axes before a page is committed.
pub(crate) fn prepare<'a>(
    spec: &'a ChartSpec,
    plot: &'a PlotData,
) -> Result<PreparedPlot<'a>, RenderFailure> {
    let (x, y) = match plot {
        PlotData::Histogram { series } => {
            let first = series.first().ok_or(RenderFailure::NoData)?;
            let (Some(start), Some(end)) = (first.bins.first(), first.bins.last()) else {
                return Err(RenderFailure::NoData);
            };
            let peak = series
                .iter()
                .flat_map(|series| series.bins.iter())
                .map(|bin| bin.count)
                .max()
                .unwrap_or(0);
            (
                Some(Axis::exact(start.start, end.end)?),
                Some(Axis::exact(0.0, peak.max(1) as f64 * 1.05)?),
            )
        }
        PlotData::Scatter { points, trend, .. } => {
            let (x_min, x_max) = fold_extent(
                points
                    .iter()
                    .map(|point| point.x)
                    .chain(trend.iter().map(|(x, _)| *x)),
            );
            let (y_min, y_max) = fold_extent(
                points
                    .iter()
                    .map(|point| point.y)
                    .chain(trend.iter().map(|(_, y)| *y)),
            );
            (
                Some(Axis::padded(x_min, x_max)?),
                Some(Axis::padded(y_min, y_max)?),
            )
        }
        PlotData::Box { groups } => {
            if groups.is_empty() {
                return Err(RenderFailure::NoData);
            }
            let (min, max) = fold_extent(groups.iter().flat_map(|group| {
                [group.stats.lower_whisker, group.stats.upper_whisker]
                    .into_iter()
                    .chain(group.stats.outliers.iter().copied())
            }));
            (None, Some(Axis::padded(min, max)?))
        }
        PlotData::Heatmap { matrix } => {
            if matrix.fields.is_empty() {
                return Err(RenderFailure::NoData);
            }
            (None, None)
        }
    };
    let expected = match plot {
        PlotData::Histogram { .. } => ChartKind::Histogram,
        PlotData::Scatter { .. } => ChartKind::Scatter,
        PlotData::Box { .. } => ChartKind::Box,
        PlotData::Heatmap { .. } => ChartKind::Heatmap,
    };
    if expected != spec.kind {
        return Err(RenderFailure::Draw(format!(
            "{} data given for a {} chart",
            expected.as_str(),
            spec.kind.as_str()
        )));
    }
    Ok(PreparedPlot { spec, plot, x, y })
}

impl PreparedPlot<'_> {
    pub fn draw(&self, canvas: &Canvas, frame: Frame) {
        match self.plot {
            PlotData::Heatmap { matrix } => {
                let n = matrix.fields.len();
                let label_space = 34.0;
                let cell =
                    ((frame.width - label_space).min(frame.height - 12.0) / n as f32).max(1.0);
                let top = frame.bottom + frame.height;
                for (row, field) in matrix.fields.iter().enumerate() {
                    let y = top - (row + 1) as f32 * cell;
                    canvas.text(field.label(), 7.0, frame.left, y + cell / 2.0 - 1.0);
                    for column in 0..n {
                        let x = frame.left + label_space + column as f32 * cell;
                        let value = matrix
                            .cells
                            .get(row)
                            .and_then(|cells| cells.get(column))
                            .copied()
                            .flatten();
                        let (color, text) = match value {
                            Some(r) => (
                                scale_color(ColorScale::Coolwarm, (r + 1.0) / 2.0),
                                format!("{r:.2}"),
                            ),
                            None => (RgbColor::LIGHT, "n/a".to_string()),
                        };
                        canvas.fill_rect(x, y, cell, cell, color);
                        canvas.centered(&text, 7.0, x + cell / 2.0, y + cell / 2.0 - 1.0);
                    }
                }
                let base = top - n as f32 * cell - 5.0;
                for (column, field) in matrix.fields.iter().enumerate() {
                    let x = frame.left + label_space + (column as f32 + 0.5) * cell;
                    let y = if column % 2 == 0 { base } else { base - 4.0 };
                    canvas.centered(field.label(), 6.0, x, y);
                }
            }
            PlotData::Histogram { series } => {
                let (Some(x), Some(y)) = (self.x, self.y) else {
                    return;
                };
                self.axes(canvas, frame, Some(x), y);
                let k = series.len().max(1) as f32;
                for (index, series) in series.iter().enumerate() {
                    let color = series_color(&self.spec.color_hint, index);
                    for bin in &series.bins {
                        let start = x.map(bin.start, frame.left, frame.width);
                        let end = x.map(bin.end, frame.left, frame.width);
                        let width = (end - start) / k;
                        let height =
                            y.map(bin.count as f64, frame.bottom, frame.height) - frame.bottom;
                        if height > 0.0 {
                            canvas.fill_rect(
                                start + width * index as f32,
                                frame.bottom,
                                width * 0.92,
                                height,
                                color,
                            );
                        }
                    }
                }
                if series.len() > 1 {
                    self.legend(canvas, frame, series.iter().map(|series| series.field.label()));
                }
            }
            PlotData::Scatter {
                points,
                trend,
                color_range,
            } => {
                let (Some(x), Some(y)) = (self.x, self.y) else {
                    return;
                };
                self.axes(canvas, frame, Some(x), y);
                let base = series_color(&self.spec.color_hint, 0);
                let scale = match self.spec.color_hint {
                    ColorHint::Scale(scale) => Some(scale),
                    ColorHint::Solid(_) | ColorHint::Palette(_) => None,
                };
                for point in points {
                    let color = match (scale, point.color, color_range) {
                        (Some(scale), Some(value), Some((min, max))) if max > min => {
                            scale_color(scale, (value - min) / (max - min))
                        }
                        (Some(scale), Some(_), _) => scale_color(scale, 0.5),
                        _ => base,
                    };
                    canvas.marker(
                        x.map(point.x, frame.left, frame.width),
                        y.map(point.y, frame.bottom, frame.height),
                        color,
                    );
                }
                let curve: Vec<(f32, f32)> = trend
                    .iter()
                    .filter(|(tx, ty)| tx.is_finite() && ty.is_finite())
                    .map(|(tx, ty)| {
                        (
                            x.map(*tx, frame.left, frame.width),
                            y.map(*ty, frame.bottom, frame.height),
                        )
                    })
                    .collect();
                canvas.line(&curve, base.darker(), 1.2);
                if let (Some(field), Some((min, max))) = (self.spec.color_field, color_range) {
                    canvas.text(
                        &format!(
                            "Colour: {} ({} to {})",
                            field.label(),
                            tick_label(*min),
                            tick_label(*max)
                        ),
                        7.0,
                        frame.left + frame.width - 70.0,
                        frame.bottom + frame.height + 3.0,
                    );
                }
            }
            PlotData::Box { groups } => {
                let Some(y) = self.y else {
                    return;
                };
                self.axes(canvas, frame, None, y);
                let slot = frame.width / groups.len() as f32;
                for (index, group) in groups.iter().enumerate() {
                    let color = if self.spec.y_field.is_some() {
                        series_color(&self.spec.color_hint, 0)
                    } else {
                        series_color(&self.spec.color_hint, index)
                    };
                    let center = frame.left + slot * (index as f32 + 0.5);
                    let half = (slot * 0.25).min(15.0);
                    let stats = &group.stats;
                    let map = |value: f64| y.map(value, frame.bottom, frame.height);
                    let (q1, median, q3) = (map(stats.q1), map(stats.median), map(stats.q3));
                    let box_height = (q3 - q1).max(0.3);
                    canvas.line(
                        &[(center, map(stats.lower_whisker)), (center, q1)],
                        RgbColor::BLACK,
                        0.5,
                    );
                    canvas.line(
                        &[(center, q3), (center, map(stats.upper_whisker))],
                        RgbColor::BLACK,
                        0.5,
                    );
                    canvas.fill_rect(center - half, q1, half * 2.0, box_height, color);
                    canvas.rect_outline(center - half, q1, half * 2.0, box_height, color.darker());
                    canvas.line(
                        &[(center - half, median), (center + half, median)],
                        RgbColor::BLACK,
                        1.0,
                    );
                    for outlier in &stats.outliers {
                        canvas.marker(center, map(*outlier), color.darker());
                    }
                    canvas.centered(&group.label, 7.0, center, frame.bottom - 5.0);
                }
                if self.spec.y_field.is_some() {
                    self.x_title(canvas, frame);
                }
            }
        }
    }

    fn x_title(&self, canvas: &Canvas, frame: Frame) {
        let center = frame.left + frame.width / 2.0;
        canvas.centered(self.spec.x_field.label(), 8.0, center, frame.bottom - 11.0);
    }

    fn axes(&self, canvas: &Canvas, frame: Frame, x: Option<Axis>, y: Axis) {
        let right = frame.left + frame.width;
        let top = frame.bottom + frame.height;
        canvas.line(
            &[(frame.left, top), (frame.left, frame.bottom), (right, frame.bottom)],
            RgbColor::GREY,
            0.6,
        );
        for value in y.ticks() {
            let py = y.map(value, frame.bottom, frame.height);
            canvas.line(&[(frame.left, py), (right, py)], RgbColor::LIGHT, 0.3);
            canvas.text(&tick_label(value), 7.0, frame.left - 12.0, py - 1.0);
        }
        if let Some(x) = x {
            for value in x.ticks() {
                let px = x.map(value, frame.left, frame.width);
                canvas.centered(&tick_label(value), 7.0, px, frame.bottom - 5.0);
            }
            self.x_title(canvas, frame);
        }
        let y_label = match (self.spec.kind, self.spec.y_field) {
            (ChartKind::Histogram, _) => "Count",
            (_, Some(field)) => field.label(),
            (_, None) => "Minutes",
        };
        canvas.text(y_label, 8.0, frame.left - 12.0, top + 3.0);
    }

    fn legend<'l>(&self, canvas: &Canvas, frame: Frame, labels: impl Iterator<Item = &'l str>) {
        let mut y = frame.bottom + frame.height - 2.0;
        let x = frame.left + frame.width - 40.0;
        for (index, label) in labels.enumerate() {
            canvas.fill_rect(x, y, 3.0, 3.0, series_color(&self.spec.color_hint, index));
            canvas.text(label, 7.0, x + 5.0, y + 0.5);
            y -= 5.0;
        }
    }
}
