use dental_model::{ChartKind, ChartSpec, ColorHint, Field, SelectorKey, Trend};

/// Builder for [`ChartSpec`]. Every chart in a report is produced through one.
#[derive(Debug, Clone)]
pub struct ChartRecipe {
    spec: ChartSpec,
}

impl ChartRecipe {
    fn new(id: &str, kind: ChartKind, x_field: Field) -> Self {
        Self {
            spec: ChartSpec {
                id: id.to_string(),
                kind,
                x_field,
                y_field: None,
                color_field: None,
                series: Vec::new(),
                bins: None,
                trend: Trend::None,
                title: String::new(),
                color_hint: ColorHint::Palette(Vec::new()),
                binding: Vec::new(),
            },
        }
    }

    pub fn histogram(id: &str, x_field: Field) -> Self {
        Self::new(id, ChartKind::Histogram, x_field)
    }

    pub fn scatter(id: &str, x_field: Field, y_field: Field) -> Self {
        let mut recipe = Self::new(id, ChartKind::Scatter, x_field);
        recipe.spec.y_field = Some(y_field);
        recipe
    }

    /// Box plot of `x_field` and any extra series side by side.
    pub fn box_plot(id: &str, x_field: Field) -> Self {
        Self::new(id, ChartKind::Box, x_field)
    }

    /// Box plot of `y_field` grouped by each distinct value of `x_field`.
    pub fn grouped_box(id: &str, x_field: Field, y_field: Field) -> Self {
        let mut recipe = Self::new(id, ChartKind::Box, x_field);
        recipe.spec.y_field = Some(y_field);
        recipe
    }

    /// Pairwise correlation grid over `fields`.
    pub fn heatmap(id: &str, first: Field, rest: &[Field]) -> Self {
        Self::new(id, ChartKind::Heatmap, first).series(rest)
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.spec.title = title.into();
        self
    }

    #[must_use]
    pub fn series(mut self, fields: &[Field]) -> Self {
        self.spec.series = fields.to_vec();
        self
    }

    #[must_use]
    pub fn bins(mut self, bins: u32) -> Self {
        self.spec.bins = Some(bins);
        self
    }

    #[must_use]
    pub fn trend(mut self, trend: Trend) -> Self {
        self.spec.trend = trend;
        self
    }

    #[must_use]
    pub fn color(mut self, hint: ColorHint) -> Self {
        self.spec.color_hint = hint;
        self
    }

    /// Colour points by a continuous field using `hint` as the scale.
    #[must_use]
    pub fn color_by(mut self, field: Field, hint: ColorHint) -> Self {
        self.spec.color_field = Some(field);
        self.spec.color_hint = hint;
        self
    }

    #[must_use]
    pub fn bind(mut self, key: SelectorKey) -> Self {
        if !self.spec.binding.contains(&key) {
            self.spec.binding.push(key);
        }
        self
    }

    pub fn build(self) -> ChartSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_bound_scatter() {
        let spec = ChartRecipe::scatter("impact", Field::Errors, Field::TotalDurationMin)
            .trend(Trend::Smoothed)
            .bind(SelectorKey::DurationProblem)
            .bind(SelectorKey::DurationProblem)
            .build();
        assert_eq!(spec.kind, ChartKind::Scatter);
        assert_eq!(spec.y_field, Some(Field::TotalDurationMin));
        assert_eq!(spec.binding, vec![SelectorKey::DurationProblem]);
    }

    #[test]
    fn heatmap_lists_every_field() {
        let spec = ChartRecipe::heatmap("grid", Field::Errors, &[Field::Interruptions]).build();
        assert_eq!(spec.x_fields(), vec![Field::Errors, Field::Interruptions]);
    }
}
