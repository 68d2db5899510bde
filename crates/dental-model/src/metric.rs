//! Scalar metrics and their shared presentation.

use serde::{Deserialize, Serialize};

use crate::error::{UndefinedReason, Warning};
use crate::field::Field;

/// A computed number, or the reason it could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricValue {
    Defined(f64),
    Undefined(UndefinedReason),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Defined(value) => Some(*value),
            MetricValue::Undefined(_) => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, MetricValue::Defined(_))
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(value) => MetricValue::Defined(value),
            None => MetricValue::Undefined(UndefinedReason::EmptyDataset),
        }
    }
}

/// What a metric measures. Drives formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Count,
    Mean,
    Max,
    /// Quantile expressed in percent (75 for the third quartile).
    Quantile(u8),
    /// Fraction in `[0, 1]`, displayed as a percentage.
    Percentage,
    Correlation,
}

/// Unit suffix appended to the formatted value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricUnit {
    #[default]
    None,
    Minutes,
    Rating,
}

/// A named scalar tied to one or more columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub id: String,
    pub label: String,
    pub fields: Vec<Field>,
    pub kind: MetricKind,
    pub unit: MetricUnit,
    pub value: MetricValue,
}

impl MetricSummary {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: MetricKind,
        value: MetricValue,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            fields: Vec::new(),
            kind,
            unit: MetricUnit::None,
            value,
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: &[Field]) -> Self {
        self.fields = fields.to_vec();
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: MetricUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Formatted value. Both render targets print metrics through this.
    pub fn display_value(&self) -> String {
        let value = match self.value {
            MetricValue::Defined(value) => value,
            MetricValue::Undefined(reason) => return format!("n/a ({reason})"),
        };
        let number = match self.kind {
            MetricKind::Count => format!("{value:.0}"),
            MetricKind::Percentage => return format!("{:.1}%", value * 100.0),
            MetricKind::Correlation => return format!("{value:.2}"),
            MetricKind::Mean | MetricKind::Max | MetricKind::Quantile(_) => format!("{value:.1}"),
        };
        match self.unit {
            MetricUnit::None => number,
            MetricUnit::Minutes => format!("{number} min"),
            MetricUnit::Rating => format!("{number}/5"),
        }
    }
}

/// Headline indicators shown in the KPI strip and on the document title page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub count: usize,
    pub mean_total_duration: MetricValue,
    pub interruption_rate: MetricValue,
    pub mean_patient_rating: MetricValue,
    pub mean_doctor_rating: MetricValue,
    pub warning: Option<Warning>,
}

impl Kpis {
    /// KPI values as metric summaries, in strip order.
    pub fn summaries(&self) -> Vec<MetricSummary> {
        vec![
            MetricSummary::new(
                "kpi.count",
                "Treatments",
                MetricKind::Count,
                MetricValue::Defined(self.count as f64),
            ),
            MetricSummary::new(
                "kpi.mean_total_duration",
                "Mean duration",
                MetricKind::Mean,
                self.mean_total_duration,
            )
            .with_fields(&[Field::TotalDurationMin])
            .with_unit(MetricUnit::Minutes),
            MetricSummary::new(
                "kpi.interruption_rate",
                "Interruption rate",
                MetricKind::Percentage,
                self.interruption_rate,
            )
            .with_fields(&[Field::Interruptions]),
            MetricSummary::new(
                "kpi.mean_patient_rating",
                "Mean patient satisfaction",
                MetricKind::Mean,
                self.mean_patient_rating,
            )
            .with_fields(&[Field::PatientRating])
            .with_unit(MetricUnit::Rating),
            MetricSummary::new(
                "kpi.mean_doctor_rating",
                "Mean doctor satisfaction",
                MetricKind::Mean,
                self.mean_doctor_rating,
            )
            .with_fields(&[Field::DoctorRating])
            .with_unit(MetricUnit::Rating),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_by_kind_and_unit() {
        let mean = MetricSummary::new("m", "Mean", MetricKind::Mean, MetricValue::Defined(12.345))
            .with_unit(MetricUnit::Minutes);
        assert_eq!(mean.display_value(), "12.3 min");

        let rate = MetricSummary::new(
            "r",
            "Rate",
            MetricKind::Percentage,
            MetricValue::Defined(1.0 / 3.0),
        );
        assert_eq!(rate.display_value(), "33.3%");

        let corr = MetricSummary::new(
            "c",
            "Corr",
            MetricKind::Correlation,
            MetricValue::Defined(-0.456),
        );
        assert_eq!(corr.display_value(), "-0.46");
    }

    #[test]
    fn undefined_values_name_their_reason() {
        let metric = MetricSummary::new(
            "c",
            "Corr",
            MetricKind::Correlation,
            MetricValue::Undefined(UndefinedReason::ZeroVariance {
                field: Field::PatientRating,
            }),
        );
        assert_eq!(metric.display_value(), "n/a (PatientRating is constant)");
    }
}
