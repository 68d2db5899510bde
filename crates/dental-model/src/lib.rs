pub mod chart;
pub mod dataset;
pub mod error;
pub mod field;
pub mod metric;
pub mod options;
pub mod record;
pub mod report;
pub mod selector;

pub use chart::{ChartKind, ChartSpec, ColorHint, ColorScale, Trend};
pub use dataset::Dataset;
pub use error::{Result, SchemaError, UndefinedCorrelation, UndefinedReason, Warning};
pub use field::Field;
pub use metric::{Kpis, MetricKind, MetricSummary, MetricUnit, MetricValue};
pub use options::{Coverage, DEFAULT_DELIMITER, PageSize, ReportOptions};
pub use record::{DerivedRecord, TreatmentRecord};
pub use report::{Report, ReportSection, SectionId};
pub use selector::{ProblemType, RatingType, SelectorControl, SelectorKey, SelectorState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_names_column() {
        let error = SchemaError::NotNumeric {
            row: 3,
            column: "Errors".to_string(),
            value: "two".to_string(),
        };
        assert_eq!(error.column(), Some("Errors"));
        assert_eq!(
            error.to_string(),
            "row 3: column Errors is not numeric: \"two\""
        );
    }

    #[test]
    fn warning_serializes() {
        let warning = Warning::UndefinedCorrelation(UndefinedCorrelation {
            a: Field::PatientRating,
            b: Field::DoctorRating,
            reason: UndefinedReason::ZeroVariance {
                field: Field::PatientRating,
            },
        });
        let json = serde_json::to_string(&warning).expect("serialize warning");
        let round: Warning = serde_json::from_str(&json).expect("deserialize warning");
        assert_eq!(round, warning);
    }
}
