use dental_model::{Dataset, Field, Kpis, MetricValue, UndefinedReason, Warning};
use tracing::warn;

use crate::stats::mean;

/// Headline indicators of a dataset.
///
/// An empty dataset yields `count == 0`, undefined means, and an
/// [`Warning::EmptyDataset`] instead of a panic.
pub fn compute_kpis(dataset: &Dataset) -> Kpis {
    if dataset.is_empty() {
        warn!("dataset is empty; KPI values are undefined");
        let undefined = MetricValue::Undefined(UndefinedReason::EmptyDataset);
        return Kpis {
            count: 0,
            mean_total_duration: undefined,
            interruption_rate: undefined,
            mean_patient_rating: undefined,
            mean_doctor_rating: undefined,
            warning: Some(Warning::EmptyDataset),
        };
    }
    let interrupted = dataset
        .records()
        .iter()
        .filter(|record| record.record.interruptions > 0)
        .count();
    Kpis {
        count: dataset.len(),
        mean_total_duration: mean(&dataset.column(Field::TotalDurationMin)).into(),
        interruption_rate: MetricValue::Defined(interrupted as f64 / dataset.len() as f64),
        mean_patient_rating: mean(&dataset.column(Field::PatientRating)).into(),
        mean_doctor_rating: mean(&dataset.column(Field::DoctorRating)).into(),
        warning: None,
    }
}
