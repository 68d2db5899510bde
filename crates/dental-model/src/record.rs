use serde::{Deserialize, Serialize};

use crate::field::Field;

/// One treatment visit as read from the source table.
///
/// `source` keeps every cell of the row verbatim, aligned with
/// [`Dataset::source_columns`](crate::Dataset::source_columns), so the raw
/// export can reproduce the input byte for byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentRecord {
    pub number_of_teeth: u32,
    pub setup_duration_sec: f64,
    pub treatment_duration_sec: f64,
    pub interruptions: u32,
    pub errors: u32,
    pub patient_rating: f64,
    pub doctor_rating: f64,
    #[serde(default)]
    pub source: Vec<String>,
}

/// A treatment record augmented with its computed duration fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    pub record: TreatmentRecord,
    pub setup_duration_min: f64,
    pub treatment_duration_min: f64,
    pub total_duration_min: f64,
}

impl DerivedRecord {
    /// Numeric value of `field` for this record.
    pub fn value(&self, field: Field) -> f64 {
        let record = &self.record;
        match field {
            Field::NumberOfTeeth => f64::from(record.number_of_teeth),
            Field::SetupDurationSec => record.setup_duration_sec,
            Field::TreatmentDurationSec => record.treatment_duration_sec,
            Field::Interruptions => f64::from(record.interruptions),
            Field::Errors => f64::from(record.errors),
            Field::PatientRating => record.patient_rating,
            Field::DoctorRating => record.doctor_rating,
            Field::SetupDurationMin => self.setup_duration_min,
            Field::TreatmentDurationMin => self.treatment_duration_min,
            Field::TotalDurationMin => self.total_duration_min,
        }
    }
}
