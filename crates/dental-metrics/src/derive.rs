//! Row-level derived fields.

use dental_model::{DerivedRecord, TreatmentRecord};

/// Seconds per minute. A fixed scale, so derivation never divides by data.
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Augment a record with its duration fields in minutes.
pub fn derive_record(record: TreatmentRecord) -> DerivedRecord {
    let setup_duration_min = record.setup_duration_sec / SECONDS_PER_MINUTE;
    let treatment_duration_min = record.treatment_duration_sec / SECONDS_PER_MINUTE;
    let total_duration_min =
        (record.setup_duration_sec + record.treatment_duration_sec) / SECONDS_PER_MINUTE;
    DerivedRecord {
        record,
        setup_duration_min,
        treatment_duration_min,
        total_duration_min,
    }
}
