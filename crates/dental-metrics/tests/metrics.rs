//! Integration tests for the derived metrics engine.

use dental_metrics::{compute_kpis, correlation, correlation_matrix, derive_record};
use dental_model::{Dataset, Field, MetricValue, TreatmentRecord, UndefinedReason, Warning};

fn record(interruptions: u32, patient: f64, doctor: f64, teeth: u32) -> TreatmentRecord {
    TreatmentRecord {
        number_of_teeth: teeth,
        setup_duration_sec: 120.0 + f64::from(teeth) * 10.0,
        treatment_duration_sec: 600.0 + f64::from(interruptions) * 90.0,
        interruptions,
        errors: interruptions / 2,
        patient_rating: patient,
        doctor_rating: doctor,
        source: vec![],
    }
}

fn dataset(records: Vec<TreatmentRecord>) -> Dataset {
    Dataset::new(vec![], records.into_iter().map(derive_record).collect())
}

#[test]
fn interruption_rate_counts_interrupted_records() {
    let data = dataset(vec![
        record(0, 5.0, 4.0, 1),
        record(2, 5.0, 3.0, 2),
        record(0, 5.0, 5.0, 3),
    ]);
    let kpis = compute_kpis(&data);
    assert_eq!(kpis.count, 3);
    let rate = kpis.interruption_rate.as_f64().expect("rate");
    assert!((rate - 1.0 / 3.0).abs() < 1e-12);
    assert!(kpis.warning.is_none());

    let undefined = correlation(&data, Field::PatientRating, Field::DoctorRating)
        .expect_err("patient rating is constant");
    assert_eq!(
        undefined.reason,
        UndefinedReason::ZeroVariance {
            field: Field::PatientRating
        }
    );
}

#[test]
fn empty_dataset_reports_sentinels() {
    let kpis = compute_kpis(&Dataset::default());
    assert_eq!(kpis.count, 0);
    assert_eq!(
        kpis.mean_total_duration,
        MetricValue::Undefined(UndefinedReason::EmptyDataset)
    );
    assert_eq!(kpis.warning, Some(Warning::EmptyDataset));
}

#[test]
fn kpi_means_use_total_minutes() {
    let data = dataset(vec![record(0, 4.0, 4.0, 0), record(0, 2.0, 5.0, 0)]);
    let kpis = compute_kpis(&data);
    // (120 + 600) / 60 = 12 minutes for both rows.
    assert_eq!(kpis.mean_total_duration, MetricValue::Defined(12.0));
    assert_eq!(kpis.mean_patient_rating, MetricValue::Defined(3.0));
    assert_eq!(kpis.interruption_rate, MetricValue::Defined(0.0));
}

#[test]
fn matrix_is_symmetric_with_unit_diagonal() {
    let data = dataset(vec![
        record(0, 5.0, 4.0, 1),
        record(3, 2.0, 3.0, 4),
        record(1, 4.0, 5.0, 2),
        record(2, 3.0, 2.0, 8),
    ]);
    let (matrix, undefined) = correlation_matrix(&data, &Field::CORRELATED);
    assert!(undefined.is_empty());
    for a in Field::CORRELATED {
        assert_eq!(matrix.get(a, a), Some(1.0));
        for b in Field::CORRELATED {
            assert_eq!(matrix.get(a, b), matrix.get(b, a));
        }
    }
}

#[test]
fn matrix_marks_constant_fields_undefined() {
    let data = dataset(vec![
        record(0, 5.0, 4.0, 1),
        record(3, 5.0, 3.0, 4),
        record(1, 5.0, 5.0, 2),
    ]);
    let (matrix, undefined) = correlation_matrix(&data, &Field::CORRELATED);
    assert_eq!(matrix.get(Field::PatientRating, Field::PatientRating), None);
    assert_eq!(matrix.get(Field::PatientRating, Field::Errors), None);
    assert_eq!(matrix.get(Field::DoctorRating, Field::DoctorRating), Some(1.0));
    assert_eq!(undefined.len(), Field::CORRELATED.len() - 1);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn arb_record() -> impl Strategy<Value = TreatmentRecord> {
        (0u32..=32, 0.0f64..3_600.0, 0.0f64..7_200.0, 0u32..6, 0u32..6, 0.0f64..=5.0, 0.0f64..=5.0)
            .prop_map(
                |(teeth, setup, treatment, interruptions, errors, patient, doctor)| {
                    TreatmentRecord {
                        number_of_teeth: teeth,
                        setup_duration_sec: setup,
                        treatment_duration_sec: treatment,
                        interruptions,
                        errors,
                        patient_rating: patient,
                        doctor_rating: doctor,
                        source: vec![],
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn derive_is_deterministic(record in arb_record()) {
            prop_assert_eq!(derive_record(record.clone()), derive_record(record));
        }

        #[test]
        fn correlation_is_symmetric(records in prop::collection::vec(arb_record(), 0..40)) {
            let data = dataset(records);
            for a in Field::CORRELATED {
                for b in Field::CORRELATED {
                    prop_assert_eq!(correlation(&data, a, b).ok(), correlation(&data, b, a).ok());
                }
            }
        }

        #[test]
        fn self_correlation_is_one_or_undefined(
            records in prop::collection::vec(arb_record(), 2..40)
        ) {
            let data = dataset(records);
            for field in Field::CORRELATED {
                match correlation(&data, field, field) {
                    Ok(value) => prop_assert_eq!(value, 1.0),
                    Err(error) => prop_assert!(
                        matches!(error.reason, UndefinedReason::ZeroVariance { .. }),
                        "{} undefined for another reason: {:?}",
                        field,
                        error.reason
                    ),
                }
            }
        }

        #[test]
        fn kpi_count_matches_length(records in prop::collection::vec(arb_record(), 1..40)) {
            let data = dataset(records);
            prop_assert_eq!(compute_kpis(&data).count, data.len());
        }
    }
}
