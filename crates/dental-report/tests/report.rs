//! Integration tests for report assembly and selective rebuild.

use dental_metrics::derive_record;
use dental_model::{
    ChartKind, Dataset, Field, MetricValue, ProblemType, RatingType, SectionId, SelectorKey,
    SelectorState, TreatmentRecord, UndefinedReason, Warning,
};
use dental_report::{affected_sections, all_recipes, assemble_report, rebuild_section};

fn record(
    teeth: u32,
    interruptions: u32,
    errors: u32,
    patient: f64,
    doctor: f64,
) -> TreatmentRecord {
    TreatmentRecord {
        number_of_teeth: teeth,
        setup_duration_sec: 60.0 * f64::from(teeth),
        treatment_duration_sec: 600.0 + 120.0 * f64::from(interruptions + errors),
        interruptions,
        errors,
        patient_rating: patient,
        doctor_rating: doctor,
        source: vec![],
    }
}

fn dataset(records: Vec<TreatmentRecord>) -> Dataset {
    Dataset::new(vec![], records.into_iter().map(derive_record).collect())
}

fn sample() -> Dataset {
    dataset(vec![
        record(2, 0, 0, 5.0, 4.5),
        record(8, 2, 1, 3.0, 3.5),
        record(4, 1, 0, 4.0, 4.0),
        record(12, 3, 2, 2.0, 3.0),
        record(6, 0, 1, 4.5, 5.0),
    ])
}

#[test]
fn sections_follow_fixed_order() {
    let report = assemble_report(&sample(), SelectorState::default());
    let ids: Vec<SectionId> = report.sections.iter().map(|section| section.id).collect();
    assert_eq!(ids, SectionId::ORDER.to_vec());
    assert!(report.warnings().is_empty());
}

#[test]
fn chart_ids_in_report_order() {
    let report = assemble_report(&sample(), SelectorState::default());
    let ids: Vec<&str> = report.charts().map(|chart| chart.id.as_str()).collect();
    insta::assert_snapshot!(ids.join("\n"), @r"
    overview.rating_distribution
    overview.correlation_heatmap
    temporal.duration_histogram
    temporal.teeth_vs_duration
    temporal.duration_comparison
    problems.interruptions_distribution
    problems.errors_distribution
    problems.impact_on_duration
    problems.impact_on_satisfaction
    problems.problem_relation
    satisfaction.duration_vs_patient
    satisfaction.duration_vs_doctor
    satisfaction.rating_agreement
    ");
}

#[test]
fn kpi_section_matches_kpis() {
    let report = assemble_report(&sample(), SelectorState::default());
    let section = report.section(SectionId::Kpis).expect("kpi section");
    assert_eq!(section.metrics, report.kpis.summaries());
    assert_eq!(report.kpis.count, 5);
}

#[test]
fn problems_metrics_follow_selection() {
    let selectors = SelectorState::default()
        .with_duration_problem(ProblemType::Errors)
        .with_rating(RatingType::Doctor);
    let report = assemble_report(&sample(), selectors);
    let problems = report.section(SectionId::Problems).expect("problems");

    let max = problems
        .metrics
        .iter()
        .find(|metric| metric.id == "problems.interruptions.max")
        .expect("max");
    assert_eq!(max.value, MetricValue::Defined(3.0));

    let duration = problems
        .metrics
        .iter()
        .find(|metric| metric.id == "problems.duration_correlation")
        .expect("duration correlation");
    assert_eq!(duration.fields, vec![Field::Errors, Field::TotalDurationMin]);

    let satisfaction = problems
        .metrics
        .iter()
        .find(|metric| metric.id == "problems.satisfaction_correlation")
        .expect("satisfaction correlation");
    assert_eq!(satisfaction.fields, vec![Field::Interruptions, Field::DoctorRating]);

    let impact = problems.chart("problems.impact_on_duration").expect("impact");
    assert_eq!(impact.x_field, Field::Errors);
    assert_eq!(problems.controls.len(), 3);
    assert_eq!(problems.controls[2].selected, "Doctor");
}

#[test]
fn only_problems_section_depends_on_selectors() {
    let base = SelectorState::default();
    assert!(affected_sections(&base, &base).is_empty());
    for next in SelectorState::all_variants().into_iter().skip(1) {
        assert_eq!(affected_sections(&base, &next), vec![SectionId::Problems]);
    }
    let report = assemble_report(&sample(), base);
    for section in &report.sections {
        if section.id != SectionId::Problems {
            assert!(section.charts.iter().all(|chart| !chart.is_selector_bound()));
        }
    }
}

#[test]
fn rebuild_touches_only_target_section() {
    let data = sample();
    let mut report = assemble_report(&data, SelectorState::default());
    let before = report.clone();
    let next = SelectorState::default().with_satisfaction_problem(ProblemType::Errors);

    rebuild_section(&mut report, &data, SectionId::Problems, next);

    assert_eq!(report.selectors, next);
    for (old, new) in before.sections.iter().zip(&report.sections) {
        if old.id == SectionId::Problems {
            assert_ne!(old, new);
        } else {
            assert_eq!(old, new);
        }
    }
    let rebuilt = report.chart("problems.impact_on_satisfaction").expect("chart");
    assert_eq!(rebuilt.x_field, Field::Errors);
    assert!(rebuilt.depends_on(SelectorKey::SatisfactionProblem));
    assert_eq!(report, assemble_report(&data, next));
}

#[test]
fn empty_dataset_assembles_with_warning() {
    let report = assemble_report(&Dataset::default(), SelectorState::default());
    assert_eq!(report.kpis.count, 0);
    assert_eq!(report.warnings(), vec![&Warning::EmptyDataset]);
    let raw = report.section(SectionId::RawData).expect("raw");
    assert_eq!(raw.metrics[0].value, MetricValue::Defined(0.0));
    assert_eq!(report.charts().count(), 13);
}

#[test]
fn constant_rating_reports_undefined_correlation() {
    let data = dataset(vec![
        record(2, 0, 0, 5.0, 4.0),
        record(4, 1, 1, 5.0, 3.0),
        record(6, 2, 0, 5.0, 5.0),
    ]);
    let report = assemble_report(&data, SelectorState::default());
    let satisfaction = report.section(SectionId::Satisfaction).expect("satisfaction");
    let patient = &satisfaction.metrics[0];
    assert_eq!(
        patient.value,
        MetricValue::Undefined(UndefinedReason::ZeroVariance {
            field: Field::PatientRating
        })
    );
    assert_eq!(patient.display_value(), "n/a (PatientRating is constant)");
    assert!(!satisfaction.warnings.is_empty());
}

#[test]
fn shared_rating_pair_warns_once() {
    let data = dataset(vec![
        record(2, 0, 0, 5.0, 4.0),
        record(4, 1, 1, 5.0, 3.0),
        record(6, 2, 0, 5.0, 5.0),
    ]);
    let report = assemble_report(&data, SelectorState::default());
    let ratings = (Field::PatientRating, Field::DoctorRating);
    let key = (ratings.0.min(ratings.1), ratings.0.max(ratings.1));
    let raised = report
        .sections
        .iter()
        .flat_map(|section| section.warnings.iter())
        .filter(|warning| warning.field_pair() == Some(key))
        .count();
    assert!(raised > 1);
    let listed = report
        .warnings()
        .into_iter()
        .filter(|warning| warning.field_pair() == Some(key))
        .count();
    assert_eq!(listed, 1);
}

#[test]
fn catalog_kinds() {
    let specs = all_recipes();
    assert_eq!(
        specs.iter().filter(|spec| spec.kind == ChartKind::Heatmap).count(),
        1
    );
    assert!(specs.iter().all(|spec| !spec.title.is_empty()));
}
