//! Tests for dental-model types.

use dental_model::{
    ChartKind, ChartSpec, ColorHint, Dataset, DerivedRecord, Field, Kpis, MetricValue,
    ReportSection, SectionId, SelectorKey, TreatmentRecord, Trend, UndefinedReason,
};

fn record(teeth: u32, setup: f64, treatment: f64) -> DerivedRecord {
    DerivedRecord {
        record: TreatmentRecord {
            number_of_teeth: teeth,
            setup_duration_sec: setup,
            treatment_duration_sec: treatment,
            interruptions: 1,
            errors: 0,
            patient_rating: 4.0,
            doctor_rating: 5.0,
            source: vec![],
        },
        setup_duration_min: setup / 60.0,
        treatment_duration_min: treatment / 60.0,
        total_duration_min: (setup + treatment) / 60.0,
    }
}

#[test]
fn dataset_columns_follow_record_order() {
    let dataset = Dataset::new(
        vec!["NumberOfTeeth".to_string()],
        vec![record(2, 60.0, 120.0), record(4, 30.0, 90.0)],
    );
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.column(Field::NumberOfTeeth), vec![2.0, 4.0]);
    assert_eq!(dataset.column(Field::TotalDurationMin), vec![3.0, 2.0]);
    assert_eq!(dataset.column_count(), 4);
}

#[test]
fn kpi_summaries_keep_strip_order() {
    let kpis = Kpis {
        count: 0,
        mean_total_duration: MetricValue::Undefined(UndefinedReason::EmptyDataset),
        interruption_rate: MetricValue::Undefined(UndefinedReason::EmptyDataset),
        mean_patient_rating: MetricValue::Undefined(UndefinedReason::EmptyDataset),
        mean_doctor_rating: MetricValue::Undefined(UndefinedReason::EmptyDataset),
        warning: None,
    };
    let ids: Vec<String> = kpis.summaries().into_iter().map(|m| m.id).collect();
    assert_eq!(
        ids,
        vec![
            "kpi.count",
            "kpi.mean_total_duration",
            "kpi.interruption_rate",
            "kpi.mean_patient_rating",
            "kpi.mean_doctor_rating",
        ]
    );
    assert_eq!(kpis.summaries()[1].display_value(), "n/a (empty dataset)");
}

#[test]
fn chart_binding_and_lookup() {
    let mut section = ReportSection::new(SectionId::Problems);
    section.charts.push(ChartSpec {
        id: "impact.duration".to_string(),
        kind: ChartKind::Scatter,
        x_field: Field::Errors,
        y_field: Some(Field::TotalDurationMin),
        color_field: None,
        series: vec![],
        bins: None,
        trend: Trend::Smoothed,
        title: "Impact".to_string(),
        color_hint: ColorHint::solid("#B6E880"),
        binding: vec![SelectorKey::DurationProblem],
    });
    let chart = section.chart("impact.duration").expect("chart");
    assert!(chart.depends_on(SelectorKey::DurationProblem));
    assert!(!chart.depends_on(SelectorKey::Rating));
    assert_eq!(chart.x_fields(), vec![Field::Errors]);
    assert_eq!(section.title, "Problems and errors");
}
