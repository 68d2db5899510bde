//! Integration tests for the interactive and document targets.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;

use dental_metrics::derive_record;
use dental_model::{
    Coverage, Dataset, ProblemType, RatingType, ReportOptions, SectionId, SelectorState,
    TreatmentRecord,
};
use dental_render::{
    DocumentControl, DocumentUpdate, InteractiveSession, PageKind, PlotData, RenderError,
    RenderFailure, WidgetContent, planned_pages, render_document, render_document_with, resolve,
    spawn_document_export,
};
use dental_report::{assemble_report, catalog};

fn record(
    teeth: u32,
    setup: f64,
    treatment: f64,
    interruptions: u32,
    errors: u32,
    patient: f64,
    doctor: f64,
) -> TreatmentRecord {
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
}

fn sample() -> Arc<Dataset> {
    let records = vec![
        record(2, 120.0, 600.0, 0, 0, 5.0, 4.0),
        record(6, 180.0, 1200.0, 2, 1, 3.0, 4.0),
        record(4, 60.0, 900.0, 1, 0, 4.0, 5.0),
        record(8, 240.0, 1500.0, 0, 2, 4.0, 3.0),
    ];
    Arc::new(Dataset::new(
        vec![],
        records.into_iter().map(derive_record).collect(),
    ))
}

fn session(dataset: Arc<Dataset>) -> InteractiveSession {
    InteractiveSession::new(dataset, SelectorState::default(), "Test", 10).expect("session")
}

#[test]
fn kpi_strip_text() {
    let session = session(sample());
    insta::assert_snapshot!(session.view().kpi_strip(), @"Treatments: 4 | Mean duration: 20.0 min | Interruption rate: 50.0% | Mean patient satisfaction: 4.0/5 | Mean doctor satisfaction: 4.0/5");
}

#[test]
fn kpis_match_between_targets() {
    let dataset = sample();
    let session = session(Arc::clone(&dataset));
    let document = render_document(session.report(), &dataset, &ReportOptions::new())
        .expect("document");
    let strip: Vec<(String, String)> = session
        .view()
        .kpis
        .iter()
        .map(|indicator| (indicator.label.clone(), indicator.value.clone()))
        .collect();
    assert_eq!(strip.len(), 5);
    assert_eq!(document.title_kpis, strip);
}

#[test]
fn empty_dataset_title_matches_strip() {
    let dataset = Arc::new(Dataset::default());
    let session = session(Arc::clone(&dataset));
    let document = render_document(session.report(), &dataset, &ReportOptions::new())
        .expect("document");
    let values: Vec<&str> = document.title_kpis.iter().map(|(_, value)| value.as_str()).collect();
    let strip: Vec<&str> = session.view().kpis.iter().map(|kpi| kpi.value.as_str()).collect();
    assert_eq!(values, strip);
    assert_eq!(values[1], "n/a (empty dataset)");
}

#[test]
fn document_has_one_page_per_chart_and_group() {
    let dataset = sample();
    let report = assemble_report(&dataset, SelectorState::default());
    let document = render_document(&report, &dataset, &ReportOptions::new()).expect("document");
    assert_eq!(document.page_count(), planned_pages(&report));
    assert_eq!(document.page_count(), 13 + 1 + 4);
    assert_eq!(document.pages[0], PageKind::Title);
    assert!(document.failures.is_empty());
    assert!(document.bytes.starts_with(b"%PDF"));

    let charts: Vec<&str> = document
        .pages
        .iter()
        .filter_map(|page| match page {
            PageKind::Chart { chart_id, .. } => Some(chart_id.as_str()),
            _ => None,
        })
        .collect();
    let expected: Vec<&str> = report.charts().map(|chart| chart.id.as_str()).collect();
    assert_eq!(charts, expected);
}

#[test]
fn all_variants_adds_bound_chart_variants() {
    let dataset = sample();
    let report = assemble_report(&dataset, SelectorState::default());
    let options = ReportOptions::new().with_coverage(Coverage::AllVariants);
    let document = render_document(&report, &dataset, &options).expect("document");
    // Two duration-impact variants and four satisfaction-impact variants.
    assert_eq!(document.page_count(), planned_pages(&report) + 1 + 3);
}

#[test]
fn empty_dataset_yields_placeholders() {
    let dataset = Arc::new(Dataset::default());
    let report = assemble_report(&dataset, SelectorState::default());
    let document = render_document(&report, &dataset, &ReportOptions::new()).expect("document");
    assert_eq!(document.page_count(), planned_pages(&report));
    assert_eq!(document.failures.len(), report.charts().count());
    assert!(
        document
            .failures
            .iter()
            .all(|failure| failure.failure == RenderFailure::NoData)
    );

    let session = session(dataset);
    assert!(session.view().kpis[1].value.starts_with("n/a"));
    let tab = session.view().tab(SectionId::Overview).expect("overview");
    assert!(tab.widgets.iter().all(|widget| !widget.is_ready()));
}

#[test]
fn selection_rerenders_only_bound_charts() {
    let mut session = session(sample());
    let before = session.view().clone();

    let next = SelectorState::default().with_rating(RatingType::Doctor);
    let rerendered = session.select(next);
    assert_eq!(rerendered, vec!["problems.impact_on_satisfaction".to_string()]);
    assert_eq!(session.selectors(), next);

    for (old, new) in before.tabs.iter().zip(&session.view().tabs) {
        if old.section != SectionId::Problems {
            assert_eq!(old, new);
        }
    }
    let widget = session
        .view()
        .widget("problems.impact_on_satisfaction")
        .expect("widget");
    assert_eq!(widget.spec.y_field, Some(RatingType::Doctor.field()));

    let rerendered = session.select(next.with_duration_problem(ProblemType::Errors));
    assert_eq!(rerendered, vec!["problems.impact_on_duration".to_string()]);
    assert!(session.select(session.selectors()).is_empty());
}

#[test]
fn chart_renders_on_demand() {
    let mut session = session(sample());
    let widget = session
        .render_chart("overview.correlation_heatmap")
        .expect("widget");
    assert!(matches!(widget.content, WidgetContent::Ready { .. }));
    assert!(session.render_chart("missing.chart").is_none());
}

#[test]
fn raw_data_tab_has_preview() {
    let session = session(sample());
    let tab = session.view().tab(SectionId::RawData).expect("raw tab");
    let table = tab.table.as_ref().expect("preview");
    assert_eq!(table.total_rows, 4);
    assert_eq!(table.rows[0], vec!["2", "10", "12"]);
    let json = session.view().to_json().expect("json");
    assert!(json.contains("\"kpis\""));
}

#[test]
fn cancelled_export_stops() {
    let dataset = sample();
    let report = assemble_report(&dataset, SelectorState::default());
    let control = DocumentControl::new().with_cancel_flag(Arc::new(AtomicBool::new(true)));
    let result = render_document_with(&report, &dataset, &ReportOptions::new(), control);
    assert!(matches!(result, Err(RenderError::Cancelled)));
}

#[test]
fn background_export_reports_progress() {
    let dataset = sample();
    let report = assemble_report(&dataset, SelectorState::default());
    let total = planned_pages(&report);
    let (sender, receiver) = mpsc::channel();
    let handle = spawn_document_export(report, dataset, ReportOptions::new(), sender);
    assert!(!handle.is_cancelled());

    let mut progress = 0;
    let document = loop {
        match receiver.recv().expect("update") {
            DocumentUpdate::Progress { page, total: seen } => {
                assert_eq!(seen, total);
                progress = page;
            }
            DocumentUpdate::Complete(document) => break document,
            DocumentUpdate::Cancelled => panic!("unexpected cancel"),
            DocumentUpdate::Error(error) => panic!("export failed: {error}"),
        }
    };
    assert_eq!(progress, total);
    assert_eq!(document.page_count(), total);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn arb_record() -> impl Strategy<Value = TreatmentRecord> {
        (
            0u32..=32,
            0.0f64..1_800.0,
            0.0f64..3_600.0,
            0u32..4,
            0u32..4,
            0.0f64..=5.0,
            0.0f64..=5.0,
        )
            .prop_map(|(teeth, setup, treatment, interruptions, errors, patient, doctor)| {
                record(teeth, setup, treatment, interruptions, errors, patient, doctor)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(12))]

        #[test]
        fn page_count_matches_plan(
            records in prop::collection::vec(arb_record(), 0..12),
            variant in 0usize..8,
        ) {
            let dataset = Dataset::new(vec![], records.into_iter().map(derive_record).collect());
            let selectors = SelectorState::all_variants()[variant];
            let report = assemble_report(&dataset, selectors);
            let document = render_document(&report, &dataset, &ReportOptions::new())
                .expect("document");
            let expected = report.charts().count() + 1 + report.metric_groups().count();
            prop_assert_eq!(document.page_count(), expected);
            prop_assert_eq!(document.page_count(), 18);
        }

        #[test]
        fn duration_histogram_counts_every_record(
            records in prop::collection::vec(arb_record(), 1..20),
        ) {
            let dataset = Dataset::new(vec![], records.into_iter().map(derive_record).collect());
            let plot = resolve(&catalog::duration_histogram(), &dataset).expect("histogram");
            let PlotData::Histogram { series } = plot else {
                panic!("expected histogram data");
            };
            for entry in series {
                let counted: usize = entry.bins.iter().map(|bin| bin.count).sum();
                prop_assert_eq!(counted, dataset.len());
            }
        }
    }
}
