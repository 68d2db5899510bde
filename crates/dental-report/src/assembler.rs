use tracing::{debug, info, info_span, warn};

use dental_metrics::{compute_kpis, correlation, correlation_matrix, describe};
use dental_model::{
    Dataset, Field, Kpis, MetricKind, MetricSummary, MetricUnit, MetricValue, ProblemType,
    RatingType, Report, ReportSection, SectionId, SelectorControl, SelectorKey, SelectorState,
    UndefinedReason, Warning,
};

use crate::catalog;

/// Assemble every section in fixed order for the given selector state.
///
/// Never fails: undefined metrics and empty data surface as warnings.
pub fn assemble_report(dataset: &Dataset, selectors: SelectorState) -> Report {
    let span = info_span!("assemble", records = dataset.len());
    let _guard = span.enter();
    let kpis = compute_kpis(dataset);
    let sections = SectionId::ORDER
        .iter()
        .map(|id| build_section(*id, dataset, &kpis, selectors))
        .collect();
    let report = Report {
        kpis,
        selectors,
        sections,
    };
    for warning in report.warnings() {
        warn!(%warning, "report warning");
    }
    info!(
        sections = report.sections.len(),
        charts = report.charts().count(),
        "report assembled"
    );
    report
}

/// Recompute one section in place. Other sections are left untouched.
pub fn rebuild_section(
    report: &mut Report,
    dataset: &Dataset,
    section: SectionId,
    selectors: SelectorState,
) {
    debug!(section = section.as_str(), "rebuilding section");
    report.selectors = selectors;
    if section == SectionId::Kpis {
        report.kpis = compute_kpis(dataset);
    }
    let rebuilt = build_section(section, dataset, &report.kpis, selectors);
    for warning in &rebuilt.warnings {
        warn!(%warning, section = section.as_str(), "report warning");
    }
    match report.section_mut(section) {
        Some(slot) => *slot = rebuilt,
        None => report.sections.push(rebuilt),
    }
}

/// Selectors a section reads.
pub fn section_bindings(section: SectionId) -> &'static [SelectorKey] {
    match section {
        SectionId::Problems => &SelectorKey::ALL,
        SectionId::Kpis
        | SectionId::Overview
        | SectionId::Temporal
        | SectionId::Satisfaction
        | SectionId::RawData => &[],
    }
}

/// Sections whose content changes between two selector states.
pub fn affected_sections(previous: &SelectorState, next: &SelectorState) -> Vec<SectionId> {
    let changed = previous.changed_keys(next);
    SectionId::ORDER
        .into_iter()
        .filter(|section| {
            section_bindings(*section)
                .iter()
                .any(|key| changed.contains(key))
        })
        .collect()
}

fn build_section(
    id: SectionId,
    dataset: &Dataset,
    kpis: &Kpis,
    selectors: SelectorState,
) -> ReportSection {
    let mut section = ReportSection::new(id);
    match id {
        SectionId::Kpis => {
            section.metrics = kpis.summaries();
            section.warnings.extend(kpis.warning.clone());
        }
        SectionId::Overview => {
            let (_, undefined) = correlation_matrix(dataset, &Field::CORRELATED);
            section.warnings.extend(
                undefined
                    .into_iter()
                    .filter(|pair| pair.reason != UndefinedReason::EmptyDataset)
                    .map(Warning::from),
            );
            section.charts = vec![
                catalog::rating_distribution(),
                catalog::correlation_heatmap(),
            ];
        }
        SectionId::Temporal => {
            section.metrics = vec![
                mean_metric(dataset, "temporal.mean_setup", "Mean setup", Field::SetupDurationMin),
                mean_metric(
                    dataset,
                    "temporal.mean_treatment",
                    "Mean treatment",
                    Field::TreatmentDurationMin,
                ),
            ];
            section.charts = vec![
                catalog::duration_histogram(),
                catalog::teeth_vs_duration(),
                catalog::duration_comparison(),
            ];
        }
        SectionId::Problems => {
            for problem in ProblemType::ALL {
                section.metrics.extend(problem_metrics(dataset, problem));
            }
            let duration_problem = selectors.duration_problem;
            section.metrics.push(correlation_metric(
                dataset,
                "problems.duration_correlation",
                format!("{} / total duration", duration_problem.label()),
                duration_problem.field(),
                Field::TotalDurationMin,
                &mut section.warnings,
            ));
            let satisfaction_problem = selectors.satisfaction_problem;
            section.metrics.push(correlation_metric(
                dataset,
                "problems.satisfaction_correlation",
                format!(
                    "{} / {} rating",
                    satisfaction_problem.label(),
                    selectors.rating.label().to_lowercase()
                ),
                satisfaction_problem.field(),
                selectors.rating.field(),
                &mut section.warnings,
            ));
            section.charts = vec![
                catalog::problem_distribution(ProblemType::Interruptions),
                catalog::problem_distribution(ProblemType::Errors),
                catalog::impact_on_duration(duration_problem),
                catalog::impact_on_satisfaction(satisfaction_problem, selectors.rating),
                catalog::problem_relation(),
            ];
            section.controls = controls(selectors);
        }
        SectionId::Satisfaction => {
            section.metrics = vec![
                correlation_metric(
                    dataset,
                    "satisfaction.duration_patient",
                    "Duration / patient rating",
                    Field::TotalDurationMin,
                    Field::PatientRating,
                    &mut section.warnings,
                ),
                correlation_metric(
                    dataset,
                    "satisfaction.duration_doctor",
                    "Duration / doctor rating",
                    Field::TotalDurationMin,
                    Field::DoctorRating,
                    &mut section.warnings,
                ),
                correlation_metric(
                    dataset,
                    "satisfaction.patient_doctor",
                    "Patient / doctor rating",
                    Field::PatientRating,
                    Field::DoctorRating,
                    &mut section.warnings,
                ),
            ];
            section.charts = vec![
                catalog::duration_vs_rating(RatingType::Patient),
                catalog::duration_vs_rating(RatingType::Doctor),
                catalog::rating_agreement(),
            ];
        }
        SectionId::RawData => {
            section.metrics = vec![
                MetricSummary::new(
                    "raw.rows",
                    "Rows",
                    MetricKind::Count,
                    MetricValue::Defined(dataset.len() as f64),
                ),
                MetricSummary::new(
                    "raw.columns",
                    "Columns",
                    MetricKind::Count,
                    MetricValue::Defined(dataset.column_count() as f64),
                ),
            ];
        }
    }
    section
}

fn mean_metric(dataset: &Dataset, id: &str, label: &str, field: Field) -> MetricSummary {
    let value = describe(&dataset.column(field)).map(|stats| stats.mean);
    MetricSummary::new(id, label, MetricKind::Mean, value.into())
        .with_fields(&[field])
        .with_unit(MetricUnit::Minutes)
}

fn problem_metrics(dataset: &Dataset, problem: ProblemType) -> Vec<MetricSummary> {
    let stats = describe(&dataset.column(problem.field()));
    let name = problem.label().to_lowercase();
    let field = [problem.field()];
    vec![
        MetricSummary::new(
            format!("problems.{name}.mean"),
            format!("Mean {name}"),
            MetricKind::Mean,
            stats.as_ref().map(|stats| stats.mean).into(),
        )
        .with_fields(&field),
        MetricSummary::new(
            format!("problems.{name}.max"),
            format!("Max {name}"),
            MetricKind::Max,
            stats.as_ref().map(|stats| stats.max).into(),
        )
        .with_fields(&field),
        MetricSummary::new(
            format!("problems.{name}.p75"),
            format!("75th percentile {name}"),
            MetricKind::Quantile(75),
            stats.as_ref().map(|stats| stats.q3).into(),
        )
        .with_fields(&field),
    ]
}

fn correlation_metric(
    dataset: &Dataset,
    id: &str,
    label: impl Into<String>,
    a: Field,
    b: Field,
    warnings: &mut Vec<Warning>,
) -> MetricSummary {
    let value = match correlation(dataset, a, b) {
        Ok(value) => MetricValue::Defined(value),
        Err(undefined) => {
            if undefined.reason != UndefinedReason::EmptyDataset {
                warnings.push(undefined.into());
            }
            MetricValue::Undefined(undefined.reason)
        }
    };
    MetricSummary::new(id, label, MetricKind::Correlation, value).with_fields(&[a, b])
}

fn controls(selectors: SelectorState) -> Vec<SelectorControl> {
    let problems: Vec<String> = ProblemType::ALL
        .iter()
        .map(|problem| problem.label().to_string())
        .collect();
    let ratings: Vec<String> = RatingType::ALL
        .iter()
        .map(|rating| rating.label().to_string())
        .collect();
    SelectorKey::ALL
        .into_iter()
        .map(|key| SelectorControl {
            key,
            label: match key {
                SelectorKey::DurationProblem => "Problem affecting duration",
                SelectorKey::SatisfactionProblem => "Problem affecting satisfaction",
                SelectorKey::Rating => "Rating",
            }
            .to_string(),
            choices: match key {
                SelectorKey::Rating => ratings.clone(),
                SelectorKey::DurationProblem | SelectorKey::SatisfactionProblem => {
                    problems.clone()
                }
            },
            selected: selectors.value_label(key).to_string(),
        })
        .collect()
}
