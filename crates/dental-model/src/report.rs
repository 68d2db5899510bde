//! Ordered report sections shared by every render target.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::chart::ChartSpec;
use crate::error::Warning;
use crate::metric::{Kpis, MetricSummary};
use crate::selector::{SelectorControl, SelectorState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Kpis,
    Overview,
    Temporal,
    Problems,
    Satisfaction,
    RawData,
}

impl SectionId {
    /// Section order shared by the document and the interactive tabs.
    pub const ORDER: [SectionId; 6] = [
        SectionId::Kpis,
        SectionId::Overview,
        SectionId::Temporal,
        SectionId::Problems,
        SectionId::Satisfaction,
        SectionId::RawData,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionId::Kpis => "Key indicators",
            SectionId::Overview => "Overview",
            SectionId::Temporal => "Temporal analysis",
            SectionId::Problems => "Problems and errors",
            SectionId::Satisfaction => "Satisfaction",
            SectionId::RawData => "Raw data",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::Kpis => "kpis",
            SectionId::Overview => "overview",
            SectionId::Temporal => "temporal",
            SectionId::Problems => "problems",
            SectionId::Satisfaction => "satisfaction",
            SectionId::RawData => "raw_data",
        }
    }
}

/// One named section: metrics, charts, and the selectors that parameterize
/// its charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub id: SectionId,
    pub title: String,
    pub metrics: Vec<MetricSummary>,
    pub charts: Vec<ChartSpec>,
    pub controls: Vec<SelectorControl>,
    pub warnings: Vec<Warning>,
}

impl ReportSection {
    pub fn new(id: SectionId) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            metrics: Vec::new(),
            charts: Vec::new(),
            controls: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn chart(&self, chart_id: &str) -> Option<&ChartSpec> {
        self.charts.iter().find(|chart| chart.id == chart_id)
    }
}

/// A full report for one dataset and one selector state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub kpis: Kpis,
    pub selectors: SelectorState,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn section(&self, id: SectionId) -> Option<&ReportSection> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut ReportSection> {
        self.sections.iter_mut().find(|section| section.id == id)
    }

    /// Every chart in section order.
    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.sections.iter().flat_map(|section| section.charts.iter())
    }

    pub fn chart(&self, chart_id: &str) -> Option<&ChartSpec> {
        self.charts().find(|chart| chart.id == chart_id)
    }

    /// Sections other than the KPI strip that carry at least one metric.
    pub fn metric_groups(&self) -> impl Iterator<Item = &ReportSection> {
        self.sections
            .iter()
            .filter(|section| section.id != SectionId::Kpis && !section.metrics.is_empty())
    }

    /// Warnings across all sections, each condition once.
    ///
    /// A field pair raised by several sections is kept at its first
    /// occurrence regardless of argument order.
    pub fn warnings(&self) -> Vec<&Warning> {
        let mut seen = BTreeSet::new();
        self.sections
            .iter()
            .flat_map(|section| section.warnings.iter())
            .filter(|warning| seen.insert(warning.field_pair()))
            .collect()
    }
}
