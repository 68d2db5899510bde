//! Interactive target: a serializable view model for a UI collaborator.
//!
//! The session keeps the assembled report and view in sync. A selector change
//! rebuilds only the affected section and re-renders only the charts bound to
//! a changed selector.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use dental_ingest::format_numeric;
use dental_model::{
    ChartSpec, Dataset, Field, MetricSummary, MetricValue, Report, ReportSection, SectionId,
    SelectorControl, SelectorState,
};
use dental_report::{affected_sections, assemble_report, rebuild_section};

use crate::error::{RenderError, RenderFailure};
use crate::plot::{PlotData, resolve};
use crate::renderer::{Renderer, compile};

/// Rows shown in the raw data tab.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: String,
    pub label: String,
    /// Formatted exactly as on the document title page.
    pub value: String,
    pub raw: MetricValue,
}

impl From<&MetricSummary> for Indicator {
    fn from(metric: &MetricSummary) -> Self {
        Self {
            id: metric.id.clone(),
            label: metric.label.clone(),
            value: metric.display_value(),
            raw: metric.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum WidgetContent {
    Ready { plot: PlotData },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub spec: ChartSpec,
    pub content: WidgetContent,
}

impl Widget {
    fn ready(spec: &ChartSpec, plot: PlotData) -> Self {
        Self {
            spec: spec.clone(),
            content: WidgetContent::Ready { plot },
        }
    }

    fn failed(spec: &ChartSpec, failure: &RenderFailure) -> Self {
        Self {
            spec: spec.clone(),
            content: WidgetContent::Failed {
                message: failure.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.content, WidgetContent::Ready { .. })
    }
}

fn render_widget(spec: &ChartSpec, dataset: &Dataset) -> Widget {
    match resolve(spec, dataset) {
        Ok(plot) => Widget::ready(spec, plot),
        Err(failure) => Widget::failed(spec, &failure),
    }
}

/// First rows of the dataset with the derived columns appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

pub fn table_preview(dataset: &Dataset, limit: usize) -> TablePreview {
    let mut columns = dataset.source_columns().to_vec();
    columns.extend(Field::DERIVED.iter().map(|field| field.column_name().to_string()));
    let rows = dataset
        .records()
        .iter()
        .take(limit)
        .map(|record| {
            let mut row = record.record.source.clone();
            row.extend(
                Field::DERIVED
                    .iter()
                    .map(|field| format_numeric(record.value(*field))),
            );
            row
        })
        .collect();
    TablePreview {
        columns,
        rows,
        total_rows: dataset.len(),
    }
}

/// One tab per report section after the KPI strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub section: SectionId,
    pub title: String,
    pub indicators: Vec<Indicator>,
    pub widgets: Vec<Widget>,
    pub controls: Vec<SelectorControl>,
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TablePreview>,
}

impl Tab {
    fn new(section: &ReportSection) -> Self {
        Self {
            section: section.id,
            title: section.title.clone(),
            indicators: Vec::new(),
            widgets: Vec::new(),
            controls: section.controls.clone(),
            warnings: section.warnings.iter().map(ToString::to_string).collect(),
            table: None,
        }
    }

    pub fn widget(&self, chart_id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|widget| widget.spec.id == chart_id)
    }

    fn put_widget(&mut self, widget: Widget) {
        match self
            .widgets
            .iter_mut()
            .find(|existing| existing.spec.id == widget.spec.id)
        {
            Some(slot) => *slot = widget,
            None => self.widgets.push(widget),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractiveView {
    pub title: String,
    pub kpis: Vec<Indicator>,
    pub selectors: SelectorState,
    pub warnings: Vec<String>,
    pub tabs: Vec<Tab>,
}

impl InteractiveView {
    pub fn tab(&self, section: SectionId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.section == section)
    }

    fn tab_mut(&mut self, section: SectionId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| tab.section == section)
    }

    pub fn widget(&self, chart_id: &str) -> Option<&Widget> {
        self.tabs.iter().find_map(|tab| tab.widget(chart_id))
    }

    /// KPI strip as a single line of text.
    pub fn kpi_strip(&self) -> String {
        self.kpis
            .iter()
            .map(|indicator| format!("{}: {}", indicator.label, indicator.value))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn to_json(&self) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds an [`InteractiveView`] from a report.
pub struct InteractiveRenderer {
    view: InteractiveView,
    preview: TablePreview,
}

impl InteractiveRenderer {
    pub fn new(title: &str, dataset: &Dataset, preview_rows: usize) -> Self {
        Self {
            view: InteractiveView {
                title: title.to_string(),
                kpis: Vec::new(),
                selectors: SelectorState::default(),
                warnings: Vec::new(),
                tabs: Vec::new(),
            },
            preview: table_preview(dataset, preview_rows),
        }
    }
}

impl Renderer for InteractiveRenderer {
    type Output = InteractiveView;

    fn title(&mut self, report: &Report, kpis: &[MetricSummary]) {
        self.view.kpis = kpis.iter().map(Indicator::from).collect();
        self.view.selectors = report.selectors;
    }

    fn section(&mut self, section: &ReportSection) {
        if section.id == SectionId::Kpis {
            self.view.warnings = section.warnings.iter().map(ToString::to_string).collect();
            return;
        }
        let mut tab = Tab::new(section);
        if section.id == SectionId::RawData {
            tab.table = Some(self.preview.clone());
        }
        self.view.tabs.push(tab);
    }

    fn metric_group(&mut self, section: &ReportSection) {
        if let Some(tab) = self.view.tab_mut(section.id) {
            tab.indicators = section.metrics.iter().map(Indicator::from).collect();
        }
    }

    fn chart(
        &mut self,
        section: SectionId,
        spec: &ChartSpec,
        plot: &PlotData,
    ) -> Result<(), RenderFailure> {
        let tab = self.view.tab_mut(section).ok_or_else(|| {
            RenderFailure::Draw(format!("no tab for section {}", section.as_str()))
        })?;
        tab.put_widget(Widget::ready(spec, plot.clone()));
        Ok(())
    }

    fn chart_failed(&mut self, section: SectionId, spec: &ChartSpec, failure: &RenderFailure) {
        if let Some(tab) = self.view.tab_mut(section) {
            tab.put_widget(Widget::failed(spec, failure));
        }
    }

    fn finish(self) -> Result<InteractiveView, RenderError> {
        Ok(self.view)
    }
}

/// Live interactive report over one immutable dataset.
pub struct InteractiveSession {
    dataset: Arc<Dataset>,
    report: Report,
    view: InteractiveView,
}

impl InteractiveSession {
    pub fn new(
        dataset: Arc<Dataset>,
        selectors: SelectorState,
        title: &str,
        preview_rows: usize,
    ) -> Result<Self, RenderError> {
        let report = assemble_report(&dataset, selectors);
        let view = compile(
            &report,
            &dataset,
            InteractiveRenderer::new(title, &dataset, preview_rows),
        )?;
        Ok(Self {
            dataset,
            report,
            view,
        })
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn view(&self) -> &InteractiveView {
        &self.view
    }

    pub fn selectors(&self) -> SelectorState {
        self.report.selectors
    }

    /// Apply a new selector state. Returns the ids of the re-rendered charts.
    pub fn select(&mut self, selectors: SelectorState) -> Vec<String> {
        let previous = self.report.selectors;
        let changed = previous.changed_keys(&selectors);
        let span = info_span!("select", changed = changed.len());
        let _guard = span.enter();

        let mut rerendered = Vec::new();
        for section_id in affected_sections(&previous, &selectors) {
            rebuild_section(&mut self.report, &self.dataset, section_id, selectors);
            let (Some(section), Some(tab)) = (
                self.report.section(section_id),
                self.view.tabs.iter_mut().find(|tab| tab.section == section_id),
            ) else {
                continue;
            };
            tab.indicators = section.metrics.iter().map(Indicator::from).collect();
            tab.controls = section.controls.clone();
            tab.warnings = section.warnings.iter().map(ToString::to_string).collect();
            for spec in &section.charts {
                if changed.iter().any(|key| spec.depends_on(*key)) {
                    tab.put_widget(render_widget(spec, &self.dataset));
                    rerendered.push(spec.id.clone());
                }
            }
        }
        self.report.selectors = selectors;
        self.view.selectors = selectors;
        debug!(charts = ?rerendered, "selection applied");
        rerendered
    }

    /// Re-render one chart on demand.
    pub fn render_chart(&mut self, chart_id: &str) -> Option<&Widget> {
        let section_id = self
            .report
            .sections
            .iter()
            .find(|section| section.chart(chart_id).is_some())?
            .id;
        let spec = self.report.chart(chart_id)?;
        let widget = render_widget(spec, &self.dataset);
        let tab = self.view.tab_mut(section_id)?;
        tab.put_widget(widget);
        tab.widget(chart_id)
    }
}
