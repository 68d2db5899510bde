//! Static document target: a paginated PDF.
//!
//! Page plan: a title page carrying the KPI values, then for each section in
//! order one page per non-empty metric group and one page per chart. A chart
//! that cannot be drawn becomes a placeholder page and is recorded.

use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use printpdf::{
    Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use dental_model::{
    ChartSpec, Coverage, Dataset, MetricSummary, Report, ReportOptions, ReportSection, SectionId,
    SelectorState,
};
use dental_report::{rebuild_section, section_bindings};

use crate::error::{RenderError, RenderFailure};
use crate::pdf::{Canvas, Fonts, Frame, prepare};
use crate::plot::PlotData;
use crate::renderer::{Renderer, compile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "page")]
pub enum PageKind {
    Title,
    Metrics {
        section: SectionId,
    },
    Chart {
        section: SectionId,
        chart_id: String,
    },
    Placeholder {
        section: SectionId,
        chart_id: String,
        reason: String,
    },
}

/// A chart replaced by a placeholder page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartFailure {
    pub section: SectionId,
    pub chart_id: String,
    pub failure: RenderFailure,
}

#[derive(Debug, Clone)]
pub struct StaticDocument {
    pub bytes: Vec<u8>,
    pub pages: Vec<PageKind>,
    pub failures: Vec<ChartFailure>,
    /// KPI label and value pairs exactly as printed on the title page.
    pub title_kpis: Vec<(String, String)>,
}

impl StaticDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn write_to(&self, path: &Path) -> Result<(), RenderError> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Pages the document will have for `report`.
pub fn planned_pages(report: &Report) -> usize {
    1 + report.metric_groups().count() + report.charts().count()
}

/// The report as the document covers it.
///
/// `AllVariants` replaces each selector-bound chart with every distinct
/// variant of it, the active one first.
pub fn coverage_report(report: &Report, dataset: &Dataset, coverage: Coverage) -> Report {
    match coverage {
        Coverage::ActiveSelection => report.clone(),
        Coverage::AllVariants => all_variants_report(report, dataset),
    }
}

fn all_variants_report(report: &Report, dataset: &Dataset) -> Report {
    let mut variants = vec![report.selectors];
    variants.extend(
        SelectorState::all_variants()
            .into_iter()
            .filter(|variant| *variant != report.selectors),
    );
    let mut expanded = report.clone();
    let mut scratch = report.clone();
    for section in &mut expanded.sections {
        if section_bindings(section.id).is_empty() {
            continue;
        }
        let mut bound: Vec<ChartSpec> = Vec::new();
        for variant in &variants {
            rebuild_section(&mut scratch, dataset, section.id, *variant);
            let Some(rebuilt) = scratch.section(section.id) else {
                continue;
            };
            for spec in rebuilt.charts.iter().filter(|spec| spec.is_selector_bound()) {
                if !bound.contains(spec) {
                    bound.push(spec.clone());
                }
            }
        }
        let mut charts = Vec::with_capacity(section.charts.len() + bound.len());
        for spec in &section.charts {
            if spec.is_selector_bound() {
                charts.extend(bound.iter().filter(|variant| variant.id == spec.id).cloned());
            } else {
                charts.push(spec.clone());
            }
        }
        section.charts = charts;
    }
    expanded
}

type ProgressFn = Box<dyn FnMut(usize, usize) + Send>;

/// Cancellation and progress reporting for a document build.
#[derive(Default)]
pub struct DocumentControl {
    cancel_flag: Option<Arc<AtomicBool>>,
    progress: Option<ProgressFn>,
}

impl DocumentControl {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    /// Called with `(pages_done, pages_total)` after every page.
    #[must_use]
    pub fn with_progress(mut self, progress: impl FnMut(usize, usize) + Send + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

/// Builds a [`StaticDocument`] page by page.
pub struct DocumentRenderer {
    doc: PdfDocumentReference,
    fonts: Fonts,
    first_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    width: f32,
    height: f32,
    title: String,
    generated_at: Option<String>,
    coverage: Coverage,
    section_title: String,
    total: usize,
    pages: Vec<PageKind>,
    failures: Vec<ChartFailure>,
    control: DocumentControl,
    title_kpis: Vec<(String, String)>,
}

impl DocumentRenderer {
    pub fn new(
        options: &ReportOptions,
        total_pages: usize,
        control: DocumentControl,
    ) -> Result<Self, RenderError> {
        let (width, height) = options.page_size.dimensions_mm();
        let (doc, page, layer) =
            PdfDocument::new(&options.title, Mm(width), Mm(height), "Layer 1");
        let fonts = Fonts::load(&doc)?;
        Ok(Self {
            doc,
            fonts,
            first_page: Some((page, layer)),
            width,
            height,
            title: options.title.clone(),
            generated_at: options.generated_at.clone(),
            coverage: options.coverage,
            section_title: String::new(),
            total: total_pages,
            pages: Vec::new(),
            failures: Vec::new(),
            control,
            title_kpis: Vec::new(),
        })
    }

    fn new_page(&mut self) -> PdfLayerReference {
        let (page, layer) = match self.first_page.take() {
            Some(first) => first,
            None => self.doc.add_page(Mm(self.width), Mm(self.height), "Layer 1"),
        };
        self.doc.get_page(page).get_layer(layer)
    }

    fn commit(&mut self, kind: PageKind) {
        debug!(page = self.pages.len() + 1, ?kind, "page added");
        self.pages.push(kind);
        let done = self.pages.len();
        let total = self.total.max(done);
        if let Some(progress) = self.control.progress.as_mut() {
            progress(done, total);
        }
    }

    fn decorate(&self, canvas: &Canvas) {
        canvas.bold(&self.section_title, 10.0, 15.0, self.height - 12.0);
        canvas.text(&self.title, 7.0, 15.0, 8.0);
        canvas.text(
            &format!("Page {}", self.pages.len() + 1),
            7.0,
            self.width - 30.0,
            8.0,
        );
    }

    fn metric_rows(&self, canvas: &Canvas, rows: &[(String, String)], mut y: f32) -> f32 {
        for (label, value) in rows {
            canvas.text(label, 11.0, 25.0, y);
            canvas.bold(value, 11.0, 130.0, y);
            y -= 8.0;
        }
        y
    }

    fn warning_rows(&self, canvas: &Canvas, warnings: &[String], mut y: f32) {
        if warnings.is_empty() {
            return;
        }
        canvas.bold("Warnings", 10.0, 25.0, y);
        y -= 6.0;
        for warning in warnings.iter().take(12) {
            canvas.text(warning, 8.0, 28.0, y);
            y -= 5.0;
        }
        if warnings.len() > 12 {
            canvas.text(&format!("... and {} more", warnings.len() - 12), 8.0, 28.0, y);
        }
    }

    fn chart_heading(&self, canvas: &Canvas, spec: &ChartSpec) {
        self.decorate(canvas);
        canvas.bold(&spec.title, 14.0, 15.0, self.height - 22.0);
    }
}

fn metric_lines(metrics: &[MetricSummary]) -> Vec<(String, String)> {
    metrics
        .iter()
        .map(|metric| (metric.label.clone(), metric.display_value()))
        .collect()
}

fn selection_line(selectors: SelectorState, coverage: Coverage) -> String {
    let active = format!(
        "duration problem {}, satisfaction problem {}, rating {}",
        selectors.duration_problem.label(),
        selectors.satisfaction_problem.label(),
        selectors.rating.label()
    );
    match coverage {
        Coverage::ActiveSelection => format!("Selection: {active}"),
        Coverage::AllVariants => format!("All selector variants (active: {active})"),
    }
}

impl Renderer for DocumentRenderer {
    type Output = StaticDocument;

    fn title(&mut self, report: &Report, kpis: &[MetricSummary]) {
        let layer = self.new_page();
        let canvas = Canvas::new(layer, self.fonts.clone());
        let mut y = self.height - 35.0;
        canvas.bold(&self.title, 24.0, 20.0, y);
        y -= 10.0;
        if let Some(stamp) = &self.generated_at {
            canvas.text(&format!("Generated {stamp}"), 10.0, 20.0, y);
            y -= 7.0;
        }
        canvas.text(&selection_line(report.selectors, self.coverage), 9.0, 20.0, y);
        y -= 14.0;
        canvas.bold(SectionId::Kpis.title(), 13.0, 20.0, y);
        y -= 10.0;
        let rows = metric_lines(kpis);
        y = self.metric_rows(&canvas, &rows, y);
        self.title_kpis = rows;
        let warnings: Vec<String> = report
            .section(SectionId::Kpis)
            .map(|section| section.warnings.iter().map(ToString::to_string).collect())
            .unwrap_or_default();
        self.warning_rows(&canvas, &warnings, y - 6.0);
        self.commit(PageKind::Title);
    }

    fn section(&mut self, section: &ReportSection) {
        self.section_title = section.title.clone();
    }

    fn metric_group(&mut self, section: &ReportSection) {
        let layer = self.new_page();
        let canvas = Canvas::new(layer, self.fonts.clone());
        self.decorate(&canvas);
        let y = self.metric_rows(&canvas, &metric_lines(&section.metrics), self.height - 30.0);
        let warnings: Vec<String> = section.warnings.iter().map(ToString::to_string).collect();
        self.warning_rows(&canvas, &warnings, y - 6.0);
        self.commit(PageKind::Metrics {
            section: section.id,
        });
    }

    fn chart(
        &mut self,
        section: SectionId,
        spec: &ChartSpec,
        plot: &PlotData,
    ) -> Result<(), RenderFailure> {
        let prepared = prepare(spec, plot)?;
        let layer = self.new_page();
        let canvas = Canvas::new(layer, self.fonts.clone());
        self.chart_heading(&canvas, spec);
        let frame = Frame {
            left: 32.0,
            bottom: 32.0,
            width: self.width - 64.0,
            height: self.height - 72.0,
        };
        prepared.draw(&canvas, frame);
        self.commit(PageKind::Chart {
            section,
            chart_id: spec.id.clone(),
        });
        Ok(())
    }

    fn chart_failed(&mut self, section: SectionId, spec: &ChartSpec, failure: &RenderFailure) {
        let layer = self.new_page();
        let canvas = Canvas::new(layer, self.fonts.clone());
        self.chart_heading(&canvas, spec);
        canvas.text(
            &format!("This chart could not be drawn: {failure}"),
            12.0,
            25.0,
            self.height / 2.0,
        );
        self.failures.push(ChartFailure {
            section,
            chart_id: spec.id.clone(),
            failure: failure.clone(),
        });
        self.commit(PageKind::Placeholder {
            section,
            chart_id: spec.id.clone(),
            reason: failure.to_string(),
        });
    }

    fn checkpoint(&mut self) -> Result<(), RenderError> {
        if self.control.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        Ok(())
    }

    fn finish(self) -> Result<StaticDocument, RenderError> {
        let mut buffer = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buffer)
            .map_err(|error| RenderError::Pdf(format!("save: {error}")))?;
        let bytes = buffer
            .into_inner()
            .map_err(|error| RenderError::Pdf(format!("buffer: {error}")))?;
        Ok(StaticDocument {
            bytes,
            pages: self.pages,
            failures: self.failures,
            title_kpis: self.title_kpis,
        })
    }
}

/// Render the document for `report` under the given options.
pub fn render_document(
    report: &Report,
    dataset: &Dataset,
    options: &ReportOptions,
) -> Result<StaticDocument, RenderError> {
    render_document_with(report, dataset, options, DocumentControl::new())
}

/// [`render_document`] with cancellation and progress reporting.
pub fn render_document_with(
    report: &Report,
    dataset: &Dataset,
    options: &ReportOptions,
    control: DocumentControl,
) -> Result<StaticDocument, RenderError> {
    let span = info_span!("compile", coverage = ?options.coverage);
    let _guard = span.enter();
    let covered = coverage_report(report, dataset, options.coverage);
    let total = planned_pages(&covered);
    let document = compile(&covered, dataset, DocumentRenderer::new(options, total, control)?)?;
    info!(
        pages = document.page_count(),
        failures = document.failures.len(),
        bytes = document.bytes.len(),
        "document rendered"
    );
    Ok(document)
}
