use tracing::{debug, warn};

use dental_model::{ChartSpec, Dataset, MetricSummary, Report, ReportSection, SectionId};

use crate::error::{RenderError, RenderFailure};
use crate::plot::{PlotData, resolve};

/// A render target. [`compile`] drives the hooks in report order.
pub trait Renderer {
    type Output;

    /// Report title with the KPI values.
    fn title(&mut self, report: &Report, kpis: &[MetricSummary]);

    /// Start of a section.
    fn section(&mut self, section: &ReportSection);

    /// Metric group of a non-KPI section with at least one metric.
    fn metric_group(&mut self, section: &ReportSection);

    /// Draw a resolved chart. An error turns into [`Renderer::chart_failed`].
    fn chart(
        &mut self,
        section: SectionId,
        spec: &ChartSpec,
        plot: &PlotData,
    ) -> Result<(), RenderFailure>;

    fn chart_failed(&mut self, section: SectionId, spec: &ChartSpec, failure: &RenderFailure);

    /// Called before each chart. Returning an error stops compilation.
    fn checkpoint(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, RenderError>;
}

/// Walk the report in section order and hand every chart, resolved once, to
/// the renderer.
pub fn compile<R: Renderer>(
    report: &Report,
    dataset: &Dataset,
    mut renderer: R,
) -> Result<R::Output, RenderError> {
    let kpis = report
        .section(SectionId::Kpis)
        .map(|section| section.metrics.clone())
        .unwrap_or_else(|| report.kpis.summaries());
    renderer.title(report, &kpis);

    for section in &report.sections {
        renderer.section(section);
        if section.id != SectionId::Kpis && !section.metrics.is_empty() {
            renderer.metric_group(section);
        }
        for spec in &section.charts {
            renderer.checkpoint()?;
            let outcome = resolve(spec, dataset)
                .and_then(|plot| renderer.chart(section.id, spec, &plot));
            match outcome {
                Ok(()) => debug!(chart = %spec.id, "chart rendered"),
                Err(failure) => {
                    warn!(chart = %spec.id, %failure, "chart could not be rendered");
                    renderer.chart_failed(section.id, spec, &failure);
                }
            }
        }
    }
    renderer.finish()
}
