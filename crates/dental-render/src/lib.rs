//! Dual-target compiler.
//!
//! One [`Report`](dental_model::Report) compiles either into an interactive
//! view model or into a paginated PDF. Both targets receive the same chart
//! descriptors and the same resolved plot data.

pub mod document;
pub mod error;
pub mod interactive;
mod pdf;
pub mod plot;
pub mod renderer;
pub mod task;

pub use document::{
    ChartFailure, DocumentControl, DocumentRenderer, PageKind, StaticDocument, coverage_report,
    planned_pages, render_document, render_document_with,
};
pub use error::{RenderError, RenderFailure};
pub use interactive::{
    DEFAULT_PREVIEW_ROWS, Indicator, InteractiveRenderer, InteractiveSession, InteractiveView, Tab,
    TablePreview, Widget, WidgetContent, table_preview,
};
pub use plot::{BoxGroup, HistogramSeries, PlotData, ScatterPoint, resolve};
pub use renderer::{Renderer, compile};
pub use task::{DocumentUpdate, ExportHandle, spawn_document_export};
