use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single chart could not be rendered. Never aborts the report.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "failure", content = "detail")]
pub enum RenderFailure {
    #[error("no data to plot")]
    NoData,
    #[error("cannot draw chart: {0}")]
    Draw(String),
}

/// Fatal error of a whole render target.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
    #[error("document export cancelled")]
    Cancelled,
    #[error("failed to serialize view: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
