use std::path::PathBuf;

use dental_render::{ChartFailure, InteractiveView};

/// Result of one `report` run.
#[derive(Debug)]
pub struct ReportOutcome {
    pub data: PathBuf,
    pub output_dir: PathBuf,
    pub records: usize,
    pub view: InteractiveView,
    pub csv: Option<PathBuf>,
    pub pdf: Option<DocumentOutcome>,
}

/// The written PDF document.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub path: PathBuf,
    pub pages: usize,
    pub failures: Vec<ChartFailure>,
}

impl ReportOutcome {
    /// Charts that fell back to a placeholder page.
    pub fn chart_failures(&self) -> &[ChartFailure] {
        self.pdf
            .as_ref()
            .map_or(&[][..], |document| document.failures.as_slice())
    }
}
