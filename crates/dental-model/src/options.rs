//! Configuration options for report generation.

use serde::{Deserialize, Serialize};

use crate::selector::SelectorState;

/// Field delimiter of the source table.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Which charts the static document contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    /// Exactly the charts of one interactive pass at the current selectors.
    #[default]
    ActiveSelection,
    /// Every selector-bound chart in every variant.
    AllVariants,
}

/// Page size of the static document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    #[default]
    A4Landscape,
    A4Portrait,
    LetterLandscape,
}

impl PageSize {
    /// Width and height in millimetres.
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PageSize::A4Landscape => (297.0, 210.0),
            PageSize::A4Portrait => (210.0, 297.0),
            PageSize::LetterLandscape => (279.4, 215.9),
        }
    }
}

/// Options controlling a report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Delimiter for both reading and the raw data export.
    pub delimiter: u8,
    pub coverage: Coverage,
    pub selectors: SelectorState,
    pub page_size: PageSize,
    /// Title printed on the document title page.
    pub title: String,
    /// Free-form generation stamp printed under the title.
    pub generated_at: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            coverage: Coverage::default(),
            selectors: SelectorState::default(),
            page_size: PageSize::default(),
            title: "Dental Treatment Report".to_string(),
            generated_at: None,
        }
    }
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_coverage(mut self, coverage: Coverage) -> Self {
        self.coverage = coverage;
        self
    }

    #[must_use]
    pub fn with_selectors(mut self, selectors: SelectorState) -> Self {
        self.selectors = selectors;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_generated_at(mut self, stamp: impl Into<String>) -> Self {
        self.generated_at = Some(stamp.into());
        self
    }
}
