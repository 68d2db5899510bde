//! Derived metrics engine.
//!
//! Row-level derivation, headline KPIs, Pearson correlations, and the
//! distribution and trend statistics that turn chart descriptors into
//! plot-ready data. Everything here is a pure function of the dataset.

pub mod correlation;
pub mod derive;
pub mod distribution;
pub mod kpi;
pub mod stats;
pub mod trend;

pub use correlation::{CorrelationMatrix, correlation, correlation_matrix};
pub use derive::{SECONDS_PER_MINUTE, derive_record};
pub use distribution::{Bin, BoxStats, box_stats, grouped_box_stats, histogram};
pub use kpi::compute_kpis;
pub use stats::{Describe, describe, mean, quantile_sorted};
pub use trend::{LOWESS_FRACTION, LinearFit, linear_fit, lowess};
