//! Record schema and validator.
//!
//! Reads a delimited treatment table, checks every required column against
//! its domain, and produces the immutable [`Dataset`] the rest of the
//! pipeline works on. Any invalid row rejects the whole input.

use std::path::Path;
use std::time::Instant;

use tracing::{info, info_span};

use dental_model::{Dataset, Result};

pub mod export;
pub mod frame;
pub mod schema;
pub mod table;

pub use export::{format_numeric, write_delimited};
pub use frame::{dataset_frame, preview};
pub use schema::{
    COLUMN_RULES, ColumnRule, MAX_COUNT, MAX_RATING, MAX_TEETH, validate_rows, validate_table,
};
pub use table::{RawTable, read_delimited, read_delimited_from};

/// Read and validate a delimited file.
pub fn load_dataset(path: &Path, delimiter: u8) -> Result<Dataset> {
    let span = info_span!("load", path = %path.display());
    let _guard = span.enter();
    let started = Instant::now();
    let table = read_delimited(path, delimiter)?;
    let dataset = validate_table(&table)?;
    info!(
        records = dataset.len(),
        columns = dataset.column_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "dataset loaded"
    );
    Ok(dataset)
}
