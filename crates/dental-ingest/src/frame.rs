//! Columnar view of a dataset for tabular display and export.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};

use dental_model::{Dataset, Field};

/// Build a data frame with every source column and the derived columns.
///
/// Required fields become numeric columns. Other source columns stay text.
pub fn dataset_frame(dataset: &Dataset) -> PolarsResult<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(dataset.column_count());
    for (index, name) in dataset.source_columns().iter().enumerate() {
        let column = match Field::from_column_name(name) {
            Some(field) => Series::new(name.as_str().into(), dataset.column(field)),
            None => {
                let values: Vec<String> = dataset
                    .records()
                    .iter()
                    .map(|record| record.record.source.get(index).cloned().unwrap_or_default())
                    .collect();
                Series::new(name.as_str().into(), values)
            }
        };
        columns.push(column.into_column());
    }
    for field in Field::DERIVED {
        columns.push(Series::new(field.column_name().into(), dataset.column(field)).into_column());
    }
    DataFrame::new(columns)
}

/// First `limit` rows of the frame.
pub fn preview(frame: &DataFrame, limit: usize) -> DataFrame {
    frame.head(Some(limit))
}
