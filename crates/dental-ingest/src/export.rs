//! Raw data export: source cells verbatim plus the derived duration columns.

use std::io::Write;

use csv::WriterBuilder;

use dental_model::{Dataset, Field};

/// Shortest decimal text for `value`, without a trailing `.0`.
pub fn format_numeric(value: f64) -> String {
    let text = format!("{value}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Write the dataset as delimited text.
///
/// Source columns keep their original order and cell text. The derived
/// minute columns are appended, so re-ingesting the output yields the same
/// records.
pub fn write_delimited<W: Write>(
    dataset: &Dataset,
    writer: W,
    delimiter: u8,
) -> std::io::Result<()> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
    let mut header: Vec<&str> = dataset.source_columns().iter().map(String::as_str).collect();
    header.extend(Field::DERIVED.iter().map(|field| field.column_name()));
    writer.write_record(&header)?;

    for record in dataset.records() {
        let mut row: Vec<String> = record.record.source.clone();
        row.resize(dataset.source_columns().len(), String::new());
        row.extend(Field::DERIVED.iter().map(|field| format_numeric(record.value(*field))));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_keeps_whole_numbers_intact() {
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(2.5), "2.5");
        assert_eq!(format_numeric(0.0), "0");
    }
}
