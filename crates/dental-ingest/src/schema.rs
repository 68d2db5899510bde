//! Required columns, value domains, and row validation.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use dental_metrics::derive_record;
use dental_model::{Dataset, Field, Result, SchemaError, TreatmentRecord};

use crate::table::RawTable;

/// Allowed domain of one required column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRule {
    pub field: Field,
    pub min: f64,
    pub max: Option<f64>,
    pub integer: bool,
}

impl ColumnRule {
    const fn new(field: Field, min: f64, max: Option<f64>, integer: bool) -> Self {
        Self {
            field,
            min,
            max,
            integer,
        }
    }

    /// Human-readable domain used in error messages.
    pub fn expected(&self) -> String {
        match self.max {
            Some(max) => format!("{}..={}", self.min, max),
            None => format!(">= {}", self.min),
        }
    }

    /// Parse and check one cell. `row` is 1-based.
    pub fn parse(&self, row: usize, raw: &str) -> Result<f64> {
        let column = self.field.column_name().to_string();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SchemaError::MissingValue { row, column });
        }
        let value = match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                return Err(SchemaError::NotNumeric {
                    row,
                    column,
                    value: trimmed.to_string(),
                });
            }
        };
        if self.integer && value.fract() != 0.0 {
            return Err(SchemaError::NotInteger {
                row,
                column,
                value: trimmed.to_string(),
            });
        }
        let above = self.max.is_some_and(|max| value > max);
        if value < self.min || above {
            return Err(SchemaError::OutOfRange {
                row,
                column,
                value: trimmed.to_string(),
                expected: self.expected(),
            });
        }
        Ok(value)
    }
}

/// Maximum tooth count of a permanent dentition.
pub const MAX_TEETH: f64 = 32.0;
/// Ratings are on a 0 to 5 scale.
pub const MAX_RATING: f64 = 5.0;
/// Largest interruption or error count a record can hold.
pub const MAX_COUNT: f64 = u32::MAX as f64;

pub const COLUMN_RULES: [ColumnRule; 7] = [
    ColumnRule::new(Field::NumberOfTeeth, 0.0, Some(MAX_TEETH), true),
    ColumnRule::new(Field::SetupDurationSec, 0.0, None, false),
    ColumnRule::new(Field::TreatmentDurationSec, 0.0, None, false),
    ColumnRule::new(Field::Interruptions, 0.0, Some(MAX_COUNT), true),
    ColumnRule::new(Field::Errors, 0.0, Some(MAX_COUNT), true),
    ColumnRule::new(Field::PatientRating, 0.0, Some(MAX_RATING), false),
    ColumnRule::new(Field::DoctorRating, 0.0, Some(MAX_RATING), false),
];

/// Validate a raw table into a dataset.
///
/// Any invalid row or repeated header rejects the whole table. Derived
/// columns present in the input are discarded and recomputed.
pub fn validate_table(table: &RawTable) -> Result<Dataset> {
    let mut seen = BTreeSet::new();
    if let Some(header) = table.headers.iter().find(|header| !seen.insert(header.as_str())) {
        return Err(SchemaError::DuplicateColumn {
            column: header.clone(),
        });
    }

    let mut positions = Vec::with_capacity(COLUMN_RULES.len());
    for rule in &COLUMN_RULES {
        let name = rule.field.column_name();
        let position = table
            .headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| SchemaError::MissingColumn {
                column: name.to_string(),
            })?;
        positions.push(position);
    }

    let kept: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, header)| !Field::from_column_name(header).is_some_and(Field::is_derived))
        .map(|(index, _)| index)
        .collect();
    if kept.len() != table.headers.len() {
        debug!(
            dropped = table.headers.len() - kept.len(),
            "discarding derived columns present in input"
        );
    }

    let mut records = Vec::with_capacity(table.rows.len());
    for (index, row) in table.rows.iter().enumerate() {
        let row_number = index + 1;
        let mut values = [0.0; 7];
        for ((rule, position), slot) in COLUMN_RULES.iter().zip(&positions).zip(&mut values) {
            let raw = row.get(*position).map(String::as_str).unwrap_or("");
            *slot = rule.parse(row_number, raw)?;
        }
        let source = kept
            .iter()
            .map(|position| row.get(*position).cloned().unwrap_or_default())
            .collect();
        records.push(derive_record(to_record(values, source)));
    }

    let source_columns = kept
        .iter()
        .map(|position| table.headers[*position].clone())
        .collect();
    Ok(Dataset::new(source_columns, records))
}

/// Validate rows given as column-name to value mappings.
///
/// Column order follows the first row. An empty slice yields an empty
/// dataset over the required columns.
pub fn validate_rows(rows: &[BTreeMap<String, String>]) -> Result<Dataset> {
    let headers: Vec<String> = match rows.first() {
        Some(first) => first.keys().cloned().collect(),
        None => Field::REQUIRED
            .iter()
            .map(|field| field.column_name().to_string())
            .collect(),
    };
    let table = RawTable {
        rows: rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|header| row.get(header).cloned().unwrap_or_default())
                    .collect()
            })
            .collect(),
        headers,
    };
    validate_table(&table)
}

fn to_record(values: [f64; 7], source: Vec<String>) -> TreatmentRecord {
    let [teeth, setup, treatment, interruptions, errors, patient, doctor] = values;
    TreatmentRecord {
        number_of_teeth: teeth as u32,
        setup_duration_sec: setup,
        treatment_duration_sec: treatment,
        interruptions: interruptions as u32,
        errors: errors as u32,
        patient_rating: patient,
        doctor_rating: doctor,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(header: &str, rows: &[&str]) -> RawTable {
        RawTable {
            headers: header.split(';').map(str::to_string).collect(),
            rows: rows
                .iter()
                .map(|row| row.split(';').map(str::to_string).collect())
                .collect(),
        }
    }

    const HEADER: &str = "Id;NumberOfTeeth;SetupDuration(sec);TreatmentDuration(sec);Interruptions;Errors;PatientRating;DoctorRating";

    #[test]
    fn rules_follow_required_order() {
        let fields: Vec<Field> = COLUMN_RULES.iter().map(|rule| rule.field).collect();
        assert_eq!(fields, Field::REQUIRED.to_vec());
    }

    #[test]
    fn accepts_whole_number_written_as_float() {
        let data = validate_table(&table(HEADER, &["a;3.0;60;120;1;0;4.5;4"])).expect("valid");
        assert_eq!(data.records()[0].record.number_of_teeth, 3);
        assert_eq!(data.records()[0].total_duration_min, 3.0);
    }

    #[test]
    fn rejects_fractional_count() {
        let err = validate_table(&table(HEADER, &["a;3;60;120;1.5;0;4;4"])).expect_err("invalid");
        assert!(matches!(err, SchemaError::NotInteger { row: 1, .. }));
        assert_eq!(err.column(), Some("Interruptions"));
    }

    #[test]
    fn rejects_count_beyond_record_range() {
        let err = validate_table(&table(HEADER, &["a;3;60;120;5000000000;0;4;4"]))
            .expect_err("invalid");
        assert!(matches!(err, SchemaError::OutOfRange { row: 1, .. }));
        assert_eq!(err.column(), Some("Interruptions"));

        let data = validate_table(&table(HEADER, &["a;3;60;120;0;4294967295;4;4"])).expect("valid");
        assert_eq!(data.records()[0].record.errors, u32::MAX);
    }

    #[test]
    fn rejects_infinite_duration() {
        let err = validate_table(&table(HEADER, &["a;3;inf;120;1;0;4;4"])).expect_err("invalid");
        assert!(matches!(err, SchemaError::NotNumeric { .. }));
    }

    #[test]
    fn drops_derived_input_columns() {
        let header = format!("{HEADER};TotalDuration(min)");
        let data = validate_table(&table(&header, &["a;3;60;120;1;0;4;4;999"])).expect("valid");
        assert_eq!(data.source_columns().len(), 8);
        assert_eq!(data.records()[0].record.source.len(), 8);
        assert_eq!(data.records()[0].total_duration_min, 3.0);
    }

    #[test]
    fn empty_row_list_is_valid() {
        let data = validate_rows(&[]).expect("valid");
        assert!(data.is_empty());
    }
}
