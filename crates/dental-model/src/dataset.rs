use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::record::DerivedRecord;

/// Ordered, immutable snapshot of validated treatment records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    source_columns: Vec<String>,
    records: Vec<DerivedRecord>,
}

impl Dataset {
    pub fn new(source_columns: Vec<String>, records: Vec<DerivedRecord>) -> Self {
        Self {
            source_columns,
            records,
        }
    }

    /// Source column names in file order, derived columns excluded.
    pub fn source_columns(&self) -> &[String] {
        &self.source_columns
    }

    pub fn records(&self) -> &[DerivedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of one field in record order.
    pub fn column(&self, field: Field) -> Vec<f64> {
        self.records.iter().map(|record| record.value(field)).collect()
    }

    /// Column count as shown to users: source columns plus derived columns.
    pub fn column_count(&self) -> usize {
        self.source_columns.len() + Field::DERIVED.len()
    }
}
