use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::Field;

/// Fatal input problem. The whole dataset is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("cannot read input: {0}")]
    Unreadable(String),
    #[error("missing required column {column}")]
    MissingColumn { column: String },
    #[error("column {column} appears more than once")]
    DuplicateColumn { column: String },
    #[error("row {row}: missing value for column {column}")]
    MissingValue { row: usize, column: String },
    #[error("row {row}: column {column} is not numeric: {value:?}")]
    NotNumeric {
        row: usize,
        column: String,
        value: String,
    },
    #[error("row {row}: column {column} must be a whole number, got {value:?}")]
    NotInteger {
        row: usize,
        column: String,
        value: String,
    },
    #[error("row {row}: column {column} value {value} is outside {expected}")]
    OutOfRange {
        row: usize,
        column: String,
        value: String,
        expected: String,
    },
}

impl SchemaError {
    /// Name of the offending column, when the error is tied to one.
    pub fn column(&self) -> Option<&str> {
        match self {
            SchemaError::Unreadable(_) => None,
            SchemaError::MissingColumn { column }
            | SchemaError::DuplicateColumn { column }
            | SchemaError::MissingValue { column, .. }
            | SchemaError::NotNumeric { column, .. }
            | SchemaError::NotInteger { column, .. }
            | SchemaError::OutOfRange { column, .. } => Some(column),
        }
    }
}

/// Why a metric has no defined value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum UndefinedReason {
    EmptyDataset,
    InsufficientData,
    ZeroVariance { field: Field },
}

impl std::fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UndefinedReason::EmptyDataset => f.write_str("empty dataset"),
            UndefinedReason::InsufficientData => f.write_str("fewer than two records"),
            UndefinedReason::ZeroVariance { field } => write!(f, "{field} is constant"),
        }
    }
}

/// Pearson correlation that cannot be computed for a field pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("correlation between {a} and {b} is undefined: {reason}")]
pub struct UndefinedCorrelation {
    pub a: Field,
    pub b: Field,
    pub reason: UndefinedReason,
}

/// Non-fatal condition collected while assembling a report.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Warning {
    #[error("dataset is empty; aggregate metrics are undefined")]
    EmptyDataset,
    #[error(transparent)]
    UndefinedCorrelation(#[from] UndefinedCorrelation),
}

impl Warning {
    /// Field pair the warning concerns, smaller field first.
    pub fn field_pair(&self) -> Option<(Field, Field)> {
        match self {
            Warning::EmptyDataset => None,
            Warning::UndefinedCorrelation(pair) => Some((pair.a.min(pair.b), pair.a.max(pair.b))),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
