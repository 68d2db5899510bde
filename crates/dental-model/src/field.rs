//! Numeric columns that metrics and charts can reference.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A numeric column of the treatment table, either read from the source file
/// or derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    NumberOfTeeth,
    SetupDurationSec,
    TreatmentDurationSec,
    Interruptions,
    Errors,
    PatientRating,
    DoctorRating,
    SetupDurationMin,
    TreatmentDurationMin,
    TotalDurationMin,
}

impl Field {
    /// Numeric columns every input file must carry.
    pub const REQUIRED: [Field; 7] = [
        Field::NumberOfTeeth,
        Field::SetupDurationSec,
        Field::TreatmentDurationSec,
        Field::Interruptions,
        Field::Errors,
        Field::PatientRating,
        Field::DoctorRating,
    ];

    /// Columns computed from the source record, in export order.
    pub const DERIVED: [Field; 3] = [
        Field::SetupDurationMin,
        Field::TreatmentDurationMin,
        Field::TotalDurationMin,
    ];

    /// Fields shown in the correlation heatmap.
    pub const CORRELATED: [Field; 7] = [
        Field::NumberOfTeeth,
        Field::SetupDurationMin,
        Field::TreatmentDurationMin,
        Field::Interruptions,
        Field::Errors,
        Field::PatientRating,
        Field::DoctorRating,
    ];

    /// Column name as it appears in the delimited file.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::NumberOfTeeth => "NumberOfTeeth",
            Field::SetupDurationSec => "SetupDuration(sec)",
            Field::TreatmentDurationSec => "TreatmentDuration(sec)",
            Field::Interruptions => "Interruptions",
            Field::Errors => "Errors",
            Field::PatientRating => "PatientRating",
            Field::DoctorRating => "DoctorRating",
            Field::SetupDurationMin => "SetupDuration(min)",
            Field::TreatmentDurationMin => "TreatmentDuration(min)",
            Field::TotalDurationMin => "TotalDuration(min)",
        }
    }

    /// Human-readable axis label.
    pub fn label(self) -> &'static str {
        match self {
            Field::NumberOfTeeth => "Teeth",
            Field::SetupDurationSec => "Setup (s)",
            Field::TreatmentDurationSec => "Treatment (s)",
            Field::Interruptions => "Interruptions",
            Field::Errors => "Errors",
            Field::PatientRating => "Patient rating",
            Field::DoctorRating => "Doctor rating",
            Field::SetupDurationMin => "Setup (min)",
            Field::TreatmentDurationMin => "Treatment (min)",
            Field::TotalDurationMin => "Duration (min)",
        }
    }

    /// Look up a field by its exact column name.
    pub fn from_column_name(name: &str) -> Option<Field> {
        Self::REQUIRED
            .iter()
            .chain(Self::DERIVED.iter())
            .copied()
            .find(|field| field.column_name() == name)
    }

    /// True for columns that hold whole-number counts.
    pub fn is_count(self) -> bool {
        matches!(
            self,
            Field::NumberOfTeeth | Field::Interruptions | Field::Errors
        )
    }

    pub fn is_derived(self) -> bool {
        Self::DERIVED.contains(&self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_round_trip() {
        for field in Field::REQUIRED.iter().chain(Field::DERIVED.iter()) {
            assert_eq!(Field::from_column_name(field.column_name()), Some(*field));
        }
        assert_eq!(Field::from_column_name("PatientId"), None);
    }

    #[test]
    fn derived_fields_are_flagged() {
        assert!(Field::TotalDurationMin.is_derived());
        assert!(!Field::SetupDurationSec.is_derived());
        assert!(Field::Errors.is_count());
        assert!(!Field::PatientRating.is_count());
    }
}
