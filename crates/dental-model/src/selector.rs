//! Externally owned choices that pick which chart variant a section shows.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::Field;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    #[default]
    Interruptions,
    Errors,
}

impl ProblemType {
    pub const ALL: [ProblemType; 2] = [ProblemType::Interruptions, ProblemType::Errors];

    pub fn field(self) -> Field {
        match self {
            ProblemType::Interruptions => Field::Interruptions,
            ProblemType::Errors => Field::Errors,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProblemType::Interruptions => "Interruptions",
            ProblemType::Errors => "Errors",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingType {
    #[default]
    Patient,
    Doctor,
}

impl RatingType {
    pub const ALL: [RatingType; 2] = [RatingType::Patient, RatingType::Doctor];

    pub fn field(self) -> Field {
        match self {
            RatingType::Patient => Field::PatientRating,
            RatingType::Doctor => Field::DoctorRating,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingType::Patient => "Patient",
            RatingType::Doctor => "Doctor",
        }
    }
}

/// Identifies one selector control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKey {
    /// Problem type plotted against total duration.
    DurationProblem,
    /// Problem type plotted against satisfaction.
    SatisfactionProblem,
    /// Rating plotted against the satisfaction problem type.
    Rating,
}

impl SelectorKey {
    pub const ALL: [SelectorKey; 3] = [
        SelectorKey::DurationProblem,
        SelectorKey::SatisfactionProblem,
        SelectorKey::Rating,
    ];
}

impl fmt::Display for SelectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectorKey::DurationProblem => "duration problem",
            SelectorKey::SatisfactionProblem => "satisfaction problem",
            SelectorKey::Rating => "rating",
        })
    }
}

/// Current value of every selector. Owned by the caller, passed in on each
/// rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectorState {
    pub duration_problem: ProblemType,
    pub satisfaction_problem: ProblemType,
    pub rating: RatingType,
}

impl SelectorState {
    #[must_use]
    pub fn with_duration_problem(mut self, problem: ProblemType) -> Self {
        self.duration_problem = problem;
        self
    }

    #[must_use]
    pub fn with_satisfaction_problem(mut self, problem: ProblemType) -> Self {
        self.satisfaction_problem = problem;
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: RatingType) -> Self {
        self.rating = rating;
        self
    }

    /// Selectors whose value differs between `self` and `other`.
    pub fn changed_keys(&self, other: &SelectorState) -> Vec<SelectorKey> {
        let mut keys = Vec::new();
        if self.duration_problem != other.duration_problem {
            keys.push(SelectorKey::DurationProblem);
        }
        if self.satisfaction_problem != other.satisfaction_problem {
            keys.push(SelectorKey::SatisfactionProblem);
        }
        if self.rating != other.rating {
            keys.push(SelectorKey::Rating);
        }
        keys
    }

    /// Every combination of selector values, default state first.
    pub fn all_variants() -> Vec<SelectorState> {
        let mut variants = Vec::new();
        for duration_problem in ProblemType::ALL {
            for satisfaction_problem in ProblemType::ALL {
                for rating in RatingType::ALL {
                    variants.push(SelectorState {
                        duration_problem,
                        satisfaction_problem,
                        rating,
                    });
                }
            }
        }
        variants
    }

    /// Display value of one selector.
    pub fn value_label(&self, key: SelectorKey) -> &'static str {
        match key {
            SelectorKey::DurationProblem => self.duration_problem.label(),
            SelectorKey::SatisfactionProblem => self.satisfaction_problem.label(),
            SelectorKey::Rating => self.rating.label(),
        }
    }
}

/// A selector as exposed by a report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorControl {
    pub key: SelectorKey,
    pub label: String,
    pub choices: Vec<String>,
    pub selected: String,
}
