use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::{
    Contribution, Gender, Mobility, OutcomeDimension, PatientProfile,
};

/// Declarative condition over a [`PatientProfile`].
///
/// Predicates are plain data so rule tables can be published as JSON and
/// compared between versions; evaluation never has side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    Always,
    /// Strictly older than `years`.
    AgeAbove { years: u8 },
    AgeAtMost { years: u8 },
    /// Inclusive on both ends.
    AgeBetween { min: u8, max: u8 },
    GenderIs { gender: Gender },
    MobilityIs { level: Mobility },
    /// At least as impaired as `level`.
    MobilityAtLeast { level: Mobility },
    MobilityAtMost { level: Mobility },
    Not { predicate: Box<Predicate> },
    All { predicates: Vec<Predicate> },
    Any { predicates: Vec<Predicate> },
}

impl Predicate {
    pub fn matches(&self, profile: &PatientProfile) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::AgeAbove { years } => profile.age() > *years,
            Predicate::AgeAtMost { years } => profile.age() <= *years,
            Predicate::AgeBetween { min, max } => (*min..=*max).contains(&profile.age()),
            Predicate::GenderIs { gender } => profile.gender() == *gender,
            Predicate::MobilityIs { level } => profile.pre_injury_mobility() == *level,
            Predicate::MobilityAtLeast { level } => profile.pre_injury_mobility() >= *level,
            Predicate::MobilityAtMost { level } => profile.pre_injury_mobility() <= *level,
            Predicate::Not { predicate } => !predicate.matches(profile),
            Predicate::All { predicates } => predicates.iter().all(|p| p.matches(profile)),
            Predicate::Any { predicates } => predicates.iter().any(|p| p.matches(profile)),
        }
    }

    pub fn not(predicate: Predicate) -> Self {
        Predicate::Not {
            predicate: Box::new(predicate),
        }
    }

    /// Describe the first structural defect, if any.
    pub(crate) fn defect(&self) -> Option<String> {
        match self {
            Predicate::AgeBetween { min, max } if min > max => {
                Some(format!("age_between has min {min} above max {max}"))
            }
            Predicate::Not { predicate } => predicate.defect(),
            Predicate::All { predicates } | Predicate::Any { predicates } => {
                if predicates.is_empty() {
                    Some("all/any predicate lists must not be empty".to_string())
                } else {
                    predicates.iter().find_map(Predicate::defect)
                }
            }
            _ => None,
        }
    }
}

/// Predicate-to-contribution mapping declared once in a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub id: String,
    pub priority: i32,
    #[serde(rename = "when")]
    pub predicate: Predicate,
    pub contributions: BTreeMap<OutcomeDimension, Contribution>,
}

impl ScoringRule {
    pub fn new(id: impl Into<String>, priority: i32, predicate: Predicate) -> Self {
        Self {
            id: id.into(),
            priority,
            predicate,
            contributions: BTreeMap::new(),
        }
    }

    pub fn contributes(mut self, dimension: OutcomeDimension, contribution: Contribution) -> Self {
        self.contributions.insert(dimension, contribution);
        self
    }

    pub fn writes(&self, dimension: OutcomeDimension) -> bool {
        self.contributions.contains_key(&dimension)
    }

    pub fn applies_to(&self, profile: &PatientProfile) -> bool {
        self.predicate.matches(profile)
    }
}
