//! Versioned, immutable scoring rule tables.
//!
//! A [`RuleRegistry`] is validated once at construction and never edited
//! afterwards. New clinical thresholds ship as a new registry version which is
//! either registered in a [`RegistryCatalog`] or swapped wholesale into a
//! [`SharedRegistry`].

mod rule;
mod seed;
mod shared;

pub use rule::{Predicate, ScoringRule};
pub use shared::{RegistryCatalog, SharedRegistry};

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Contribution, OutcomeDimension, RulesetVersion};

/// Errors raised while assembling a registry. Any of these is fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum RegistryLoadError {
    #[error("ruleset version must not be empty")]
    EmptyVersion,
    #[error("ruleset version {0} is already registered")]
    DuplicateVersion(RulesetVersion),
    #[error("rule id `{0}` is declared more than once")]
    DuplicateRuleId(String),
    #[error("rule `{rule_id}` is malformed: {reason}")]
    MalformedRule { rule_id: String, reason: String },
    #[error(
        "rules `{first}` and `{second}` both write {dimension} with priority {priority}"
    )]
    PriorityConflict {
        dimension: OutcomeDimension,
        priority: i32,
        first: String,
        second: String,
    },
    #[error("unable to parse ruleset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unable to read ruleset: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialized form of a ruleset file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesetDocument {
    pub version: RulesetVersion,
    pub published_on: NaiveDate,
    pub rules: Vec<ScoringRule>,
}

/// Ordered, validated set of scoring rules for one ruleset version.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleRegistry {
    version: RulesetVersion,
    published_on: NaiveDate,
    rules: Vec<ScoringRule>,
}

impl RuleRegistry {
    pub fn new(
        version: RulesetVersion,
        published_on: NaiveDate,
        rules: Vec<ScoringRule>,
    ) -> Result<Self, RegistryLoadError> {
        if version.as_str().trim().is_empty() {
            return Err(RegistryLoadError::EmptyVersion);
        }

        check_table(&rules)?;

        Ok(Self {
            version,
            published_on,
            rules: sorted(rules),
        })
    }

    /// Built-in table matching the original dashboard estimator.
    pub fn seed() -> Self {
        Self {
            version: RulesetVersion::new(seed::SEED_VERSION),
            published_on: seed::seed_published_on(),
            rules: sorted(seed::seed_rules()),
        }
    }

    pub fn from_document(document: RulesetDocument) -> Result<Self, RegistryLoadError> {
        Self::new(document.version, document.published_on, document.rules)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RegistryLoadError> {
        let document: RulesetDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryLoadError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn to_document(&self) -> RulesetDocument {
        RulesetDocument {
            version: self.version.clone(),
            published_on: self.published_on,
            rules: self.rules.clone(),
        }
    }

    pub fn version(&self) -> &RulesetVersion {
        &self.version
    }

    pub fn published_on(&self) -> NaiveDate {
        self.published_on
    }

    /// Rules ordered by descending priority, then id.
    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    pub fn rules_for_dimension(
        &self,
        dimension: OutcomeDimension,
    ) -> impl Iterator<Item = &ScoringRule> + '_ {
        self.rules.iter().filter(move |rule| rule.writes(dimension))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn sorted(mut rules: Vec<ScoringRule>) -> Vec<ScoringRule> {
    rules.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));
    rules
}

fn check_table(rules: &[ScoringRule]) -> Result<(), RegistryLoadError> {
    let mut seen_ids = HashSet::new();
    let mut priorities: BTreeMap<(OutcomeDimension, i32), &str> = BTreeMap::new();

    for rule in rules {
        check_rule(rule)?;

        if !seen_ids.insert(rule.id.as_str()) {
            return Err(RegistryLoadError::DuplicateRuleId(rule.id.clone()));
        }

        for dimension in rule.contributions.keys() {
            if let Some(first) = priorities.insert((*dimension, rule.priority), &rule.id) {
                return Err(RegistryLoadError::PriorityConflict {
                    dimension: *dimension,
                    priority: rule.priority,
                    first: first.to_string(),
                    second: rule.id.clone(),
                });
            }
        }
    }

    Ok(())
}

fn check_rule(rule: &ScoringRule) -> Result<(), RegistryLoadError> {
    let malformed = |reason: String| RegistryLoadError::MalformedRule {
        rule_id: rule.id.clone(),
        reason,
    };

    if rule.id.trim().is_empty() {
        return Err(malformed("rule id must not be empty".to_string()));
    }

    if rule.contributions.is_empty() {
        return Err(malformed("rule contributes to no dimension".to_string()));
    }

    if let Some(defect) = rule.predicate.defect() {
        return Err(malformed(defect));
    }

    for (dimension, contribution) in &rule.contributions {
        let expected = dimension.expected_kind();
        if contribution.kind() != expected {
            return Err(malformed(format!(
                "{dimension} expects a {expected} contribution, found {}",
                contribution.kind()
            )));
        }

        match contribution {
            Contribution::Percentage { value } if *value > 100 => {
                return Err(malformed(format!(
                    "{dimension} percentage {value} exceeds 100"
                )));
            }
            Contribution::Range { base, spread } if base.checked_add(*spread).is_none() => {
                return Err(malformed(format!(
                    "{dimension} range {base}+{spread} overflows the day counter"
                )));
            }
            Contribution::WeekSpan { low, high } if low > high => {
                return Err(malformed(format!(
                    "{dimension} week span {low}-{high} is inverted"
                )));
            }
            _ => {}
        }
    }

    Ok(())
}
