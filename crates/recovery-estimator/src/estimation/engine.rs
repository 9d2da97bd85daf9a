use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{Contribution, OutcomeDimension, PatientProfile, RulesetVersion};
use super::registry::RuleRegistry;

/// Contribution selected for a dimension, with the rule that supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedContribution {
    pub rule_id: String,
    pub priority: i32,
    pub contribution: Contribution,
}

/// Per-call working state between scoring and formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeAccumulator {
    ruleset_version: RulesetVersion,
    resolved: BTreeMap<OutcomeDimension, ResolvedContribution>,
}

impl OutcomeAccumulator {
    fn new(ruleset_version: RulesetVersion) -> Self {
        Self {
            ruleset_version,
            resolved: BTreeMap::new(),
        }
    }

    pub fn ruleset_version(&self) -> &RulesetVersion {
        &self.ruleset_version
    }

    pub fn get(&self, dimension: OutcomeDimension) -> Option<&ResolvedContribution> {
        self.resolved.get(&dimension)
    }

    pub fn is_resolved(&self, dimension: OutcomeDimension) -> bool {
        self.resolved.contains_key(&dimension)
    }

    pub fn unresolved(&self) -> impl Iterator<Item = OutcomeDimension> + '_ {
        OutcomeDimension::ALL
            .into_iter()
            .filter(|dimension| !self.resolved.contains_key(dimension))
    }

    /// Winning rule ids in dimension order.
    pub fn matched_rules(&self) -> Vec<String> {
        self.resolved
            .values()
            .map(|resolved| resolved.rule_id.clone())
            .collect()
    }
}

/// Stateless evaluator resolving every dimension of a profile against a registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn estimate(&self, profile: &PatientProfile, registry: &RuleRegistry) -> OutcomeAccumulator {
        let mut accumulator = OutcomeAccumulator::new(registry.version().clone());

        for dimension in OutcomeDimension::ALL {
            let winner = registry
                .rules_for_dimension(dimension)
                .filter(|rule| rule.applies_to(profile))
                .max_by_key(|rule| rule.priority);

            let Some(rule) = winner else {
                continue;
            };

            if let Some(contribution) = rule.contributions.get(&dimension) {
                accumulator.resolved.insert(
                    dimension,
                    ResolvedContribution {
                        rule_id: rule.id.clone(),
                        priority: rule.priority,
                        contribution: *contribution,
                    },
                );
            }
        }

        accumulator
    }
}
