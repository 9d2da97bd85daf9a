use std::sync::Arc;

use tracing::{debug, warn};

use super::cohort::CohortImport;
use super::domain::{PatientProfile, RawPatientInput};
use super::engine::ScoringEngine;
use super::formatter::{self, OutcomeEstimate};
use super::registry::{RuleRegistry, SharedRegistry};
use super::validation::{ProfileValidator, ValidationError};

/// Service composing the validator, the active registry, the engine and the formatter.
pub struct RecoveryEstimationService {
    validator: ProfileValidator,
    registry: Arc<SharedRegistry>,
    engine: ScoringEngine,
}

impl RecoveryEstimationService {
    pub fn new(registry: Arc<SharedRegistry>) -> Self {
        Self::with_validator(ProfileValidator::default(), registry)
    }

    pub fn with_validator(validator: ProfileValidator, registry: Arc<SharedRegistry>) -> Self {
        Self {
            validator,
            registry,
            engine: ScoringEngine::new(),
        }
    }

    pub fn registry(&self) -> &Arc<SharedRegistry> {
        &self.registry
    }

    /// Validate raw input and estimate against the active ruleset.
    pub fn estimate(&self, input: &RawPatientInput) -> Result<OutcomeEstimate, EstimationError> {
        let profile = self.validator.validate(input)?;
        Ok(self.estimate_profile(&profile))
    }

    pub fn estimate_profile(&self, profile: &PatientProfile) -> OutcomeEstimate {
        let registry = self.registry.snapshot();
        estimate_with(&self.engine, profile, &registry)
    }

    /// Estimate every row of a cohort, keeping per-row validation failures.
    pub fn estimate_cohort(&self, cohort: &CohortImport) -> Vec<CohortEstimate> {
        let registry = self.registry.snapshot();

        cohort
            .rows
            .iter()
            .map(|row| CohortEstimate {
                line: row.line,
                outcome: self
                    .validator
                    .validate(&row.input)
                    .map(|profile| estimate_with(&self.engine, &profile, &registry))
                    .map_err(EstimationError::from),
            })
            .collect()
    }
}

fn estimate_with(
    engine: &ScoringEngine,
    profile: &PatientProfile,
    registry: &RuleRegistry,
) -> OutcomeEstimate {
    let accumulator = engine.estimate(profile, registry);
    let estimate = formatter::format(&accumulator);

    debug!(
        ruleset = %estimate.ruleset_version(),
        matched = ?estimate.matched_rules(),
        "recovery estimate computed"
    );
    for warning in estimate.warnings() {
        warn!(
            ruleset = %estimate.ruleset_version(),
            dimension = %warning.dimension,
            "outcome dimension unresolved"
        );
    }

    estimate
}

/// Estimate outcome for one cohort row.
#[derive(Debug)]
pub struct CohortEstimate {
    pub line: usize,
    pub outcome: Result<OutcomeEstimate, EstimationError>,
}

/// Error raised by the estimation service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimationError {
    #[error("invalid patient profile: {0}")]
    Validation(#[from] ValidationError),
}
