//! Recovery outcome estimation pipeline.
//!
//! Raw input is validated into a [`PatientProfile`], scored against a
//! [`RuleRegistry`] snapshot by the [`ScoringEngine`], and rendered into an
//! [`OutcomeEstimate`] by the formatter.

pub mod cohort;
pub mod domain;
pub mod engine;
pub mod formatter;
pub mod registry;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use cohort::{parse_cohort, CohortImport, CohortRow};
pub use domain::{
    Contribution, ContributionKind, Gender, Likelihood, Mobility, OutcomeDimension,
    PatientProfile, RawAge, RawPatientInput, RulesetVersion,
};
pub use engine::{OutcomeAccumulator, ResolvedContribution, ScoringEngine};
pub use formatter::{
    DayRange, EstimateLine, Estimated, OutcomeEstimate, UnresolvedDimensionWarning,
    ESTIMATE_DISCLAIMER,
};
pub use registry::{
    Predicate, RegistryCatalog, RegistryLoadError, RuleRegistry, RulesetDocument, ScoringRule,
    SharedRegistry,
};
pub use router::estimation_router;
pub use service::{CohortEstimate, EstimationError, RecoveryEstimationService};
pub use validation::{ProfileValidator, ValidationError, ValidationPolicy};
