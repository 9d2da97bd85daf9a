use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::estimation::domain::{
    Contribution, Likelihood, OutcomeDimension, PatientProfile, RawPatientInput, RulesetVersion,
};
use crate::estimation::registry::{Predicate, RuleRegistry, ScoringRule, SharedRegistry};
use crate::estimation::service::RecoveryEstimationService;
use crate::estimation::validation::ProfileValidator;

pub(super) fn profile(age: i64, gender: &str, mobility: &str) -> PatientProfile {
    ProfileValidator::default()
        .validate(&RawPatientInput::new(age, gender, mobility))
        .expect("fixture profile is valid")
}

pub(super) fn published_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")
}

pub(super) fn version(value: &str) -> RulesetVersion {
    RulesetVersion::new(value)
}

pub(super) fn support_rule(
    id: &str,
    priority: i32,
    predicate: Predicate,
    level: Likelihood,
) -> ScoringRule {
    ScoringRule::new(id, priority, predicate).contributes(
        OutcomeDimension::HomeSupportLikelihood,
        Contribution::Likelihood { level },
    )
}

/// Ruleset that only knows about home support for patients over 85.
pub(super) fn sparse_registry() -> RuleRegistry {
    RuleRegistry::new(
        version("sparse-v1"),
        published_on(),
        vec![support_rule(
            "support_over_85",
            10,
            Predicate::AgeAbove { years: 85 },
            Likelihood::High,
        )],
    )
    .expect("sparse registry loads")
}

pub(super) fn seed_service() -> RecoveryEstimationService {
    RecoveryEstimationService::new(Arc::new(SharedRegistry::default()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
