use std::sync::Arc;

use super::common::*;
use crate::estimation::domain::{Contribution, Likelihood, OutcomeDimension};
use crate::estimation::registry::{
    Predicate, RegistryCatalog, RegistryLoadError, RuleRegistry, ScoringRule, SharedRegistry,
};

#[test]
fn seed_table_passes_load_validation() {
    let seed = RuleRegistry::seed();

    let reloaded = RuleRegistry::new(seed.version().clone(), seed.published_on(), seed.rules().to_vec())
        .expect("seed rules load through the validating constructor");

    assert_eq!(reloaded, seed);
    assert_eq!(seed.version().as_str(), "seed-v1");
    assert_eq!(seed.len(), 8);
}

#[test]
fn seed_groups_two_rules_per_dimension() {
    let seed = RuleRegistry::seed();

    for dimension in OutcomeDimension::ALL {
        assert_eq!(
            seed.rules_for_dimension(dimension).count(),
            2,
            "{dimension} should have an older and a younger branch"
        );
    }
}

#[test]
fn rules_are_ordered_by_priority_then_id() {
    let registry = RuleRegistry::new(
        version("ordering"),
        published_on(),
        vec![
            support_rule("b_low", 1, Predicate::Always, Likelihood::Low),
            support_rule("a_high", 9, Predicate::Always, Likelihood::High),
            ScoringRule::new("c_rehab", 9, Predicate::Always).contributes(
                OutcomeDimension::RehabProbabilityPct,
                Contribution::Percentage { value: 50 },
            ),
        ],
    )
    .expect("registry loads");

    let ids: Vec<&str> = registry.rules().iter().map(|rule| rule.id.as_str()).collect();
    assert_eq!(ids, vec!["a_high", "c_rehab", "b_low"]);
}

#[test]
fn equal_priority_on_shared_dimension_fails_to_load() {
    let result = RuleRegistry::new(
        version("conflict"),
        published_on(),
        vec![
            support_rule("older", 10, Predicate::AgeAbove { years: 85 }, Likelihood::High),
            support_rule("everyone", 10, Predicate::Always, Likelihood::Moderate),
        ],
    );

    match result {
        Err(RegistryLoadError::PriorityConflict {
            dimension,
            priority,
            first,
            second,
        }) => {
            assert_eq!(dimension, OutcomeDimension::HomeSupportLikelihood);
            assert_eq!(priority, 10);
            assert_eq!(first, "older");
            assert_eq!(second, "everyone");
        }
        other => panic!("expected priority conflict, got {other:?}"),
    }
}

#[test]
fn equal_priority_on_different_dimensions_is_allowed() {
    let registry = RuleRegistry::new(
        version("disjoint"),
        published_on(),
        vec![
            support_rule("support", 10, Predicate::Always, Likelihood::Low),
            ScoringRule::new("rehab", 10, Predicate::Always).contributes(
                OutcomeDimension::RehabProbabilityPct,
                Contribution::Percentage { value: 40 },
            ),
        ],
    );

    assert!(registry.is_ok());
}

#[test]
fn rejects_duplicate_rule_ids() {
    let result = RuleRegistry::new(
        version("dupes"),
        published_on(),
        vec![
            support_rule("same", 1, Predicate::Always, Likelihood::Low),
            support_rule("same", 2, Predicate::Always, Likelihood::High),
        ],
    );

    assert!(matches!(result, Err(RegistryLoadError::DuplicateRuleId(id)) if id == "same"));
}

#[test]
fn rejects_malformed_rules() {
    let cases = vec![
        support_rule("  ", 1, Predicate::Always, Likelihood::Low),
        ScoringRule::new("no_effect", 1, Predicate::Always),
        ScoringRule::new("wrong_kind", 1, Predicate::Always).contributes(
            OutcomeDimension::HospitalStayDays,
            Contribution::Percentage { value: 10 },
        ),
        ScoringRule::new("too_likely", 1, Predicate::Always).contributes(
            OutcomeDimension::RehabProbabilityPct,
            Contribution::Percentage { value: 101 },
        ),
        ScoringRule::new("overflowing_stay", 1, Predicate::Always).contributes(
            OutcomeDimension::HospitalStayDays,
            Contribution::Range {
                base: u16::MAX,
                spread: 5,
            },
        ),
        ScoringRule::new("inverted_weeks", 1, Predicate::Always).contributes(
            OutcomeDimension::WalkingTimeWeeks,
            Contribution::WeekSpan { low: 10, high: 6 },
        ),
        support_rule(
            "empty_any",
            1,
            Predicate::Any {
                predicates: Vec::new(),
            },
            Likelihood::Low,
        ),
        support_rule(
            "inverted_ages",
            1,
            Predicate::not(Predicate::AgeBetween { min: 90, max: 60 }),
            Likelihood::Low,
        ),
    ];

    for rule in cases {
        let id = rule.id.clone();
        let result = RuleRegistry::new(version("malformed"), published_on(), vec![rule]);
        assert!(
            matches!(result, Err(RegistryLoadError::MalformedRule { .. })),
            "rule `{id}` should be rejected, got {result:?}"
        );
    }
}

#[test]
fn widest_representable_stay_range_loads() {
    let registry = RuleRegistry::new(
        version("edge"),
        published_on(),
        vec![ScoringRule::new("longest_stay", 1, Predicate::Always).contributes(
            OutcomeDimension::HospitalStayDays,
            Contribution::Range {
                base: u16::MAX - 5,
                spread: 5,
            },
        )],
    );

    assert!(registry.is_ok());
}

#[test]
fn rejects_blank_versions() {
    let result = RuleRegistry::new(version(" "), published_on(), Vec::new());
    assert!(matches!(result, Err(RegistryLoadError::EmptyVersion)));
}

#[test]
fn catalog_serves_rules_per_version() {
    let mut catalog = RegistryCatalog::with_seed();
    catalog.register(sparse_registry()).expect("new version registers");

    assert_eq!(catalog.len(), 2);
    assert_eq!(
        catalog.rules_for(&version("seed-v1")).map(<[_]>::len),
        Some(8)
    );
    assert_eq!(
        catalog.rules_for(&version("sparse-v1")).map(<[_]>::len),
        Some(1)
    );
    assert!(catalog.rules_for(&version("missing")).is_none());

    let versions: Vec<&str> = catalog.versions().map(|v| v.as_str()).collect();
    assert_eq!(versions, vec!["seed-v1", "sparse-v1"]);
}

#[test]
fn catalog_rejects_duplicate_versions() {
    let mut catalog = RegistryCatalog::with_seed();

    let result = catalog.register(RuleRegistry::seed());

    assert!(matches!(result, Err(RegistryLoadError::DuplicateVersion(v)) if v.as_str() == "seed-v1"));
    assert_eq!(catalog.len(), 1);
}

#[test]
fn shared_registry_swaps_whole_versions() {
    let shared = SharedRegistry::default();
    let before = shared.snapshot();

    let previous = shared.replace(sparse_registry());

    assert!(Arc::ptr_eq(&before, &previous));
    assert_eq!(before.version().as_str(), "seed-v1");
    assert_eq!(before.len(), 8, "held snapshots keep their rule set");
    assert_eq!(shared.snapshot().version().as_str(), "sparse-v1");
}

#[test]
fn ruleset_documents_round_trip_through_json() {
    let json = serde_json::to_string(&RuleRegistry::seed().to_document()).expect("serializes");

    let reloaded = RuleRegistry::from_reader(json.as_bytes()).expect("document loads");

    assert_eq!(reloaded, RuleRegistry::seed());
}

#[test]
fn unparseable_documents_report_parse_errors() {
    let result = RuleRegistry::from_reader("{\"version\": 3}".as_bytes());
    assert!(matches!(result, Err(RegistryLoadError::Parse(_))));
}
