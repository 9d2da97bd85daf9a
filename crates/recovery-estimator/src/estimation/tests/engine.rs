use super::common::*;
use crate::estimation::domain::{
    Contribution, Gender, Likelihood, Mobility, OutcomeDimension,
};
use crate::estimation::engine::ScoringEngine;
use crate::estimation::registry::{Predicate, RuleRegistry, ScoringRule};

#[test]
fn age_80_takes_the_younger_branch() {
    let engine = ScoringEngine::new();
    let seed = RuleRegistry::seed();

    let at_80 = engine.estimate(&profile(80, "female", "independent"), &seed);
    let at_81 = engine.estimate(&profile(81, "female", "independent"), &seed);

    assert_eq!(
        at_80.get(OutcomeDimension::HospitalStayDays).map(|r| r.rule_id.as_str()),
        Some("hospital_stay_80_and_under")
    );
    assert_eq!(
        at_81.get(OutcomeDimension::HospitalStayDays).map(|r| r.rule_id.as_str()),
        Some("hospital_stay_over_80")
    );
}

#[test]
fn older_profiles_have_longer_base_stays() {
    let engine = ScoringEngine::new();
    let seed = RuleRegistry::seed();

    let base = |age: i64| {
        match engine
            .estimate(&profile(age, "male", "frame"), &seed)
            .get(OutcomeDimension::HospitalStayDays)
            .map(|resolved| resolved.contribution)
        {
            Some(Contribution::Range { base, .. }) => base,
            other => panic!("expected hospital stay range, got {other:?}"),
        }
    };

    assert_eq!(base(81), 12);
    assert_eq!(base(80), 7);
    assert!(base(95) > base(60));
}

#[test]
fn highest_priority_match_wins_regardless_of_declaration_order() {
    let rules = vec![
        support_rule("baseline", 1, Predicate::Always, Likelihood::Low),
        support_rule(
            "limited_mobility",
            50,
            Predicate::MobilityAtLeast {
                level: Mobility::Frame,
            },
            Likelihood::High,
        ),
        support_rule(
            "women_over_70",
            20,
            Predicate::All {
                predicates: vec![
                    Predicate::GenderIs {
                        gender: Gender::Female,
                    },
                    Predicate::AgeAbove { years: 70 },
                ],
            },
            Likelihood::Moderate,
        ),
    ];
    let mut reversed = rules.clone();
    reversed.reverse();

    let forward = RuleRegistry::new(version("forward"), published_on(), rules).expect("loads");
    let backward = RuleRegistry::new(version("forward"), published_on(), reversed).expect("loads");
    let engine = ScoringEngine::new();

    for (subject, expected) in [
        (profile(75, "female", "limited"), "limited_mobility"),
        (profile(75, "female", "stick"), "women_over_70"),
        (profile(75, "male", "stick"), "baseline"),
    ] {
        let a = engine.estimate(&subject, &forward);
        let b = engine.estimate(&subject, &backward);
        assert_eq!(a, b);
        assert_eq!(
            a.get(OutcomeDimension::HomeSupportLikelihood)
                .map(|r| r.rule_id.as_str()),
            Some(expected)
        );
    }
}

#[test]
fn unmatched_dimensions_stay_unresolved() {
    let accumulator = ScoringEngine::new().estimate(&profile(70, "male", "stick"), &sparse_registry());

    let unresolved: Vec<OutcomeDimension> = accumulator.unresolved().collect();
    assert_eq!(unresolved, OutcomeDimension::ALL.to_vec());
    assert!(accumulator.matched_rules().is_empty());
}

#[test]
fn multi_dimension_rules_contribute_to_each_dimension() {
    let registry = RuleRegistry::new(
        version("combined"),
        published_on(),
        vec![ScoringRule::new("frail", 5, Predicate::AgeBetween { min: 90, max: 110 })
            .contributes(
                OutcomeDimension::HospitalStayDays,
                Contribution::Range { base: 14, spread: 6 },
            )
            .contributes(
                OutcomeDimension::HomeSupportLikelihood,
                Contribution::Likelihood {
                    level: Likelihood::High,
                },
            )],
    )
    .expect("loads");

    let accumulator = ScoringEngine::new().estimate(&profile(90, "female", "stick"), &registry);

    assert!(accumulator.is_resolved(OutcomeDimension::HospitalStayDays));
    assert!(accumulator.is_resolved(OutcomeDimension::HomeSupportLikelihood));
    assert!(!accumulator.is_resolved(OutcomeDimension::WalkingTimeWeeks));
    assert_eq!(accumulator.matched_rules(), vec!["frail", "frail"]);
}

#[test]
fn predicates_cover_mobility_ordering() {
    let frame = profile(70, "male", "frame");

    assert!(Predicate::MobilityAtLeast { level: Mobility::Stick }.matches(&frame));
    assert!(Predicate::MobilityAtMost { level: Mobility::Frame }.matches(&frame));
    assert!(!Predicate::MobilityAtMost { level: Mobility::Stick }.matches(&frame));
    assert!(Predicate::Any {
        predicates: vec![
            Predicate::MobilityIs { level: Mobility::Limited },
            Predicate::AgeAtMost { years: 70 },
        ],
    }
    .matches(&frame));
    assert!(Predicate::not(Predicate::GenderIs { gender: Gender::Female }).matches(&frame));
}

#[test]
fn estimation_is_repeatable() {
    let engine = ScoringEngine::new();
    let seed = RuleRegistry::seed();
    let subject = profile(88, "female", "limited");

    let first = engine.estimate(&subject, &seed);
    let second = engine.estimate(&subject, &seed);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).expect("serializes"),
        serde_json::to_vec(&second).expect("serializes")
    );
}
