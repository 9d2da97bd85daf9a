use chrono::NaiveDate;

use super::super::domain::{Contribution, Likelihood, Mobility, OutcomeDimension};
use super::rule::{Predicate, ScoringRule};

pub(crate) const SEED_VERSION: &str = "seed-v1";

pub(crate) fn seed_published_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// Rule table reproducing the recovery estimator shipped with the consumer
/// dashboard.
pub(crate) fn seed_rules() -> Vec<ScoringRule> {
    let older = Predicate::AgeAbove { years: 80 };
    let younger = Predicate::AgeAtMost { years: 80 };
    let limited = Predicate::MobilityIs {
        level: Mobility::Limited,
    };

    vec![
        ScoringRule::new("hospital_stay_over_80", 20, older.clone()).contributes(
            OutcomeDimension::HospitalStayDays,
            Contribution::Range {
                base: 12,
                spread: 5,
            },
        ),
        ScoringRule::new("hospital_stay_80_and_under", 10, younger.clone()).contributes(
            OutcomeDimension::HospitalStayDays,
            Contribution::Range { base: 7, spread: 5 },
        ),
        ScoringRule::new("rehab_limited_mobility", 20, limited.clone()).contributes(
            OutcomeDimension::RehabProbabilityPct,
            Contribution::Percentage { value: 85 },
        ),
        ScoringRule::new("rehab_other_mobility", 10, Predicate::not(limited)).contributes(
            OutcomeDimension::RehabProbabilityPct,
            Contribution::Percentage { value: 45 },
        ),
        ScoringRule::new("walking_over_80", 20, older).contributes(
            OutcomeDimension::WalkingTimeWeeks,
            Contribution::WeekSpan { low: 12, high: 16 },
        ),
        ScoringRule::new("walking_80_and_under", 10, younger).contributes(
            OutcomeDimension::WalkingTimeWeeks,
            Contribution::WeekSpan { low: 6, high: 10 },
        ),
        ScoringRule::new("home_support_over_85", 20, Predicate::AgeAbove { years: 85 })
            .contributes(
                OutcomeDimension::HomeSupportLikelihood,
                Contribution::Likelihood {
                    level: Likelihood::High,
                },
            ),
        ScoringRule::new(
            "home_support_85_and_under",
            10,
            Predicate::AgeAtMost { years: 85 },
        )
        .contributes(
            OutcomeDimension::HomeSupportLikelihood,
            Contribution::Likelihood {
                level: Likelihood::Moderate,
            },
        ),
    ]
}
