use std::fmt;

use serde::{Serialize, Serializer};

use super::domain::{Contribution, Likelihood, OutcomeDimension, RulesetVersion};
use super::engine::OutcomeAccumulator;

const UNRESOLVED: &str = "Unresolved";

pub const ESTIMATE_DISCLAIMER: &str =
    "These are estimates based on population averages, not specific medical advice.";

/// Dimension value, or an explicit marker when no rule matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Estimated<T> {
    Resolved(T),
    Unresolved,
}

impl<T> Estimated<T> {
    pub fn as_resolved(&self) -> Option<&T> {
        match self {
            Estimated::Resolved(value) => Some(value),
            Estimated::Unresolved => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Estimated::Unresolved)
    }
}

impl<T: Serialize> Serialize for Estimated<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Estimated::Resolved(value) => value.serialize(serializer),
            Estimated::Unresolved => serializer.serialize_str(UNRESOLVED),
        }
    }
}

/// Closed day range `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRange {
    pub low: u16,
    pub high: u16,
}

/// Raised when a dimension has no matching rule for an otherwise valid profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedDimensionWarning {
    pub dimension: OutcomeDimension,
    pub message: String,
}

impl fmt::Display for UnresolvedDimensionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.dimension, self.message)
    }
}

/// Presentation-ready outcome estimate, produced once per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeEstimate {
    hospital_stay_days: Estimated<DayRange>,
    rehab_probability_pct: Estimated<u8>,
    walking_time_weeks: Estimated<String>,
    home_support_likelihood: Estimated<Likelihood>,
    ruleset_version: RulesetVersion,
    matched_rules: Vec<String>,
    warnings: Vec<UnresolvedDimensionWarning>,
}

/// Label/value pair for text front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstimateLine {
    pub label: &'static str,
    pub value: String,
}

impl OutcomeEstimate {
    pub fn hospital_stay_days(&self) -> &Estimated<DayRange> {
        &self.hospital_stay_days
    }

    pub fn rehab_probability_pct(&self) -> &Estimated<u8> {
        &self.rehab_probability_pct
    }

    pub fn walking_time_weeks(&self) -> &Estimated<String> {
        &self.walking_time_weeks
    }

    pub fn home_support_likelihood(&self) -> &Estimated<Likelihood> {
        &self.home_support_likelihood
    }

    pub fn ruleset_version(&self) -> &RulesetVersion {
        &self.ruleset_version
    }

    pub fn matched_rules(&self) -> &[String] {
        &self.matched_rules
    }

    pub fn warnings(&self) -> &[UnresolvedDimensionWarning] {
        &self.warnings
    }

    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn display_lines(&self) -> Vec<EstimateLine> {
        let hospital = display(&self.hospital_stay_days, |range| {
            format!("{} - {} days", range.low, range.high)
        });
        let rehab = display(&self.rehab_probability_pct, |pct| format!("{pct}%"));
        let walking = display(&self.walking_time_weeks, |weeks| format!("{weeks} weeks"));
        let support = display(&self.home_support_likelihood, |level| {
            format!("{} Likelihood", level.label())
        });

        [
            (OutcomeDimension::HospitalStayDays, hospital),
            (OutcomeDimension::RehabProbabilityPct, rehab),
            (OutcomeDimension::WalkingTimeWeeks, walking),
            (OutcomeDimension::HomeSupportLikelihood, support),
        ]
        .into_iter()
        .map(|(dimension, value)| EstimateLine {
            label: dimension.display_label(),
            value,
        })
        .collect()
    }
}

fn display<T>(value: &Estimated<T>, render: impl Fn(&T) -> String) -> String {
    match value {
        Estimated::Resolved(inner) => render(inner),
        Estimated::Unresolved => format!("{UNRESOLVED} (no matching rule)"),
    }
}

/// Render an accumulator into the final estimate.
pub fn format(accumulator: &OutcomeAccumulator) -> OutcomeEstimate {
    let mut warnings = Vec::new();

    let hospital_stay_days = extract(
        accumulator,
        OutcomeDimension::HospitalStayDays,
        &mut warnings,
        |contribution| match contribution {
            Contribution::Range { base, spread } => Some(DayRange {
                low: base,
                high: base.saturating_add(spread),
            }),
            _ => None,
        },
    );

    let rehab_probability_pct = extract(
        accumulator,
        OutcomeDimension::RehabProbabilityPct,
        &mut warnings,
        |contribution| match contribution {
            Contribution::Percentage { value } => Some(value),
            _ => None,
        },
    );

    let walking_time_weeks = extract(
        accumulator,
        OutcomeDimension::WalkingTimeWeeks,
        &mut warnings,
        |contribution| match contribution {
            Contribution::WeekSpan { low, high } => Some(format!("{low}-{high}")),
            _ => None,
        },
    );

    let home_support_likelihood = extract(
        accumulator,
        OutcomeDimension::HomeSupportLikelihood,
        &mut warnings,
        |contribution| match contribution {
            Contribution::Likelihood { level } => Some(level),
            _ => None,
        },
    );

    OutcomeEstimate {
        hospital_stay_days,
        rehab_probability_pct,
        walking_time_weeks,
        home_support_likelihood,
        ruleset_version: accumulator.ruleset_version().clone(),
        matched_rules: accumulator.matched_rules(),
        warnings,
    }
}

fn extract<T>(
    accumulator: &OutcomeAccumulator,
    dimension: OutcomeDimension,
    warnings: &mut Vec<UnresolvedDimensionWarning>,
    convert: impl Fn(Contribution) -> Option<T>,
) -> Estimated<T> {
    let Some(resolved) = accumulator.get(dimension) else {
        warnings.push(UnresolvedDimensionWarning {
            dimension,
            message: format!(
                "no rule in ruleset {} matched this profile",
                accumulator.ruleset_version()
            ),
        });
        return Estimated::Unresolved;
    };

    match convert(resolved.contribution) {
        Some(value) => Estimated::Resolved(value),
        None => {
            warnings.push(UnresolvedDimensionWarning {
                dimension,
                message: format!(
                    "rule `{}` supplied a {} contribution",
                    resolved.rule_id,
                    resolved.contribution.kind()
                ),
            });
            Estimated::Unresolved
        }
    }
}
