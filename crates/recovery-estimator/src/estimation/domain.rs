use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Biological sex captured by the registry intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    pub const fn label(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

/// Walking ability before the fracture, ordered from least to most impaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mobility {
    Independent,
    Stick,
    Frame,
    Limited,
}

impl Mobility {
    pub const ALL: [Mobility; 4] = [
        Mobility::Independent,
        Mobility::Stick,
        Mobility::Frame,
        Mobility::Limited,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Mobility::Independent => "independent",
            Mobility::Stick => "stick",
            Mobility::Frame => "frame",
            Mobility::Limited => "limited",
        }
    }

    /// Human readable description as shown on the intake form.
    pub const fn description(self) -> &'static str {
        match self {
            Mobility::Independent => "Independent (No Aids)",
            Mobility::Stick => "Walking Stick",
            Mobility::Frame => "Frame / Walker",
            Mobility::Limited => "Limited / Assistance Required",
        }
    }
}

/// Validated patient attributes used as scoring input.
///
/// Instances are only produced by
/// [`ProfileValidator`](super::validation::ProfileValidator), so every
/// profile in circulation satisfies the validation policy it was checked
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    age: u8,
    gender: Gender,
    pre_injury_mobility: Mobility,
}

impl PatientProfile {
    pub(crate) fn new(age: u8, gender: Gender, pre_injury_mobility: Mobility) -> Self {
        Self {
            age,
            gender,
            pre_injury_mobility,
        }
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn pre_injury_mobility(&self) -> Mobility {
        self.pre_injury_mobility
    }
}

/// Unvalidated age as it arrives from a form, CLI flag, or JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAge {
    Integer(i64),
    Number(f64),
    Text(String),
    /// Any other JSON shape; always rejected by the validator.
    Other(Value),
}

impl From<i64> for RawAge {
    fn from(value: i64) -> Self {
        RawAge::Integer(value)
    }
}

impl From<i32> for RawAge {
    fn from(value: i32) -> Self {
        RawAge::Integer(i64::from(value))
    }
}

impl From<u8> for RawAge {
    fn from(value: u8) -> Self {
        RawAge::Integer(i64::from(value))
    }
}

impl From<&str> for RawAge {
    fn from(value: &str) -> Self {
        RawAge::Text(value.to_string())
    }
}

impl From<String> for RawAge {
    fn from(value: String) -> Self {
        RawAge::Text(value)
    }
}

impl fmt::Display for RawAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAge::Integer(value) => write!(f, "{value}"),
            RawAge::Number(value) => write!(f, "{value}"),
            RawAge::Text(value) => write!(f, "{value:?}"),
            RawAge::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Patient input before validation. Every field is optional so that missing
/// values surface as validation errors instead of deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPatientInput {
    #[serde(default)]
    pub age: Option<RawAge>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub gender: Option<String>,
    #[serde(default, alias = "mobility", deserialize_with = "lenient_text")]
    pub pre_injury_mobility: Option<String>,
}

/// Keep non-string JSON values as their literal text so the validator, not
/// the extractor, rejects them.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

impl RawPatientInput {
    pub fn new(
        age: impl Into<RawAge>,
        gender: impl Into<String>,
        pre_injury_mobility: impl Into<String>,
    ) -> Self {
        Self {
            age: Some(age.into()),
            gender: Some(gender.into()),
            pre_injury_mobility: Some(pre_injury_mobility.into()),
        }
    }
}

/// Named axis of the outcome estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeDimension {
    HospitalStayDays,
    RehabProbabilityPct,
    WalkingTimeWeeks,
    HomeSupportLikelihood,
}

impl OutcomeDimension {
    pub const ALL: [OutcomeDimension; 4] = [
        OutcomeDimension::HospitalStayDays,
        OutcomeDimension::RehabProbabilityPct,
        OutcomeDimension::WalkingTimeWeeks,
        OutcomeDimension::HomeSupportLikelihood,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            OutcomeDimension::HospitalStayDays => "hospitalStayDays",
            OutcomeDimension::RehabProbabilityPct => "rehabProbabilityPct",
            OutcomeDimension::WalkingTimeWeeks => "walkingTimeWeeks",
            OutcomeDimension::HomeSupportLikelihood => "homeSupportLikelihood",
        }
    }

    pub const fn display_label(self) -> &'static str {
        match self {
            OutcomeDimension::HospitalStayDays => "Avg. Hospital Stay",
            OutcomeDimension::RehabProbabilityPct => "Rehab Requirement",
            OutcomeDimension::WalkingTimeWeeks => "Unassisted Walking",
            OutcomeDimension::HomeSupportLikelihood => "Assisted Living Requirements",
        }
    }

    pub const fn expected_kind(self) -> ContributionKind {
        match self {
            OutcomeDimension::HospitalStayDays => ContributionKind::Range,
            OutcomeDimension::RehabProbabilityPct => ContributionKind::Percentage,
            OutcomeDimension::WalkingTimeWeeks => ContributionKind::WeekSpan,
            OutcomeDimension::HomeSupportLikelihood => ContributionKind::Likelihood,
        }
    }
}

impl fmt::Display for OutcomeDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Categorical likelihood label for home support needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Likelihood {
    Low,
    Moderate,
    High,
}

impl Likelihood {
    pub const fn label(self) -> &'static str {
        match self {
            Likelihood::Low => "Low",
            Likelihood::Moderate => "Moderate",
            Likelihood::High => "High",
        }
    }
}

/// Value a rule writes into a single dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Contribution {
    /// Numeric band rendered as `[base, base + spread]`.
    Range { base: u16, spread: u16 },
    /// Whole percentage in `0..=100`.
    Percentage { value: u8 },
    /// Week interval rendered as `"low-high"`.
    WeekSpan { low: u16, high: u16 },
    Likelihood { level: Likelihood },
}

impl Contribution {
    pub const fn kind(&self) -> ContributionKind {
        match self {
            Contribution::Range { .. } => ContributionKind::Range,
            Contribution::Percentage { .. } => ContributionKind::Percentage,
            Contribution::WeekSpan { .. } => ContributionKind::WeekSpan,
            Contribution::Likelihood { .. } => ContributionKind::Likelihood,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    Range,
    Percentage,
    WeekSpan,
    Likelihood,
}

impl fmt::Display for ContributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContributionKind::Range => "range",
            ContributionKind::Percentage => "percentage",
            ContributionKind::WeekSpan => "week_span",
            ContributionKind::Likelihood => "likelihood",
        };
        f.write_str(label)
    }
}

/// Identifier of a published rule table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RulesetVersion(pub String);

impl RulesetVersion {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RulesetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
