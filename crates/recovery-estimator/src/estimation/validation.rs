use super::domain::{Gender, Mobility, PatientProfile, RawAge, RawPatientInput};

/// Validation errors raised while building a [`PatientProfile`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field `{field}`")]
    Missing { field: &'static str },
    #[error("`{field}` must be a whole number (found {found})")]
    Type { field: &'static str, found: String },
    #[error("`{field}` must be between {min} and {max} (found {found})")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        found: i64,
    },
    #[error("`{field}` must be one of [{}] (found {found:?})", .allowed.join(", "))]
    InvalidEnum {
        field: &'static str,
        allowed: Vec<&'static str>,
        found: String,
    },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::Type { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidEnum { field, .. } => field,
        }
    }
}

pub const DEFAULT_MIN_AGE: u8 = 50;
pub const DEFAULT_MAX_AGE: u8 = 110;

/// Age bounds accepted at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    min_age: u8,
    max_age: u8,
}

impl ValidationPolicy {
    pub fn new(min_age: u8, max_age: u8) -> Self {
        if min_age <= max_age {
            Self { min_age, max_age }
        } else {
            Self::default()
        }
    }

    pub fn min_age(&self) -> u8 {
        self.min_age
    }

    pub fn max_age(&self) -> u8 {
        self.max_age
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_age: DEFAULT_MIN_AGE,
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

/// Single gate producing [`PatientProfile`] instances from raw input.
#[derive(Debug, Clone, Default)]
pub struct ProfileValidator {
    policy: ValidationPolicy,
}

impl ProfileValidator {
    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Normalize and validate raw input into a typed profile.
    pub fn validate(&self, input: &RawPatientInput) -> Result<PatientProfile, ValidationError> {
        let age = self.validate_age(input.age.as_ref())?;
        let gender = parse_gender(input.gender.as_deref())?;
        let mobility = parse_mobility(input.pre_injury_mobility.as_deref())?;

        Ok(PatientProfile::new(age, gender, mobility))
    }

    fn validate_age(&self, raw: Option<&RawAge>) -> Result<u8, ValidationError> {
        const FIELD: &str = "age";

        let raw = raw.ok_or(ValidationError::Missing { field: FIELD })?;
        let type_error = || ValidationError::Type {
            field: FIELD,
            found: raw.to_string(),
        };

        let age = match raw {
            RawAge::Integer(value) => *value,
            RawAge::Number(value) => {
                if !value.is_finite() || value.fract() != 0.0 {
                    return Err(type_error());
                }
                if *value < i64::MIN as f64 || *value > i64::MAX as f64 {
                    return Err(type_error());
                }
                *value as i64
            }
            RawAge::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::Missing { field: FIELD });
                }
                trimmed.parse::<i64>().map_err(|_| type_error())?
            }
            RawAge::Other(_) => return Err(type_error()),
        };

        let min = i64::from(self.policy.min_age);
        let max = i64::from(self.policy.max_age);
        if age < min || age > max {
            return Err(ValidationError::OutOfRange {
                field: FIELD,
                min,
                max,
                found: age,
            });
        }

        u8::try_from(age).map_err(|_| type_error())
    }
}

fn parse_gender(raw: Option<&str>) -> Result<Gender, ValidationError> {
    const FIELD: &str = "gender";
    let value = required_text(FIELD, raw)?;

    Gender::ALL
        .into_iter()
        .find(|gender| gender.label() == value)
        .ok_or_else(|| ValidationError::InvalidEnum {
            field: FIELD,
            allowed: Gender::ALL.iter().map(|gender| gender.label()).collect(),
            found: value,
        })
}

fn parse_mobility(raw: Option<&str>) -> Result<Mobility, ValidationError> {
    const FIELD: &str = "preInjuryMobility";
    let value = required_text(FIELD, raw)?;

    Mobility::ALL
        .into_iter()
        .find(|mobility| mobility.label() == value)
        .ok_or_else(|| ValidationError::InvalidEnum {
            field: FIELD,
            allowed: Mobility::ALL.iter().map(|mobility| mobility.label()).collect(),
            found: value,
        })
}

fn required_text(field: &'static str, raw: Option<&str>) -> Result<String, ValidationError> {
    let normalized = raw
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if normalized.is_empty() {
        Err(ValidationError::Missing { field })
    } else {
        Ok(normalized)
    }
}
