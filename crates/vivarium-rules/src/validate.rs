//! Type- and bound-checking of raw input against the rule table.
//!
//! [`validate`] walks every parameter in the rule set: an absent field
//! takes its standard value, a present field is coerced to the rule's
//! kind and checked against its inclusive bound. The first failing field
//! aborts the whole validation -- no silent substitution of defaults --
//! so a returned [`SimulationConfig`] always satisfies every rule bound.

use std::collections::BTreeMap;

use tracing::debug;
use vivarium_types::SimulationConfig;

use crate::error::ValidationError;
use crate::rule::{Parameter, ParameterRule, RuleKind, RuleSet, RuleValue};

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// An untyped scalar as delivered by the HTTP layer or the sampler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Text from a query or form field, not yet parsed.
    Text(String),
    /// An integer drawn by the interval sampler.
    Integer(i64),
    /// A pre-parsed boolean.
    Flag(bool),
}

/// Mapping from recognized parameters to raw, unvalidated values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawValueMap {
    values: BTreeMap<Parameter, RawValue>,
}

impl RawValueMap {
    /// Create an empty map (all parameters take standard values).
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Insert or replace the raw value for a parameter.
    pub fn insert(&mut self, parameter: Parameter, value: RawValue) {
        self.values.insert(parameter, value);
    }

    /// The raw value for a parameter, if one was supplied.
    pub fn get(&self, parameter: Parameter) -> Option<&RawValue> {
        self.values.get(&parameter)
    }

    /// Build a raw value map from URL query pairs.
    ///
    /// Unrecognized keys are ignored. An empty value counts as absent:
    /// `?rows=` means "use the default".
    pub fn from_query(query: &BTreeMap<String, String>) -> Self {
        let mut raw = Self::new();
        for (key, value) in query {
            let Some(parameter) = Parameter::from_key(key) else {
                debug!(key = %key, "ignoring unrecognized query parameter");
                continue;
            };
            if value.is_empty() {
                continue;
            }
            raw.insert(parameter, RawValue::Text(value.clone()));
        }
        raw
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a raw value map against a rule set.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidType`] when a raw value's shape
/// does not match the rule's kind (booleans must be literally `true` or
/// `false`, integers must parse in base 10), or
/// [`ValidationError::OutOfBounds`] when a numeric value lies outside
/// the rule's inclusive bound.
pub fn validate(
    raw: &RawValueMap,
    rules: &RuleSet,
) -> Result<SimulationConfig, ValidationError> {
    let mut config = SimulationConfig::default();

    for parameter in Parameter::ALL {
        let rule = rules.rule(parameter);
        let value = match raw.get(parameter) {
            None => rule.standard_value(),
            Some(raw_value) => check(parameter, rule, raw_value)?,
        };
        apply(&mut config, parameter, value);
    }

    Ok(config)
}

/// Coerce one raw value to its rule's kind and bound-check it.
fn check(
    parameter: Parameter,
    rule: &ParameterRule,
    raw: &RawValue,
) -> Result<RuleValue, ValidationError> {
    match rule.kind {
        RuleKind::Flag { .. } => check_flag(parameter, raw),
        RuleKind::Signed { min, max, .. } => {
            let value = parse_integer(parameter, raw)?;
            if value < min || value > max {
                return Err(ValidationError::OutOfBounds {
                    parameter,
                    message: rule.message,
                });
            }
            Ok(RuleValue::Signed(value))
        }
        RuleKind::Unsigned { min, max, .. } => {
            let value = parse_integer(parameter, raw)?;
            let Ok(unsigned) = u64::try_from(value) else {
                // Negative input to an unsigned field is a bound
                // violation, not a parse failure.
                return Err(ValidationError::OutOfBounds {
                    parameter,
                    message: rule.message,
                });
            };
            if unsigned < min || unsigned > max {
                return Err(ValidationError::OutOfBounds {
                    parameter,
                    message: rule.message,
                });
            }
            Ok(RuleValue::Unsigned(unsigned))
        }
    }
}

/// Booleans must literally be `true` or `false`, case-sensitive.
fn check_flag(parameter: Parameter, raw: &RawValue) -> Result<RuleValue, ValidationError> {
    match raw {
        RawValue::Flag(value) => Ok(RuleValue::Flag(*value)),
        RawValue::Text(text) if text == "true" => Ok(RuleValue::Flag(true)),
        RawValue::Text(text) if text == "false" => Ok(RuleValue::Flag(false)),
        RawValue::Text(_) | RawValue::Integer(_) => Err(ValidationError::InvalidType {
            parameter,
            expected: "boolean",
        }),
    }
}

/// Extract a base-10 integer from a raw value.
fn parse_integer(parameter: Parameter, raw: &RawValue) -> Result<i64, ValidationError> {
    match raw {
        RawValue::Integer(value) => Ok(*value),
        RawValue::Text(text) => {
            text.parse::<i64>()
                .map_err(|_parse_error| ValidationError::InvalidType {
                    parameter,
                    expected: "integer",
                })
        }
        RawValue::Flag(_) => Err(ValidationError::InvalidType {
            parameter,
            expected: "integer",
        }),
    }
}

/// Assign a resolved value to its configuration field.
///
/// The value's kind always agrees with the rule table here, since
/// [`check`] coerced it; a mismatched arm leaves the standard value in
/// place.
fn apply(config: &mut SimulationConfig, parameter: Parameter, value: RuleValue) {
    match parameter {
        Parameter::Rows => {
            if let RuleValue::Signed(v) = value {
                config.rows = v;
            }
        }
        Parameter::Cols => {
            if let RuleValue::Signed(v) = value {
                config.cols = v;
            }
        }
        Parameter::Draw => {
            if let RuleValue::Flag(v) = value {
                config.draw = v;
            }
        }
        Parameter::Foods => {
            if let RuleValue::Signed(v) = value {
                config.foods = v;
            }
        }
        Parameter::Creature1 => {
            if let RuleValue::Unsigned(v) = value {
                config.creature1 = v;
            }
        }
        Parameter::Creature2 => {
            if let RuleValue::Unsigned(v) = value {
                config.creature2 = v;
            }
        }
        Parameter::MaxRounds => {
            if let RuleValue::Signed(v) = value {
                config.max_rounds = v;
            }
        }
        Parameter::GamelogSize => {
            if let RuleValue::Signed(v) = value {
                config.gamelog_size = v;
            }
        }
    }
}
