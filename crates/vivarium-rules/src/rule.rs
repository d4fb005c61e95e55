//! The declarative parameter rule table.
//!
//! Every configurable simulation field is described by one
//! [`ParameterRule`]: its kind and bound as a tagged union
//! ([`RuleKind`]), whether randomized sampling covers it, and the
//! constraint message surfaced to callers on a bound violation.
//!
//! [`RuleSet::standard`] builds the fixed table once at process start.
//! The set exposes no mutation API; consumers only read, so it is shared
//! across concurrent validators without locking.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Parameter keys
// ---------------------------------------------------------------------------

/// A configurable simulation parameter.
///
/// The variants double as the query-parameter vocabulary: each maps to
/// the spelling accepted in URLs via [`Parameter::as_str`] and
/// [`Parameter::from_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    /// Board row count.
    Rows,
    /// Board column count.
    Cols,
    /// Render-while-running flag.
    Draw,
    /// Food object count.
    Foods,
    /// First creature population.
    Creature1,
    /// Second creature population.
    Creature2,
    /// Round cutoff.
    MaxRounds,
    /// Game-log ring-buffer size.
    GamelogSize,
}

impl Parameter {
    /// Every parameter, in the fixed iteration order used by the
    /// validator. Field checks are independent, so the order never
    /// affects the outcome; it only makes logs and tests predictable.
    pub const ALL: [Self; 8] = [
        Self::Rows,
        Self::Cols,
        Self::Draw,
        Self::Foods,
        Self::Creature1,
        Self::Creature2,
        Self::MaxRounds,
        Self::GamelogSize,
    ];

    /// Query-parameter spelling of this key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rows => "rows",
            Self::Cols => "cols",
            Self::Draw => "draw",
            Self::Foods => "foods",
            Self::Creature1 => "creature1",
            Self::Creature2 => "creature2",
            Self::MaxRounds => "maxrounds",
            Self::GamelogSize => "gamelogsize",
        }
    }

    /// Resolve a query-parameter key, or `None` for an unrecognized
    /// name (unrecognized keys are ignored, not rejected).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == key)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rule values and kinds
// ---------------------------------------------------------------------------

/// A typed value resolved by the validator for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleValue {
    /// A signed integer field.
    Signed(i64),
    /// An unsigned integer field.
    Unsigned(u64),
    /// A boolean field.
    Flag(bool),
}

/// Inclusive signed bound used by interval containment checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Lowest permitted value.
    pub min: i64,
    /// Highest permitted value.
    pub max: i64,
}

/// Kind, standard value, and bound of one parameter as a tagged union.
///
/// Carrying the value and the bound in the same variant keeps the two
/// in the same integer domain, so a kind mismatch between them cannot
/// be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Signed integer with an inclusive `[min, max]` bound.
    Signed {
        /// Default used when input omits the field.
        standard: i64,
        /// Lowest permitted value.
        min: i64,
        /// Highest permitted value.
        max: i64,
    },
    /// Unsigned integer with an inclusive `[min, max]` bound.
    Unsigned {
        /// Default used when input omits the field.
        standard: u64,
        /// Lowest permitted value.
        min: u64,
        /// Highest permitted value.
        max: u64,
    },
    /// Boolean; no bound applies.
    Flag {
        /// Default used when input omits the field.
        standard: bool,
    },
}

impl RuleKind {
    /// Human-readable kind name, used in type-mismatch messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Signed { .. } => "integer",
            Self::Unsigned { .. } => "unsigned integer",
            Self::Flag { .. } => "boolean",
        }
    }

    /// The bound as a signed pair, or `None` for the boolean kind.
    pub const fn bounds(&self) -> Option<Bounds> {
        match *self {
            Self::Signed { min, max, .. } => Some(Bounds { min, max }),
            // Unsigned bounds in the table never exceed i64::MAX.
            #[allow(clippy::cast_possible_wrap)]
            Self::Unsigned { min, max, .. } => Some(Bounds {
                min: min as i64,
                max: max as i64,
            }),
            Self::Flag { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parameter rules
// ---------------------------------------------------------------------------

/// Constraint record for one configurable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterRule {
    /// Kind, standard value, and inclusive bound.
    pub kind: RuleKind,
    /// Whether randomized sampling draws this field. Fields with
    /// `false` always take their standard value in random configs.
    pub randomized: bool,
    /// Constraint description surfaced on a bound violation.
    pub message: &'static str,
}

impl ParameterRule {
    /// The rule's standard (default) value as a typed [`RuleValue`].
    pub const fn standard_value(&self) -> RuleValue {
        match self.kind {
            RuleKind::Signed { standard, .. } => RuleValue::Signed(standard),
            RuleKind::Unsigned { standard, .. } => RuleValue::Unsigned(standard),
            RuleKind::Flag { standard } => RuleValue::Flag(standard),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule set
// ---------------------------------------------------------------------------

/// Immutable table of all parameter rules.
///
/// Built once by [`RuleSet::standard`] and passed by reference into
/// every component that needs it. Lookup is an exhaustive match, so a
/// parameter without a rule cannot exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rows: ParameterRule,
    cols: ParameterRule,
    draw: ParameterRule,
    foods: ParameterRule,
    creature1: ParameterRule,
    creature2: ParameterRule,
    max_rounds: ParameterRule,
    gamelog_size: ParameterRule,
}

impl RuleSet {
    /// Build the standard rule table.
    pub const fn standard() -> Self {
        Self {
            rows: ParameterRule {
                kind: RuleKind::Signed {
                    standard: 40,
                    min: 5,
                    max: 200,
                },
                randomized: true,
                message: "Invalid rows value, value should be between 5-200.",
            },
            cols: ParameterRule {
                kind: RuleKind::Signed {
                    standard: 100,
                    min: 5,
                    max: 200,
                },
                randomized: true,
                message: "Invalid cols value, value should be between 5-200.",
            },
            draw: ParameterRule {
                kind: RuleKind::Flag { standard: false },
                randomized: false,
                message: "Invalid value for draw parameters, must be either true or false.",
            },
            foods: ParameterRule {
                kind: RuleKind::Signed {
                    standard: 75,
                    min: 1,
                    max: 150,
                },
                randomized: true,
                message: "Invalid value for foods parameter, value should be between 1-150.",
            },
            creature1: ParameterRule {
                kind: RuleKind::Unsigned {
                    standard: 10,
                    min: 0,
                    max: 50,
                },
                randomized: true,
                message: "Invalid value for creature1, should be between 0-50",
            },
            creature2: ParameterRule {
                kind: RuleKind::Unsigned {
                    standard: 10,
                    min: 0,
                    max: 50,
                },
                randomized: true,
                message: "Invalid value for creature2, should be between 0-50",
            },
            max_rounds: ParameterRule {
                kind: RuleKind::Signed {
                    standard: 50,
                    min: 1,
                    max: 100,
                },
                randomized: false,
                message: "Invalid value for max rounds, should be between 1-100",
            },
            gamelog_size: ParameterRule {
                kind: RuleKind::Signed {
                    standard: 40,
                    min: 20,
                    max: 75,
                },
                randomized: false,
                message: "Invalid value for gamelog size, should be between 20-75",
            },
        }
    }

    /// Look up the rule for a parameter.
    pub const fn rule(&self, parameter: Parameter) -> &ParameterRule {
        match parameter {
            Parameter::Rows => &self.rows,
            Parameter::Cols => &self.cols,
            Parameter::Draw => &self.draw,
            Parameter::Foods => &self.foods,
            Parameter::Creature1 => &self.creature1,
            Parameter::Creature2 => &self.creature2,
            Parameter::MaxRounds => &self.max_rounds,
            Parameter::GamelogSize => &self.gamelog_size,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_parameter_resolves_its_own_key() {
        for parameter in Parameter::ALL {
            assert_eq!(Parameter::from_key(parameter.as_str()), Some(parameter));
        }
    }

    #[test]
    fn unknown_key_resolves_to_none() {
        assert_eq!(Parameter::from_key("velocity"), None);
        assert_eq!(Parameter::from_key(""), None);
        // Parameter names are case-sensitive, like the query grammar.
        assert_eq!(Parameter::from_key("Rows"), None);
    }

    #[test]
    fn standard_table_bounds_are_well_formed() {
        let rules = RuleSet::standard();
        for parameter in Parameter::ALL {
            if let Some(bounds) = rules.rule(parameter).kind.bounds() {
                assert!(bounds.min <= bounds.max, "{parameter}: inverted bound");
            }
        }
    }

    #[test]
    fn boolean_rule_has_no_bounds() {
        let rules = RuleSet::standard();
        assert!(rules.rule(Parameter::Draw).kind.bounds().is_none());
    }

    #[test]
    fn randomized_flags_match_the_exempt_set() {
        let rules = RuleSet::standard();
        for parameter in Parameter::ALL {
            let expected = !matches!(
                parameter,
                Parameter::Draw | Parameter::MaxRounds | Parameter::GamelogSize
            );
            assert_eq!(rules.rule(parameter).randomized, expected, "{parameter}");
        }
    }
}
