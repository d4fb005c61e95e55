//! Configuration rule engine for the Vivarium simulation API.
//!
//! Turns untyped key/value input (URL query parameters or randomly drawn
//! interval values) into a validated
//! [`SimulationConfig`](vivarium_types::SimulationConfig) without
//! hand-written per-field branches:
//!
//! - [`rule`] -- the declarative parameter table: one
//!   [`ParameterRule`](rule::ParameterRule) per configurable field,
//!   carrying its kind, standard value, and inclusive bound
//! - [`validate`] -- type- and bound-checks a raw value map against the
//!   table, aborting on the first failing field
//! - [`sample`] -- draws uniformly random in-interval values per field
//!   and feeds them through the validator
//!
//! The rule table is immutable after construction and is shared freely
//! across concurrent validators.

pub mod error;
pub mod rule;
pub mod sample;
pub mod validate;

// Re-export primary types for convenience.
pub use error::{SampleError, ValidationError};
pub use rule::{Bounds, Parameter, ParameterRule, RuleKind, RuleSet, RuleValue};
pub use sample::{Interval, IntervalMap, sample_config, standard_intervals};
pub use validate::{RawValue, RawValueMap, validate};
