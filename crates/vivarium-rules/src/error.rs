//! Error types for the configuration rule engine.
//!
//! [`ValidationError`] covers per-field failures while coercing raw
//! input against the rule table; [`SampleError`] adds the failure modes
//! specific to randomized sampling. Both carry the parameter they refer
//! to so callers can log precisely.

use crate::rule::Parameter;

/// A raw value failed validation against its parameter rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The raw value's shape does not match the rule's kind.
    #[error("For value: {parameter} the value was not a valid {expected}, as expected.")]
    InvalidType {
        /// The offending parameter.
        parameter: Parameter,
        /// The kind the rule demands.
        expected: &'static str,
    },

    /// The value parsed but lies outside the rule's inclusive bound.
    #[error("{message}")]
    OutOfBounds {
        /// The offending parameter.
        parameter: Parameter,
        /// The rule's constraint description.
        message: &'static str,
    },
}

/// Randomized sampling failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    /// No interval was supplied for a parameter that requires sampling.
    /// This is a configuration defect, not a user error, and fails fast.
    #[error("no sampling interval configured for parameter {parameter}")]
    MissingInterval {
        /// The parameter lacking an interval.
        parameter: Parameter,
    },

    /// The supplied interval is inverted or not contained in the
    /// parameter rule's own bound.
    #[error("sampling interval for parameter {parameter} is not within the rule bound")]
    IntervalOutOfBounds {
        /// The parameter with a bad interval.
        parameter: Parameter,
    },

    /// The drawn values failed rule validation.
    #[error("validation of sampled configuration failed: {source}")]
    Validation {
        /// The underlying validation failure.
        #[from]
        source: ValidationError,
    },
}
