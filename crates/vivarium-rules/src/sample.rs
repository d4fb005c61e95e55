//! Randomized configuration sampling.
//!
//! [`sample_config`] draws a uniformly distributed integer inside each
//! randomized parameter's inclusive interval, then feeds the draws
//! through the validator so a sampled configuration honors exactly the
//! same bound guarantees as a hand-supplied one.
//!
//! The caller supplies the random generator. Concurrent batch workers
//! each use their own thread-local `rand::rng()`, so no mutable RNG
//! state is ever shared across tasks.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::debug;
use vivarium_types::SimulationConfig;

use crate::error::SampleError;
use crate::rule::{Parameter, RuleSet};
use crate::validate::{RawValue, RawValueMap, validate};

/// Inclusive `[min, max]` sampling range for one parameter.
///
/// Distinct from the rule's own bound: an interval is the (narrower)
/// range random configurations are drawn from, and must lie within the
/// rule bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// Lowest drawable value.
    pub min: i64,
    /// Highest drawable value.
    pub max: i64,
}

/// Per-parameter sampling intervals.
pub type IntervalMap = BTreeMap<Parameter, Interval>;

/// The standard sampling intervals used by the random endpoints.
///
/// Each lies strictly inside its rule bound; the containment is still
/// re-checked on every sample so a future edit here cannot silently
/// break the configuration invariant.
pub fn standard_intervals() -> IntervalMap {
    let mut intervals = IntervalMap::new();
    intervals.insert(Parameter::Rows, Interval { min: 50, max: 150 });
    intervals.insert(Parameter::Cols, Interval { min: 50, max: 150 });
    intervals.insert(Parameter::Foods, Interval { min: 50, max: 150 });
    intervals.insert(Parameter::Creature1, Interval { min: 5, max: 25 });
    intervals.insert(Parameter::Creature2, Interval { min: 5, max: 25 });
    intervals
}

/// Draw a random configuration from the given intervals.
///
/// Every randomized parameter in the rule set needs an interval;
/// exempt parameters (the draw flag and the free-form sizing fields)
/// always take their standard values.
///
/// # Errors
///
/// Returns [`SampleError::MissingInterval`] when a randomized parameter
/// has no interval, [`SampleError::IntervalOutOfBounds`] when an
/// interval is inverted or escapes the rule bound, and
/// [`SampleError::Validation`] if the drawn values fail rule validation.
pub fn sample_config(
    rules: &RuleSet,
    intervals: &IntervalMap,
    rng: &mut impl Rng,
) -> Result<SimulationConfig, SampleError> {
    let mut raw = RawValueMap::new();

    for parameter in Parameter::ALL {
        let rule = rules.rule(parameter);
        if !rule.randomized {
            continue;
        }

        let interval = intervals
            .get(&parameter)
            .copied()
            .ok_or(SampleError::MissingInterval { parameter })?;
        check_interval(parameter, rules, interval)?;

        let value = rng.random_range(interval.min..=interval.max);
        debug!(%parameter, value, "sampled parameter value");
        raw.insert(parameter, RawValue::Integer(value));
    }

    Ok(validate(&raw, rules)?)
}

/// Require an interval to be well-formed and contained in its rule
/// bound.
fn check_interval(
    parameter: Parameter,
    rules: &RuleSet,
    interval: Interval,
) -> Result<(), SampleError> {
    let Some(bounds) = rules.rule(parameter).kind.bounds() else {
        return Err(SampleError::IntervalOutOfBounds { parameter });
    };
    if interval.min > interval.max || interval.min < bounds.min || interval.max > bounds.max {
        return Err(SampleError::IntervalOutOfBounds { parameter });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn sampled_config_stays_inside_intervals() {
        let rules = RuleSet::standard();
        let intervals = standard_intervals();
        let mut rng = SmallRng::seed_from_u64(7);

        let mut saw_min = false;
        let mut saw_max = false;

        for _ in 0..1000 {
            let config = sample_config(&rules, &intervals, &mut rng)
                .unwrap_or_default();
            assert!((50..=150).contains(&config.rows));
            assert!((50..=150).contains(&config.cols));
            assert!((50..=150).contains(&config.foods));
            assert!((5..=25).contains(&config.creature1));
            assert!((5..=25).contains(&config.creature2));

            saw_min |= config.creature1 == 5 || config.creature2 == 5;
            saw_max |= config.creature1 == 25 || config.creature2 == 25;
        }

        // Coverage sanity: across 1000 draws both creature endpoints
        // should have been realized at least once.
        assert!(saw_min, "interval minimum never drawn");
        assert!(saw_max, "interval maximum never drawn");
    }

    #[test]
    fn exempt_parameters_keep_standard_values() {
        let rules = RuleSet::standard();
        let intervals = standard_intervals();
        let mut rng = SmallRng::seed_from_u64(11);

        let config = sample_config(&rules, &intervals, &mut rng).unwrap_or_default();
        assert!(!config.draw);
        assert_eq!(config.max_rounds, 50);
        assert_eq!(config.gamelog_size, 40);
    }

    #[test]
    fn missing_interval_fails_fast() {
        let rules = RuleSet::standard();
        let mut intervals = standard_intervals();
        intervals.remove(&Parameter::Foods);
        let mut rng = SmallRng::seed_from_u64(3);

        let err = sample_config(&rules, &intervals, &mut rng);
        assert_eq!(
            err,
            Err(SampleError::MissingInterval {
                parameter: Parameter::Foods
            })
        );
    }

    #[test]
    fn interval_escaping_the_rule_bound_is_rejected() {
        let rules = RuleSet::standard();
        let mut intervals = standard_intervals();
        // The creature1 rule bound is [0, 50].
        intervals.insert(Parameter::Creature1, Interval { min: 5, max: 60 });
        let mut rng = SmallRng::seed_from_u64(3);

        let err = sample_config(&rules, &intervals, &mut rng);
        assert_eq!(
            err,
            Err(SampleError::IntervalOutOfBounds {
                parameter: Parameter::Creature1
            })
        );
    }

    #[test]
    fn inverted_interval_is_rejected() {
        let rules = RuleSet::standard();
        let mut intervals = standard_intervals();
        intervals.insert(Parameter::Rows, Interval { min: 150, max: 50 });
        let mut rng = SmallRng::seed_from_u64(3);

        let err = sample_config(&rules, &intervals, &mut rng);
        assert_eq!(
            err,
            Err(SampleError::IntervalOutOfBounds {
                parameter: Parameter::Rows
            })
        );
    }

    #[test]
    fn degenerate_single_point_interval_is_allowed() {
        let rules = RuleSet::standard();
        let mut intervals = standard_intervals();
        intervals.insert(Parameter::Rows, Interval { min: 77, max: 77 });
        let mut rng = SmallRng::seed_from_u64(3);

        let config = sample_config(&rules, &intervals, &mut rng).unwrap_or_default();
        assert_eq!(config.rows, 77);
    }
}
