//! Concurrent batch runner.
//!
//! [`run_batch`] fans out one Tokio task per requested iteration. Each
//! unit samples its own random configuration, invokes the engine on the
//! blocking pool, projects round summaries, and posts its result into
//! an mpsc collector channel. A single aggregating receiver drains
//! exactly `iterations` messages, so the shared result container is
//! never appended to concurrently.
//!
//! The whole fan-in runs under a deadline. When it expires the receiver
//! is dropped and abandoned workers' sends fail harmlessly; a late unit
//! can never write into an outcome that has already been handed to the
//! response writer.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use vivarium_rules::{IntervalMap, RuleSet, SampleError, sample_config};
use vivarium_types::{RoundSummary, SummaryKind};

use crate::engine::{EngineError, SimulationEngine};
use crate::project::project_rounds;

/// Upper bound on batch size, capping resource use per request.
pub const MAX_BATCH_ITERATIONS: u32 = 100;

/// The batch could not run or did not converge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    /// The requested iteration count is outside `[1, 100]`. Checked
    /// before any work is dispatched.
    #[error("Either too few or too many iterations, interval should be between 1-100.")]
    InvalidIterationCount {
        /// The rejected iteration count.
        iterations: u32,
    },

    /// Not all units finished before the deadline.
    #[error("batch did not converge within {deadline:?}")]
    Timeout {
        /// The deadline that expired.
        deadline: Duration,
    },
}

/// One unit's failure inside an otherwise successful batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum UnitError {
    /// Random configuration sampling failed.
    #[error("{source}")]
    Sample {
        /// The underlying sampling failure.
        #[from]
        source: SampleError,
    },

    /// The engine invocation failed.
    #[error("{source}")]
    Engine {
        /// The underlying engine failure.
        #[from]
        source: EngineError,
    },

    /// The blocking engine task was cancelled or panicked.
    #[error("engine task aborted: {message}")]
    Task {
        /// Description of the abort.
        message: String,
    },
}

/// A successful simulation run within a batch.
///
/// `unit` is the launch index; results arrive in completion order, so
/// callers correlate through this field rather than through position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRun {
    /// Zero-based launch index of the unit that produced this run.
    pub unit: u32,
    /// Per-round summaries of the finished board.
    pub rounds: Vec<RoundSummary>,
}

/// A failed unit, recorded instead of silently dropping its slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchUnitFailure {
    /// Zero-based launch index of the failed unit.
    pub unit: u32,
    /// Human-readable failure description.
    pub message: String,
}

/// Aggregate result of one batch request.
///
/// `runs.len()` equals the number of units that succeeded; every
/// launched unit appears exactly once, either in `runs` or `failures`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Successful runs, in completion order.
    pub runs: Vec<BatchRun>,
    /// Failed units with their error messages.
    pub failures: Vec<BatchUnitFailure>,
}

/// Run `iterations` independent randomized simulations concurrently.
///
/// Blocks until every unit has completed or the deadline expires; there
/// is no partial early return. A single unit's failure does not abort
/// its siblings -- it is recorded in the outcome and excluded from the
/// successful runs.
///
/// # Errors
///
/// Returns [`BatchError::InvalidIterationCount`] for an iteration count
/// outside `[1, 100]` (before any unit is launched), or
/// [`BatchError::Timeout`] when the deadline elapses first.
pub async fn run_batch(
    engine: Arc<dyn SimulationEngine>,
    rules: Arc<RuleSet>,
    intervals: Arc<IntervalMap>,
    iterations: u32,
    kind: SummaryKind,
    deadline: Duration,
) -> Result<BatchOutcome, BatchError> {
    if iterations < 1 || iterations > MAX_BATCH_ITERATIONS {
        return Err(BatchError::InvalidIterationCount { iterations });
    }

    let capacity = usize::try_from(iterations).unwrap_or(1);
    let (tx, mut rx) = mpsc::channel::<(u32, Result<Vec<RoundSummary>, UnitError>)>(capacity);

    for unit in 0..iterations {
        let tx = tx.clone();
        let engine = Arc::clone(&engine);
        let rules = Arc::clone(&rules);
        let intervals = Arc::clone(&intervals);

        tokio::spawn(async move {
            let outcome = run_unit(engine, &rules, &intervals, kind).await;
            if tx.send((unit, outcome)).await.is_err() {
                // The batch already timed out; this unit's result is
                // discarded rather than written after handoff.
                debug!(unit, "batch collector gone, dropping late result");
            }
        });
    }
    drop(tx);

    let drain = async {
        let mut runs = Vec::new();
        let mut failures = Vec::new();
        let mut received: u32 = 0;

        while received < iterations {
            let Some((unit, outcome)) = rx.recv().await else {
                break;
            };
            match outcome {
                Ok(rounds) => runs.push(BatchRun { unit, rounds }),
                Err(error) => {
                    warn!(unit, %error, "batch unit failed");
                    failures.push(BatchUnitFailure {
                        unit,
                        message: error.to_string(),
                    });
                }
            }
            received = received.saturating_add(1);
        }

        BatchOutcome { runs, failures }
    };

    match tokio::time::timeout(deadline, drain).await {
        Ok(outcome) => Ok(outcome),
        Err(_elapsed) => {
            warn!(iterations, ?deadline, "batch timed out before convergence");
            Err(BatchError::Timeout { deadline })
        }
    }
}

/// One fan-out unit: sample, run the engine, project.
async fn run_unit(
    engine: Arc<dyn SimulationEngine>,
    rules: &RuleSet,
    intervals: &IntervalMap,
    kind: SummaryKind,
) -> Result<Vec<RoundSummary>, UnitError> {
    // The thread-local generator is scoped so nothing non-Send lives
    // across the await below.
    let config = {
        let mut rng = rand::rng();
        sample_config(rules, intervals, &mut rng)?
    };

    let board = tokio::task::spawn_blocking(move || engine.run(&config))
        .await
        .map_err(|join_error| UnitError::Task {
            message: join_error.to_string(),
        })??;

    Ok(project_rounds(&board, kind))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicU32, Ordering};

    use vivarium_rules::standard_intervals;
    use vivarium_types::{Board, SimulationConfig};

    use crate::engine::SyntheticEngine;

    use super::*;

    /// Stub engine counting invocations, optionally failing every
    /// third call (counter values 0, 3, 6, ...).
    #[derive(Default)]
    struct CountingEngine {
        calls: AtomicU32,
        fail_every_third: bool,
    }

    impl CountingEngine {
        fn failing() -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail_every_third: true,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SimulationEngine for CountingEngine {
        fn run(&self, config: &SimulationConfig) -> Result<Board, EngineError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_every_third && n % 3 == 0 {
                return Err(EngineError::new("stubbed failure"));
            }
            SyntheticEngine.run(config)
        }
    }

    /// Stub engine that sleeps long enough to trip any short deadline.
    struct SlowEngine;

    impl SimulationEngine for SlowEngine {
        fn run(&self, config: &SimulationConfig) -> Result<Board, EngineError> {
            std::thread::sleep(Duration::from_millis(250));
            SyntheticEngine.run(config)
        }
    }

    fn fixtures() -> (Arc<RuleSet>, Arc<IntervalMap>) {
        (
            Arc::new(RuleSet::standard()),
            Arc::new(standard_intervals()),
        )
    }

    const DEADLINE: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn ten_iterations_yield_ten_runs() {
        let engine = Arc::new(CountingEngine::default());
        let (rules, intervals) = fixtures();

        let outcome = run_batch(
            engine.clone(),
            rules,
            intervals,
            10,
            SummaryKind::AliveAtEnd,
            DEADLINE,
        )
        .await;

        let outcome = outcome.unwrap_or(BatchOutcome {
            runs: Vec::new(),
            failures: Vec::new(),
        });
        assert_eq!(outcome.runs.len(), 10);
        assert!(outcome.failures.is_empty());
        assert_eq!(engine.calls(), 10);

        // Every launch index appears exactly once.
        let units: BTreeSet<u32> = outcome.runs.iter().map(|run| run.unit).collect();
        assert_eq!(units, (0..10).collect::<BTreeSet<u32>>());
    }

    #[tokio::test]
    async fn failing_units_are_annotated_not_dropped() {
        let engine = Arc::new(CountingEngine::failing());
        let (rules, intervals) = fixtures();

        let outcome = run_batch(
            engine.clone(),
            rules,
            intervals,
            10,
            SummaryKind::AliveAtEnd,
            DEADLINE,
        )
        .await;

        let outcome = outcome.unwrap_or(BatchOutcome {
            runs: Vec::new(),
            failures: Vec::new(),
        });
        // Calls 0, 3, 6, 9 fail: 10 - ceil(10 / 3) = 6 successes.
        assert_eq!(outcome.runs.len(), 6);
        assert_eq!(outcome.failures.len(), 4);
        assert_eq!(engine.calls(), 10);

        let mut units: BTreeSet<u32> = outcome.runs.iter().map(|run| run.unit).collect();
        units.extend(outcome.failures.iter().map(|failure| failure.unit));
        assert_eq!(units, (0..10).collect::<BTreeSet<u32>>());

        for failure in &outcome.failures {
            assert!(failure.message.contains("stubbed failure"));
        }
    }

    #[tokio::test]
    async fn zero_iterations_rejected_before_dispatch() {
        let engine = Arc::new(CountingEngine::default());
        let (rules, intervals) = fixtures();

        let err = run_batch(
            engine.clone(),
            rules,
            intervals,
            0,
            SummaryKind::AliveAtEnd,
            DEADLINE,
        )
        .await;

        assert_eq!(err, Err(BatchError::InvalidIterationCount { iterations: 0 }));
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn oversized_batch_rejected_before_dispatch() {
        let engine = Arc::new(CountingEngine::default());
        let (rules, intervals) = fixtures();

        let err = run_batch(
            engine.clone(),
            rules,
            intervals,
            101,
            SummaryKind::AliveAtEnd,
            DEADLINE,
        )
        .await;

        assert_eq!(
            err,
            Err(BatchError::InvalidIterationCount { iterations: 101 })
        );
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn repeated_full_batches_keep_exact_counts() {
        // Concurrency stress: the collector channel must deliver every
        // unit exactly once, run after run.
        let (rules, intervals) = fixtures();

        for _ in 0..50 {
            let engine = Arc::new(CountingEngine::default());
            let outcome = run_batch(
                engine.clone(),
                Arc::clone(&rules),
                Arc::clone(&intervals),
                100,
                SummaryKind::AliveAtEnd,
                DEADLINE,
            )
            .await;

            let outcome = outcome.unwrap_or(BatchOutcome {
                runs: Vec::new(),
                failures: Vec::new(),
            });
            assert_eq!(outcome.runs.len(), 100);
            assert!(outcome.failures.is_empty());
            assert_eq!(engine.calls(), 100);
        }
    }

    #[tokio::test]
    async fn slow_units_trip_the_deadline() {
        let engine = Arc::new(SlowEngine);
        let (rules, intervals) = fixtures();

        let deadline = Duration::from_millis(25);
        let err = run_batch(
            engine,
            rules,
            intervals,
            4,
            SummaryKind::AliveAtEnd,
            deadline,
        )
        .await;

        assert_eq!(err, Err(BatchError::Timeout { deadline }));
    }
}
