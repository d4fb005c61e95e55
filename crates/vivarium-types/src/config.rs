//! The validated simulation configuration.
//!
//! A [`SimulationConfig`] is only ever constructed by the rule engine in
//! `vivarium-rules`, which guarantees that every field satisfies its
//! parameter rule's bound. Downstream code (the engine seam, the batch
//! runner) relies on that invariant without re-checking.

use serde::{Deserialize, Serialize};

/// Fully validated input for one simulation run.
///
/// Constructed once per run, immutable thereafter, and owned by the task
/// that hands it to the engine. `Default` yields the standard parameter
/// values from the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Board row count.
    pub rows: i64,
    /// Board column count.
    pub cols: i64,
    /// Number of food objects placed on the board.
    pub foods: i64,
    /// Whether the engine renders the board while running.
    pub draw: bool,
    /// Starting population of the first creature kind.
    pub creature1: u64,
    /// Starting population of the second creature kind.
    pub creature2: u64,
    /// Maximum number of rounds before the run is cut off.
    pub max_rounds: i64,
    /// Ring-buffer size of the engine's game log.
    pub gamelog_size: i64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: 40,
            cols: 100,
            foods: 75,
            draw: false,
            creature1: 10,
            creature2: 10,
            max_rounds: 50,
            gamelog_size: 40,
        }
    }
}
