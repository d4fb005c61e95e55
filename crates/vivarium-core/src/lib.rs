//! Simulation orchestration for the Vivarium API.
//!
//! - [`engine`] -- the seam to the external simulation engine: the
//!   [`SimulationEngine`](engine::SimulationEngine) trait plus a
//!   deterministic synthetic stand-in for development and tests
//! - [`project`] -- read-only projection of a finished board into
//!   per-round summaries
//! - [`batch`] -- the concurrent batch runner: fan-out of independent
//!   randomized runs, channel-collected fan-in, deadline handling
//!
//! The engine's internal mechanics (creature movement, food
//! consumption, board evolution) are out of scope; everything here
//! treats a finished [`Board`](vivarium_types::Board) as opaque input.

pub mod batch;
pub mod engine;
pub mod project;

// Re-export primary types for convenience.
pub use batch::{BatchError, BatchOutcome, BatchRun, BatchUnitFailure, run_batch};
pub use engine::{EngineError, SimulationEngine, SyntheticEngine};
pub use project::project_rounds;
