//! The seam to the external simulation engine.
//!
//! The real engine is a separate collaborator: it consumes a validated
//! [`SimulationConfig`] and returns a finished [`Board`]. Only that
//! contract is fixed here. [`SyntheticEngine`] is a deterministic
//! stand-in so the server binary and the test suite run without the
//! real engine linked in; it derives plausible per-round tallies from
//! the configuration without simulating board mechanics.

use std::collections::BTreeMap;

use vivarium_types::{Board, CreatureKind, Round, SimulationConfig};

/// The external engine invocation failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("simulation engine failure: {message}")]
pub struct EngineError {
    /// Description of the engine failure.
    pub message: String,
}

impl EngineError {
    /// Create an engine error from any displayable cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A simulation engine that turns a configuration into a finished board.
///
/// Implementations are synchronous and may block (the engine is CPU
/// bound); callers on the async runtime invoke them through
/// [`tokio::task::spawn_blocking`].
pub trait SimulationEngine: Send + Sync {
    /// Run one simulation to completion.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the engine cannot produce a board
    /// for the given configuration.
    fn run(&self, config: &SimulationConfig) -> Result<Board, EngineError>;
}

/// Deterministic stand-in engine.
///
/// Populations decay and respawn by fixed integer rules derived from
/// the configuration, producing a board whose rounds are numbered from
/// 1 and never exceed `max_rounds`. Two runs with the same
/// configuration yield the same board.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticEngine;

impl SimulationEngine for SyntheticEngine {
    fn run(&self, config: &SimulationConfig) -> Result<Board, EngineError> {
        if config.max_rounds < 1 {
            return Err(EngineError::new("configuration allows no rounds"));
        }

        let mut alive1 = config.creature1;
        let mut alive2 = config.creature2;
        let food = u64::try_from(config.foods).unwrap_or(0);

        let mut rounds = Vec::new();
        let mut id: u32 = 1;

        while i64::from(id) <= config.max_rounds && (alive1 > 0 || alive2 > 0) {
            // The slower creature kind starves faster once food per
            // head drops below one.
            let population = alive1.saturating_add(alive2);
            let starving = population > food;

            let killed1 = decay(alive1, if starving { 3 } else { 6 });
            let killed2 = decay(alive2, if starving { 4 } else { 8 });
            let spawned1 = if starving { 0 } else { alive1 / 8 };
            let spawned2 = if starving { 0 } else { alive2 / 8 };

            alive1 = alive1.saturating_sub(killed1).saturating_add(spawned1);
            alive2 = alive2.saturating_sub(killed2).saturating_add(spawned2);

            rounds.push(Round {
                id,
                alive_at_end: tally(alive1, alive2),
                killed: tally(killed1, killed2),
                spawned: tally(spawned1, spawned2),
            });

            id = id.saturating_add(1);
        }

        Ok(Board {
            rows: config.rows,
            cols: config.cols,
            rounds,
        })
    }
}

/// Integer decay: at least one casualty per round while anyone lives.
const fn decay(alive: u64, divisor: u64) -> u64 {
    if alive == 0 {
        0
    } else {
        let lost = alive / divisor;
        if lost == 0 { 1 } else { lost }
    }
}

/// Build a per-kind tally map, truncating to the summary count domain.
fn tally(creature1: u64, creature2: u64) -> BTreeMap<CreatureKind, u32> {
    let mut counts = BTreeMap::new();
    counts.insert(
        CreatureKind::Creature1,
        u32::try_from(creature1).unwrap_or(u32::MAX),
    );
    counts.insert(
        CreatureKind::Creature2,
        u32::try_from(creature2).unwrap_or(u32::MAX),
    );
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_engine_is_deterministic() {
        let config = SimulationConfig::default();
        let first = SyntheticEngine.run(&config);
        let second = SyntheticEngine.run(&config);
        assert_eq!(first, second);
    }

    #[test]
    fn rounds_are_numbered_from_one_and_bounded() {
        let config = SimulationConfig {
            max_rounds: 7,
            ..SimulationConfig::default()
        };
        let board = SyntheticEngine.run(&config).unwrap_or(Board {
            rows: 0,
            cols: 0,
            rounds: Vec::new(),
        });

        assert!(!board.rounds.is_empty());
        assert!(board.rounds.len() <= 7);
        for (index, round) in board.rounds.iter().enumerate() {
            let expected = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
            assert_eq!(round.id, expected);
        }
    }

    #[test]
    fn empty_world_produces_no_rounds() {
        let config = SimulationConfig {
            creature1: 0,
            creature2: 0,
            ..SimulationConfig::default()
        };
        let board = SyntheticEngine.run(&config).unwrap_or(Board {
            rows: 0,
            cols: 0,
            rounds: Vec::new(),
        });
        assert!(board.rounds.is_empty());
    }

    #[test]
    fn board_mirrors_config_dimensions() {
        let config = SimulationConfig {
            rows: 60,
            cols: 90,
            ..SimulationConfig::default()
        };
        let board = SyntheticEngine.run(&config).unwrap_or(Board {
            rows: 0,
            cols: 0,
            rounds: Vec::new(),
        });
        assert_eq!(board.rows, 60);
        assert_eq!(board.cols, 90);
    }
}
