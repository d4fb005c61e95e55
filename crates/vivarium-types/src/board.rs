//! Finished-board shape and per-round summary projections.
//!
//! The external simulation engine consumes a
//! [`SimulationConfig`](crate::config::SimulationConfig) and produces a
//! [`Board`]. Only that output contract is modeled here; the board's
//! evolution is the engine's business.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A creature category on the board.
///
/// The engine tracks two competing creature kinds. Food and empty cells
/// never appear in round tallies, so they are not represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureKind {
    /// The first creature population.
    Creature1,
    /// The second creature population.
    Creature2,
}

/// Aggregate tallies for one finished round.
///
/// Round identifiers are monotonic from 1 in board order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Round identifier, starting at 1.
    pub id: u32,
    /// Creatures still alive when the round ended.
    pub alive_at_end: BTreeMap<CreatureKind, u32>,
    /// Creatures killed during the round.
    pub killed: BTreeMap<CreatureKind, u32>,
    /// Creatures spawned during the round.
    pub spawned: BTreeMap<CreatureKind, u32>,
}

/// A finished simulation board as returned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Row count the board was created with.
    pub rows: i64,
    /// Column count the board was created with.
    pub cols: i64,
    /// Per-round aggregates in round order.
    pub rounds: Vec<Round>,
}

/// Which aggregate tally a round summary projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    /// Creatures alive when each round ended.
    AliveAtEnd,
    /// Creatures killed during each round.
    Killed,
    /// Creatures spawned during each round.
    Spawned,
}

impl SummaryKind {
    /// Query-parameter spelling of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AliveAtEnd => "alive",
            Self::Killed => "killed",
            Self::Spawned => "spawned",
        }
    }
}

/// The requested summary kind does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown summary kind: {0}, expected one of alive, killed, spawned")]
pub struct UnknownSummaryKind(pub String);

impl FromStr for SummaryKind {
    type Err = UnknownSummaryKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alive" => Ok(Self::AliveAtEnd),
            "killed" => Ok(Self::Killed),
            "spawned" => Ok(Self::Spawned),
            other => Err(UnknownSummaryKind(String::from(other))),
        }
    }
}

/// Per-round projection served to API callers.
///
/// One tally per creature kind, selected by the caller's
/// [`SummaryKind`]. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Round identifier, starting at 1.
    pub id: u32,
    /// Aggregate count per creature kind.
    pub creatures: BTreeMap<CreatureKind, u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_kind_round_trips_through_str() {
        for kind in [SummaryKind::AliveAtEnd, SummaryKind::Killed, SummaryKind::Spawned] {
            assert_eq!(kind.as_str().parse::<SummaryKind>(), Ok(kind));
        }
    }

    #[test]
    fn summary_kind_rejects_unknown_spelling() {
        let err = "Alive".parse::<SummaryKind>();
        assert_eq!(err, Err(UnknownSummaryKind(String::from("Alive"))));
    }

    #[test]
    fn creature_kind_serializes_snake_case() {
        let json = serde_json::to_string(&CreatureKind::Creature1).unwrap_or_default();
        assert_eq!(json, "\"creature1\"");
    }
}
