//! Read-only projection of a finished board into round summaries.

use vivarium_types::{Board, RoundSummary, SummaryKind};

/// Project one tally per round out of a finished board.
///
/// Selects the aggregate matching `kind` for every round, preserving
/// the board's round order. The kind is an exhaustive enum, so there is
/// no failure mode here; parsing an unknown kind fails earlier at the
/// request boundary.
pub fn project_rounds(board: &Board, kind: SummaryKind) -> Vec<RoundSummary> {
    board
        .rounds
        .iter()
        .map(|round| {
            let creatures = match kind {
                SummaryKind::AliveAtEnd => round.alive_at_end.clone(),
                SummaryKind::Killed => round.killed.clone(),
                SummaryKind::Spawned => round.spawned.clone(),
            };
            RoundSummary {
                id: round.id,
                creatures,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use vivarium_types::{CreatureKind, Round};

    use super::*;

    fn counts(creature1: u32, creature2: u32) -> BTreeMap<CreatureKind, u32> {
        let mut map = BTreeMap::new();
        map.insert(CreatureKind::Creature1, creature1);
        map.insert(CreatureKind::Creature2, creature2);
        map
    }

    fn board() -> Board {
        Board {
            rows: 40,
            cols: 100,
            rounds: vec![
                Round {
                    id: 1,
                    alive_at_end: counts(9, 8),
                    killed: counts(1, 2),
                    spawned: counts(0, 0),
                },
                Round {
                    id: 2,
                    alive_at_end: counts(7, 5),
                    killed: counts(2, 3),
                    spawned: counts(0, 0),
                },
            ],
        }
    }

    #[test]
    fn alive_projection_selects_the_alive_tally() {
        let summaries = project_rounds(&board(), SummaryKind::AliveAtEnd);
        let ids: Vec<u32> = summaries.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(
            summaries.first().map(|s| s.creatures.clone()),
            Some(counts(9, 8))
        );
    }

    #[test]
    fn killed_projection_selects_the_killed_tally() {
        let summaries = project_rounds(&board(), SummaryKind::Killed);
        assert_eq!(
            summaries.last().map(|s| s.creatures.clone()),
            Some(counts(2, 3))
        );
    }

    #[test]
    fn spawned_projection_selects_the_spawned_tally() {
        let summaries = project_rounds(&board(), SummaryKind::Spawned);
        assert!(
            summaries
                .iter()
                .all(|s| s.creatures.values().all(|count| *count == 0))
        );
    }

    #[test]
    fn empty_board_projects_to_empty_summary() {
        let empty = Board {
            rows: 5,
            cols: 5,
            rounds: Vec::new(),
        };
        assert!(project_rounds(&empty, SummaryKind::AliveAtEnd).is_empty());
    }
}
