//! Snake-draft unit id allocation
//!
//! Unit ids double as the turn-order tie-break, so they are dealt out
//! round by round: forward through the team list on even rounds, backward
//! on odd rounds. No team ends up holding all of the low ids.

use serde::{Deserialize, Serialize};

use crate::core::types::{TeamId, UnitId};

/// One id assignment: the `slot`-th unit of `team` receives `unit_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPick {
    pub team: TeamId,
    pub slot: usize,
    pub unit_id: UnitId,
}

/// Assign dense ids starting at 0 to every unit of every team
///
/// `teams` lists each team with its unit count in round-robin order.
/// Picks are returned in id order.
pub fn snake_draft(teams: &[(TeamId, usize)]) -> Vec<DraftPick> {
    let total: usize = teams.iter().map(|(_, count)| count).sum();
    let rounds = teams.iter().map(|(_, count)| *count).max().unwrap_or(0);

    let mut picks = Vec::with_capacity(total);
    let mut next_id = 0u32;

    for round in 0..rounds {
        let order: Box<dyn Iterator<Item = &(TeamId, usize)>> = if round % 2 == 0 {
            Box::new(teams.iter())
        } else {
            Box::new(teams.iter().rev())
        };

        for &(team, count) in order {
            if round < count {
                picks.push(DraftPick {
                    team,
                    slot: round,
                    unit_id: UnitId(next_id),
                });
                next_id += 1;
            }
        }
    }

    picks
}
