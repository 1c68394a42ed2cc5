//! Build a combat from loaded scenario configuration
//!
//! Teams are registered in file order, unit ids are dealt by the snake
//! draft, and each team is placed on its own contiguous run of start tiles
//! (row-major), so the first team starts on the lowest rows and the last
//! team on the highest.

use crate::battle::board::Board;
use crate::battle::draft::snake_draft;
use crate::battle::execution::CombatState;
use crate::battle::teams::{AllianceTable, Team, TeamRoster};
use crate::battle::units::{Unit, UnitRoster};
use crate::battle::victory::VictoryRule;
use crate::core::config::CombatConfig;
use crate::core::error::{CombatError, Result};
use crate::core::types::{TeamId, UnitId};
use crate::data::loader::Scenario;
use crate::data::team::UnitConfig;

fn unit_from_config(id: UnitId, team: TeamId, config: &UnitConfig) -> Result<Unit> {
    // CT may only drop at turn end, so speed cannot be negative
    if config.speed < 0 {
        return Err(CombatError::InvalidConfig(format!(
            "unit '{}' of team {} has negative speed {}",
            config.name, team, config.speed
        )));
    }

    let name = if config.name.is_empty() {
        format!("Unit {}", id)
    } else {
        config.name.clone()
    };

    Ok(Unit::new(id, team)
        .with_name(name)
        .with_stats(config.hp, config.speed, config.pa)
        .with_movement(config.move_range, config.jump)
        .with_ct(config.initial_ct))
}

/// Build a ready-to-run combat from a loaded scenario
///
/// Every failure here is a setup error and is returned to the caller.
pub fn build_combat(scenario: &Scenario, config: CombatConfig) -> Result<CombatState> {
    config.validate().map_err(CombatError::InvalidConfig)?;
    let rule: VictoryRule = scenario.game.general.victory_condition.parse()?;

    let mut teams = TeamRoster::new();
    for team_config in &scenario.teams {
        let id = TeamId(team_config.team_id);
        teams.add(Team::new(id, team_config.is_ai).with_name(team_config.team_name.clone()))?;
    }

    let alliances = AllianceTable::from_config(&scenario.game.general.alliances);

    let sizes: Vec<(TeamId, usize)> = scenario
        .teams
        .iter()
        .map(|t| (TeamId(t.team_id), t.units.len()))
        .collect();
    let picks = snake_draft(&sizes);

    let mut board = Board::from_config(&scenario.map)?;
    let starts = board.start_positions();
    if starts.len() < picks.len() {
        return Err(CombatError::InvalidConfig(format!(
            "map '{}' has {} start tiles for {} units",
            scenario.map.general.map_name,
            starts.len(),
            picks.len()
        )));
    }

    // First start tile index for each team, in file order
    let offsets: Vec<usize> = sizes
        .iter()
        .scan(0, |next, (_, count)| {
            let offset = *next;
            *next += count;
            Some(offset)
        })
        .collect();

    let mut units = UnitRoster::new(config.ct_threshold);
    for pick in &picks {
        let team_index = scenario
            .teams
            .iter()
            .position(|t| TeamId(t.team_id) == pick.team)
            .ok_or(CombatError::TeamNotFound(pick.team))?;
        let unit_config = &scenario.teams[team_index].units[pick.slot];

        units.add(unit_from_config(pick.unit_id, pick.team, unit_config)?)?;
        let position = starts[offsets[team_index] + pick.slot];
        board.place_unit(pick.unit_id, position)?;

        tracing::debug!(
            unit = %pick.unit_id,
            team = %pick.team,
            %position,
            "Placed unit"
        );
    }

    CombatState::new(units, teams, alliances, board, config, rule)
}
