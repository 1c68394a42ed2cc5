//! Read-only view of a combat handed to decision-makers

use crate::battle::board::Board;
use crate::battle::position::Position;
use crate::battle::teams::{AllianceTable, TeamRoster};
use crate::battle::units::{Unit, UnitRoster};
use crate::core::config::CombatConfig;
use crate::core::types::{Tick, UnitId};

/// Borrowed snapshot of combat state
///
/// Decision-makers never mutate combat state; they answer with an
/// `ActionRequest` that the combat loop validates and resolves.
pub struct DecisionView<'a> {
    pub units: &'a UnitRoster,
    pub teams: &'a TeamRoster,
    pub alliances: &'a AllianceTable,
    pub board: &'a Board,
    pub config: &'a CombatConfig,
    pub tick: Tick,
}

impl<'a> DecisionView<'a> {
    pub fn unit(&self, id: UnitId) -> Option<&'a Unit> {
        self.units.get(id)
    }

    pub fn position_of(&self, id: UnitId) -> Option<Position> {
        self.board.get_unit_position(id)
    }

    /// Living units on the board that `actor`'s team regards as enemies,
    /// with their positions, in id order
    pub fn enemies_of(&self, actor: UnitId) -> Vec<(&'a Unit, Position)> {
        let Some(me) = self.units.get(actor) else {
            return Vec::new();
        };

        let mut enemies: Vec<(&'a Unit, Position)> = self
            .units
            .living_units()
            .filter(|u| u.id != actor && self.alliances.are_enemies(me.team, u.team))
            .filter_map(|u| self.board.get_unit_position(u.id).map(|p| (u, p)))
            .collect();
        enemies.sort_by_key(|(u, _)| u.id);
        enemies
    }

    /// Height step a unit can take: its own jump, but never less than the
    /// configured baseline
    pub fn jump_tolerance(&self, unit: &Unit) -> i32 {
        unit.jump.max(self.config.max_jump_delta)
    }
}
