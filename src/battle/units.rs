//! Unit readiness model
//!
//! Every unit accumulates charge time (CT) by its speed each world tick.
//! Reaching the threshold makes it eligible for an active turn; ending a
//! turn subtracts the threshold again. HP reaching zero incapacitates the
//! unit for the rest of the combat.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::constants::CT_THRESHOLD;
use crate::core::error::{CombatError, Result};
use crate::core::types::{TeamId, UnitId};

/// A single combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub team: TeamId,
    pub name: String,

    // Readiness
    pub ct: i32,
    pub speed: i32,

    // Combat stats
    pub physical_attack: i32,
    pub hp: i32,
    pub max_hp: i32,

    // Movement
    pub move_range: u32,
    pub jump: i32,

    // State
    incapacitated: bool,
    mid_active_turn: bool,
}

impl Unit {
    pub fn new(id: UnitId, team: TeamId) -> Self {
        Self {
            id,
            team,
            name: String::new(),
            ct: 0,
            speed: 0,
            physical_attack: 0,
            hp: 1,
            max_hp: 1,
            move_range: 0,
            jump: 0,
            incapacitated: false,
            mid_active_turn: false,
        }
    }

    /// Builder-style stat setup used by setup code and tests
    pub fn with_stats(mut self, hp: i32, speed: i32, physical_attack: i32) -> Self {
        self.hp = hp.max(0);
        self.max_hp = hp.max(0);
        self.speed = speed;
        self.physical_attack = physical_attack;
        if self.hp == 0 {
            self.incapacitated = true;
        }
        self
    }

    pub fn with_movement(mut self, move_range: u32, jump: i32) -> Self {
        self.move_range = move_range;
        self.jump = jump;
        self
    }

    pub fn with_ct(mut self, ct: i32) -> Self {
        self.ct = ct.max(0);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_incapacitated(&self) -> bool {
        self.incapacitated
    }

    pub fn is_mid_active_turn(&self) -> bool {
        self.mid_active_turn
    }

    /// Can this unit open a fresh active turn?
    pub fn is_eligible_for_active_turn(&self, threshold: i32) -> bool {
        !self.incapacitated && self.ct >= threshold
    }

    /// Accumulate CT for one world tick
    ///
    /// No cap is applied on increment; only units below the threshold charge.
    /// CT never drops here, whatever the speed.
    pub fn advance_readiness(&mut self, threshold: i32) {
        if self.ct < threshold {
            self.ct = self.ct.saturating_add(self.speed.max(0));
        }
    }

    /// Apply an HP delta (negative for damage)
    ///
    /// HP never goes below zero. Incapacitation is sticky: healing an
    /// incapacitated unit restores HP but not its ability to act.
    pub fn apply_damage(&mut self, delta: i32) {
        self.hp = self.hp.saturating_add(delta);

        if self.hp <= 0 {
            self.hp = 0;
            self.incapacitated = true;
            // An incapacitated unit cannot finish an opened turn
            self.mid_active_turn = false;
        }
    }

    /// Mark a turn as opened but not yet concluded
    pub fn begin_turn(&mut self) {
        self.mid_active_turn = true;
    }

    /// Conclude the current turn. The only CT decrement path.
    pub fn end_turn(&mut self, threshold: i32) {
        self.mid_active_turn = false;
        self.ct = (self.ct - threshold).max(0);
    }
}

/// Debug row for a unit, ordered by id in `UnitRoster::summary`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub id: UnitId,
    pub team: TeamId,
    pub ct: i32,
    pub hp: i32,
    pub incapacitated: bool,
}

/// Owns every unit of a combat
///
/// Units live in a dense arena; other components refer to them by id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRoster {
    units: Vec<Unit>,
    index: AHashMap<UnitId, usize>,
    ct_threshold: i32,
}

impl Default for UnitRoster {
    fn default() -> Self {
        Self::new(CT_THRESHOLD)
    }
}

impl UnitRoster {
    pub fn new(ct_threshold: i32) -> Self {
        Self {
            units: Vec::new(),
            index: AHashMap::new(),
            ct_threshold,
        }
    }

    pub fn ct_threshold(&self) -> i32 {
        self.ct_threshold
    }

    /// Add a unit. Ids must be unique.
    pub fn add(&mut self, unit: Unit) -> Result<()> {
        if self.index.contains_key(&unit.id) {
            return Err(CombatError::DuplicateUnit(unit.id));
        }
        self.index.insert(unit.id, self.units.len());
        self.units.push(unit);
        Ok(())
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.index.get(&id).map(|&i| &self.units[i])
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        match self.index.get(&id) {
            Some(&i) => Some(&mut self.units[i]),
            None => None,
        }
    }

    fn require_mut(&mut self, id: UnitId) -> Result<&mut Unit> {
        self.get_mut(id).ok_or(CombatError::UnitNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.index.contains_key(&id)
    }

    /// Eligibility test for a unit id (false for unknown ids)
    pub fn eligible_for_active_turn(&self, id: UnitId) -> bool {
        self.get(id)
            .map(|u| u.is_eligible_for_active_turn(self.ct_threshold))
            .unwrap_or(false)
    }

    /// One world tick of CT for every non-incapacitated unit
    pub fn advance_all(&mut self) {
        let threshold = self.ct_threshold;
        for unit in self.units.iter_mut().filter(|u| !u.is_incapacitated()) {
            unit.advance_readiness(threshold);
        }
    }

    pub fn apply_damage(&mut self, id: UnitId, delta: i32) -> Result<&Unit> {
        let unit = self.require_mut(id)?;
        unit.apply_damage(delta);
        Ok(unit)
    }

    pub fn begin_turn(&mut self, id: UnitId) -> Result<()> {
        self.require_mut(id)?.begin_turn();
        Ok(())
    }

    pub fn end_turn(&mut self, id: UnitId) -> Result<()> {
        let threshold = self.ct_threshold;
        self.require_mut(id)?.end_turn(threshold);
        Ok(())
    }

    /// Select the unit whose turn comes next
    ///
    /// A mid-turn unit always outranks a fresh-eligible one regardless of CT.
    /// Within each group the lowest id wins.
    pub fn next_ready_unit(&self) -> Option<&Unit> {
        let mut mid_turn: Option<&Unit> = None;
        let mut fresh: Option<&Unit> = None;

        for unit in &self.units {
            if unit.is_mid_active_turn() {
                if mid_turn.map_or(true, |best| unit.id < best.id) {
                    mid_turn = Some(unit);
                }
            } else if unit.is_eligible_for_active_turn(self.ct_threshold)
                && fresh.map_or(true, |best| unit.id < best.id)
            {
                fresh = Some(unit);
            }
        }

        mid_turn.or(fresh)
    }

    pub fn is_any_unit_mid_turn(&self) -> bool {
        self.units.iter().any(|u| u.is_mid_active_turn())
    }

    /// True iff no unit of the team can still act (vacuously true for empty teams)
    pub fn is_team_defeated(&self, team: TeamId) -> bool {
        self.units
            .iter()
            .filter(|u| u.team == team)
            .all(|u| u.is_incapacitated())
    }

    pub fn units_on_team(&self, team: TeamId) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| u.team == team)
    }

    pub fn living_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| !u.is_incapacitated())
    }

    /// Unit table ordered by id, for debugging and runner output
    pub fn summary(&self) -> Vec<UnitSummary> {
        let mut rows: Vec<UnitSummary> = self
            .units
            .iter()
            .map(|u| UnitSummary {
                id: u.id,
                team: u.team,
                ct: u.ct,
                hp: u.hp,
                incapacitated: u.is_incapacitated(),
            })
            .collect();
        rows.sort_by_key(|row| row.id);
        rows
    }
}
