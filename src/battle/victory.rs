//! Victory evaluation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::battle::teams::TeamRoster;
use crate::battle::units::UnitRoster;
use crate::core::error::CombatError;
use crate::core::types::TeamId;

/// Condition that ends a combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VictoryRule {
    /// Combat ends once at most one team has a unit that can still act
    #[default]
    LastTeamStanding,
}

impl FromStr for VictoryRule {
    type Err = CombatError;

    /// Case, spaces, `_` and `-` are ignored. Empty selects the default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "" | "lastteamstanding" => Ok(VictoryRule::LastTeamStanding),
            _ => Err(CombatError::UnknownVictoryRule(s.to_string())),
        }
    }
}

impl fmt::Display for VictoryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VictoryRule::LastTeamStanding => f.write_str("LastTeamStanding"),
        }
    }
}

/// Recomputes team defeat and applies the configured rule
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VictoryEvaluator {
    pub rule: VictoryRule,
}

impl VictoryEvaluator {
    pub fn new(rule: VictoryRule) -> Self {
        Self { rule }
    }

    pub fn is_victory_met(&self, teams: &mut TeamRoster, units: &UnitRoster) -> bool {
        teams.update_defeat_status(units);

        match self.rule {
            VictoryRule::LastTeamStanding => teams.undefeated().count() <= 1,
        }
    }

    /// Teams still standing, in setup order
    pub fn winners(&self, teams: &TeamRoster) -> Vec<TeamId> {
        teams.undefeated().map(|t| t.id).collect()
    }
}
