//! Teams and the alliance relation between them

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::battle::units::UnitRoster;
use crate::core::error::{CombatError, Result};
use crate::core::types::TeamId;

/// How one team regards another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Alliance {
    #[serde(rename = "Self")]
    SelfTeam,
    #[default]
    Neutral,
    Enemy,
    Allied,
    Hero,
}

impl Alliance {
    /// Friendly relations that forbid attacking
    pub fn is_friendly(&self) -> bool {
        matches!(self, Alliance::SelfTeam | Alliance::Allied | Alliance::Hero)
    }
}

impl FromStr for Alliance {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "self" => Ok(Alliance::SelfTeam),
            "neutral" => Ok(Alliance::Neutral),
            "enemy" => Ok(Alliance::Enemy),
            "allied" => Ok(Alliance::Allied),
            "hero" => Ok(Alliance::Hero),
            other => Err(CombatError::InvalidConfig(format!(
                "unknown alliance '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Alliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alliance::SelfTeam => "Self",
            Alliance::Neutral => "Neutral",
            Alliance::Enemy => "Enemy",
            Alliance::Allied => "Allied",
            Alliance::Hero => "Hero",
        };
        f.write_str(name)
    }
}

/// Directed team -> team relation table
///
/// Populated once at setup, read-only during combat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllianceTable {
    relations: HashMap<TeamId, HashMap<TeamId, Alliance>>,
}

impl AllianceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the configuration shape `[{ "0": { "1": "Enemy" } }]`
    ///
    /// Unparsable team keys are skipped; unparsable relations become Neutral.
    pub fn from_config(entries: &[BTreeMap<String, BTreeMap<String, String>>]) -> Self {
        let mut table = Self::new();

        for entry in entries {
            for (source_key, targets) in entry {
                let Ok(source) = source_key.trim().parse::<u32>() else {
                    tracing::warn!(key = %source_key, "Skipping alliance entry with invalid team id");
                    continue;
                };

                for (target_key, relation) in targets {
                    let Ok(target) = target_key.trim().parse::<u32>() else {
                        tracing::warn!(key = %target_key, "Skipping alliance target with invalid team id");
                        continue;
                    };

                    let alliance = relation.parse::<Alliance>().unwrap_or_else(|_| {
                        tracing::warn!(
                            relation = %relation,
                            "Could not parse alliance type, defaulting to Neutral"
                        );
                        Alliance::Neutral
                    });

                    tracing::debug!(source, target, %alliance, "Set alliance");
                    table.set(TeamId(source), TeamId(target), alliance);
                }
            }
        }

        table
    }

    /// Relation from `source` towards `target`
    pub fn get(&self, source: TeamId, target: TeamId) -> Alliance {
        if source == target {
            return Alliance::SelfTeam;
        }

        self.relations
            .get(&source)
            .and_then(|targets| targets.get(&target))
            .copied()
            .unwrap_or_default()
    }

    pub fn set(&mut self, source: TeamId, target: TeamId, alliance: Alliance) {
        self.relations
            .entry(source)
            .or_default()
            .insert(target, alliance);
    }

    /// Set the same relation in both directions
    pub fn set_mutual(&mut self, a: TeamId, b: TeamId, alliance: Alliance) {
        self.set(a, b, alliance);
        self.set(b, a, alliance);
    }

    pub fn are_allied(&self, a: TeamId, b: TeamId) -> bool {
        matches!(self.get(a, b), Alliance::Allied | Alliance::Hero)
    }

    pub fn are_enemies(&self, a: TeamId, b: TeamId) -> bool {
        self.get(a, b) == Alliance::Enemy
    }
}

/// A team taking part in combat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub is_ai: bool,
    pub defeated: bool,
}

impl Team {
    pub fn new(id: TeamId, is_ai: bool) -> Self {
        Self {
            id,
            name: String::new(),
            is_ai,
            defeated: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// The teams in a combat, in setup order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamRoster {
    teams: Vec<Team>,
}

impl TeamRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, team: Team) -> Result<()> {
        if self.get(team.id).is_some() {
            return Err(CombatError::DuplicateTeam(team.id));
        }
        self.teams.push(team);
        Ok(())
    }

    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Recompute every team's defeated flag from unit state
    pub fn update_defeat_status(&mut self, units: &UnitRoster) {
        for team in &mut self.teams {
            let defeated = units.is_team_defeated(team.id);
            if defeated && !team.defeated {
                tracing::info!(team = %team.id, "Team defeated");
            }
            team.defeated = defeated;
        }
    }

    pub fn undefeated(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter().filter(|t| !t.defeated)
    }
}
