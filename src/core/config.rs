//! Combat tuning configuration
//!
//! All tunable numbers used by the scheduler and the action processor are
//! collected here. Values load from TOML; missing keys fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::battle::constants::{
    CT_THRESHOLD, DEFAULT_ATTACK_RANGE, DEFAULT_MAX_ACTION_RETRIES, DAMAGE_VARIANCE_PERCENT,
    MAX_JUMP_DELTA,
};
use crate::core::error::{CombatError, Result};

/// Configuration for a single combat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    // === READINESS ===
    /// CT a unit needs before it may open an active turn
    ///
    /// Also the amount subtracted from CT when a turn ends.
    pub ct_threshold: i32,

    // === DAMAGE ===
    /// Symmetric damage variance as a percentage of physical attack
    ///
    /// At 25, an attacker with PA 8 deals 6..=10 damage.
    pub damage_variance_percent: u32,

    // === BOARD ===
    /// Height difference any unit can step up or down, whatever its jump stat
    ///
    /// Units with a higher `jump` use their own value.
    pub max_jump_delta: i32,

    /// Manhattan distance at which the reference AI considers an enemy attackable
    pub attack_range: u32,

    // === TURN OWNERSHIP ===
    /// Failed actions tolerated in one opened turn before it is forfeited
    ///
    /// A failed action leaves the actor mid-turn so the decision re-opens.
    /// After this many failures the combat loop ends the turn itself.
    pub max_action_retries: u32,

    // === RANDOMNESS ===
    /// Seed for the damage RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            ct_threshold: CT_THRESHOLD,
            damage_variance_percent: DAMAGE_VARIANCE_PERCENT,
            max_jump_delta: MAX_JUMP_DELTA,
            attack_range: DEFAULT_ATTACK_RANGE,
            max_action_retries: DEFAULT_MAX_ACTION_RETRIES,
            seed: None,
        }
    }
}

impl CombatConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config with a fixed RNG seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CombatConfig = toml::from_str(content)?;
        config.validate().map_err(CombatError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.ct_threshold <= 0 {
            return Err(format!(
                "ct_threshold ({}) must be positive",
                self.ct_threshold
            ));
        }

        if self.damage_variance_percent > 100 {
            return Err(format!(
                "damage_variance_percent ({}) must be <= 100",
                self.damage_variance_percent
            ));
        }

        if self.max_jump_delta < 0 {
            return Err("max_jump_delta must not be negative".into());
        }

        if self.max_action_retries == 0 {
            return Err("max_action_retries must be at least 1".into());
        }

        Ok(())
    }
}
