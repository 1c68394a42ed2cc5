//! Team files: team identity, control and unit stats

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TeamConfig {
    pub team_id: u32,
    pub team_name: String,
    #[serde(rename = "IsAI", alias = "IsAi")]
    pub is_ai: bool,
    pub units: Vec<UnitConfig>,
}

/// Stats for one unit
///
/// `unit_id` identifies the unit inside its file only; combat ids are
/// reassigned by the snake draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UnitConfig {
    pub unit_id: u32,
    pub name: String,
    #[serde(rename = "HP", alias = "Hp")]
    pub hp: i32,
    pub speed: i32,
    #[serde(rename = "PA", alias = "Pa")]
    pub pa: i32,
    #[serde(rename = "Move")]
    pub move_range: u32,
    pub jump: i32,
    #[serde(rename = "InitialCT", alias = "InitialCt")]
    pub initial_ct: i32,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            unit_id: 0,
            name: String::new(),
            hp: 1,
            speed: 0,
            pa: 0,
            move_range: 0,
            jump: 0,
            initial_ct: 0,
        }
    }
}
