//! Top-level scenario file: victory rule, alliances, team and map files

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Alliance entry shape: `{ "<source team>": { "<target team>": "Enemy" } }`
pub type AllianceEntry = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GameConfig {
    pub general: GeneralConfig,
    /// Team file paths, relative to the game file
    pub teams: Vec<String>,
    pub map: MapReference,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GeneralConfig {
    /// Victory rule name; empty selects Last Team Standing
    pub victory_condition: String,
    pub alliances: Vec<AllianceEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MapReference {
    /// Map file path, relative to the game file
    pub map_file: String,
}
