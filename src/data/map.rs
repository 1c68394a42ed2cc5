//! Map files: tile grid with heights and flags

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MapConfig {
    pub general: MapGeneralConfig,
    pub tiles: Vec<TileConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MapGeneralConfig {
    pub map_name: String,
}

/// One tile; `z` is its height
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TileConfig {
    pub tile_id: u32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub standable: bool,
    pub traversable: bool,
    pub terrain: String,
    pub can_player_start: bool,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            tile_id: 0,
            x: 0,
            y: 0,
            z: 0,
            standable: true,
            traversable: true,
            terrain: "default".to_string(),
            can_player_start: false,
        }
    }
}
