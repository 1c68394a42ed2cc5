//! Scenario configuration: JSON models and loaders

pub mod game;
pub mod loader;
pub mod map;
pub mod team;

pub use game::{AllianceEntry, GameConfig, GeneralConfig, MapReference};
pub use loader::{load_game, load_map, load_scenario, load_team, Scenario};
pub use map::{MapConfig, MapGeneralConfig, TileConfig};
pub use team::{TeamConfig, UnitConfig};
