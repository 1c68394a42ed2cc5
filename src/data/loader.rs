//! Load scenario files from disk
//!
//! A scenario is a game file plus the team and map files it names. Paths
//! inside the game file are resolved relative to the game file itself.

use std::path::{Path, PathBuf};

use crate::core::error::{CombatError, Result};
use crate::data::game::GameConfig;
use crate::data::map::MapConfig;
use crate::data::team::TeamConfig;

/// Everything needed to set up one combat
#[derive(Debug, Clone)]
pub struct Scenario {
    pub game: GameConfig,
    pub teams: Vec<TeamConfig>,
    pub map: MapConfig,
}

pub fn game_from_json(json: &str) -> Result<GameConfig> {
    Ok(serde_json::from_str(json)?)
}

pub fn team_from_json(json: &str) -> Result<TeamConfig> {
    Ok(serde_json::from_str(json)?)
}

pub fn map_from_json(json: &str) -> Result<MapConfig> {
    Ok(serde_json::from_str(json)?)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Could not read config file");
        CombatError::IoError(e)
    })
}

pub fn load_game(path: &Path) -> Result<GameConfig> {
    game_from_json(&read(path)?)
}

pub fn load_team(path: &Path) -> Result<TeamConfig> {
    team_from_json(&read(path)?)
}

pub fn load_map(path: &Path) -> Result<MapConfig> {
    map_from_json(&read(path)?)
}

/// Load a game file and every team and map file it references
pub fn load_scenario(game_path: &Path) -> Result<Scenario> {
    let game = load_game(game_path)?;
    let base = game_path.parent().map(Path::to_path_buf).unwrap_or_default();

    if game.teams.is_empty() {
        return Err(CombatError::InvalidConfig(format!(
            "{} lists no team files",
            game_path.display()
        )));
    }
    if game.map.map_file.is_empty() {
        return Err(CombatError::InvalidConfig(format!(
            "{} names no map file",
            game_path.display()
        )));
    }

    let teams = game
        .teams
        .iter()
        .map(|file| load_team(&resolve(&base, file)))
        .collect::<Result<Vec<_>>>()?;
    let map = load_map(&resolve(&base, &game.map.map_file))?;

    tracing::info!(
        game = %game_path.display(),
        teams = teams.len(),
        map = %map.general.map_name,
        "Loaded scenario"
    );

    Ok(Scenario { game, teams, map })
}

fn resolve(base: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute() {
        let base = Path::new("/scenarios/duel");
        assert_eq!(
            resolve(base, "team_0.json"),
            PathBuf::from("/scenarios/duel/team_0.json")
        );
        assert_eq!(resolve(base, "/maps/flat.json"), PathBuf::from("/maps/flat.json"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_game(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(CombatError::IoError(_))));
    }

    #[test]
    fn test_malformed_json_is_serde_error() {
        assert!(matches!(
            team_from_json("{ \"TeamId\": \"zero\" }"),
            Err(CombatError::SerdeError(_))
        ));
    }
}
