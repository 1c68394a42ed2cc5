//! Scenario and tuning file loading

use std::path::{Path, PathBuf};

use ct_tactics::battle::build_combat;
use ct_tactics::command::{parse_script, PlayerCommand};
use ct_tactics::core::config::CombatConfig;
use ct_tactics::core::error::CombatError;
use ct_tactics::data::{load_map, load_scenario, load_team};

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn test_bundled_tuning_file() {
    let config = CombatConfig::load(&data_dir().join("combat.toml")).unwrap();

    assert_eq!(config.ct_threshold, 100);
    assert_eq!(config.damage_variance_percent, 25);
    assert_eq!(config.max_action_retries, 3);
    assert_eq!(config.seed, Some(7));
}

#[test]
fn test_scenario_resolves_relative_paths() {
    let scenario = load_scenario(&data_dir().join("scenarios/skirmish/game.json")).unwrap();

    assert_eq!(scenario.game.general.victory_condition, "LastTeamStanding");
    assert_eq!(scenario.teams.len(), 2);
    assert_eq!(scenario.teams[0].team_name, "Blue");
    assert!(!scenario.teams[0].is_ai);
    assert!(scenario.teams[1].is_ai);
    assert_eq!(scenario.map.general.map_name, "Hillock");
    assert_eq!(scenario.map.tiles.len(), 36);
}

#[test]
fn test_map_file_flags() {
    let map = load_map(&data_dir().join("scenarios/skirmish/map.json")).unwrap();

    let rock = map.tiles.iter().find(|t| t.x == 0 && t.y == 3).unwrap();
    assert!(!rock.standable);
    assert!(!rock.traversable);

    let hill = map.tiles.iter().find(|t| t.x == 2 && t.y == 2).unwrap();
    assert_eq!(hill.z, 1);
    assert!(hill.standable);

    let starts = map.tiles.iter().filter(|t| t.can_player_start).count();
    assert_eq!(starts, 6);
}

#[test]
fn test_team_file_stats() {
    let team = load_team(&data_dir().join("scenarios/skirmish/red.json")).unwrap();

    let rogue = &team.units[1];
    assert_eq!(rogue.name, "Rogue");
    assert_eq!(rogue.hp, 28);
    assert_eq!(rogue.speed, 14);
    assert_eq!(rogue.pa, 8);
    assert_eq!(rogue.move_range, 4);
    assert_eq!(rogue.jump, 2);
}

#[test]
fn test_missing_game_file() {
    let result = load_scenario(&data_dir().join("scenarios/nowhere/game.json"));
    assert!(matches!(result, Err(CombatError::IoError(_))));
}

#[test]
fn test_tuning_file_drives_combat() {
    let scenario = load_scenario(&data_dir().join("scenarios/skirmish/game.json")).unwrap();
    let config = CombatConfig::load(&data_dir().join("combat.toml")).unwrap();

    let combat = build_combat(&scenario, config).unwrap();
    assert_eq!(combat.config.seed, Some(7));
    assert_eq!(combat.units.len(), 6);
}

#[test]
fn test_threshold_validation() {
    let scenario = load_scenario(&data_dir().join("scenarios/skirmish/game.json")).unwrap();
    let config = CombatConfig::from_toml_str("ct_threshold = -5").map(|_| ());

    assert!(matches!(config, Err(CombatError::InvalidConfig(_))));
    // A custom positive threshold still builds
    let custom = CombatConfig::from_toml_str("ct_threshold = 50").unwrap();
    assert!(build_combat(&scenario, custom).is_ok());
}

#[test]
fn test_bundled_command_script() {
    let text = std::fs::read_to_string(data_dir().join("scenarios/skirmish/commands.txt")).unwrap();
    let commands = parse_script(&text).unwrap();

    assert_eq!(commands.len(), 4);
    assert_eq!(commands[3], PlayerCommand::Move { x: 2, y: 2 });
}
