//! Headless Combat Runner
//!
//! Loads a scenario, plays it out with the greedy AI (and an optional player
//! command script) and prints the result.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use ct_tactics::battle::{build_combat, run_to_completion, GreedyAi, ScriptedPlayer, UnitSummary};
use ct_tactics::command::parse_script;
use ct_tactics::core::config::CombatConfig;
use ct_tactics::core::error::Result;
use ct_tactics::data::load_scenario;

/// Headless Combat Runner - play a scenario to the end
#[derive(Parser, Debug)]
#[command(name = "combat_runner")]
#[command(about = "Run a CT tactics scenario and report the outcome")]
struct Args {
    /// Game file (JSON) naming the teams and map
    #[arg(long, default_value = "data/scenarios/skirmish/game.json")]
    game: PathBuf,

    /// Combat tuning file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum loop steps before giving up
    #[arg(long, default_value_t = 10_000)]
    max_steps: u64,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Player command script, one command per line
    #[arg(long)]
    commands: Option<PathBuf>,

    /// Print the combat log to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct CombatResult {
    completed: bool,
    winners: Vec<u32>,
    ticks: u64,
    steps: u64,
    seed: Option<u64>,
    units: Vec<UnitSummary>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ct_tactics=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => CombatConfig::load(path)?,
        None => CombatConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let seed = config.seed;

    let scenario = load_scenario(&args.game)?;
    tracing::info!(
        map = %scenario.map.general.map_name,
        teams = scenario.teams.len(),
        "Scenario loaded"
    );

    let script = match &args.commands {
        Some(path) => parse_script(&std::fs::read_to_string(path)?)?,
        None => Vec::new(),
    };

    let mut combat = build_combat(&scenario, config)?;
    let mut ai = GreedyAi::new();
    let mut player = ScriptedPlayer::new(script);

    let completed = run_to_completion(&mut combat, &mut ai, &mut player, args.max_steps)?;

    if args.verbose {
        for event in combat.events() {
            eprintln!("  [{}] {}", event.tick, event.description);
        }
        eprintln!();
    }

    let result = CombatResult {
        completed,
        winners: combat.winners().iter().map(|team| team.0).collect(),
        ticks: combat.tick(),
        steps: combat.steps(),
        seed,
        units: combat.units.summary(),
    };

    match args.format.as_str() {
        "text" => print_text(&result),
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn print_text(result: &CombatResult) {
    println!("Combat Result");
    println!("=============");
    if result.completed {
        let winners: Vec<String> = result.winners.iter().map(|t| format!("Team {}", t)).collect();
        if winners.is_empty() {
            println!("Outcome: no team standing");
        } else {
            println!("Outcome: {} wins", winners.join(", "));
        }
    } else {
        println!("Outcome: unfinished");
    }
    println!("Ticks: {}", result.ticks);
    println!("Steps: {}", result.steps);
    println!();
    for unit in &result.units {
        println!(
            "  Unit {:>2}  team {}  hp {:>3}  ct {:>3}{}",
            unit.id,
            unit.team,
            unit.hp,
            unit.ct,
            if unit.incapacitated { "  (down)" } else { "" }
        );
    }
    if let Some(seed) = result.seed {
        println!();
        println!("Seed: {}", seed);
    }
}
