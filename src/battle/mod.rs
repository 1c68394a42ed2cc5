//! Battle system - CT-driven turn order and action resolution
//!
//! Units charge time (CT) by their speed every world tick and act once it
//! reaches the threshold. Work is dispatched by phase precedence:
//!
//! - Queued effects in the fast phases run first
//! - An opened turn that has not concluded always resumes before a new one
//! - World time only advances when no phase has anything ready
//!
//! Decisions come from outside the loop (`ai::DecisionMaker`); the loop
//! suspends until one is submitted.

pub mod action;
pub mod ai;
pub mod board;
pub mod constants;
pub mod draft;
pub mod execution;
pub mod pathfinding;
pub mod phase;
pub mod position;
pub mod processor;
pub mod scheduler;
pub mod setup;
pub mod teams;
pub mod units;
pub mod victory;

// Re-exports for convenient access
pub use action::{ActionIdGenerator, ActionKind, ActionRequest, ActionToken, TokenKind};
pub use ai::{run_to_completion, DecisionMaker, DecisionView, GreedyAi, ScriptedPlayer};
pub use board::{Board, Tile};
pub use constants::*;
pub use draft::{snake_draft, DraftPick};
pub use execution::{
    CombatEvent, CombatEventType, CombatState, Controller, DecisionRequest, LoopState, StepOutcome,
};
pub use pathfinding::{find_path, find_reachable, Reachability, ReachableTile};
pub use phase::Phase;
pub use position::{Direction, Position};
pub use processor::{ActionOutcome, ActionProcessor, ResolutionContext};
pub use scheduler::{admit_all, AdmissionFn, PhaseScheduler};
pub use setup::build_combat;
pub use teams::{Alliance, AllianceTable, Team, TeamRoster};
pub use units::{Unit, UnitRoster, UnitSummary};
pub use victory::{VictoryEvaluator, VictoryRule};
