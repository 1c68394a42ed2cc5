use thiserror::Error;

use crate::battle::phase::Phase;
use crate::core::types::{ActionId, TeamId, UnitId};

#[derive(Error, Debug)]
pub enum CombatError {
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("Action {0} has no actor")]
    MissingActor(ActionId),

    #[error("Decision {token} queued in {phase} would never run ahead of the open turn")]
    PhaseAfterTurn { token: ActionId, phase: Phase },

    #[error("Action {0} cannot be queued in a turn phase")]
    DerivedPhase(ActionId),

    #[error("Action {token} targets unit {listed} but its attack names unit {attack}")]
    TargetMismatch { token: ActionId, listed: UnitId, attack: UnitId },

    #[error("Action {0} carries no action payload")]
    MissingPayload(ActionId),

    #[error("Unit {0} is not on the board")]
    NotOnBoard(UnitId),

    #[error("Move rejected: {0}")]
    MoveRejected(String),

    #[error("Unit {actor} may not attack unit {target}")]
    ForbiddenTarget { actor: UnitId, target: UnitId },

    #[error("Expected a decision for unit {expected}, got one for {actual:?}")]
    UnexpectedActor { expected: UnitId, actual: Option<UnitId> },

    #[error("Combat is not awaiting a decision")]
    NotAwaitingDecision,

    #[error("Unknown victory condition: {0}")]
    UnknownVictoryRule(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Duplicate unit id: {0}")]
    DuplicateUnit(UnitId),

    #[error("Duplicate team id: {0}")]
    DuplicateTeam(TeamId),

    #[error("Command parse error: {0}")]
    CommandParse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CombatError>;
