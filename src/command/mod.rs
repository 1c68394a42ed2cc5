//! Player command input
//!
//! Text commands typed (or scripted) for a player-controlled turn:
//! `wait`, `move <x> <y>`, `attack <unit-id>`.

pub mod parser;

pub use parser::{parse_command, parse_script};

use serde::{Deserialize, Serialize};

use crate::battle::action::ActionRequest;
use crate::battle::position::Position;
use crate::core::types::UnitId;

/// A parsed player command, not yet bound to an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerCommand {
    Wait,
    Move { x: i32, y: i32 },
    Attack { target: UnitId },
}

impl PlayerCommand {
    pub fn into_request(self, actor: UnitId) -> ActionRequest {
        match self {
            PlayerCommand::Wait => ActionRequest::wait(actor),
            PlayerCommand::Move { x, y } => ActionRequest::move_to(actor, Position::new(x, y)),
            PlayerCommand::Attack { target } => ActionRequest::attack(actor, target),
        }
    }
}
