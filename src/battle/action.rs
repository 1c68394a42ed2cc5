//! Action tokens: the unit of work the scheduler dispatches
//!
//! A token is either a turn trigger ("this unit's turn is open, ask for a
//! decision") or an effect carrying a concrete action to resolve.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::battle::phase::Phase;
use crate::battle::position::Position;
use crate::core::types::{ActionId, UnitId};

/// What an effect token does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Wait,
    Move { destination: Position },
    Attack { target: UnitId },
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Wait => write!(f, "wait"),
            ActionKind::Move { destination } => write!(f, "move to {}", destination),
            ActionKind::Attack { target } => write!(f, "attack unit {}", target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    TurnTrigger,
    Effect,
}

/// A scheduled action record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionToken {
    /// Diagnostic ordering only, never a tie-break
    pub id: ActionId,
    pub phase: Option<Phase>,
    pub actor: Option<UnitId>,
    /// Mirrors the attack payload; the processor rejects a mismatch
    pub target: Option<UnitId>,
    pub action: Option<ActionKind>,
}

impl ActionToken {
    /// Turn trigger synthesized by the scheduler for `actor`
    pub fn turn_trigger(id: ActionId, phase: Phase, actor: UnitId) -> Self {
        Self {
            id,
            phase: Some(phase),
            actor: Some(actor),
            target: None,
            action: None,
        }
    }

    /// Effect token carrying a concrete action
    ///
    /// Attack payloads also fill in `target`.
    pub fn effect(id: ActionId, phase: Phase, actor: UnitId, action: ActionKind) -> Self {
        let target = match action {
            ActionKind::Attack { target } => Some(target),
            _ => None,
        };
        Self {
            id,
            phase: Some(phase),
            actor: Some(actor),
            target,
            action: Some(action),
        }
    }

    pub fn kind(&self) -> TokenKind {
        if self.action.is_none() && self.phase.is_some_and(|p| p.is_derived()) {
            TokenKind::TurnTrigger
        } else {
            TokenKind::Effect
        }
    }

    pub fn is_turn_trigger(&self) -> bool {
        self.kind() == TokenKind::TurnTrigger
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token {}", self.id)?;
        if let Some(phase) = self.phase {
            write!(f, " [{}]", phase)?;
        }
        if let Some(actor) = self.actor {
            write!(f, " unit {}", actor)?;
        }
        match self.action {
            Some(action) => write!(f, ": {}", action),
            None => write!(f, ": turn opened"),
        }
    }
}

/// Monotonic token id source, owned by one combat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionIdGenerator {
    next: u64,
}

impl ActionIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> ActionId {
        let id = ActionId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// A decision-maker's answer for one actor, before it is given an id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub actor: UnitId,
    pub kind: ActionKind,
}

impl ActionRequest {
    pub fn new(actor: UnitId, kind: ActionKind) -> Self {
        Self { actor, kind }
    }

    pub fn wait(actor: UnitId) -> Self {
        Self::new(actor, ActionKind::Wait)
    }

    pub fn move_to(actor: UnitId, destination: Position) -> Self {
        Self::new(actor, ActionKind::Move { destination })
    }

    pub fn attack(actor: UnitId, target: UnitId) -> Self {
        Self::new(actor, ActionKind::Attack { target })
    }

    /// Decisions are serviced ahead of every other queued effect
    pub fn into_token(self, ids: &mut ActionIdGenerator) -> ActionToken {
        ActionToken::effect(ids.next_id(), Phase::FasterThanFastAction, self.actor, self.kind)
    }
}
