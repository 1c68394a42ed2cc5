//! Scheduling phases and their fixed precedence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Precedence bucket for scheduled work, highest precedence first
///
/// `MidTurn` and `ActiveTurn` have no backlog of their own; their tokens
/// are derived from unit readiness each time the scheduler is pulled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    FasterThanFastAction,
    Reaction,
    Mime,
    MidTurn,
    QuickTurn,
    ActiveTurn,
    EndOfActiveTurn,
    SlowAction,
}

impl Phase {
    /// Every phase in the order the scheduler visits them
    pub const ORDER: [Phase; 8] = [
        Phase::FasterThanFastAction,
        Phase::Reaction,
        Phase::Mime,
        Phase::MidTurn,
        Phase::QuickTurn,
        Phase::ActiveTurn,
        Phase::EndOfActiveTurn,
        Phase::SlowAction,
    ];

    /// Phases backed by a FIFO queue
    pub const QUEUED: [Phase; 6] = [
        Phase::FasterThanFastAction,
        Phase::Reaction,
        Phase::Mime,
        Phase::QuickTurn,
        Phase::EndOfActiveTurn,
        Phase::SlowAction,
    ];

    /// True for phases synthesized from unit readiness
    pub fn is_derived(&self) -> bool {
        matches!(self, Phase::MidTurn | Phase::ActiveTurn)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::FasterThanFastAction => "FasterThanFastAction",
            Phase::Reaction => "Reaction",
            Phase::Mime => "Mime",
            Phase::MidTurn => "MidTurn",
            Phase::QuickTurn => "QuickTurn",
            Phase::ActiveTurn => "ActiveTurn",
            Phase::EndOfActiveTurn => "EndOfActiveTurn",
            Phase::SlowAction => "SlowAction",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
