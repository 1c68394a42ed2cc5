//! Phase scheduler: priority by phase, FIFO within a phase
//!
//! `pull_next` walks the phases in precedence order and returns the first
//! token any of them yields. The two turn phases are computed from the
//! readiness model instead of being read from a queue. When nothing is
//! available the caller advances world time once and pulls again.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::battle::action::{ActionIdGenerator, ActionToken};
use crate::battle::phase::Phase;
use crate::battle::units::UnitRoster;

/// Decides whether the head of a queue may be dispatched now
///
/// A rejected head stays in place and its phase yields nothing this pull.
pub type AdmissionFn = fn(&ActionToken, &UnitRoster) -> bool;

/// Default admission: everything is admitted
pub fn admit_all(_token: &ActionToken, _units: &UnitRoster) -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PhaseQueues {
    faster_than_fast: VecDeque<ActionToken>,
    reaction: VecDeque<ActionToken>,
    mime: VecDeque<ActionToken>,
    quick_turn: VecDeque<ActionToken>,
    end_of_active_turn: VecDeque<ActionToken>,
    slow_action: VecDeque<ActionToken>,
}

impl PhaseQueues {
    fn get(&self, phase: Phase) -> Option<&VecDeque<ActionToken>> {
        match phase {
            Phase::FasterThanFastAction => Some(&self.faster_than_fast),
            Phase::Reaction => Some(&self.reaction),
            Phase::Mime => Some(&self.mime),
            Phase::QuickTurn => Some(&self.quick_turn),
            Phase::EndOfActiveTurn => Some(&self.end_of_active_turn),
            Phase::SlowAction => Some(&self.slow_action),
            Phase::MidTurn | Phase::ActiveTurn => None,
        }
    }

    fn get_mut(&mut self, phase: Phase) -> Option<&mut VecDeque<ActionToken>> {
        match phase {
            Phase::FasterThanFastAction => Some(&mut self.faster_than_fast),
            Phase::Reaction => Some(&mut self.reaction),
            Phase::Mime => Some(&mut self.mime),
            Phase::QuickTurn => Some(&mut self.quick_turn),
            Phase::EndOfActiveTurn => Some(&mut self.end_of_active_turn),
            Phase::SlowAction => Some(&mut self.slow_action),
            Phase::MidTurn | Phase::ActiveTurn => None,
        }
    }
}

/// One queue per non-derived phase plus the admission gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseScheduler {
    queues: PhaseQueues,
    #[serde(skip, default = "default_admission")]
    admission: AdmissionFn,
}

fn default_admission() -> AdmissionFn {
    admit_all
}

impl Default for PhaseScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseScheduler {
    pub fn new() -> Self {
        Self {
            queues: PhaseQueues::default(),
            admission: admit_all,
        }
    }

    /// Replace the admission predicate
    pub fn with_admission(mut self, admission: AdmissionFn) -> Self {
        self.admission = admission;
        self
    }

    /// Append a token to the queue named by its phase
    ///
    /// Returns false (and logs) when the token has no phase or names a
    /// derived phase.
    pub fn enqueue(&mut self, token: ActionToken) -> bool {
        let Some(phase) = token.phase else {
            tracing::warn!(token = %token.id, "Cannot enqueue token without a phase");
            return false;
        };

        match self.queues.get_mut(phase) {
            Some(queue) => {
                tracing::debug!(token = %token.id, %phase, "Enqueued token");
                queue.push_back(token);
                true
            }
            None => {
                tracing::warn!(
                    token = %token.id,
                    %phase,
                    "Cannot enqueue into a phase derived from unit readiness"
                );
                false
            }
        }
    }

    /// Next token to dispatch, or `None` when world time must advance
    ///
    /// Pure with respect to unit state: only queue heads are removed, and
    /// only when returned. Turn triggers draw ids from `ids`.
    pub fn pull_next(&mut self, units: &UnitRoster, ids: &mut ActionIdGenerator) -> Option<ActionToken> {
        for phase in Phase::ORDER {
            let next = match phase {
                Phase::MidTurn => Self::mid_turn_trigger(units, ids),
                Phase::ActiveTurn => Self::active_turn_trigger(units, ids),
                _ => self.pop_admitted(phase, units),
            };

            if next.is_some() {
                return next;
            }
        }

        None
    }

    fn mid_turn_trigger(units: &UnitRoster, ids: &mut ActionIdGenerator) -> Option<ActionToken> {
        if !units.is_any_unit_mid_turn() {
            return None;
        }
        let unit = units.next_ready_unit()?;
        if !unit.is_mid_active_turn() {
            return None;
        }
        Some(ActionToken::turn_trigger(ids.next_id(), Phase::MidTurn, unit.id))
    }

    fn active_turn_trigger(units: &UnitRoster, ids: &mut ActionIdGenerator) -> Option<ActionToken> {
        let unit = units.next_ready_unit()?;
        if unit.is_mid_active_turn() {
            return None;
        }
        Some(ActionToken::turn_trigger(ids.next_id(), Phase::ActiveTurn, unit.id))
    }

    fn pop_admitted(&mut self, phase: Phase, units: &UnitRoster) -> Option<ActionToken> {
        let admission = self.admission;
        let queue = self.queues.get_mut(phase)?;
        let head = queue.front()?;
        if !admission(head, units) {
            tracing::debug!(token = %head.id, %phase, "Queue head not admitted");
            return None;
        }
        queue.pop_front()
    }

    pub fn queue_len(&self, phase: Phase) -> usize {
        self.queues.get(phase).map_or(0, |q| q.len())
    }

    /// Copy of a phase's queue, head first
    pub fn queued(&self, phase: Phase) -> Vec<ActionToken> {
        self.queues
            .get(phase)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear_phase(&mut self, phase: Phase) {
        if let Some(queue) = self.queues.get_mut(phase) {
            queue.clear();
        }
    }

    pub fn clear_all(&mut self) {
        for phase in Phase::QUEUED {
            self.clear_phase(phase);
        }
    }

    /// True when every queue is empty (derived phases are not considered)
    pub fn is_empty(&self) -> bool {
        Phase::QUEUED.iter().all(|p| self.queue_len(*p) == 0)
    }
}
