//! Decision-makers for open turns
//!
//! Architecture: trait + implementations
//! - DecisionMaker trait is the hand-off contract for AI and player input
//! - GreedyAi is the reference heuristic for AI teams
//! - ScriptedPlayer answers player turns from prepared commands
//! - DecisionView is the read-only combat snapshot both receive

mod decision_view;
mod greedy;
mod scripted;

pub use decision_view::DecisionView;
pub use greedy::GreedyAi;
pub use scripted::ScriptedPlayer;

use crate::battle::action::ActionRequest;
use crate::battle::execution::{CombatState, Controller, StepOutcome};
use crate::core::error::Result;
use crate::core::types::UnitId;

/// Produces exactly one action for an actor whose turn is open
pub trait DecisionMaker {
    fn name(&self) -> &str;

    fn decide(&mut self, view: &DecisionView<'_>, actor: UnitId) -> ActionRequest;
}

/// Drive a combat, answering each turn with the matching decision-maker
///
/// Returns whether the combat completed within `max_steps`.
pub fn run_to_completion(
    combat: &mut CombatState,
    ai: &mut dyn DecisionMaker,
    player: &mut dyn DecisionMaker,
    max_steps: u64,
) -> Result<bool> {
    for _ in 0..max_steps {
        match combat.step() {
            StepOutcome::Completed => return Ok(true),
            StepOutcome::DecisionRequired(request) => {
                let maker: &mut dyn DecisionMaker = match request.controller {
                    Controller::Ai => &mut *ai,
                    Controller::Player => &mut *player,
                };
                let action = maker.decide(&combat.decision_view(), request.actor);
                tracing::debug!(
                    unit = %request.actor,
                    decided_by = maker.name(),
                    action = %action.kind,
                    "Decision made"
                );
                combat.submit_request(action)?;
            }
            StepOutcome::Awaiting { .. }
            | StepOutcome::Processed { .. }
            | StepOutcome::TimeAdvanced { .. } => {}
        }
    }

    if combat.is_completed() {
        return Ok(true);
    }
    tracing::warn!(max_steps, tick = combat.tick(), "Combat did not finish within the step limit");
    Ok(false)
}
