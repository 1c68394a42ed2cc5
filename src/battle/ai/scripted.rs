//! Player-input collaborator driven by a prepared command script

use std::collections::VecDeque;

use crate::battle::action::ActionRequest;
use crate::battle::ai::{DecisionMaker, DecisionView};
use crate::command::PlayerCommand;
use crate::core::types::UnitId;

/// Answers each player turn with the next scripted command
///
/// Once the script runs out every turn is answered with Wait.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPlayer {
    script: VecDeque<PlayerCommand>,
}

impl ScriptedPlayer {
    pub fn new(commands: impl IntoIterator<Item = PlayerCommand>) -> Self {
        Self {
            script: commands.into_iter().collect(),
        }
    }

    pub fn push(&mut self, command: PlayerCommand) {
        self.script.push_back(command);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DecisionMaker for ScriptedPlayer {
    fn name(&self) -> &str {
        "scripted"
    }

    fn decide(&mut self, _view: &DecisionView<'_>, actor: UnitId) -> ActionRequest {
        match self.script.pop_front() {
            Some(command) => {
                tracing::debug!(unit = %actor, ?command, "Scripted command");
                command.into_request(actor)
            }
            None => {
                tracing::debug!(unit = %actor, "Script exhausted, waiting");
                ActionRequest::wait(actor)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::action::ActionKind;
    use crate::battle::board::Board;
    use crate::battle::position::Position;
    use crate::battle::teams::{AllianceTable, TeamRoster};
    use crate::battle::units::UnitRoster;
    use crate::core::config::CombatConfig;

    #[test]
    fn test_script_then_wait() {
        let units = UnitRoster::default();
        let teams = TeamRoster::new();
        let alliances = AllianceTable::new();
        let board = Board::new(1, 1);
        let config = CombatConfig::default();
        let view = DecisionView {
            units: &units,
            teams: &teams,
            alliances: &alliances,
            board: &board,
            config: &config,
            tick: 0,
        };

        let mut player = ScriptedPlayer::new([
            PlayerCommand::Move { x: 2, y: 1 },
            PlayerCommand::Attack { target: UnitId(3) },
        ]);

        assert_eq!(
            player.decide(&view, UnitId(0)).kind,
            ActionKind::Move {
                destination: Position::new(2, 1)
            }
        );
        assert_eq!(
            player.decide(&view, UnitId(0)).kind,
            ActionKind::Attack { target: UnitId(3) }
        );
        assert_eq!(player.remaining(), 0);
        assert_eq!(player.decide(&view, UnitId(0)).kind, ActionKind::Wait);
    }
}
