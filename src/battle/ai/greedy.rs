//! Greedy reference AI
//!
//! Attack the weakest enemy in reach; otherwise close distance on the
//! nearest enemy; otherwise wait.

use crate::battle::action::ActionRequest;
use crate::battle::ai::{DecisionMaker, DecisionView};
use crate::battle::position::Position;
use crate::battle::units::Unit;
use crate::core::types::UnitId;

#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAi;

impl GreedyAi {
    pub fn new() -> Self {
        Self
    }

    /// Lowest-HP enemy within attack range, lowest id on ties
    fn attack_target(
        view: &DecisionView<'_>,
        origin: Position,
        enemies: &[(&Unit, Position)],
    ) -> Option<UnitId> {
        enemies
            .iter()
            .filter(|(_, p)| origin.distance(p) <= view.config.attack_range)
            .min_by_key(|(u, _)| (u.hp, u.id))
            .map(|(u, _)| u.id)
    }

    /// Reachable tile that gets strictly closer to the nearest enemy
    fn approach(
        view: &DecisionView<'_>,
        unit: &Unit,
        origin: Position,
        enemies: &[(&Unit, Position)],
    ) -> Option<Position> {
        let goal = enemies
            .iter()
            .min_by_key(|(u, p)| (origin.distance(p), u.id))
            .map(|(_, p)| *p)?;

        let best = view
            .board
            .get_valid_move_tiles(origin, unit.move_range, view.jump_tolerance(unit))
            .into_iter()
            .min_by_key(|t| (t.position.distance(&goal), t.distance, t.position.y, t.position.x))?;

        (best.position.distance(&goal) < origin.distance(&goal)).then_some(best.position)
    }
}

impl DecisionMaker for GreedyAi {
    fn name(&self) -> &str {
        "greedy"
    }

    fn decide(&mut self, view: &DecisionView<'_>, actor: UnitId) -> ActionRequest {
        let (Some(unit), Some(origin)) = (view.unit(actor), view.position_of(actor)) else {
            tracing::warn!(unit = %actor, "AI actor missing or off the board, waiting");
            return ActionRequest::wait(actor);
        };

        let enemies = view.enemies_of(actor);

        if let Some(target) = Self::attack_target(view, origin, &enemies) {
            tracing::debug!(unit = %actor, %target, "AI attacks");
            return ActionRequest::attack(actor, target);
        }

        if let Some(destination) = Self::approach(view, unit, origin, &enemies) {
            tracing::debug!(unit = %actor, %destination, "AI moves");
            return ActionRequest::move_to(actor, destination);
        }

        tracing::debug!(unit = %actor, "AI waits");
        ActionRequest::wait(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::action::ActionKind;
    use crate::battle::board::Board;
    use crate::battle::teams::{Alliance, AllianceTable, Team, TeamRoster};
    use crate::battle::units::UnitRoster;
    use crate::core::config::CombatConfig;
    use crate::core::types::TeamId;

    struct Scene {
        units: UnitRoster,
        teams: TeamRoster,
        alliances: AllianceTable,
        board: Board,
        config: CombatConfig,
    }

    impl Scene {
        /// `placements` are (id, team, hp, position)
        fn new(placements: &[(u32, u32, i32, Position)]) -> Self {
            let mut units = UnitRoster::default();
            let mut board = Board::new(8, 8);
            let mut teams = TeamRoster::new();
            for &(id, team, hp, pos) in placements {
                units
                    .add(
                        Unit::new(UnitId(id), TeamId(team))
                            .with_stats(hp, 10, 5)
                            .with_movement(3, 1),
                    )
                    .unwrap();
                board.place_unit(UnitId(id), pos).unwrap();
                if teams.get(TeamId(team)).is_none() {
                    teams.add(Team::new(TeamId(team), true)).unwrap();
                }
            }

            let mut alliances = AllianceTable::new();
            alliances.set_mutual(TeamId(0), TeamId(1), Alliance::Enemy);

            Self {
                units,
                teams,
                alliances,
                board,
                config: CombatConfig::default(),
            }
        }

        fn decide(&self, actor: u32) -> ActionRequest {
            let view = DecisionView {
                units: &self.units,
                teams: &self.teams,
                alliances: &self.alliances,
                board: &self.board,
                config: &self.config,
                tick: 0,
            };
            GreedyAi::new().decide(&view, UnitId(actor))
        }
    }

    #[test]
    fn test_attacks_weakest_adjacent_enemy() {
        let scene = Scene::new(&[
            (0, 0, 20, Position::new(3, 3)),
            (1, 1, 15, Position::new(4, 3)),
            (2, 1, 8, Position::new(3, 4)),
        ]);

        assert_eq!(scene.decide(0).kind, ActionKind::Attack { target: UnitId(2) });
    }

    #[test]
    fn test_attack_tie_breaks_on_id() {
        let scene = Scene::new(&[
            (0, 0, 20, Position::new(3, 3)),
            (4, 1, 8, Position::new(4, 3)),
            (2, 1, 8, Position::new(2, 3)),
        ]);

        assert_eq!(scene.decide(0).kind, ActionKind::Attack { target: UnitId(2) });
    }

    #[test]
    fn test_moves_toward_nearest_enemy() {
        let scene = Scene::new(&[(0, 0, 20, Position::new(0, 0)), (1, 1, 20, Position::new(7, 0))]);

        let request = scene.decide(0);
        let ActionKind::Move { destination } = request.kind else {
            panic!("expected a move, got {:?}", request.kind);
        };
        assert_eq!(destination.distance(&Position::new(7, 0)), 4);
        assert!(destination.distance(&Position::new(0, 0)) <= 3);
    }

    #[test]
    fn test_ignores_non_enemies() {
        // Team 2 is neutral towards team 0
        let scene = Scene::new(&[(0, 0, 20, Position::new(3, 3)), (1, 2, 5, Position::new(4, 3))]);

        assert_eq!(scene.decide(0).kind, ActionKind::Wait);
    }

    #[test]
    fn test_waits_when_boxed_in() {
        let mut scene = Scene::new(&[(0, 0, 20, Position::new(0, 0)), (1, 1, 20, Position::new(7, 7))]);
        scene.board.set_height(Position::new(1, 0), 5);
        scene.board.set_height(Position::new(0, 1), 5);

        assert_eq!(scene.decide(0).kind, ActionKind::Wait);
    }

    #[test]
    fn test_missing_actor_waits() {
        let scene = Scene::new(&[(0, 0, 20, Position::new(0, 0))]);
        assert_eq!(scene.decide(9).kind, ActionKind::Wait);
    }
}
