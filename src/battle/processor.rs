//! Action resolution
//!
//! Applies an effect token to unit and board state. Every successful
//! resolution ends the actor's turn; a failed one leaves all state as it was.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::battle::action::{ActionKind, ActionToken};
use crate::battle::board::Board;
use crate::battle::constants::MIN_DAMAGE;
use crate::battle::position::Position;
use crate::battle::teams::AllianceTable;
use crate::battle::units::UnitRoster;
use crate::core::config::CombatConfig;
use crate::core::error::{CombatError, Result};
use crate::core::types::UnitId;

/// What a successful resolution did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Waited {
        actor: UnitId,
    },
    Moved {
        actor: UnitId,
        from: Position,
        to: Position,
    },
    Attacked {
        actor: UnitId,
        target: UnitId,
        damage: i32,
        target_incapacitated: bool,
    },
}

impl ActionOutcome {
    pub fn actor(&self) -> UnitId {
        match self {
            ActionOutcome::Waited { actor }
            | ActionOutcome::Moved { actor, .. }
            | ActionOutcome::Attacked { actor, .. } => *actor,
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Waited { actor } => write!(f, "Unit {} waited", actor),
            ActionOutcome::Moved { actor, from, to } => {
                write!(f, "Unit {} moved from {} to {}", actor, from, to)
            }
            ActionOutcome::Attacked {
                actor,
                target,
                damage,
                target_incapacitated,
            } => {
                write!(f, "Unit {} attacked unit {} for {} damage", actor, target, damage)?;
                if *target_incapacitated {
                    write!(f, " (incapacitated)")?;
                }
                Ok(())
            }
        }
    }
}

/// Mutable state an action resolves against
pub struct ResolutionContext<'a> {
    pub units: &'a mut UnitRoster,
    pub board: &'a mut Board,
    pub alliances: &'a AllianceTable,
}

/// Resolves effect tokens
///
/// Owns the damage RNG so that a seeded combat replays identically.
#[derive(Debug, Clone)]
pub struct ActionProcessor {
    rng: ChaCha8Rng,
    damage_variance_percent: u32,
}

impl ActionProcessor {
    pub fn new(config: &CombatConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            rng,
            damage_variance_percent: config.damage_variance_percent,
        }
    }

    /// Resolve a token, logging and returning false on failure
    pub fn process(&mut self, token: &ActionToken, ctx: ResolutionContext<'_>) -> bool {
        tracing::debug!(token = %token.id, "Processing: {}", Self::summarize(token));

        match self.resolve(token, ctx) {
            Ok(outcome) => {
                tracing::debug!(token = %token.id, "{}", outcome);
                true
            }
            Err(e) => {
                tracing::warn!(token = %token.id, actor = ?token.actor, error = %e, "Action failed");
                false
            }
        }
    }

    /// Resolve a token, reporting what happened
    ///
    /// All validation happens before the first mutation.
    pub fn resolve(&mut self, token: &ActionToken, ctx: ResolutionContext<'_>) -> Result<ActionOutcome> {
        let actor = token.actor.ok_or(CombatError::MissingActor(token.id))?;
        if !ctx.units.contains(actor) {
            return Err(CombatError::UnitNotFound(actor));
        }
        let action = token.action.ok_or(CombatError::MissingPayload(token.id))?;

        match action {
            ActionKind::Wait => {
                ctx.units.end_turn(actor)?;
                Ok(ActionOutcome::Waited { actor })
            }
            ActionKind::Move { destination } => {
                let from = ctx
                    .board
                    .get_unit_position(actor)
                    .ok_or(CombatError::NotOnBoard(actor))?;
                ctx.board.move_unit(actor, from, destination)?;
                ctx.units.end_turn(actor)?;
                Ok(ActionOutcome::Moved {
                    actor,
                    from,
                    to: destination,
                })
            }
            ActionKind::Attack { target } => {
                if let Some(listed) = token.target.filter(|listed| *listed != target) {
                    return Err(CombatError::TargetMismatch {
                        token: token.id,
                        listed,
                        attack: target,
                    });
                }
                self.resolve_attack(actor, target, ctx)
            }
        }
    }

    fn resolve_attack(
        &mut self,
        actor: UnitId,
        target: UnitId,
        ctx: ResolutionContext<'_>,
    ) -> Result<ActionOutcome> {
        let attacker = ctx.units.get(actor).ok_or(CombatError::UnitNotFound(actor))?;
        let defender = ctx.units.get(target).ok_or(CombatError::UnitNotFound(target))?;

        if attacker.team == defender.team || ctx.alliances.are_allied(attacker.team, defender.team) {
            return Err(CombatError::ForbiddenTarget { actor, target });
        }

        let damage = self.roll_damage(attacker.physical_attack);
        let target_incapacitated = ctx.units.apply_damage(target, -damage)?.is_incapacitated();
        if target_incapacitated {
            tracing::info!(unit = %target, by = %actor, "Unit incapacitated");
        }
        ctx.units.end_turn(actor)?;

        Ok(ActionOutcome::Attacked {
            actor,
            target,
            damage,
            target_incapacitated,
        })
    }

    /// Physical attack plus a symmetric integer variance, at least 1
    pub fn roll_damage(&mut self, physical_attack: i32) -> i32 {
        let base = i64::from(physical_attack.max(0));
        let variance = base * i64::from(self.damage_variance_percent) / 100;
        let roll = if variance > 0 {
            self.rng.gen_range(-variance..=variance)
        } else {
            0
        };
        let damage = (base + roll).clamp(i64::from(MIN_DAMAGE), i64::from(i32::MAX));
        i32::try_from(damage).unwrap_or(i32::MAX)
    }

    /// Describe what a token will do, for logs and debugging
    pub fn summarize(token: &ActionToken) -> String {
        let actor = token
            .actor
            .map_or_else(|| "Unknown".to_string(), |a| a.to_string());

        match token.action {
            Some(ActionKind::Wait) => format!("Unit {} will wait and end their turn", actor),
            Some(ActionKind::Move { destination }) => {
                format!("Unit {} will move to {}", actor, destination)
            }
            Some(ActionKind::Attack { target }) => {
                format!("Unit {} will attack unit {}", actor, target)
            }
            None => format!("Unit {} has an open turn", actor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::action::ActionIdGenerator;
    use crate::battle::phase::Phase;
    use crate::battle::teams::Alliance;
    use crate::battle::units::Unit;
    use crate::core::types::{ActionId, TeamId};

    struct Fixture {
        units: UnitRoster,
        board: Board,
        alliances: AllianceTable,
        processor: ActionProcessor,
        ids: ActionIdGenerator,
    }

    impl Fixture {
        fn new() -> Self {
            let mut units = UnitRoster::default();
            units
                .add(Unit::new(UnitId(0), TeamId(0)).with_stats(50, 8, 10).with_ct(100))
                .unwrap();
            units
                .add(Unit::new(UnitId(1), TeamId(1)).with_stats(30, 6, 8).with_ct(40))
                .unwrap();
            units
                .add(Unit::new(UnitId(2), TeamId(0)).with_stats(30, 6, 8))
                .unwrap();

            let mut board = Board::new(5, 5);
            board.place_unit(UnitId(0), Position::new(0, 0)).unwrap();
            board.place_unit(UnitId(1), Position::new(1, 0)).unwrap();
            board.place_unit(UnitId(2), Position::new(0, 1)).unwrap();

            let mut alliances = AllianceTable::new();
            alliances.set_mutual(TeamId(0), TeamId(1), Alliance::Enemy);

            Self {
                units,
                board,
                alliances,
                processor: ActionProcessor::new(&CombatConfig::with_seed(7)),
                ids: ActionIdGenerator::new(),
            }
        }

        fn token(&mut self, actor: u32, action: ActionKind) -> ActionToken {
            ActionToken::effect(self.ids.next_id(), Phase::FasterThanFastAction, UnitId(actor), action)
        }

        fn resolve(&mut self, token: &ActionToken) -> Result<ActionOutcome> {
            self.processor.resolve(
                token,
                ResolutionContext {
                    units: &mut self.units,
                    board: &mut self.board,
                    alliances: &self.alliances,
                },
            )
        }
    }

    #[test]
    fn test_wait_ends_turn() {
        let mut fx = Fixture::new();
        fx.units.begin_turn(UnitId(0)).unwrap();
        let token = fx.token(0, ActionKind::Wait);

        let outcome = fx.resolve(&token).unwrap();

        assert_eq!(outcome, ActionOutcome::Waited { actor: UnitId(0) });
        let unit = fx.units.get(UnitId(0)).unwrap();
        assert_eq!(unit.ct, 0);
        assert!(!unit.is_mid_active_turn());
    }

    #[test]
    fn test_move_updates_board_and_ends_turn() {
        let mut fx = Fixture::new();
        let token = fx.token(
            0,
            ActionKind::Move {
                destination: Position::new(2, 2),
            },
        );

        fx.resolve(&token).unwrap();

        assert_eq!(fx.board.get_unit_position(UnitId(0)), Some(Position::new(2, 2)));
        assert_eq!(fx.units.get(UnitId(0)).unwrap().ct, 0);
    }

    #[test]
    fn test_move_to_occupied_is_noop() {
        let mut fx = Fixture::new();
        fx.units.begin_turn(UnitId(0)).unwrap();
        let token = fx.token(
            0,
            ActionKind::Move {
                destination: Position::new(1, 0),
            },
        );

        assert!(fx.resolve(&token).is_err());

        let unit = fx.units.get(UnitId(0)).unwrap();
        assert_eq!(unit.ct, 100);
        assert!(unit.is_mid_active_turn());
        assert_eq!(fx.board.get_unit_position(UnitId(0)), Some(Position::new(0, 0)));
    }

    #[test]
    fn test_move_without_board_position_fails() {
        let mut fx = Fixture::new();
        fx.board.remove_unit(UnitId(0));
        let token = fx.token(
            0,
            ActionKind::Move {
                destination: Position::new(3, 3),
            },
        );

        assert!(matches!(fx.resolve(&token), Err(CombatError::NotOnBoard(_))));
        assert_eq!(fx.units.get(UnitId(0)).unwrap().ct, 100);
    }

    #[test]
    fn test_attack_damages_and_ends_turn() {
        let mut fx = Fixture::new();
        let token = fx.token(0, ActionKind::Attack { target: UnitId(1) });

        let outcome = fx.resolve(&token).unwrap();

        let ActionOutcome::Attacked { damage, .. } = outcome else {
            panic!("expected an attack outcome");
        };
        // PA 10 with 25% variance
        assert!((8..=12).contains(&damage));
        assert_eq!(fx.units.get(UnitId(1)).unwrap().hp, 30 - damage);
        assert_eq!(fx.units.get(UnitId(0)).unwrap().ct, 0);
    }

    #[test]
    fn test_attack_can_incapacitate() {
        let mut fx = Fixture::new();
        fx.units.get_mut(UnitId(1)).unwrap().hp = 1;
        let token = fx.token(0, ActionKind::Attack { target: UnitId(1) });

        let outcome = fx.resolve(&token).unwrap();

        assert!(matches!(
            outcome,
            ActionOutcome::Attacked {
                target_incapacitated: true,
                ..
            }
        ));
        assert_eq!(fx.units.get(UnitId(1)).unwrap().hp, 0);
    }

    #[test]
    fn test_attack_missing_target_is_noop() {
        let mut fx = Fixture::new();
        let token = fx.token(0, ActionKind::Attack { target: UnitId(99) });

        assert!(matches!(fx.resolve(&token), Err(CombatError::UnitNotFound(UnitId(99)))));
        assert_eq!(fx.units.get(UnitId(0)).unwrap().ct, 100);
    }

    #[test]
    fn test_attack_target_must_match_payload() {
        let mut fx = Fixture::new();
        let mut token = fx.token(0, ActionKind::Attack { target: UnitId(1) });
        token.target = Some(UnitId(2));

        assert!(matches!(
            fx.resolve(&token),
            Err(CombatError::TargetMismatch { listed: UnitId(2), attack: UnitId(1), .. })
        ));
        assert_eq!(fx.units.get(UnitId(1)).unwrap().hp, 30);
        assert_eq!(fx.units.get(UnitId(0)).unwrap().ct, 100);

        // Leaving the listed target unset defers to the payload
        token.target = None;
        assert!(fx.resolve(&token).is_ok());
    }

    #[test]
    fn test_attack_on_teammate_forbidden() {
        let mut fx = Fixture::new();
        let token = fx.token(0, ActionKind::Attack { target: UnitId(2) });

        assert!(matches!(fx.resolve(&token), Err(CombatError::ForbiddenTarget { .. })));
        assert_eq!(fx.units.get(UnitId(2)).unwrap().hp, 30);
    }

    #[test]
    fn test_attack_on_ally_forbidden_but_neutral_allowed() {
        let mut fx = Fixture::new();
        fx.alliances.set(TeamId(0), TeamId(1), Alliance::Allied);
        let token = fx.token(0, ActionKind::Attack { target: UnitId(1) });
        assert!(fx.resolve(&token).is_err());

        fx.alliances.set(TeamId(0), TeamId(1), Alliance::Neutral);
        assert!(fx.resolve(&token).is_ok());
    }

    #[test]
    fn test_missing_actor_and_payload() {
        let mut fx = Fixture::new();

        let mut token = fx.token(0, ActionKind::Wait);
        token.actor = None;
        assert!(matches!(fx.resolve(&token), Err(CombatError::MissingActor(_))));

        let trigger = ActionToken::turn_trigger(ActionId(50), Phase::ActiveTurn, UnitId(0));
        assert!(matches!(fx.resolve(&trigger), Err(CombatError::MissingPayload(_))));

        let unknown = fx.token(42, ActionKind::Wait);
        assert!(matches!(fx.resolve(&unknown), Err(CombatError::UnitNotFound(_))));
    }

    #[test]
    fn test_process_reports_bool() {
        let mut fx = Fixture::new();
        let good = fx.token(0, ActionKind::Wait);
        let bad = fx.token(9, ActionKind::Wait);

        let ctx = ResolutionContext {
            units: &mut fx.units,
            board: &mut fx.board,
            alliances: &fx.alliances,
        };
        assert!(fx.processor.process(&good, ctx));

        let ctx = ResolutionContext {
            units: &mut fx.units,
            board: &mut fx.board,
            alliances: &fx.alliances,
        };
        assert!(!fx.processor.process(&bad, ctx));
    }

    #[test]
    fn test_roll_damage_floor() {
        let mut processor = ActionProcessor::new(&CombatConfig::with_seed(1));
        for _ in 0..50 {
            assert_eq!(processor.roll_damage(0), 1);
            assert_eq!(processor.roll_damage(-5), 1);
            // Variance of 25% of 3 truncates to 0
            assert_eq!(processor.roll_damage(3), 3);
        }
    }

    #[test]
    fn test_roll_damage_huge_attack_stays_in_range() {
        let mut processor = ActionProcessor::new(&CombatConfig::with_seed(5));
        for _ in 0..50 {
            let damage = processor.roll_damage(100_000_000);
            assert!((75_000_000..=125_000_000).contains(&damage));
            assert!(processor.roll_damage(i32::MAX) > 0);
        }
    }

    #[test]
    fn test_seeded_damage_is_reproducible() {
        let config = CombatConfig::with_seed(99);
        let mut a = ActionProcessor::new(&config);
        let mut b = ActionProcessor::new(&config);

        let rolls_a: Vec<i32> = (0..20).map(|_| a.roll_damage(40)).collect();
        let rolls_b: Vec<i32> = (0..20).map(|_| b.roll_damage(40)).collect();
        assert_eq!(rolls_a, rolls_b);
        assert!(rolls_a.iter().all(|d| (30..=50).contains(d)));
    }

    #[test]
    fn test_summarize() {
        let mut fx = Fixture::new();
        let token = fx.token(3, ActionKind::Attack { target: UnitId(1) });
        assert_eq!(ActionProcessor::summarize(&token), "Unit 3 will attack unit 1");

        let trigger = ActionToken::turn_trigger(ActionId(0), Phase::MidTurn, UnitId(2));
        assert_eq!(ActionProcessor::summarize(&trigger), "Unit 2 has an open turn");
    }
}
