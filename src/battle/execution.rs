//! Combat loop
//!
//! Each step: check victory -> pull the next token -> open a turn (suspend
//! for a decision), resolve an effect, or advance world time.
//!
//! The loop is re-entrant. While a decision is pending `step` returns
//! immediately; a collaborator resumes it by calling `submit`.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::action::{ActionIdGenerator, ActionRequest, ActionToken};
use crate::battle::ai::DecisionView;
use crate::battle::board::Board;
use crate::battle::phase::Phase;
use crate::battle::processor::{ActionOutcome, ActionProcessor, ResolutionContext};
use crate::battle::scheduler::PhaseScheduler;
use crate::battle::teams::{AllianceTable, TeamRoster};
use crate::battle::units::UnitRoster;
use crate::battle::victory::{VictoryEvaluator, VictoryRule};
use crate::core::config::CombatConfig;
use crate::core::error::{CombatError, Result};
use crate::core::types::{ActionId, TeamId, Tick, UnitId};

/// Where the loop is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopState {
    #[default]
    Running,
    AwaitingDecision {
        actor: UnitId,
    },
    Completed,
}

/// Who answers a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    Ai,
    Player,
}

/// Handed out when a turn opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub actor: UnitId,
    pub team: TeamId,
    pub controller: Controller,
    /// `ActiveTurn` for a fresh turn, `MidTurn` when an open turn resumes
    pub phase: Phase,
    pub trigger: ActionId,
}

/// Result of one `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// A turn opened; the loop is now waiting for `submit`
    DecisionRequired(DecisionRequest),
    /// Still waiting on an earlier request
    Awaiting { actor: UnitId },
    /// An effect token was resolved
    Processed { token: ActionId, success: bool },
    /// Nothing was ready, so world time moved forward
    TimeAdvanced { tick: Tick },
    Completed,
}

/// Log entry for combat events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatEvent {
    pub tick: Tick,
    pub event_type: CombatEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEventType {
    CombatStarted,
    TurnOpened { unit: UnitId, phase: Phase },
    DecisionSubmitted { unit: UnitId, token: ActionId },
    ActionResolved { token: ActionId, outcome: ActionOutcome },
    ActionFailed { token: ActionId, unit: Option<UnitId>, reason: String },
    TurnForfeited { unit: UnitId },
    UnitIncapacitated { unit: UnitId },
    TeamDefeated { team: TeamId },
    CombatEnded { winners: Vec<TeamId> },
}

/// Everything one combat needs, owned in one place
#[derive(Debug, Clone)]
pub struct CombatState {
    pub units: UnitRoster,
    pub teams: TeamRoster,
    pub alliances: AllianceTable,
    pub board: Board,
    pub config: CombatConfig,

    scheduler: PhaseScheduler,
    processor: ActionProcessor,
    ids: ActionIdGenerator,
    victory: VictoryEvaluator,

    tick: Tick,
    steps: u64,
    state: LoopState,
    /// Consecutive failed actions per unit within its open turn
    failures: AHashMap<UnitId, u32>,

    log: Vec<CombatEvent>,
}

impl CombatState {
    pub fn new(
        units: UnitRoster,
        teams: TeamRoster,
        alliances: AllianceTable,
        board: Board,
        config: CombatConfig,
        rule: VictoryRule,
    ) -> Result<Self> {
        config.validate().map_err(CombatError::InvalidConfig)?;
        if units.ct_threshold() != config.ct_threshold {
            return Err(CombatError::InvalidConfig(format!(
                "unit roster threshold {} does not match configured {}",
                units.ct_threshold(),
                config.ct_threshold
            )));
        }
        if let Some(orphan) = units.iter().find(|u| teams.get(u.team).is_none()) {
            return Err(CombatError::TeamNotFound(orphan.team));
        }

        let processor = ActionProcessor::new(&config);
        let mut state = Self {
            units,
            teams,
            alliances,
            board,
            config,
            scheduler: PhaseScheduler::new(),
            processor,
            ids: ActionIdGenerator::new(),
            victory: VictoryEvaluator::new(rule),
            tick: 0,
            steps: 0,
            state: LoopState::Running,
            failures: AHashMap::new(),
            log: Vec::new(),
        };

        tracing::info!(
            units = state.units.len(),
            teams = state.teams.len(),
            rule = %rule,
            "Combat started"
        );
        state.log_event(
            CombatEventType::CombatStarted,
            format!(
                "{} units across {} teams",
                state.units.len(),
                state.teams.len()
            ),
        );
        Ok(state)
    }

    /// Swap in a scheduler, e.g. one with a custom admission predicate
    pub fn with_scheduler(mut self, scheduler: PhaseScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn loop_state(&self) -> LoopState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == LoopState::Completed
    }

    /// Actor whose decision is pending, if any
    pub fn pending_actor(&self) -> Option<UnitId> {
        match self.state {
            LoopState::AwaitingDecision { actor } => Some(actor),
            _ => None,
        }
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.log
    }

    pub fn scheduler(&self) -> &PhaseScheduler {
        &self.scheduler
    }

    /// Teams still standing
    pub fn winners(&self) -> Vec<TeamId> {
        self.victory.winners(&self.teams)
    }

    /// Read-only view handed to decision-makers
    pub fn decision_view(&self) -> DecisionView<'_> {
        DecisionView {
            units: &self.units,
            teams: &self.teams,
            alliances: &self.alliances,
            board: &self.board,
            config: &self.config,
            tick: self.tick,
        }
    }

    fn log_event(&mut self, event_type: CombatEventType, description: String) {
        self.log.push(CombatEvent {
            tick: self.tick,
            event_type,
            description,
        });
    }

    /// Run one iteration of the loop
    pub fn step(&mut self) -> StepOutcome {
        match self.state {
            LoopState::Completed => return StepOutcome::Completed,
            LoopState::AwaitingDecision { actor } => return StepOutcome::Awaiting { actor },
            LoopState::Running => {}
        }

        self.steps += 1;

        if self.check_victory() {
            return StepOutcome::Completed;
        }

        match self.scheduler.pull_next(&self.units, &mut self.ids) {
            Some(token) if token.is_turn_trigger() => self.open_turn(token),
            Some(token) => self.process_effect(token),
            None => {
                self.advance_time();
                StepOutcome::TimeAdvanced { tick: self.tick }
            }
        }
    }

    /// Step until a decision is needed, combat ends, or `max_steps` run out
    pub fn run_until_decision(&mut self, max_steps: u64) -> StepOutcome {
        let mut outcome = self.step();
        let mut taken = 1;
        while taken < max_steps {
            match outcome {
                StepOutcome::DecisionRequired(_)
                | StepOutcome::Awaiting { .. }
                | StepOutcome::Completed => break,
                _ => {}
            }
            outcome = self.step();
            taken += 1;
        }
        outcome
    }

    /// Hand in the decision for the pending actor
    ///
    /// An unset phase becomes `FasterThanFastAction` so the decision is
    /// serviced before any other queued effect. A decision must land in a
    /// phase ahead of `MidTurn`; anything later would sit behind the open
    /// turn it is meant to conclude.
    pub fn submit(&mut self, mut token: ActionToken) -> Result<ActionId> {
        let LoopState::AwaitingDecision { actor } = self.state else {
            return Err(CombatError::NotAwaitingDecision);
        };
        if token.actor != Some(actor) {
            return Err(CombatError::UnexpectedActor {
                expected: actor,
                actual: token.actor,
            });
        }

        let phase = *token.phase.get_or_insert(Phase::FasterThanFastAction);
        if phase.is_derived() {
            return Err(CombatError::DerivedPhase(token.id));
        }
        if phase > Phase::MidTurn {
            return Err(CombatError::PhaseAfterTurn {
                token: token.id,
                phase,
            });
        }

        let id = token.id;
        let description = ActionProcessor::summarize(&token);
        if !self.scheduler.enqueue(token) {
            return Err(CombatError::DerivedPhase(id));
        }

        tracing::debug!(unit = %actor, token = %id, "Decision submitted");
        self.log_event(
            CombatEventType::DecisionSubmitted { unit: actor, token: id },
            description,
        );
        self.state = LoopState::Running;
        Ok(id)
    }

    /// Build a token for `request` and submit it
    pub fn submit_request(&mut self, request: ActionRequest) -> Result<ActionId> {
        let token = request.into_token(&mut self.ids);
        self.submit(token)
    }

    /// Queue an effect outside the decision hand-off (reactions, delayed effects)
    pub fn enqueue_effect(&mut self, token: ActionToken) -> bool {
        self.scheduler.enqueue(token)
    }

    pub fn next_action_id(&mut self) -> ActionId {
        self.ids.next_id()
    }

    fn check_victory(&mut self) -> bool {
        let already_defeated: Vec<TeamId> = self
            .teams
            .iter()
            .filter(|t| t.defeated)
            .map(|t| t.id)
            .collect();

        let met = self.victory.is_victory_met(&mut self.teams, &self.units);

        let newly_defeated: Vec<TeamId> = self
            .teams
            .iter()
            .filter(|t| t.defeated && !already_defeated.contains(&t.id))
            .map(|t| t.id)
            .collect();
        for team in newly_defeated {
            self.log_event(
                CombatEventType::TeamDefeated { team },
                format!("Team {} has no units left standing", team),
            );
        }

        if met {
            let winners = self.winners();
            tracing::info!(tick = self.tick, ?winners, "Combat complete");
            self.log_event(
                CombatEventType::CombatEnded {
                    winners: winners.clone(),
                },
                format!("Victory condition {} met", self.victory.rule),
            );
            self.state = LoopState::Completed;
        }
        met
    }

    fn open_turn(&mut self, token: ActionToken) -> StepOutcome {
        let (Some(actor), Some(phase)) = (token.actor, token.phase) else {
            tracing::warn!(token = %token.id, "Turn trigger without actor or phase");
            return StepOutcome::Processed {
                token: token.id,
                success: false,
            };
        };

        if phase == Phase::ActiveTurn {
            self.failures.remove(&actor);
            if let Err(e) = self.units.begin_turn(actor) {
                tracing::warn!(unit = %actor, error = %e, "Could not open turn");
            }
        }

        let team = self.units.get(actor).map(|u| u.team).unwrap_or_default();
        let controller = match self.teams.get(team) {
            Some(t) if !t.is_ai => Controller::Player,
            Some(_) => Controller::Ai,
            None => {
                tracing::warn!(unit = %actor, %team, "Actor's team not found, treating as AI");
                Controller::Ai
            }
        };

        tracing::debug!(unit = %actor, %phase, ?controller, tick = self.tick, "Turn opened");
        self.log_event(
            CombatEventType::TurnOpened { unit: actor, phase },
            format!("Unit {} is up ({})", actor, phase),
        );
        self.state = LoopState::AwaitingDecision { actor };

        StepOutcome::DecisionRequired(DecisionRequest {
            actor,
            team,
            controller,
            phase,
            trigger: token.id,
        })
    }

    fn process_effect(&mut self, token: ActionToken) -> StepOutcome {
        tracing::debug!(token = %token.id, "Processing: {}", ActionProcessor::summarize(&token));

        let ctx = ResolutionContext {
            units: &mut self.units,
            board: &mut self.board,
            alliances: &self.alliances,
        };

        match self.processor.resolve(&token, ctx) {
            Ok(outcome) => {
                self.failures.remove(&outcome.actor());
                let description = outcome.to_string();
                self.log_event(
                    CombatEventType::ActionResolved {
                        token: token.id,
                        outcome,
                    },
                    description,
                );
                if let ActionOutcome::Attacked {
                    target,
                    target_incapacitated: true,
                    ..
                } = outcome
                {
                    self.log_event(
                        CombatEventType::UnitIncapacitated { unit: target },
                        format!("Unit {} is incapacitated", target),
                    );
                }
                StepOutcome::Processed {
                    token: token.id,
                    success: true,
                }
            }
            Err(e) => {
                tracing::warn!(token = %token.id, actor = ?token.actor, error = %e, "Action failed");
                self.log_event(
                    CombatEventType::ActionFailed {
                        token: token.id,
                        unit: token.actor,
                        reason: e.to_string(),
                    },
                    format!("Failed to process token {}", token.id),
                );
                if let Some(actor) = token.actor {
                    self.record_failure(actor);
                }
                StepOutcome::Processed {
                    token: token.id,
                    success: false,
                }
            }
        }
    }

    /// Count a failure against an open turn, forfeiting it at the retry limit
    fn record_failure(&mut self, actor: UnitId) {
        let mid_turn = self
            .units
            .get(actor)
            .is_some_and(|u| u.is_mid_active_turn());
        if !mid_turn {
            return;
        }

        let count = self.failures.entry(actor).or_insert(0);
        *count += 1;
        if *count < self.config.max_action_retries {
            return;
        }

        self.failures.remove(&actor);
        if let Err(e) = self.units.end_turn(actor) {
            tracing::warn!(unit = %actor, error = %e, "Could not forfeit turn");
            return;
        }
        tracing::info!(unit = %actor, "Turn forfeited after repeated failed actions");
        self.log_event(
            CombatEventType::TurnForfeited { unit: actor },
            format!(
                "Unit {} forfeits its turn after {} failed actions",
                actor, self.config.max_action_retries
            ),
        );
    }

    fn advance_time(&mut self) {
        self.tick += 1;
        self.units.advance_all();
        tracing::trace!(tick = self.tick, "World tick");
    }
}
