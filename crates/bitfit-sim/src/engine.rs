//! Battle engine: the core of the combat simulation.
//!
//! `BattleEngine` owns the hecs ECS world, processes host commands, runs all
//! systems, and produces `BattleSnapshot`s. Completely headless, enabling
//! deterministic testing: the same seed and command script always produce
//! the same snapshots.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bitfit_boss_ai::brain::BossBrain;
use bitfit_core::commands::BattleCommand;
use bitfit_core::constants::{ROUNDS_TO_WIN, ROUND_TIME_FRAMES};
use bitfit_core::content::CombatContent;
use bitfit_core::enums::{AiPattern, BattlePhase, Difficulty};
use bitfit_core::error::{ConfigError, SetupError};
use bitfit_core::events::CombatEvent;
use bitfit_core::input::{InputEvent, RawInputEvent};
use bitfit_core::state::{BattleSnapshot, DebugBoxes};
use bitfit_core::types::{FighterId, SimTime};

use crate::combo::ComboTracker;
use crate::scheduler::FixedTimestep;
use crate::systems;
use crate::systems::collision::HitLedger;
use crate::systems::round::{RoundOutcome, RoundState};
use crate::systems::snapshot::SnapshotContext;
use crate::world_setup::{self, FighterSpec};

/// Configuration for a new battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConfig {
    /// RNG seed for determinism. Same seed = same battle.
    pub seed: u64,
    pub difficulty: Difficulty,
    pub ai_pattern: AiPattern,
    pub player_archetype: String,
    pub boss_archetype: String,
    pub round_time_frames: u32,
    pub rounds_to_win: u8,
    pub content: CombatContent,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: Difficulty::default(),
            ai_pattern: AiPattern::default(),
            player_archetype: "brawler".to_string(),
            boss_archetype: "gym_boss".to_string(),
            round_time_frames: ROUND_TIME_FRAMES,
            rounds_to_win: ROUNDS_TO_WIN,
            content: CombatContent::builtin(),
        }
    }
}

/// Result of [`BattleEngine::advance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    pub ticks_run: u32,
    /// Interpolation factor for rendering between the last two ticks.
    pub alpha: f64,
    /// Latest snapshot, carrying the events of every tick run.
    pub snapshot: BattleSnapshot,
}

/// The battle engine. Owns the ECS world and all sim state.
pub struct BattleEngine {
    world: World,
    time: SimTime,
    phase: BattlePhase,
    config: BattleConfig,
    player: FighterSpec,
    boss: FighterSpec,
    rng: ChaCha8Rng,
    command_queue: VecDeque<BattleCommand>,
    pending_inputs: Vec<InputEvent>,
    events: Vec<CombatEvent>,
    combos: ComboTracker,
    ledger: HitLedger,
    brain: BossBrain,
    rounds: RoundState,
    scheduler: FixedTimestep,
    ai_enabled: bool,
}

impl BattleEngine {
    /// Validate the config and build an idle engine. Call [`start_match`](Self::start_match) to fight.
    pub fn new(config: BattleConfig) -> Result<Self, SetupError> {
        config.content.validate()?;
        if config.round_time_frames == 0 {
            return Err(ConfigError::InvalidTuning("round time must be positive".into()).into());
        }
        let player = world_setup::prepare_fighter(&config.content, FighterId::PLAYER, &config.player_archetype)?;
        let boss = world_setup::prepare_fighter(&config.content, FighterId::BOSS, &config.boss_archetype)?;

        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            phase: BattlePhase::Idle,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            pending_inputs: Vec::new(),
            events: Vec::new(),
            combos: ComboTracker::new(&config.content.tuning),
            ledger: HitLedger::default(),
            brain: BossBrain::new(config.difficulty, config.ai_pattern),
            rounds: RoundState::new(config.round_time_frames, config.rounds_to_win),
            scheduler: FixedTimestep::default(),
            ai_enabled: true,
            player,
            boss,
            config,
        })
    }

    /// Reset scores and start round 1.
    pub fn start_match(&mut self) -> Result<(), SetupError> {
        if !matches!(
            self.phase,
            BattlePhase::Idle | BattlePhase::RoundOver | BattlePhase::MatchOver
        ) {
            return Err(SetupError::InvalidPhase(self.phase));
        }
        self.rounds.reset_match();
        info!(
            player = %self.player.archetype,
            boss = %self.boss.archetype,
            difficulty = ?self.brain.difficulty(),
            "match started"
        );
        self.begin_round();
        Ok(())
    }

    /// Start the next round after a round ends without deciding the match.
    pub fn start_next_round(&mut self) -> Result<(), SetupError> {
        match self.phase {
            BattlePhase::RoundOver => {
                self.begin_round();
                Ok(())
            }
            BattlePhase::MatchOver => Err(SetupError::MatchDecided),
            other => Err(SetupError::InvalidPhase(other)),
        }
    }

    /// Queue a host command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: BattleCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = BattleCommand>) {
        self.command_queue.extend(commands);
    }

    /// Queue one raw frontend input.
    pub fn queue_input(&mut self, event: RawInputEvent) {
        self.queue_command(BattleCommand::Input { event });
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> BattleSnapshot {
        self.process_commands();

        if self.phase == BattlePhase::Fighting {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        self.build_snapshot(events)
    }

    /// Feed host frame time and run every tick that is due.
    pub fn advance(&mut self, delta_ms: f64) -> FrameOutput {
        let step = self.scheduler.update(delta_ms);
        let mut events = Vec::new();
        let mut latest = None;
        for _ in 0..step.ticks {
            let mut snapshot = self.tick();
            events.append(&mut snapshot.events);
            latest = Some(snapshot);
        }
        let mut snapshot = latest.unwrap_or_else(|| self.snapshot());
        snapshot.events = events;
        FrameOutput {
            ticks_run: step.ticks,
            alpha: step.alpha,
            snapshot,
        }
    }

    /// Current state without advancing. Carries no events.
    pub fn snapshot(&self) -> BattleSnapshot {
        self.build_snapshot(Vec::new())
    }

    /// World-space hurtboxes and active hitboxes.
    pub fn debug_boxes(&self) -> DebugBoxes {
        systems::collision::debug_boxes(&self.world)
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn rounds(&self) -> &RoundState {
        &self.rounds
    }

    pub fn combos(&self) -> &ComboTracker {
        &self.combos
    }

    pub fn brain(&self) -> &BossBrain {
        &self.brain
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for test setups.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Freeze the boss so tests control both fighters.
    #[cfg(test)]
    pub fn set_ai_enabled(&mut self, enabled: bool) {
        self.ai_enabled = enabled;
    }

    fn begin_round(&mut self) {
        world_setup::spawn_round(&mut self.world, &self.player, &self.boss);
        self.combos.clear();
        self.ledger.clear();
        self.brain.reset_round();
        self.pending_inputs.clear();
        self.scheduler.reset();

        let round = self.rounds.begin_round();
        self.phase = BattlePhase::Fighting;
        self.events.push(CombatEvent::RoundStarted { round });
        info!(round, "round started");
    }

    fn build_snapshot(&self, events: Vec<CombatEvent>) -> BattleSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            SnapshotContext {
                time: self.time,
                phase: self.phase,
                rounds: &self.rounds,
                combos: &self.combos,
                difficulty: self.brain.difficulty(),
                ai_adaptation: self.brain.adaptation(),
            },
            events,
        )
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single host command.
    fn handle_command(&mut self, command: BattleCommand) {
        match command {
            BattleCommand::Pause => {
                if self.phase == BattlePhase::Fighting {
                    self.phase = BattlePhase::Paused;
                    debug!(tick = self.time.tick, "paused");
                }
            }
            BattleCommand::Resume => {
                if self.phase == BattlePhase::Paused {
                    self.phase = BattlePhase::Fighting;
                    debug!(tick = self.time.tick, "resumed");
                }
            }
            BattleCommand::Input { event } => {
                if self.phase != BattlePhase::Fighting {
                    debug!(phase = ?self.phase, "input dropped outside a round");
                    return;
                }
                match InputEvent::try_from(&event) {
                    Ok(input) => self.pending_inputs.push(input),
                    Err(err) => debug!(%err, kind = ?event.kind, value = %event.value, "invalid input dropped"),
                }
            }
            BattleCommand::SetDifficulty { difficulty } => {
                self.brain.set_difficulty(difficulty);
                self.config.difficulty = difficulty;
                info!(?difficulty, "difficulty changed");
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let tick = self.time.tick;
        let tuning = &self.config.content.tuning;

        // 1. Player input
        systems::input::run(&mut self.world, &mut self.pending_inputs, &self.config.content, tick);
        // 2. Fighter state machines
        systems::fighter::run(&mut self.world, tuning.cancel_window_frames, tick, &mut self.events);
        // 3. Kinematics
        systems::physics::run(&mut self.world);
        // 4. Hits, then pushbox separation
        systems::collision::run_hits(
            &mut self.world,
            &mut self.ledger,
            &mut self.combos,
            tuning,
            tick,
            &mut self.events,
        );
        systems::collision::run_pushbox(&mut self.world);
        // 5. Combo windows
        self.combos.update(tick, &mut self.events);
        // 6. Boss AI
        if self.ai_enabled {
            systems::boss_ai::run(&mut self.world, &mut self.brain, &mut self.rng);
        }
        // 7. Round clock and end check
        self.rounds.tick();
        if let Some(outcome) = systems::round::check_outcome(&self.world, self.rounds.frames_remaining) {
            self.end_round(outcome);
        }
    }

    fn end_round(&mut self, outcome: RoundOutcome) {
        self.combos.finish_round(&mut self.events);
        let round = self.rounds.round;
        self.events.push(CombatEvent::RoundEnded {
            round,
            winner: outcome.winner,
            reason: outcome.reason,
        });
        info!(round, winner = ?outcome.winner, reason = ?outcome.reason, "round over");

        match self.rounds.award(outcome.winner) {
            Some(winner) => {
                self.phase = BattlePhase::MatchOver;
                self.events.push(CombatEvent::MatchEnded { winner });
                info!(?winner, wins = ?self.rounds.wins, "match over");
            }
            None => self.phase = BattlePhase::RoundOver,
        }
    }
}
