//! Boss decision loop.
//!
//! [`BossBrain::update`] runs once per tick with a plain-data [`BossContext`]
//! and returns the [`BossControls`] the fighter state machine should execute.
//! Decisions are made only when the reaction cooldown expires; held behaviors
//! (blocking, walking) and adaptation run every tick.

use std::collections::VecDeque;

use bitfit_core::constants::*;
use bitfit_core::enums::{AiPattern, Difficulty, Direction};
use bitfit_core::moves::MoveId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::adapt::Adaptation;
use crate::decide::{choose, situational_weights, Decision, Range, Situation};
use crate::habits::{HabitWindow, ObservedAction};
use crate::profiles::{base_weights, get_tier, TierProfile};

const WALK_IN_FRAMES: u32 = ms_to_frames(300);
const BACK_OFF_FRAMES: u32 = ms_to_frames(200);
const SIDESTEP_FRAMES: u32 = ms_to_frames(150);

/// Loosely coupled behavior modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiMode {
    #[default]
    Neutral,
    Reacting,
    ExecutingCombo,
    Blocking,
    Repositioning,
}

/// One step of a canned combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComboStep {
    Move(MoveId),
    /// Fireball when meter allows, heavy punch otherwise.
    Special,
}

/// Close-range strings the boss picks from.
pub const CANNED_COMBOS: [&[ComboStep]; 4] = {
    use ComboStep::{Move, Special};
    use MoveId::*;
    [
        &[Move(LightPunch), Move(MediumPunch), Move(HeavyPunch)],
        &[Move(LightKick), Move(MediumKick), Special],
        &[Move(MediumPunch), Move(MediumKick), Move(HeavyKick)],
        &[Move(LightPunch), Move(LightKick), Move(MediumPunch), Special],
    ]
};

/// What the brain can see this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossContext {
    pub own_x: f32,
    pub opponent_x: f32,
    pub own_health_frac: f64,
    pub opponent_health_frac: f64,
    pub own_meter: f64,
    /// What the opponent is doing right now, if anything notable.
    pub opponent_action: Option<ObservedAction>,
    pub opponent_move: Option<MoveId>,
}

/// Controls requested for this tick. Directions are absolute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BossControls {
    pub direction: Direction,
    pub block: bool,
    pub jump: bool,
    pub attack: Option<MoveId>,
}

#[derive(Debug, Clone)]
pub struct BossBrain {
    difficulty: Difficulty,
    pattern: AiPattern,
    base: TierProfile,
    effective: TierProfile,
    adaptation: Adaptation,
    habits: HabitWindow,
    last_seen: Option<(ObservedAction, Option<MoveId>)>,
    mode: AiMode,
    cooldown: u32,
    combo_plan: VecDeque<ComboStep>,
    block_frames: u32,
    walk: Option<(Direction, u32)>,
    last_decision: Option<Decision>,
}

impl BossBrain {
    pub fn new(difficulty: Difficulty, pattern: AiPattern) -> Self {
        let base = get_tier(difficulty);
        Self {
            difficulty,
            pattern,
            base,
            effective: base,
            adaptation: Adaptation::default(),
            habits: HabitWindow::default(),
            last_seen: None,
            mode: AiMode::Neutral,
            cooldown: base.reaction_frames,
            combo_plan: VecDeque::new(),
            block_frames: 0,
            walk: None,
            last_decision: None,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn mode(&self) -> AiMode {
        self.mode
    }

    pub fn adaptation(&self) -> f64 {
        self.adaptation.scalar()
    }

    pub fn effective(&self) -> TierProfile {
        self.effective
    }

    pub fn habits(&self) -> &HabitWindow {
        &self.habits
    }

    pub fn last_decision(&self) -> Option<Decision> {
        self.last_decision
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.base = get_tier(difficulty);
        self.effective = self.adaptation.effective(&self.base);
        self.cooldown = self.cooldown.min(self.effective.reaction_frames);
    }

    /// Clear per-round behavior. Observed habits carry over between rounds.
    pub fn reset_round(&mut self) {
        self.adaptation.reset();
        self.effective = self.base;
        self.last_seen = None;
        self.mode = AiMode::Neutral;
        self.cooldown = self.base.reaction_frames;
        self.combo_plan.clear();
        self.block_frames = 0;
        self.walk = None;
        self.last_decision = None;
    }

    /// Advance one tick.
    pub fn update<R: Rng + ?Sized>(&mut self, ctx: &BossContext, rng: &mut R) -> BossControls {
        self.observe(ctx);
        self.adaptation
            .update(ctx.own_health_frac, ctx.opponent_health_frac);
        self.effective = self.adaptation.effective(&self.base);

        let distance = ctx.opponent_x - ctx.own_x;
        let range = Range::classify(distance);
        let mut out = BossControls::default();

        if self.block_frames > 0 {
            self.block_frames -= 1;
            if self.block_frames > 0 {
                out.block = true;
                self.cooldown = self.cooldown.saturating_sub(1);
                return out;
            }
            self.mode = AiMode::Neutral;
            self.cooldown = self.effective.reaction_frames;
            if range == Range::Close {
                out.attack = Some(MoveId::LightPunch);
            }
            return out;
        }

        if let Some((dir, frames)) = self.walk {
            out.direction = dir;
            self.walk = (frames > 1).then(|| (dir, frames - 1));
            if self.walk.is_none() && self.mode == AiMode::Repositioning {
                self.mode = AiMode::Neutral;
            }
        }

        if self.cooldown > 0 {
            self.cooldown -= 1;
            return out;
        }
        self.cooldown = self.effective.reaction_frames;
        self.decide(ctx, distance, range, rng, &mut out);
        out
    }

    /// Record a new opponent action. Held actions count once; a new move id
    /// under the same category is a new entry.
    fn observe(&mut self, ctx: &BossContext) {
        let seen = ctx.opponent_action.map(|a| (a, ctx.opponent_move));
        if seen != self.last_seen {
            if let Some((action, move_id)) = seen {
                self.habits.observe(action, move_id);
            }
            self.last_seen = seen;
        }
    }

    fn decide<R: Rng + ?Sized>(
        &mut self,
        ctx: &BossContext,
        distance: f32,
        range: Range,
        rng: &mut R,
        out: &mut BossControls,
    ) {
        if self.mode == AiMode::ExecutingCombo {
            if let Some(step) = self.combo_plan.pop_front() {
                if rng.gen::<f64>() < self.effective.mistake_chance {
                    debug!(?step, "boss dropped combo");
                    self.combo_plan.clear();
                    self.mode = AiMode::Neutral;
                    return;
                }
                out.attack = Some(resolve_step(step, ctx.own_meter));
                if self.combo_plan.is_empty() {
                    self.mode = AiMode::Neutral;
                }
                return;
            }
            self.mode = AiMode::Neutral;
        }

        let mistake = self.effective.mistake_chance;
        let opponent_attacking = matches!(
            ctx.opponent_action,
            Some(ObservedAction::Attack | ObservedAction::Special)
        );
        if opponent_attacking && range == Range::Close {
            self.mode = AiMode::Reacting;
            self.walk = None;
            if rng.gen::<f64>() < 1.0 - mistake {
                self.start_block(out);
            } else {
                out.attack = Some(MoveId::HeavyPunch);
            }
            debug!(block = out.block, "boss reacting to close attack");
            return;
        }

        let opponent_jumping = ctx.opponent_action == Some(ObservedAction::Jump);
        if opponent_jumping && range == Range::Mid && rng.gen::<f64>() < 1.0 - 2.0 * mistake {
            self.mode = AiMode::Reacting;
            self.walk = None;
            out.attack = Some(if ctx.own_meter >= SPECIAL_METER_COST {
                MoveId::RisingUppercut
            } else {
                MoveId::HeavyPunch
            });
            debug!(attack = ?out.attack, "boss anti-air");
            return;
        }

        let situation = Situation {
            range,
            own_health_frac: ctx.own_health_frac,
            habits: self.habits.frequencies(),
        };
        let weights = situational_weights(base_weights(self.pattern), &situation);
        let decision = choose(&weights, rng.gen::<f64>());
        self.last_decision = Some(decision);
        debug!(?decision, ?range, "boss decision");

        match decision {
            Decision::Attack => match range {
                Range::Close => self.start_combo(ctx.own_meter, rng, out),
                Range::Mid => {
                    self.mode = AiMode::Neutral;
                    out.attack = Some(if ctx.own_meter >= SPECIAL_METER_COST {
                        MoveId::Fireball
                    } else {
                        MoveId::MediumKick
                    });
                }
                Range::Far => self.reposition(ctx, distance, rng, out),
            },
            Decision::Defend => self.start_block(out),
            Decision::Reposition => self.reposition(ctx, distance, rng, out),
            Decision::Recenter => {
                warn!(?weights, "boss weights exhausted, drifting to center");
                self.mode = AiMode::Neutral;
                out.direction = toward_x(ctx.own_x, (STAGE_LEFT + STAGE_RIGHT) * 0.5);
            }
        }
    }

    fn start_block(&mut self, out: &mut BossControls) {
        self.mode = AiMode::Blocking;
        self.walk = None;
        self.block_frames = AI_BLOCK_HOLD_FRAMES;
        out.block = true;
        out.direction = Direction::Neutral;
    }

    fn start_combo<R: Rng + ?Sized>(&mut self, meter: f64, rng: &mut R, out: &mut BossControls) {
        let combo = CANNED_COMBOS[rng.gen_range(0..CANNED_COMBOS.len())];
        let len = (self.effective.combo_length.min(AI_MAX_COMBO_LENGTH) as usize).min(combo.len());
        self.combo_plan = combo[..len].iter().copied().collect();
        self.walk = None;
        if let Some(first) = self.combo_plan.pop_front() {
            out.attack = Some(resolve_step(first, meter));
        }
        self.mode = if self.combo_plan.is_empty() {
            AiMode::Neutral
        } else {
            AiMode::ExecutingCombo
        };
    }

    fn reposition<R: Rng + ?Sized>(
        &mut self,
        ctx: &BossContext,
        distance: f32,
        rng: &mut R,
        out: &mut BossControls,
    ) {
        let gap = distance.abs();
        let toward = toward_x(ctx.own_x, ctx.opponent_x);
        let away = mirror(toward);
        let (dir, frames) = if gap > AI_PREFERRED_DISTANCE + AI_SPACING_TOLERANCE {
            (toward, WALK_IN_FRAMES)
        } else if gap < AI_PREFERRED_DISTANCE - AI_SPACING_TOLERANCE {
            (away, BACK_OFF_FRAMES)
        } else if rng.gen_bool(0.5) {
            (toward, SIDESTEP_FRAMES)
        } else {
            (away, SIDESTEP_FRAMES)
        };
        self.mode = AiMode::Repositioning;
        out.direction = dir;
        self.walk = (frames > 1).then_some((dir, frames - 1));
    }
}

fn resolve_step(step: ComboStep, meter: f64) -> MoveId {
    match step {
        ComboStep::Move(id) => id,
        ComboStep::Special if meter >= SPECIAL_METER_COST => MoveId::Fireball,
        ComboStep::Special => MoveId::HeavyPunch,
    }
}

fn toward_x(from: f32, to: f32) -> Direction {
    if to >= from {
        Direction::Right
    } else {
        Direction::Left
    }
}

fn mirror(dir: Direction) -> Direction {
    match dir {
        Direction::Right => Direction::Left,
        Direction::Left => Direction::Right,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn close_ctx() -> BossContext {
        BossContext {
            own_x: 200.0,
            opponent_x: 150.0,
            own_health_frac: 1.0,
            opponent_health_frac: 1.0,
            own_meter: 0.0,
            opponent_action: None,
            opponent_move: None,
        }
    }

    #[test]
    fn test_combo_length_capped_by_tier() {
        let mut brain = BossBrain::new(Difficulty::Easy, AiPattern::Aggressive);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut out = BossControls::default();
        brain.start_combo(0.0, &mut rng, &mut out);
        assert!(out.attack.is_some());
        assert_eq!(brain.combo_plan.len(), 1);
        assert_eq!(brain.mode, AiMode::ExecutingCombo);
    }

    #[test]
    fn test_combo_advances_one_step_per_decision() {
        let mut brain = BossBrain::new(Difficulty::Expert, AiPattern::Aggressive);
        brain.effective.mistake_chance = 0.0;
        brain.mode = AiMode::ExecutingCombo;
        brain.combo_plan = [
            ComboStep::Move(MoveId::MediumPunch),
            ComboStep::Special,
        ]
        .into_iter()
        .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let ctx = close_ctx();

        let mut out = BossControls::default();
        brain.decide(&ctx, -50.0, Range::Close, &mut rng, &mut out);
        assert_eq!(out.attack, Some(MoveId::MediumPunch));
        assert_eq!(brain.mode, AiMode::ExecutingCombo);

        let mut out = BossControls::default();
        brain.decide(&ctx, -50.0, Range::Close, &mut rng, &mut out);
        // No meter: the special step degrades to a heavy punch.
        assert_eq!(out.attack, Some(MoveId::HeavyPunch));
        assert_eq!(brain.mode, AiMode::Neutral);
    }

    #[test]
    fn test_special_step_uses_meter() {
        assert_eq!(
            resolve_step(ComboStep::Special, SPECIAL_METER_COST),
            MoveId::Fireball
        );
        assert_eq!(resolve_step(ComboStep::Special, 0.0), MoveId::HeavyPunch);
    }

    #[test]
    fn test_reposition_walks_in_from_far() {
        let mut brain = BossBrain::new(Difficulty::Normal, AiPattern::Balanced);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ctx = BossContext {
            own_x: 300.0,
            opponent_x: 100.0,
            ..close_ctx()
        };
        let mut out = BossControls::default();
        brain.reposition(&ctx, -200.0, &mut rng, &mut out);
        assert_eq!(out.direction, Direction::Left);
        assert_eq!(brain.mode, AiMode::Repositioning);
        assert_eq!(brain.walk, Some((Direction::Left, WALK_IN_FRAMES - 1)));
    }

    #[test]
    fn test_reposition_backs_off_when_crowded() {
        let mut brain = BossBrain::new(Difficulty::Normal, AiPattern::Balanced);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ctx = close_ctx();
        let mut out = BossControls::default();
        brain.reposition(&ctx, -50.0, &mut rng, &mut out);
        assert_eq!(out.direction, Direction::Right);
        assert_eq!(brain.walk, Some((Direction::Right, BACK_OFF_FRAMES - 1)));
    }
}
