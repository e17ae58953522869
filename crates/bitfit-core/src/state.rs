//! Battle snapshot: the complete visible state handed to the presentation layer each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::CombatEvent;
use crate::moves::MoveId;
use crate::types::{FighterId, SimTime, WorldRect};

/// Complete battle state published after each tick. Read-only for consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub time: SimTime,
    pub phase: BattlePhase,
    /// 1-based round number; 0 before the first round.
    pub round: u32,
    pub round_frames_remaining: u32,
    /// Round wins, indexed by `FighterId::index()`.
    pub wins: [u8; 2],
    pub fighters: Vec<FighterView>,
    pub combos: Vec<ComboView>,
    pub difficulty: Difficulty,
    /// Boss adaptation scalar in [-1, 1].
    pub ai_adaptation: f64,
    /// Events raised during this tick.
    pub events: Vec<CombatEvent>,
}

impl BattleSnapshot {
    pub fn fighter(&self, id: FighterId) -> Option<&FighterView> {
        self.fighters.iter().find(|f| f.id == id)
    }
}

/// One combatant as the HUD and renderer see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterView {
    pub id: FighterId,
    pub archetype: String,
    pub position: Vec2,
    pub previous_position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub state: FighterState,
    pub grounded: bool,
    pub health: i32,
    pub max_health: i32,
    pub meter: f64,
    pub current_move: Option<MoveId>,
    pub move_frame: u32,
    pub hit: bool,
    pub blocked: bool,
}

impl FighterView {
    /// Position blended between the last two ticks. `alpha` comes from the scheduler.
    pub fn render_position(&self, alpha: f64) -> Vec2 {
        let t = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0) as f32
        } else {
            1.0
        };
        self.previous_position.lerp(self.position, t)
    }
}

/// A live combo with at least two hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboView {
    pub attacker: FighterId,
    pub hits: u32,
    pub damage: i32,
    pub moves: Vec<MoveId>,
    /// Display rank ("Nice", "Great", ...), if the count earns one.
    pub rank: Option<String>,
}

/// World-space collision boxes for one fighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterBoxes {
    pub id: FighterId,
    pub hurtbox: WorldRect,
    pub hitboxes: Vec<WorldRect>,
}

/// Debug overlay query result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugBoxes {
    pub fighters: Vec<FighterBoxes>,
}
