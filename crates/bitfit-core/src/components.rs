//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::moves::{ArchetypeStats, MoveDefinition, MoveId};
use crate::types::FighterId;

/// Identity and archetype of a combatant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: FighterId,
    pub archetype: String,
    pub stats: ArchetypeStats,
}

/// Kinematic state. Positive y is up; `position.y == GROUND_Y` when grounded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    /// Position at the end of the previous tick, for interpolation.
    pub previous_position: Vec2,
    /// Units per second.
    pub velocity: Vec2,
    pub facing: Facing,
    pub grounded: bool,
}

/// Health and super meter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vitals {
    pub health: i32,
    pub max_health: i32,
    pub meter: f64,
}

/// A move in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveMove {
    pub id: MoveId,
    /// In-move frame counter. 0 on the tick the move starts.
    pub frame: u32,
    /// Tick the move was started. Distinguishes repeated activations.
    pub started_tick: u64,
}

/// State-machine data for a fighter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FighterStatus {
    pub state: FighterState,
    /// Remaining stun frames in HitStun/BlockStun.
    pub state_timer: u32,
    pub current_move: Option<ActiveMove>,
    pub cancel_window: bool,
    pub hitbox_active: bool,
    /// Took an unblocked hit this tick.
    pub hit_this_tick: bool,
    /// Blocked a hit this tick.
    pub blocked_this_tick: bool,
}

/// Held and requested actions for the current tick.
///
/// `direction` and `block_held` persist until changed. `jump` and `attack`
/// are one-shot requests cleared by the fighter system.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Controls {
    pub direction: Direction,
    pub block_held: bool,
    pub jump: bool,
    pub attack: Option<MoveId>,
}

/// Frame data resolved for this fighter at round setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveSet {
    pub moves: BTreeMap<MoveId, MoveDefinition>,
}

/// Marker: driven by frontend input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerControlled;

/// Marker: driven by the boss AI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BossControlled;
