//! Move identifiers, frame data, and archetype stats.

use serde::{Deserialize, Serialize};

use crate::enums::{Limb, MoveKind, Strength};
use crate::types::BoxShape;

/// Every move a fighter can perform. Keys the content move table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveId {
    LightPunch,
    MediumPunch,
    HeavyPunch,
    LightKick,
    MediumKick,
    HeavyKick,
    /// Quarter-circle forward + punch.
    Fireball,
    /// Forward, down, down-forward + punch.
    RisingUppercut,
    /// Quarter-circle back + kick.
    WhirlwindKick,
    /// Half-circle back + kick.
    CrescentKick,
    /// Charge back, forward + punch.
    SonicBoom,
    /// Full circle + punch.
    SpinningSlam,
    /// Double quarter-circle forward + punch.
    SuperFireball,
}

impl MoveId {
    pub const NORMALS: [MoveId; 6] = [
        MoveId::LightPunch,
        MoveId::MediumPunch,
        MoveId::HeavyPunch,
        MoveId::LightKick,
        MoveId::MediumKick,
        MoveId::HeavyKick,
    ];

    /// The normal attack for a limb/strength pair.
    pub fn normal(limb: Limb, strength: Strength) -> MoveId {
        match (limb, strength) {
            (Limb::Punch, Strength::Light) => MoveId::LightPunch,
            (Limb::Punch, Strength::Medium) => MoveId::MediumPunch,
            (Limb::Punch, Strength::Heavy) => MoveId::HeavyPunch,
            (Limb::Kick, Strength::Light) => MoveId::LightKick,
            (Limb::Kick, Strength::Medium) => MoveId::MediumKick,
            (Limb::Kick, Strength::Heavy) => MoveId::HeavyKick,
        }
    }

    /// Limb of a normal attack, `None` for specials.
    pub fn limb(self) -> Option<Limb> {
        match self {
            MoveId::LightPunch | MoveId::MediumPunch | MoveId::HeavyPunch => Some(Limb::Punch),
            MoveId::LightKick | MoveId::MediumKick | MoveId::HeavyKick => Some(Limb::Kick),
            _ => None,
        }
    }

    pub fn is_normal(self) -> bool {
        self.limb().is_some()
    }
}

/// Immutable frame data for one move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDefinition {
    pub id: MoveId,
    #[serde(default)]
    pub kind: MoveKind,
    pub startup: u32,
    pub active: u32,
    pub recovery: u32,
    pub damage: u32,
    pub hitstun: u32,
    pub blockstun: u32,
    pub pushback_hit: f32,
    pub pushback_block: f32,
    /// Whether the trailing active frames open a cancel window.
    #[serde(default = "default_true")]
    pub cancelable: bool,
    /// Moves this one may be cancelled into.
    #[serde(default)]
    pub cancels_into: Vec<MoveId>,
    #[serde(default)]
    pub meter_cost: f64,
    /// Hitbox in fighter-local space.
    pub hitbox: BoxShape,
}

fn default_true() -> bool {
    true
}

impl MoveDefinition {
    pub fn total_frames(&self) -> u32 {
        self.startup.saturating_add(self.active).saturating_add(self.recovery)
    }

    /// First in-move frame after the active window.
    pub fn active_end(&self) -> u32 {
        self.startup.saturating_add(self.active)
    }

    pub fn can_cancel_into(&self, next: MoveId) -> bool {
        self.cancelable && self.cancels_into.contains(&next)
    }
}

/// Archetype stats loaded from content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeStats {
    pub health: i32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub special: u32,
}
