//! Fundamental geometric and simulation types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::Facing;

/// Identifies one of the two combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FighterId(pub u8);

impl FighterId {
    pub const PLAYER: FighterId = FighterId(0);
    pub const BOSS: FighterId = FighterId(1);

    /// The other combatant.
    pub fn opponent(self) -> FighterId {
        if self == Self::PLAYER {
            Self::BOSS
        } else {
            Self::PLAYER
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: f64,
}

impl SimTime {
    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_ms += crate::constants::FRAME_MS;
    }
}

/// A box in fighter-local space: center offset (x toward facing, y up) and full size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    pub offset: Vec2,
    pub size: Vec2,
}

impl BoxShape {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            offset: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Place this box in world space for an owner at `origin` facing `facing`.
    pub fn to_world(&self, origin: Vec2, facing: Facing) -> WorldRect {
        let center = Vec2::new(
            origin.x + self.offset.x * facing.sign(),
            origin.y + self.offset.y,
        );
        let half = self.size * 0.5;
        WorldRect {
            min: center - half,
            max: center + half,
        }
    }
}

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldRect {
    /// Degenerate rectangles (empty or non-finite) never overlap anything.
    pub fn is_degenerate(&self) -> bool {
        !(self.min.is_finite() && self.max.is_finite())
            || self.max.x <= self.min.x
            || self.max.y <= self.min.y
    }

    /// Strict axis-aligned overlap test.
    pub fn overlaps(&self, other: &WorldRect) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}
