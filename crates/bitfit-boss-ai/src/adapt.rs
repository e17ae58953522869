//! Adaptive difficulty: a bounded momentum scalar that rescales tier parameters.
//!
//! The scalar drifts toward +1 while the boss is winning and toward -1 while it
//! is losing. Positive momentum slows reactions and shortens combos but also
//! lowers the mistake chance, so a dominant boss plays slower, shorter and
//! cleaner strings while a losing boss reacts faster with longer, sloppier ones.

use bitfit_core::constants::AI_ADAPTATION_STEP;
use serde::{Deserialize, Serialize};

use crate::profiles::TierProfile;

/// Health fraction above which a side counts as comfortably ahead.
const WINNING_OWN_HEALTH: f64 = 0.7;
/// Opponent health fraction below which the opponent counts as in trouble.
const WINNING_OPPONENT_HEALTH: f64 = 0.3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Adaptation {
    scalar: f64,
}

impl Adaptation {
    pub fn scalar(&self) -> f64 {
        self.scalar
    }

    pub fn reset(&mut self) {
        self.scalar = 0.0;
    }

    /// Nudge the scalar from the current health fractions. Runs every tick.
    pub fn update(&mut self, own_health_frac: f64, opponent_health_frac: f64) {
        let winning =
            own_health_frac > WINNING_OWN_HEALTH && opponent_health_frac < WINNING_OPPONENT_HEALTH;
        let losing =
            opponent_health_frac > WINNING_OWN_HEALTH && own_health_frac < WINNING_OPPONENT_HEALTH;
        let step = if winning {
            AI_ADAPTATION_STEP
        } else if losing {
            -AI_ADAPTATION_STEP
        } else {
            0.0
        };
        let next = self.scalar + step;
        self.scalar = if next.is_finite() {
            next.clamp(-1.0, 1.0)
        } else {
            0.0
        };
    }

    /// Tier parameters rescaled by the current scalar.
    pub fn effective(&self, base: &TierProfile) -> TierProfile {
        let a = self.scalar;
        let reaction = (base.reaction_frames as f64 * (1.0 + 0.3 * a)).round().max(1.0);
        let mistake = (base.mistake_chance * (1.0 - 0.5 * a)).clamp(0.0, 1.0);
        let combo = (base.combo_length as f64 * (1.0 - 0.3 * a)).round().max(1.0);
        TierProfile {
            reaction_frames: reaction as u32,
            mistake_chance: mistake,
            combo_length: combo as u32,
        }
    }
}
