//! Situation scoring and the weighted decision chooser.
//!
//! Pure functions. Randomness enters only as the `roll` argument.

use bitfit_core::constants::{AI_CLOSE_RANGE, AI_MID_RANGE};
use serde::{Deserialize, Serialize};

use crate::habits::HabitFrequencies;
use crate::profiles::DecisionWeights;

/// Distance band between the fighters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Range {
    Close,
    Mid,
    Far,
}

impl Range {
    pub fn classify(distance: f32) -> Range {
        let d = distance.abs();
        if d < AI_CLOSE_RANGE {
            Range::Close
        } else if d < AI_MID_RANGE {
            Range::Mid
        } else {
            Range::Far
        }
    }
}

/// Everything the scoring function looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Situation {
    pub range: Range,
    pub own_health_frac: f64,
    pub habits: HabitFrequencies,
}

/// Top-level choice made on a decision tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Attack,
    Defend,
    Reposition,
    /// Fallback when the weights are unusable: drift toward stage center.
    Recenter,
}

/// Adjust base weights for range, own health, and opponent habits.
pub fn situational_weights(base: DecisionWeights, situation: &Situation) -> DecisionWeights {
    let mut w = base;

    match situation.range {
        Range::Close => {
            w.attack *= 1.5;
            w.defend *= 1.2;
        }
        Range::Far => {
            w.reposition *= 2.0;
            w.attack *= 0.5;
        }
        Range::Mid => {}
    }

    if situation.own_health_frac < 0.3 {
        w.attack *= 1.5;
        w.defend *= 0.5;
    }

    if situation.habits.attack > 0.6 {
        w.defend *= 1.5;
    }
    // Don't keep swinging into a turtle.
    if situation.habits.block > 0.4 {
        w.reposition *= 1.3;
        w.attack *= 0.8;
    }

    w
}

/// Map a roll in [0, 1) onto the weighted options.
///
/// Non-finite, negative, or all-zero weights yield [`Decision::Recenter`].
pub fn choose(weights: &DecisionWeights, roll: f64) -> Decision {
    let parts = [
        (Decision::Attack, weights.attack),
        (Decision::Defend, weights.defend),
        (Decision::Reposition, weights.reposition),
    ];
    if parts.iter().any(|(_, w)| !w.is_finite() || *w < 0.0) {
        return Decision::Recenter;
    }
    let total = weights.total();
    if total <= 0.0 || !roll.is_finite() {
        return Decision::Recenter;
    }

    let mut target = roll.clamp(0.0, 1.0) * total;
    let mut last = Decision::Recenter;
    for (decision, w) in parts {
        if w <= 0.0 {
            continue;
        }
        if target < w {
            return decision;
        }
        target -= w;
        last = decision;
    }
    // Roll landed on the upper edge through rounding.
    last
}
