//! Difficulty tiers and pattern base weights.

use bitfit_core::constants::ms_to_frames;
use bitfit_core::enums::{AiPattern, Difficulty};
use serde::{Deserialize, Serialize};

/// Tier parameters. The adaptation loop rescales these every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierProfile {
    /// Frames between decisions.
    pub reaction_frames: u32,
    /// Probability of fumbling a reaction or combo step.
    pub mistake_chance: f64,
    /// Longest canned combo attempted.
    pub combo_length: u32,
}

/// Base parameters for a difficulty tier.
pub fn get_tier(difficulty: Difficulty) -> TierProfile {
    match difficulty {
        Difficulty::Easy => TierProfile {
            reaction_frames: ms_to_frames(500),
            mistake_chance: 0.3,
            combo_length: 2,
        },
        Difficulty::Normal => TierProfile {
            reaction_frames: ms_to_frames(300),
            mistake_chance: 0.2,
            combo_length: 3,
        },
        Difficulty::Hard => TierProfile {
            reaction_frames: ms_to_frames(150),
            mistake_chance: 0.1,
            combo_length: 5,
        },
        Difficulty::Expert => TierProfile {
            reaction_frames: ms_to_frames(100),
            mistake_chance: 0.05,
            combo_length: 7,
        },
    }
}

/// Relative preference for each top-level decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionWeights {
    pub attack: f64,
    pub defend: f64,
    pub reposition: f64,
}

impl DecisionWeights {
    pub fn total(&self) -> f64 {
        self.attack + self.defend + self.reposition
    }
}

/// Base weights for a boss personality.
pub fn base_weights(pattern: AiPattern) -> DecisionWeights {
    match pattern {
        AiPattern::Aggressive => DecisionWeights {
            attack: 0.7,
            defend: 0.2,
            reposition: 0.1,
        },
        AiPattern::Balanced => DecisionWeights {
            attack: 0.5,
            defend: 0.3,
            reposition: 0.2,
        },
        AiPattern::Defensive => DecisionWeights {
            attack: 0.3,
            defend: 0.5,
            reposition: 0.2,
        },
    }
}
