//! Rolling window of observed opponent actions.
//!
//! Each entry keeps the move id the opponent was executing alongside its
//! category, so a string of different attacks counts as several observations
//! while one held move counts once.

use std::collections::VecDeque;

use bitfit_core::constants::AI_OBSERVATION_WINDOW;
use bitfit_core::moves::MoveId;
use serde::{Deserialize, Serialize};

/// Opponent action categories the boss tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservedAction {
    Attack,
    Block,
    Jump,
    Special,
}

/// One entry in the window. `move_id` is `None` for block and jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub action: ObservedAction,
    pub move_id: Option<MoveId>,
}

/// Share of each action in the window. All zero when nothing has been seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitFrequencies {
    pub attack: f64,
    pub block: f64,
    pub jump: f64,
    pub special: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitWindow {
    recent: VecDeque<Observation>,
}

impl HabitWindow {
    pub fn observe(&mut self, action: ObservedAction, move_id: Option<MoveId>) {
        if self.recent.len() == AI_OBSERVATION_WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(Observation { action, move_id });
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    pub fn clear(&mut self) {
        self.recent.clear();
    }

    /// Oldest first.
    pub fn observations(&self) -> impl Iterator<Item = &Observation> + '_ {
        self.recent.iter()
    }

    /// Move ids in the window, oldest first, skipping entries without one.
    pub fn recent_moves(&self) -> impl Iterator<Item = MoveId> + '_ {
        self.recent.iter().filter_map(|o| o.move_id)
    }

    pub fn frequencies(&self) -> HabitFrequencies {
        if self.recent.is_empty() {
            return HabitFrequencies::default();
        }
        let n = self.recent.len() as f64;
        let share = |kind: ObservedAction| {
            self.recent.iter().filter(|o| o.action == kind).count() as f64 / n
        };
        HabitFrequencies {
            attack: share(ObservedAction::Attack),
            block: share(ObservedAction::Block),
            jump: share(ObservedAction::Jump),
            special: share(ObservedAction::Special),
        }
    }
}
