//! Commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::input::RawInputEvent;

/// All host-side actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BattleCommand {
    /// Freeze the simulation. Ticks still return snapshots.
    Pause,
    Resume,
    /// Player input from the frontend. Invalid events are dropped.
    Input { event: RawInputEvent },
    /// Switch the boss difficulty tier.
    SetDifficulty { difficulty: Difficulty },
}
