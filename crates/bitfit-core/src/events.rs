//! Events emitted by the simulation for HUD, audio, and haptics feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::moves::MoveId;
use crate::types::FighterId;

/// Discrete combat events, drained into each tick's snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    HitLanded {
        attacker: FighterId,
        defender: FighterId,
        move_id: MoveId,
        damage: i32,
        blocked: bool,
    },
    /// Emitted for every hit from the second one of a combo onward.
    ComboExtended {
        attacker: FighterId,
        count: u32,
        damage: i32,
    },
    ComboEnded {
        attacker: FighterId,
        final_count: u32,
        final_damage: i32,
        reason: ComboEndReason,
    },
    SpecialPerformed {
        fighter: FighterId,
        move_id: MoveId,
        kind: MoveKind,
    },
    Knockout {
        loser: FighterId,
    },
    RoundStarted {
        round: u32,
    },
    /// `winner` is `None` on a timeout draw.
    RoundEnded {
        round: u32,
        winner: Option<FighterId>,
        reason: RoundEndReason,
    },
    MatchEnded {
        winner: FighterId,
    },
}
