//! Setup-time and input errors.
//!
//! Configuration errors are fatal for the round being set up: the round does
//! not start and the error is returned to the caller. Nothing in this module is
//! raised from inside a simulation tick.

use crate::enums::BattlePhase;
use crate::moves::MoveId;

/// Malformed or incomplete combat content.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A move referenced by the move set, a motion, or a cancel list has no definition.
    #[error("move {0:?} has no definition")]
    MissingMove(MoveId),

    /// A move table entry is stored under a key that disagrees with its `id`.
    #[error("move table key {key:?} holds definition for {id:?}")]
    MismatchedMoveKey { key: MoveId, id: MoveId },

    /// Startup, active, or recovery frames must be positive.
    #[error("move {move_id:?} has zero {field} frames")]
    ZeroFrames {
        move_id: MoveId,
        field: &'static str,
    },

    /// Startup, active, and recovery must sum to a representable frame count.
    #[error("move {0:?} frame total overflows")]
    FrameOverflow(MoveId),

    /// Archetype stats must be positive.
    #[error("archetype '{archetype}' has non-positive {stat}")]
    NonPositiveStat {
        archetype: String,
        stat: &'static str,
    },

    /// No archetypes were defined at all.
    #[error("content defines no archetypes")]
    NoArchetypes,

    #[error("motion '{0}' has no tokens")]
    EmptyMotion(String),

    /// Charge tokens may only lead a motion.
    #[error("motion '{0}' has a charge token after its first position")]
    MisplacedCharge(String),

    #[error("motion '{0}' does not end with a button")]
    MotionWithoutButton(String),

    #[error("invalid combat tuning: {0}")]
    InvalidTuning(String),

    #[error("malformed content JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned when building an engine or starting a round.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown archetype '{0}'")]
    UnknownArchetype(String),

    /// Rounds may only be (re)started from the listed phases.
    #[error("cannot start a round while the battle is {0:?}")]
    InvalidPhase(BattlePhase),

    #[error("match is already decided")]
    MatchDecided,
}

/// Rejected raw input event. Never fatal; the event is dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown {kind} value '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    #[error("non-finite timestamp")]
    BadTimestamp,
}
