//! Simulation constants and tuning parameters.
//!
//! Every duration is expressed in simulation frames at [`TICK_RATE`].
//! Millisecond values from the game design are converted here, once.

use crate::types::BoxShape;

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Milliseconds per tick.
pub const FRAME_MS: f64 = 1000.0 / TICK_RATE as f64;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

/// Maximum ticks a single scheduler update may run before dropping backlog.
pub const MAX_TICKS_PER_UPDATE: u32 = 5;

/// Convert a millisecond duration to whole frames (rounded).
pub const fn ms_to_frames(ms: u32) -> u32 {
    (ms * TICK_RATE + 500) / 1000
}

// --- Stage ---

/// Left stage wall (x).
pub const STAGE_LEFT: f32 = 50.0;

/// Right stage wall (x).
pub const STAGE_RIGHT: f32 = 364.0;

/// Ground height. Positive y is up.
pub const GROUND_Y: f32 = 0.0;

/// Player spawn x (one third of the stage width).
pub const PLAYER_SPAWN_X: f32 = 138.0;

/// Boss spawn x (two thirds of the stage width).
pub const BOSS_SPAWN_X: f32 = 276.0;

// --- Movement ---

/// Walk speed multiplier applied to the speed stat (units/s per stat point).
pub const WALK_SPEED_PER_STAT: f32 = 2.0;

/// Jump launch velocity (units/s, upward).
pub const JUMP_VELOCITY: f32 = 600.0;

/// Gravity (units/s^2).
pub const GRAVITY: f32 = 1500.0;

/// Horizontal drag applied to knockback while not walking (units/s^2).
pub const GROUND_DRAG: f32 = 800.0;

/// Knockback velocity per point of move pushback (units/s).
pub const PUSHBACK_VELOCITY_SCALE: f32 = 10.0;

// --- Bodies ---

/// Standing hurtbox in fighter-local space.
pub const HURTBOX_STANDING: BoxShape = BoxShape::new(0.0, 40.0, 60.0, 80.0);

/// Crouching hurtbox in fighter-local space.
pub const HURTBOX_CROUCHING: BoxShape = BoxShape::new(0.0, 25.0, 60.0, 50.0);

// --- Pushbox ---

/// Minimum horizontal separation between fighter centers.
pub const PUSHBOX_MIN_SEPARATION: f32 = 60.0;

/// Vertical distance beyond which pushboxes no longer interact (jump-over).
pub const PUSHBOX_HEIGHT: f32 = 80.0;

// --- Combat ---

/// Default cancel window (trailing active frames).
pub const COMBO_CANCEL_WINDOW_FRAMES: u32 = 8;

/// Maximum frame gap between two matched motion tokens.
pub const INPUT_GAP_WINDOW_FRAMES: u32 = 10;

/// Frames between hits before a combo record is finalized (~800 ms).
pub const COMBO_WINDOW_FRAMES: u32 = ms_to_frames(800);

/// Lifetime of a credited hit key (~100 ms).
pub const HIT_KEY_TTL_FRAMES: u32 = ms_to_frames(100);

/// Per-hit damage scaling. Hits beyond the table use the last entry.
pub const DAMAGE_SCALING: [f64; 8] = [1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3];

/// Fraction of raw damage dealt through a block.
pub const CHIP_DAMAGE_FACTOR: f64 = 0.1;

/// Super meter capacity.
pub const MAX_SUPER_METER: f64 = 100.0;

/// Fraction of dealt damage the attacker gains as meter.
pub const METER_GAIN_ON_HIT: f64 = 0.5;

/// Fraction of taken damage the defender gains as meter.
pub const METER_GAIN_ON_DAMAGE: f64 = 0.25;

/// Meter cost of a special move.
pub const SPECIAL_METER_COST: f64 = 25.0;

/// Meter cost of a super move.
pub const SUPER_METER_COST: f64 = 100.0;

// --- Input buffer ---

/// Buffered inputs older than this are evicted (~2 s).
pub const INPUT_RETENTION_FRAMES: u32 = ms_to_frames(2000);

/// Hard cap on buffered entries.
pub const INPUT_BUFFER_CAPACITY: usize = 60;

// --- Rounds ---

/// Round length (99 seconds).
pub const ROUND_TIME_FRAMES: u32 = 99 * TICK_RATE;

/// Round wins needed to take the match.
pub const ROUNDS_TO_WIN: u8 = 2;

// --- Boss AI ---

/// Upper bound of the "close" range band.
pub const AI_CLOSE_RANGE: f32 = 80.0;

/// Upper bound of the "mid" range band.
pub const AI_MID_RANGE: f32 = 150.0;

/// Rolling window size for observed opponent actions.
pub const AI_OBSERVATION_WINDOW: usize = 10;

/// Adaptation scalar step per tick.
pub const AI_ADAPTATION_STEP: f64 = 0.01;

/// Preferred spacing the boss repositions toward.
pub const AI_PREFERRED_DISTANCE: f32 = 120.0;

/// Dead zone around the preferred spacing.
pub const AI_SPACING_TOLERANCE: f32 = 20.0;

/// Frames a defensive block is held before release (~500 ms).
pub const AI_BLOCK_HOLD_FRAMES: u32 = ms_to_frames(500);

/// Longest canned combo the boss will attempt.
pub const AI_MAX_COMBO_LENGTH: u32 = 5;
