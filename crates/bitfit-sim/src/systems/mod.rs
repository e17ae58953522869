//! ECS systems that operate on the battle world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They do not own state. Fighter state lives in components; cross-tick
//! bookkeeping (combos, hit ledger, round clock) is passed in by the engine.

pub mod boss_ai;
pub mod collision;
pub mod fighter;
pub mod input;
pub mod physics;
pub mod round;
pub mod snapshot;
