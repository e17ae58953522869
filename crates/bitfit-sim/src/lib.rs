//! Combat simulation engine for 16BitFit.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces BattleSnapshots for the frontend.

pub mod combo;
pub mod engine;
pub mod fighter;
pub mod input_buffer;
pub mod scheduler;
pub mod systems;
pub mod world_setup;

pub use bitfit_core as core;
pub use engine::{BattleConfig, BattleEngine, FrameOutput};
