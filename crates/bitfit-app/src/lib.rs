//! 16BitFit headless host.
//!
//! Runs the battle engine on a dedicated thread, forwards host commands over a
//! channel, and publishes snapshots for polling or observation.

pub mod config;
pub mod game_loop;
pub mod state;

pub use bitfit_core as core;
