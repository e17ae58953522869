//! Boss AI for 16BitFit.
//!
//! Pure decision logic over plain data: difficulty tiers, situational
//! weighting, opponent habit tracking, and the adaptive-difficulty loop.
//! No ECS dependency. The simulation bridges fighter state into a
//! [`brain::BossContext`] each tick and applies the returned controls.

pub mod adapt;
pub mod brain;
pub mod decide;
pub mod habits;
pub mod profiles;

pub use bitfit_core as core;

#[cfg(test)]
mod tests;
