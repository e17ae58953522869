//! Core types and definitions for the 16BitFit combat simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, content tables, motions, commands, state snapshots, events,
//! errors, and constants. It has no dependency on any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod content;
pub mod enums;
pub mod error;
pub mod events;
pub mod input;
pub mod motions;
pub mod moves;
pub mod state;
pub mod types;
