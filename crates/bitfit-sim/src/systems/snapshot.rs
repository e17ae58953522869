//! Snapshot system: queries the ECS world and builds a complete BattleSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use bitfit_core::components::{Body, Combatant, FighterStatus, Vitals};
use bitfit_core::enums::{BattlePhase, Difficulty};
use bitfit_core::events::CombatEvent;
use bitfit_core::state::{BattleSnapshot, FighterView};
use bitfit_core::types::SimTime;

use crate::combo::ComboTracker;
use crate::systems::round::RoundState;

/// Everything outside the world that the snapshot reports.
pub struct SnapshotContext<'a> {
    pub time: SimTime,
    pub phase: BattlePhase,
    pub rounds: &'a RoundState,
    pub combos: &'a ComboTracker,
    pub difficulty: Difficulty,
    pub ai_adaptation: f64,
}

/// Build a complete BattleSnapshot from the current world state.
pub fn build_snapshot(world: &World, ctx: SnapshotContext<'_>, events: Vec<CombatEvent>) -> BattleSnapshot {
    BattleSnapshot {
        time: ctx.time,
        phase: ctx.phase,
        round: ctx.rounds.round,
        round_frames_remaining: ctx.rounds.frames_remaining,
        wins: ctx.rounds.wins,
        fighters: build_fighters(world),
        combos: ctx.combos.views(),
        difficulty: ctx.difficulty,
        ai_adaptation: ctx.ai_adaptation,
        events,
    }
}

/// Build FighterView list, ordered by fighter id.
fn build_fighters(world: &World) -> Vec<FighterView> {
    let mut fighters: Vec<FighterView> = world
        .query::<(&Combatant, &Body, &Vitals, &FighterStatus)>()
        .iter()
        .map(|(_, (combatant, body, vitals, status))| FighterView {
            id: combatant.id,
            archetype: combatant.archetype.clone(),
            position: body.position,
            previous_position: body.previous_position,
            velocity: body.velocity,
            facing: body.facing,
            state: status.state,
            grounded: body.grounded,
            health: vitals.health,
            max_health: vitals.max_health,
            meter: vitals.meter,
            current_move: status.current_move.map(|m| m.id),
            move_frame: status.current_move.map_or(0, |m| m.frame),
            hit: status.hit_this_tick,
            blocked: status.blocked_this_tick,
        })
        .collect();
    fighters.sort_by_key(|f| f.id);
    fighters
}
