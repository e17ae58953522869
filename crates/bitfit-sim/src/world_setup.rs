//! Fighter spawn factories.
//!
//! Resolving a fighter against the content tables is fallible and happens
//! before the world is touched, so a bad config never leaves a half-built round.

use hecs::{Entity, World};

use bitfit_core::components::*;
use bitfit_core::constants::{BOSS_SPAWN_X, GROUND_Y, PLAYER_SPAWN_X};
use bitfit_core::content::CombatContent;
use bitfit_core::enums::Facing;
use bitfit_core::error::{ConfigError, SetupError};
use bitfit_core::moves::ArchetypeStats;
use bitfit_core::types::FighterId;
use glam::Vec2;

use crate::input_buffer::InputBuffer;

/// A fighter resolved against content, ready to spawn.
#[derive(Debug, Clone)]
pub struct FighterSpec {
    pub id: FighterId,
    pub archetype: String,
    pub stats: ArchetypeStats,
    pub moves: MoveSet,
}

/// Collect every move a fighter needs. A missing entry is a config error.
pub fn resolve_move_set(content: &CombatContent) -> Result<MoveSet, ConfigError> {
    let mut moves = MoveSet::default();
    for id in content.required_moves() {
        let def = content.move_def(id)?;
        moves.moves.insert(id, def.clone());
    }
    Ok(moves)
}

pub fn prepare_fighter(
    content: &CombatContent,
    id: FighterId,
    archetype: &str,
) -> Result<FighterSpec, SetupError> {
    let stats = *content
        .archetypes
        .get(archetype)
        .ok_or_else(|| SetupError::UnknownArchetype(archetype.to_string()))?;
    Ok(FighterSpec {
        id,
        archetype: archetype.to_string(),
        stats,
        moves: resolve_move_set(content)?,
    })
}

/// Clear the world and spawn both fighters at their round-start marks.
pub fn spawn_round(world: &mut World, player: &FighterSpec, boss: &FighterSpec) -> (Entity, Entity) {
    world.clear();
    let p = spawn_player(world, player);
    let b = spawn_boss(world, boss);
    (p, b)
}

pub fn spawn_player(world: &mut World, spec: &FighterSpec) -> Entity {
    let (combatant, body, vitals) = fighter_bundle(spec, PLAYER_SPAWN_X, Facing::Right);
    world.spawn((
        combatant,
        body,
        vitals,
        FighterStatus::default(),
        Controls::default(),
        spec.moves.clone(),
        PlayerControlled,
        InputBuffer::default(),
    ))
}

pub fn spawn_boss(world: &mut World, spec: &FighterSpec) -> Entity {
    let (combatant, body, vitals) = fighter_bundle(spec, BOSS_SPAWN_X, Facing::Left);
    world.spawn((
        combatant,
        body,
        vitals,
        FighterStatus::default(),
        Controls::default(),
        spec.moves.clone(),
        BossControlled,
    ))
}

fn fighter_bundle(spec: &FighterSpec, x: f32, facing: Facing) -> (Combatant, Body, Vitals) {
    let position = Vec2::new(x, GROUND_Y);
    (
        Combatant {
            id: spec.id,
            archetype: spec.archetype.clone(),
            stats: spec.stats,
        },
        Body {
            position,
            previous_position: position,
            velocity: Vec2::ZERO,
            facing,
            grounded: true,
        },
        Vitals {
            health: spec.stats.health,
            max_health: spec.stats.health,
            meter: 0.0,
        },
    )
}
