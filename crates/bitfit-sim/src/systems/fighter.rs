//! Fighter update system: stun timers, move frames, attack requests, movement.

use hecs::World;
use tracing::debug;

use bitfit_core::components::{Body, Combatant, Controls, FighterStatus, MoveSet, Vitals};
use bitfit_core::enums::{FighterState, MoveKind};
use bitfit_core::events::CombatEvent;

use crate::fighter;

/// Advance both fighters' state machines by one tick.
pub fn run(world: &mut World, cancel_window_frames: u32, tick: u64, events: &mut Vec<CombatEvent>) {
    for (_entity, (combatant, body, vitals, status, controls, moves)) in world.query_mut::<(
        &Combatant,
        &mut Body,
        &mut Vitals,
        &mut FighterStatus,
        &mut Controls,
        &MoveSet,
    )>() {
        status.hit_this_tick = false;
        status.blocked_this_tick = false;

        if status.state == FighterState::Ko {
            controls.attack = None;
            controls.jump = false;
            continue;
        }

        fighter::tick_stun(status);
        fighter::advance_move(status, moves, cancel_window_frames);

        if let Some(requested) = controls.attack.take() {
            match moves.moves.get(&requested) {
                Some(def) if fighter::can_attack(status, body, moves, requested) => {
                    if vitals.meter >= def.meter_cost {
                        vitals.meter -= def.meter_cost;
                        fighter::start_move(status, body, def, tick);
                        if def.kind != MoveKind::Normal {
                            events.push(CombatEvent::SpecialPerformed {
                                fighter: combatant.id,
                                move_id: def.id,
                                kind: def.kind,
                            });
                        }
                    } else {
                        debug!(fighter = ?combatant.id, move_id = ?requested, "not enough meter");
                    }
                }
                Some(_) => {}
                None => debug!(fighter = ?combatant.id, move_id = ?requested, "unknown move requested"),
            }
        }

        fighter::apply_movement(status, body, controls, combatant.stats.speed);
        controls.jump = false;
    }
}
