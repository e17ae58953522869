//! Player input system.
//!
//! Turns normalized input events into the player's `Controls`, records them in
//! the input buffer, and resolves attack buttons into special moves when a
//! motion matches and the meter covers the cost.

use hecs::World;
use tracing::debug;

use bitfit_core::components::{Body, Controls, MoveSet, PlayerControlled, Vitals};
use bitfit_core::content::CombatContent;
use bitfit_core::enums::{Limb, Strength};
use bitfit_core::input::{InputAction, InputEvent};
use bitfit_core::motions::MotionToken;
use bitfit_core::moves::MoveId;

use crate::input_buffer::InputBuffer;

/// Apply this tick's input events to the player-controlled fighter.
pub fn run(world: &mut World, inputs: &mut Vec<InputEvent>, content: &CombatContent, tick: u64) {
    let query = world.query_mut::<(
        &PlayerControlled,
        &Body,
        &Vitals,
        &MoveSet,
        &mut Controls,
        &mut InputBuffer,
    )>();
    let Some((_, (_, body, vitals, moves, controls, buffer))) = query.into_iter().next() else {
        inputs.clear();
        return;
    };

    for event in inputs.drain(..) {
        match event.action {
            InputAction::Direction { direction } => {
                controls.direction = direction;
                let rel = direction.relative_to(body.facing);
                if rel != buffer.held() {
                    buffer.record(MotionToken::dir(rel), tick, event.timestamp_ms);
                }
                buffer.hold(rel, tick);
            }
            InputAction::Attack { limb, strength } => {
                buffer.record(MotionToken::button(limb), tick, event.timestamp_ms);
                controls.attack = Some(resolve_attack(
                    buffer, content, moves, vitals.meter, limb, strength, tick,
                ));
            }
            InputAction::Block { pressed } => controls.block_held = pressed,
            InputAction::Jump => controls.jump = true,
        }
    }

    buffer.hold(controls.direction.relative_to(body.facing), tick);
    buffer.advance_charge();
    buffer.prune(tick);
}

/// Pick the move an attack button produces.
///
/// Motions are tried in table order. A match the meter cannot pay for falls
/// through to the next motion, and finally to the plain normal.
fn resolve_attack(
    buffer: &mut InputBuffer,
    content: &CombatContent,
    moves: &MoveSet,
    meter: f64,
    limb: Limb,
    strength: Strength,
    tick: u64,
) -> MoveId {
    let gap = content.tuning.input_gap_frames;
    for motion in content
        .motions
        .iter()
        .filter(|m| m.tokens.last() == Some(&MotionToken::button(limb)))
    {
        let Some(span) = buffer.match_motion(motion, tick, gap) else {
            continue;
        };
        let Some(def) = moves.moves.get(&motion.move_id) else {
            continue;
        };
        if meter < def.meter_cost {
            debug!(motion = %motion.name, meter, cost = def.meter_cost, "motion matched without meter");
            continue;
        }
        debug!(motion = %motion.name, move_id = ?motion.move_id, tick, "motion matched");
        buffer.consume(motion, span);
        return motion.move_id;
    }
    MoveId::normal(limb, strength)
}
