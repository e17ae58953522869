//! Kinematic integration: gravity, ground drag, landing, stage bounds, facing.

use hecs::World;

use bitfit_core::components::{Body, Combatant, FighterStatus};
use bitfit_core::constants::{DT, GRAVITY, GROUND_DRAG, GROUND_Y, STAGE_LEFT, STAGE_RIGHT};
use bitfit_core::enums::FighterState;
use bitfit_core::types::FighterId;

/// Integrate every fighter body by one tick.
pub fn run(world: &mut World) {
    let positions: Vec<(FighterId, f32)> = world
        .query::<(&Combatant, &Body)>()
        .iter()
        .map(|(_, (c, b))| (c.id, b.position.x))
        .collect();

    for (_entity, (combatant, body, status)) in
        world.query_mut::<(&Combatant, &mut Body, &mut FighterStatus)>()
    {
        body.previous_position = body.position;

        if !body.grounded {
            body.velocity.y -= GRAVITY * DT;
        } else if status.state != FighterState::Walking {
            body.velocity.x = apply_drag(body.velocity.x, GROUND_DRAG * DT);
        }

        body.position += body.velocity * DT;

        if body.position.y <= GROUND_Y && (!body.grounded || body.velocity.y < 0.0) {
            body.position.y = GROUND_Y;
            body.velocity.y = 0.0;
            body.grounded = true;
            if status.state == FighterState::Jumping {
                status.state = FighterState::Idle;
            }
        }

        body.position.x = body.position.x.clamp(STAGE_LEFT, STAGE_RIGHT);
        if !body.position.is_finite() {
            body.position = body.previous_position;
            body.velocity = glam::Vec2::ZERO;
        }

        if !status.state.is_executing_move() {
            let opponent = combatant.id.opponent();
            if let Some(&(_, opp_x)) = positions.iter().find(|(id, _)| *id == opponent) {
                body.facing = body.facing.toward(body.position.x, opp_x);
            }
        }
    }
}

/// Move `v` toward zero by `step` without crossing it.
fn apply_drag(v: f32, step: f32) -> f32 {
    if v > 0.0 {
        (v - step).max(0.0)
    } else {
        (v + step).min(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_stops_at_zero() {
        assert_eq!(apply_drag(5.0, 10.0), 0.0);
        assert_eq!(apply_drag(-5.0, 10.0), 0.0);
        assert_eq!(apply_drag(30.0, 10.0), 20.0);
        assert_eq!(apply_drag(0.0, 10.0), 0.0);
    }
}
