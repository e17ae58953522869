//! Boss AI bridge: builds a `BossContext` from the world, runs the brain, and
//! writes its output into the boss `Controls`.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use bitfit_boss_ai::brain::{BossBrain, BossContext};
use bitfit_boss_ai::habits::ObservedAction;
use bitfit_core::components::{Body, BossControlled, Controls, FighterStatus, PlayerControlled, Vitals};
use bitfit_core::enums::FighterState;

/// What the boss perceives the opponent doing.
pub fn observe(status: &FighterStatus, body: &Body) -> Option<ObservedAction> {
    match status.state {
        FighterState::Attacking => Some(ObservedAction::Attack),
        FighterState::Special => Some(ObservedAction::Special),
        FighterState::Blocking | FighterState::BlockStun => Some(ObservedAction::Block),
        FighterState::Jumping => Some(ObservedAction::Jump),
        _ if !body.grounded => Some(ObservedAction::Jump),
        _ => None,
    }
}

fn health_frac(vitals: &Vitals) -> f64 {
    if vitals.max_health <= 0 {
        return 0.0;
    }
    (vitals.health as f64 / vitals.max_health as f64).clamp(0.0, 1.0)
}

/// Run one brain update for the boss.
pub fn run(world: &mut World, brain: &mut BossBrain, rng: &mut ChaCha8Rng) {
    let opponent = world
        .query::<(&PlayerControlled, &Body, &Vitals, &FighterStatus)>()
        .iter()
        .next()
        .map(|(_, (_, body, vitals, status))| {
            (
                body.position.x,
                health_frac(vitals),
                observe(status, body),
                status.current_move.map(|m| m.id),
            )
        });
    let Some((opponent_x, opponent_health_frac, opponent_action, opponent_move)) = opponent else {
        return;
    };

    for (_entity, (_boss, body, vitals, controls)) in
        world.query_mut::<(&BossControlled, &Body, &Vitals, &mut Controls)>()
    {
        let ctx = BossContext {
            own_x: body.position.x,
            opponent_x,
            own_health_frac: health_frac(vitals),
            opponent_health_frac,
            own_meter: vitals.meter,
            opponent_action,
            opponent_move,
        };
        let out = brain.update(&ctx, rng);
        controls.direction = out.direction;
        controls.block_held = out.block;
        controls.jump = out.jump;
        controls.attack = out.attack;
    }
}
