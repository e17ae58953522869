//! Fighter state machine.
//!
//! Pure functions over fighter components. The fighter system drives them once
//! per tick; the collision system calls the hit functions.
//!
//! Move timing: a move started at tick T has in-move frame 0 on tick T and
//! frame k on tick T+k. Frames `[startup, startup + active)` are active, and
//! the fighter returns to Idle on frame `startup + active + recovery`.

use bitfit_core::components::{ActiveMove, Body, Controls, FighterStatus, MoveSet, Vitals};
use bitfit_core::constants::{JUMP_VELOCITY, MAX_SUPER_METER, WALK_SPEED_PER_STAT};
use bitfit_core::enums::{FighterState, MoveKind};
use bitfit_core::moves::{ArchetypeStats, MoveDefinition, MoveId};

/// Free to walk, crouch, jump or block.
pub fn can_move(status: &FighterStatus) -> bool {
    !status.state.is_stunned()
        && !status.state.is_executing_move()
        && status.state != FighterState::Ko
}

pub fn can_block(status: &FighterStatus, body: &Body) -> bool {
    body.grounded
        && (can_move(status) || status.state == FighterState::BlockStun)
}

/// Whether `next` may start now: from neutral on the ground, or as a cancel.
pub fn can_attack(status: &FighterStatus, body: &Body, moves: &MoveSet, next: MoveId) -> bool {
    match status.state {
        FighterState::Idle | FighterState::Walking | FighterState::Crouching => body.grounded,
        FighterState::Attacking | FighterState::Special => {
            status.cancel_window
                && status
                    .current_move
                    .and_then(|m| moves.moves.get(&m.id))
                    .is_some_and(|def| def.can_cancel_into(next))
        }
        _ => false,
    }
}

/// Begin `def` on `tick`, replacing any move in progress.
pub fn start_move(status: &mut FighterStatus, body: &mut Body, def: &MoveDefinition, tick: u64) {
    status.current_move = Some(ActiveMove {
        id: def.id,
        frame: 0,
        started_tick: tick,
    });
    status.state = match def.kind {
        MoveKind::Normal => FighterState::Attacking,
        MoveKind::Special | MoveKind::Super => FighterState::Special,
    };
    status.state_timer = 0;
    status.hitbox_active = false;
    status.cancel_window = false;
    if body.grounded {
        body.velocity.x = 0.0;
    }
}

/// Drop the current move without touching the state.
pub fn clear_move(status: &mut FighterStatus) {
    status.current_move = None;
    status.hitbox_active = false;
    status.cancel_window = false;
}

fn end_move(status: &mut FighterStatus) {
    clear_move(status);
    if status.state.is_executing_move() {
        status.state = FighterState::Idle;
    }
}

/// Advance the current move by one frame and update the hitbox and cancel flags.
pub fn advance_move(status: &mut FighterStatus, moves: &MoveSet, cancel_window_frames: u32) {
    let Some(mut active) = status.current_move else {
        return;
    };
    let Some(def) = moves.moves.get(&active.id) else {
        tracing::warn!(move_id = ?active.id, "move missing from move set, ending it");
        end_move(status);
        return;
    };

    active.frame += 1;
    let frame = active.frame;
    if frame >= def.total_frames() {
        end_move(status);
        return;
    }

    status.current_move = Some(active);
    status.hitbox_active = frame >= def.startup && frame < def.active_end();
    let window = cancel_window_frames.min(def.active);
    status.cancel_window = def.cancelable
        && status.hitbox_active
        && frame >= def.active_end().saturating_sub(window);
}

/// Count down HitStun/BlockStun. Returns to Idle on expiry.
pub fn tick_stun(status: &mut FighterStatus) {
    if !status.state.is_stunned() {
        return;
    }
    status.state_timer = status.state_timer.saturating_sub(1);
    if status.state_timer == 0 {
        status.state = FighterState::Idle;
    }
}

/// Apply held movement input. No-op unless [`can_move`] holds.
pub fn apply_movement(status: &mut FighterStatus, body: &mut Body, controls: &Controls, speed: u32) {
    if !can_move(status) {
        return;
    }

    if controls.block_held && can_block(status, body) {
        status.state = FighterState::Blocking;
        body.velocity.x = 0.0;
        return;
    }
    if status.state == FighterState::Blocking {
        status.state = FighterState::Idle;
    }

    let horizontal = controls.direction.horizontal() as f32;
    let walk = horizontal * speed as f32 * WALK_SPEED_PER_STAT;

    if controls.jump && body.grounded {
        body.velocity.y = JUMP_VELOCITY;
        body.velocity.x = walk;
        body.grounded = false;
        status.state = FighterState::Jumping;
        return;
    }
    if !body.grounded {
        return;
    }

    if controls.direction.is_down() {
        status.state = FighterState::Crouching;
        body.velocity.x = 0.0;
    } else if horizontal != 0.0 {
        status.state = FighterState::Walking;
        body.velocity.x = walk;
    } else {
        if status.state == FighterState::Walking {
            body.velocity.x = 0.0;
        }
        status.state = FighterState::Idle;
    }
}

/// Damage before combo scaling or blocking:
/// `floor(floor(base * attack / 100) * (1 - defense / 200))`.
pub fn raw_damage(def: &MoveDefinition, attacker: &ArchetypeStats, defender: &ArchetypeStats) -> i32 {
    let powered = (def.damage as u64 * attacker.attack as u64 / 100) as f64;
    let reduction = (1.0 - defender.defense as f64 / 200.0).max(0.0);
    (powered * reduction).floor() as i32
}

/// Damage taken through a block: at least 1, and never lethal.
pub fn chip_damage(raw: i32, factor: f64, health: i32) -> i32 {
    let chip = ((raw as f64 * factor).floor() as i32).max(1);
    chip.min(health - 1).max(0)
}

/// Defender is guarding.
pub fn is_blocking(status: &FighterStatus) -> bool {
    matches!(status.state, FighterState::Blocking | FighterState::BlockStun)
}

/// Apply a guarded hit. `push_dir` is the attacker's facing sign.
pub fn take_blocked_hit(
    status: &mut FighterStatus,
    body: &mut Body,
    vitals: &mut Vitals,
    def: &MoveDefinition,
    damage: i32,
    push_dir: f32,
    pushback_scale: f32,
) {
    vitals.health -= damage;
    status.state = FighterState::BlockStun;
    status.state_timer = def.blockstun.max(1);
    status.blocked_this_tick = true;
    body.velocity.x = push_dir * def.pushback_block * pushback_scale;
}

/// Apply an unguarded hit. Returns true if it knocked the defender out.
pub fn take_hit(
    status: &mut FighterStatus,
    body: &mut Body,
    vitals: &mut Vitals,
    def: &MoveDefinition,
    damage: i32,
    push_dir: f32,
    pushback_scale: f32,
) -> bool {
    vitals.health -= damage;
    clear_move(status);
    status.hit_this_tick = true;
    body.velocity.x = push_dir * def.pushback_hit * pushback_scale;

    if vitals.health <= 0 {
        vitals.health = 0;
        status.state = FighterState::Ko;
        status.state_timer = 0;
        return true;
    }
    status.state = FighterState::HitStun;
    status.state_timer = def.hitstun.max(1);
    false
}

pub fn gain_meter(vitals: &mut Vitals, amount: f64) {
    if amount.is_finite() && amount > 0.0 {
        vitals.meter = (vitals.meter + amount).min(MAX_SUPER_METER);
    }
}
