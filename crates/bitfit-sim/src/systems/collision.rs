//! Collision system: hitbox/hurtbox resolution and pushbox separation.
//!
//! Hit detection reads a frozen view of both fighters, so the order of the
//! pairwise loop never changes who hits whom. Hits are then applied one at a
//! time against live components.

use std::collections::HashMap;

use hecs::{Entity, World};
use tracing::trace;

use bitfit_core::components::{Body, Combatant, FighterStatus, MoveSet, Vitals};
use bitfit_core::constants::*;
use bitfit_core::content::CombatTuning;
use bitfit_core::enums::FighterState;
use bitfit_core::events::CombatEvent;
use bitfit_core::moves::MoveId;
use bitfit_core::state::{DebugBoxes, FighterBoxes};
use bitfit_core::types::{BoxShape, FighterId, WorldRect};
use glam::Vec2;

use crate::combo::ComboTracker;
use crate::fighter;

/// Identifies one move activation striking one defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitKey {
    pub attacker: FighterId,
    pub defender: FighterId,
    pub move_id: MoveId,
    /// Tick the move activation started.
    pub started_tick: u64,
}

/// Credited hits, kept alive while their activation runs plus a short TTL.
/// Maps each key to the tick it expires on.
#[derive(Debug, Clone, Default)]
pub struct HitLedger {
    entries: HashMap<HitKey, u64>,
}

impl HitLedger {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, key: &HitKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Record `key`. Returns false if it was already credited.
    pub fn credit(&mut self, key: HitKey, now: u64, ttl: u32) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, now + ttl as u64);
        true
    }

    /// Extend keys whose activation is still running, then drop expired ones.
    pub fn refresh(&mut self, running: &[(FighterId, MoveId, u64)], now: u64, ttl: u32) {
        for (key, expires) in self.entries.iter_mut() {
            let live = running
                .iter()
                .any(|&(id, mv, started)| id == key.attacker && mv == key.move_id && started == key.started_tick);
            if live {
                *expires = now + ttl as u64;
            }
        }
        self.entries.retain(|_, expires| *expires >= now);
    }
}

/// Frozen per-fighter view used for detection.
#[derive(Debug, Clone)]
struct FighterFrame {
    entity: Entity,
    id: FighterId,
    hurtbox: Option<WorldRect>,
    strike: Option<Strike>,
}

#[derive(Debug, Clone, Copy)]
struct Strike {
    move_id: MoveId,
    started_tick: u64,
    hitbox: WorldRect,
}

#[derive(Debug, Clone, Copy)]
struct PendingHit {
    attacker: Entity,
    defender: Entity,
    key: HitKey,
}

/// Hurtbox shape for the fighter's current state.
pub fn hurtbox_shape(state: FighterState) -> BoxShape {
    if state == FighterState::Crouching {
        HURTBOX_CROUCHING
    } else {
        HURTBOX_STANDING
    }
}

fn strike_of(status: &FighterStatus, moves: &MoveSet, body: &Body) -> Option<Strike> {
    if !status.hitbox_active {
        return None;
    }
    let active = status.current_move?;
    let def = moves.moves.get(&active.id)?;
    Some(Strike {
        move_id: active.id,
        started_tick: active.started_tick,
        hitbox: def.hitbox.to_world(body.position, body.facing),
    })
}

fn frame_fighters(world: &World) -> Vec<FighterFrame> {
    let mut frames: Vec<FighterFrame> = world
        .query::<(&Combatant, &Body, &FighterStatus, &MoveSet)>()
        .iter()
        .map(|(entity, (combatant, body, status, moves))| FighterFrame {
            entity,
            id: combatant.id,
            hurtbox: (status.state != FighterState::Ko)
                .then(|| hurtbox_shape(status.state).to_world(body.position, body.facing)),
            strike: strike_of(status, moves, body),
        })
        .collect();
    frames.sort_by_key(|f| f.id);
    frames
}

/// Detect and apply hits for this tick.
pub fn run_hits(
    world: &mut World,
    ledger: &mut HitLedger,
    combos: &mut ComboTracker,
    tuning: &CombatTuning,
    tick: u64,
    events: &mut Vec<CombatEvent>,
) {
    let frames = frame_fighters(world);
    let ttl = tuning.hit_key_ttl_frames;

    let running: Vec<(FighterId, MoveId, u64)> = world
        .query::<(&Combatant, &FighterStatus)>()
        .iter()
        .filter_map(|(_, (c, s))| s.current_move.map(|m| (c.id, m.id, m.started_tick)))
        .collect();
    ledger.refresh(&running, tick, ttl);

    let mut pending = Vec::new();
    for attacker in &frames {
        let Some(strike) = attacker.strike else {
            continue;
        };
        for defender in frames.iter().filter(|d| d.id != attacker.id) {
            let Some(hurtbox) = defender.hurtbox else {
                continue;
            };
            if !strike.hitbox.overlaps(&hurtbox) {
                continue;
            }
            let key = HitKey {
                attacker: attacker.id,
                defender: defender.id,
                move_id: strike.move_id,
                started_tick: strike.started_tick,
            };
            if ledger.credit(key, tick, ttl) {
                pending.push(PendingHit {
                    attacker: attacker.entity,
                    defender: defender.entity,
                    key,
                });
            }
        }
    }

    for hit in pending {
        apply_hit(world, hit, combos, tuning, tick, events);
    }
}

fn apply_hit(
    world: &mut World,
    hit: PendingHit,
    combos: &mut ComboTracker,
    tuning: &CombatTuning,
    tick: u64,
    events: &mut Vec<CombatEvent>,
) {
    let (attacker_stats, facing, def) = match world.query_one_mut::<(&Combatant, &Body, &MoveSet)>(hit.attacker) {
        Ok((c, b, m)) => match m.moves.get(&hit.key.move_id) {
            Some(def) => (c.stats, b.facing, def.clone()),
            None => return,
        },
        Err(_) => return,
    };

    let Ok((defender, body, vitals, status)) = world
        .query_one_mut::<(&Combatant, &mut Body, &mut Vitals, &mut FighterStatus)>(hit.defender)
    else {
        return;
    };
    if status.state == FighterState::Ko {
        return;
    }

    let raw = fighter::raw_damage(&def, &attacker_stats, &defender.stats);
    let push_dir = facing.sign();
    let scale = tuning.pushback_velocity_scale;

    if fighter::is_blocking(status) {
        let damage = fighter::chip_damage(raw, tuning.chip_damage_factor, vitals.health);
        fighter::take_blocked_hit(status, body, vitals, &def, damage, push_dir, scale);
        trace!(attacker = ?hit.key.attacker, move_id = ?def.id, raw, damage, "hit blocked");
        events.push(CombatEvent::HitLanded {
            attacker: hit.key.attacker,
            defender: hit.key.defender,
            move_id: def.id,
            damage,
            blocked: true,
        });
        return;
    }

    let mut combo_events = Vec::new();
    let damage = combos.register_hit(hit.key.attacker, def.id, raw, tick, &mut combo_events);
    let knocked_out = fighter::take_hit(status, body, vitals, &def, damage, push_dir, scale);
    fighter::gain_meter(vitals, damage as f64 * METER_GAIN_ON_DAMAGE);
    trace!(attacker = ?hit.key.attacker, move_id = ?def.id, raw, damage, health = vitals.health, "hit landed");

    events.push(CombatEvent::HitLanded {
        attacker: hit.key.attacker,
        defender: hit.key.defender,
        move_id: def.id,
        damage,
        blocked: false,
    });
    events.append(&mut combo_events);
    combos.interrupt(hit.key.defender, events);
    if knocked_out {
        events.push(CombatEvent::Knockout {
            loser: hit.key.defender,
        });
    }

    if let Ok(attacker_vitals) = world.query_one_mut::<&mut Vitals>(hit.attacker) {
        fighter::gain_meter(attacker_vitals, damage as f64 * METER_GAIN_ON_HIT);
    }
}

/// New x positions for two overlapping fighters, or `None` if they don't touch.
///
/// The overlap is split by speed: each side moves by the other's share of the
/// combined speed, so the faster mover yields less. A side pinned at a wall
/// passes its remainder to the other.
pub fn resolve_pushbox(a: Vec2, b: Vec2, speed_a: f32, speed_b: f32) -> Option<(f32, f32)> {
    let dx = b.x - a.x;
    if (b.y - a.y).abs() >= PUSHBOX_HEIGHT || dx.abs() >= PUSHBOX_MIN_SEPARATION {
        return None;
    }
    let overlap = PUSHBOX_MIN_SEPARATION - dx.abs();
    let s = if dx < 0.0 { -1.0 } else { 1.0 };

    let total = speed_a.abs() + speed_b.abs();
    let share_a = if total > f32::EPSILON && total.is_finite() {
        speed_b.abs() / total
    } else {
        0.5
    };
    let push_a = overlap * share_a;
    let push_b = overlap - push_a;

    let ax = (a.x - s * push_a).clamp(STAGE_LEFT, STAGE_RIGHT);
    let bx = (b.x + s * push_b).clamp(STAGE_LEFT, STAGE_RIGHT);
    let short_a = push_a - (ax - a.x).abs();
    let short_b = push_b - (bx - b.x).abs();

    let ax = (ax - s * short_b.max(0.0)).clamp(STAGE_LEFT, STAGE_RIGHT);
    let bx = (bx + s * short_a.max(0.0)).clamp(STAGE_LEFT, STAGE_RIGHT);
    Some((ax, bx))
}

/// Keep the two fighters from overlapping.
pub fn run_pushbox(world: &mut World) {
    let mut bodies: Vec<(FighterId, Entity, Vec2, f32)> = world
        .query::<(&Combatant, &Body)>()
        .iter()
        .map(|(e, (c, b))| (c.id, e, b.position, b.velocity.x))
        .collect();
    bodies.sort_by_key(|(id, ..)| *id);
    let [(_, ea, pa, va), (_, eb, pb, vb)] = bodies[..] else {
        return;
    };

    let Some((ax, bx)) = resolve_pushbox(pa, pb, va, vb) else {
        return;
    };
    if let Ok(body) = world.query_one_mut::<&mut Body>(ea) {
        body.position.x = ax;
    }
    if let Ok(body) = world.query_one_mut::<&mut Body>(eb) {
        body.position.x = bx;
    }
}

/// World-space hurtbox and active hitboxes for each fighter.
pub fn debug_boxes(world: &World) -> DebugBoxes {
    let mut fighters: Vec<FighterBoxes> = world
        .query::<(&Combatant, &Body, &FighterStatus, &MoveSet)>()
        .iter()
        .map(|(_, (combatant, body, status, moves))| FighterBoxes {
            id: combatant.id,
            hurtbox: hurtbox_shape(status.state).to_world(body.position, body.facing),
            hitboxes: strike_of(status, moves, body)
                .map(|s| vec![s.hitbox])
                .unwrap_or_default(),
        })
        .collect();
    fighters.sort_by_key(|f| f.id);
    DebugBoxes { fighters }
}
