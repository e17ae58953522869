//! Combo tracking and damage scaling.
//!
//! One live record per attacker. A hit within the combo window extends the
//! record and is scaled by its position in the chain; a record with no new hit
//! inside the window is finalized by [`ComboTracker::update`].

use bitfit_core::content::CombatTuning;
use bitfit_core::enums::ComboEndReason;
use bitfit_core::events::CombatEvent;
use bitfit_core::moves::MoveId;
use bitfit_core::state::ComboView;
use bitfit_core::types::FighterId;

#[derive(Debug, Clone, PartialEq)]
pub struct ComboRecord {
    pub attacker: FighterId,
    pub hits: u32,
    pub damage: i32,
    pub moves: Vec<MoveId>,
    pub started_tick: u64,
    pub last_hit_tick: u64,
}

/// Lifetime statistics for one attacker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComboStats {
    pub max_combo: u32,
    /// Finalized records of two or more hits.
    pub total_combos: u32,
}

/// Display rank for a hit count.
pub fn combo_rank(hits: u32) -> Option<&'static str> {
    match hits {
        20.. => Some("Ultra"),
        15.. => Some("Super"),
        10.. => Some("Hyper"),
        7.. => Some("Killer"),
        5.. => Some("Great"),
        3.. => Some("Nice"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct ComboTracker {
    window_frames: u64,
    tuning: CombatTuning,
    records: [Option<ComboRecord>; 2],
    stats: [ComboStats; 2],
}

impl ComboTracker {
    pub fn new(tuning: &CombatTuning) -> Self {
        Self {
            window_frames: tuning.combo_window_frames as u64,
            tuning: tuning.clone(),
            records: [None, None],
            stats: [ComboStats::default(); 2],
        }
    }

    /// Scale factor for the `hit`-th hit (1-based). Past the table, the last entry.
    pub fn scale_for(&self, hit: u32) -> f64 {
        self.tuning.scaling_for_hit(hit)
    }

    /// Current hit count for `attacker`, 0 when no record is live.
    pub fn hits(&self, attacker: FighterId) -> u32 {
        self.record(attacker).map_or(0, |r| r.hits)
    }

    pub fn record(&self, attacker: FighterId) -> Option<&ComboRecord> {
        self.records.get(attacker.index()).and_then(Option::as_ref)
    }

    pub fn stats(&self, attacker: FighterId) -> ComboStats {
        self.stats.get(attacker.index()).copied().unwrap_or_default()
    }

    /// Register an unblocked hit and return the scaled damage the defender takes.
    pub fn register_hit(
        &mut self,
        attacker: FighterId,
        move_id: MoveId,
        raw_damage: i32,
        now: u64,
        events: &mut Vec<CombatEvent>,
    ) -> i32 {
        let idx = attacker.index();
        if idx >= self.records.len() {
            return raw_damage;
        }

        let expired = self.records[idx]
            .as_ref()
            .is_some_and(|r| now.saturating_sub(r.last_hit_tick) > self.window_frames);
        if expired {
            self.finalize(attacker, ComboEndReason::Timeout, events);
        }

        let next_hit = self.hits(attacker) + 1;
        let scaled = (raw_damage as f64 * self.scale_for(next_hit)).floor() as i32;

        let record = self.records[idx].get_or_insert_with(|| ComboRecord {
            attacker,
            hits: 0,
            damage: 0,
            moves: Vec::new(),
            started_tick: now,
            last_hit_tick: now,
        });
        record.hits += 1;
        record.damage += scaled;
        record.moves.push(move_id);
        record.last_hit_tick = now;

        let (hits, damage) = (record.hits, record.damage);
        let stats = &mut self.stats[idx];
        stats.max_combo = stats.max_combo.max(hits);
        if hits >= 2 {
            events.push(CombatEvent::ComboExtended {
                attacker,
                count: hits,
                damage,
            });
        }
        tracing::trace!(?attacker, hits, scaled, "combo hit");
        scaled
    }

    /// Finalize records whose window has lapsed.
    pub fn update(&mut self, now: u64, events: &mut Vec<CombatEvent>) {
        for id in [FighterId::PLAYER, FighterId::BOSS] {
            let lapsed = self
                .record(id)
                .is_some_and(|r| now.saturating_sub(r.last_hit_tick) > self.window_frames);
            if lapsed {
                self.finalize(id, ComboEndReason::Timeout, events);
            }
        }
    }

    /// End `attacker`'s record early, e.g. because they were hit.
    pub fn interrupt(&mut self, attacker: FighterId, events: &mut Vec<CombatEvent>) {
        self.finalize(attacker, ComboEndReason::Interrupted, events);
    }

    /// Finalize every live record at round end.
    pub fn finish_round(&mut self, events: &mut Vec<CombatEvent>) {
        for id in [FighterId::PLAYER, FighterId::BOSS] {
            self.finalize(id, ComboEndReason::RoundOver, events);
        }
    }

    /// Drop live records without emitting events.
    pub fn clear(&mut self) {
        self.records = [None, None];
    }

    /// Live combos worth showing (two or more hits).
    pub fn views(&self) -> Vec<ComboView> {
        self.records
            .iter()
            .flatten()
            .filter(|r| r.hits >= 2)
            .map(|r| ComboView {
                attacker: r.attacker,
                hits: r.hits,
                damage: r.damage,
                moves: r.moves.clone(),
                rank: combo_rank(r.hits).map(str::to_string),
            })
            .collect()
    }

    fn finalize(
        &mut self,
        attacker: FighterId,
        reason: ComboEndReason,
        events: &mut Vec<CombatEvent>,
    ) {
        let idx = attacker.index();
        let Some(record) = self.records.get_mut(idx).and_then(Option::take) else {
            return;
        };
        if record.hits >= 2 {
            self.stats[idx].total_combos += 1;
        }
        events.push(CombatEvent::ComboEnded {
            attacker,
            final_count: record.hits,
            final_damage: record.damage,
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitfit_core::constants::COMBO_WINDOW_FRAMES;

    fn tracker() -> ComboTracker {
        ComboTracker::new(&CombatTuning::default())
    }

    #[test]
    fn test_first_hit_unscaled() {
        let mut combos = tracker();
        let mut events = Vec::new();
        let dmg = combos.register_hit(FighterId::PLAYER, MoveId::HeavyPunch, 33, 10, &mut events);
        assert_eq!(dmg, 33);
        assert_eq!(combos.hits(FighterId::PLAYER), 1);
        assert!(events.is_empty());
        assert!(combos.views().is_empty());
    }

    #[test]
    fn test_chain_scales_and_extends() {
        let mut combos = tracker();
        let mut events = Vec::new();
        let damages: Vec<i32> = (0..4)
            .map(|i| combos.register_hit(FighterId::PLAYER, MoveId::LightPunch, 10, 10 + i * 5, &mut events))
            .collect();
        assert_eq!(damages, vec![10, 9, 8, 7]);
        assert_eq!(combos.hits(FighterId::PLAYER), 4);
        let extended = events
            .iter()
            .filter(|e| matches!(e, CombatEvent::ComboExtended { .. }))
            .count();
        assert_eq!(extended, 3);
        let view = &combos.views()[0];
        assert_eq!(view.damage, 34);
        assert_eq!(view.rank.as_deref(), Some("Nice"));
    }

    #[test]
    fn test_scaling_floors_at_table_end() {
        let combos = tracker();
        assert_eq!(combos.scale_for(8), 0.3);
        assert_eq!(combos.scale_for(12), 0.3);
        for hit in 1..30 {
            assert!(combos.scale_for(hit + 1) <= combos.scale_for(hit));
        }
    }

    #[test]
    fn test_window_lapse_finalizes_once() {
        let mut combos = tracker();
        let mut events = Vec::new();
        combos.register_hit(FighterId::BOSS, MoveId::LightKick, 12, 100, &mut events);
        combos.register_hit(FighterId::BOSS, MoveId::MediumKick, 22, 110, &mut events);
        events.clear();

        let last = 110 + COMBO_WINDOW_FRAMES as u64;
        for tick in 111..=last {
            combos.update(tick, &mut events);
        }
        assert!(events.is_empty(), "window still open at {last}");

        for tick in last + 1..last + 60 {
            combos.update(tick, &mut events);
        }
        assert_eq!(
            events,
            vec![CombatEvent::ComboEnded {
                attacker: FighterId::BOSS,
                final_count: 2,
                final_damage: 12 + 19,
                reason: ComboEndReason::Timeout,
            }]
        );
        assert_eq!(combos.hits(FighterId::BOSS), 0);
        assert_eq!(combos.stats(FighterId::BOSS).total_combos, 1);
        assert_eq!(combos.stats(FighterId::BOSS).max_combo, 2);
    }

    #[test]
    fn test_late_hit_starts_new_record() {
        let mut combos = tracker();
        let mut events = Vec::new();
        combos.register_hit(FighterId::PLAYER, MoveId::LightPunch, 10, 0, &mut events);
        let dmg = combos.register_hit(FighterId::PLAYER, MoveId::LightPunch, 10, 200, &mut events);
        assert_eq!(dmg, 10);
        assert_eq!(combos.hits(FighterId::PLAYER), 1);
        assert!(matches!(
            events[0],
            CombatEvent::ComboEnded {
                final_count: 1,
                reason: ComboEndReason::Timeout,
                ..
            }
        ));
    }

    #[test]
    fn test_interrupt_and_round_end_reasons() {
        let mut combos = tracker();
        let mut events = Vec::new();
        combos.register_hit(FighterId::PLAYER, MoveId::LightPunch, 10, 0, &mut events);
        combos.register_hit(FighterId::BOSS, MoveId::LightPunch, 10, 0, &mut events);
        combos.interrupt(FighterId::PLAYER, &mut events);
        combos.finish_round(&mut events);
        let reasons: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::ComboEnded {
                    attacker, reason, ..
                } => Some((*attacker, *reason)),
                _ => None,
            })
            .collect();
        assert_eq!(
            reasons,
            vec![
                (FighterId::PLAYER, ComboEndReason::Interrupted),
                (FighterId::BOSS, ComboEndReason::RoundOver),
            ]
        );
    }

    #[test]
    fn test_rank_thresholds() {
        assert_eq!(combo_rank(2), None);
        assert_eq!(combo_rank(3), Some("Nice"));
        assert_eq!(combo_rank(7), Some("Killer"));
        assert_eq!(combo_rank(25), Some("Ultra"));
    }
}
