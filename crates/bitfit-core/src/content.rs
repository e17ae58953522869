//! Combat content: archetypes, frame data, motions, and tuning.
//!
//! [`CombatContent::builtin`] reproduces the shipped game tables. Hosts may load
//! replacements from JSON; every loaded table goes through
//! [`CombatContent::validate`] before a round can start.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::MoveKind;
use crate::error::ConfigError;
use crate::motions::{default_motions, MotionDefinition, MotionToken};
use crate::moves::{ArchetypeStats, MoveDefinition, MoveId};
use crate::types::BoxShape;

/// Global combat knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub cancel_window_frames: u32,
    pub input_gap_frames: u32,
    pub combo_window_frames: u32,
    pub hit_key_ttl_frames: u32,
    /// Per-hit combo scaling. The last entry is the floor.
    pub damage_scaling: Vec<f64>,
    pub chip_damage_factor: f64,
    pub pushback_velocity_scale: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            cancel_window_frames: COMBO_CANCEL_WINDOW_FRAMES,
            input_gap_frames: INPUT_GAP_WINDOW_FRAMES,
            combo_window_frames: COMBO_WINDOW_FRAMES,
            hit_key_ttl_frames: HIT_KEY_TTL_FRAMES,
            damage_scaling: DAMAGE_SCALING.to_vec(),
            chip_damage_factor: CHIP_DAMAGE_FACTOR,
            pushback_velocity_scale: PUSHBACK_VELOCITY_SCALE,
        }
    }
}

impl CombatTuning {
    /// Scale factor for the `hit`-th hit of a combo (1-based).
    pub fn scaling_for_hit(&self, hit: u32) -> f64 {
        let idx = (hit.max(1) - 1) as usize;
        self.damage_scaling
            .get(idx)
            .or_else(|| self.damage_scaling.last())
            .copied()
            .unwrap_or(1.0)
    }
}

/// Every table the simulation reads at round setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatContent {
    pub archetypes: BTreeMap<String, ArchetypeStats>,
    pub moves: BTreeMap<MoveId, MoveDefinition>,
    /// Checked in order; earlier motions win.
    pub motions: Vec<MotionDefinition>,
    #[serde(default)]
    pub tuning: CombatTuning,
}

impl Default for CombatContent {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CombatContent {
    /// Parse and validate content from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let content: CombatContent = serde_json::from_str(json)?;
        content.validate()?;
        Ok(content)
    }

    pub fn move_def(&self, id: MoveId) -> Result<&MoveDefinition, ConfigError> {
        self.moves.get(&id).ok_or(ConfigError::MissingMove(id))
    }

    /// Moves every fighter must be able to perform: all normals plus every
    /// motion target.
    pub fn required_moves(&self) -> Vec<MoveId> {
        let mut ids: Vec<MoveId> = MoveId::NORMALS.to_vec();
        for motion in &self.motions {
            if !ids.contains(&motion.move_id) {
                ids.push(motion.move_id);
            }
        }
        ids
    }

    /// Check that the tables are complete and well-formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.archetypes.is_empty() {
            return Err(ConfigError::NoArchetypes);
        }
        for (name, stats) in &self.archetypes {
            let checks = [
                ("health", stats.health > 0),
                ("attack", stats.attack > 0),
                ("defense", stats.defense > 0),
                ("speed", stats.speed > 0),
                ("special", stats.special > 0),
            ];
            if let Some((stat, _)) = checks.into_iter().find(|(_, ok)| !ok) {
                return Err(ConfigError::NonPositiveStat {
                    archetype: name.clone(),
                    stat,
                });
            }
        }

        for (key, def) in &self.moves {
            if *key != def.id {
                return Err(ConfigError::MismatchedMoveKey {
                    key: *key,
                    id: def.id,
                });
            }
            for (field, frames) in [
                ("startup", def.startup),
                ("active", def.active),
                ("recovery", def.recovery),
            ] {
                if frames == 0 {
                    return Err(ConfigError::ZeroFrames {
                        move_id: def.id,
                        field,
                    });
                }
            }
            def.startup
                .checked_add(def.active)
                .and_then(|n| n.checked_add(def.recovery))
                .ok_or(ConfigError::FrameOverflow(def.id))?;
            for target in &def.cancels_into {
                self.move_def(*target)?;
            }
        }

        for motion in &self.motions {
            let Some(last) = motion.tokens.last() else {
                return Err(ConfigError::EmptyMotion(motion.name.clone()));
            };
            if !matches!(last, MotionToken::Button { .. }) {
                return Err(ConfigError::MotionWithoutButton(motion.name.clone()));
            }
            if motion
                .tokens
                .iter()
                .skip(1)
                .any(|t| matches!(t, MotionToken::Charge { .. }))
            {
                return Err(ConfigError::MisplacedCharge(motion.name.clone()));
            }
        }

        for id in self.required_moves() {
            self.move_def(id)?;
        }

        let scaling = &self.tuning.damage_scaling;
        if scaling.is_empty() {
            return Err(ConfigError::InvalidTuning("empty damage scaling table".into()));
        }
        if scaling.iter().any(|s| !s.is_finite() || *s <= 0.0 || *s > 1.0) {
            return Err(ConfigError::InvalidTuning(
                "damage scaling entries must lie in (0, 1]".into(),
            ));
        }
        if scaling.windows(2).any(|w| w[1] > w[0]) {
            return Err(ConfigError::InvalidTuning(
                "damage scaling must be non-increasing".into(),
            ));
        }
        if self.tuning.input_gap_frames == 0 || self.tuning.combo_window_frames == 0 {
            return Err(ConfigError::InvalidTuning("zero-length window".into()));
        }
        Ok(())
    }

    /// The shipped archetypes, frame data, and motion table.
    pub fn builtin() -> Self {
        let archetypes = [
            ("brawler", stats(1200, 130, 110, 90, 100)),
            ("speedster", stats(900, 100, 80, 150, 120)),
            ("technician", stats(1000, 110, 100, 110, 130)),
            ("gym_boss", stats(1100, 115, 105, 100, 110)),
        ]
        .into_iter()
        .map(|(name, s)| (name.to_string(), s))
        .collect();

        let moves = builtin_moves()
            .into_iter()
            .map(|def| (def.id, def))
            .collect();

        Self {
            archetypes,
            moves,
            motions: default_motions(),
            tuning: CombatTuning::default(),
        }
    }
}

fn stats(health: i32, attack: u32, defense: u32, speed: u32, special: u32) -> ArchetypeStats {
    ArchetypeStats {
        health,
        attack,
        defense,
        speed,
        special,
    }
}

const SPECIALS: [MoveId; 6] = [
    MoveId::Fireball,
    MoveId::RisingUppercut,
    MoveId::WhirlwindKick,
    MoveId::CrescentKick,
    MoveId::SonicBoom,
    MoveId::SpinningSlam,
];

#[allow(clippy::too_many_arguments)]
fn frame_data(
    id: MoveId,
    kind: MoveKind,
    (startup, active, recovery): (u32, u32, u32),
    damage: u32,
    (hitstun, blockstun): (u32, u32),
    (pushback_hit, pushback_block): (f32, f32),
    hitbox: BoxShape,
    cancels_into: Vec<MoveId>,
) -> MoveDefinition {
    let meter_cost = match kind {
        MoveKind::Normal => 0.0,
        MoveKind::Special => SPECIAL_METER_COST,
        MoveKind::Super => SUPER_METER_COST,
    };
    MoveDefinition {
        id,
        kind,
        startup,
        active,
        recovery,
        damage,
        hitstun,
        blockstun,
        pushback_hit,
        pushback_block,
        cancelable: !cancels_into.is_empty(),
        cancels_into,
        meter_cost,
        hitbox,
    }
}

fn builtin_moves() -> Vec<MoveDefinition> {
    use MoveId::*;
    use MoveKind::{Normal, Special, Super};

    let with_specials = |extra: &[MoveId]| {
        let mut v = extra.to_vec();
        v.extend(SPECIALS);
        v
    };

    vec![
        frame_data(
            LightPunch,
            Normal,
            (3, 2, 7),
            10,
            (12, 8),
            (4.0, 2.0),
            BoxShape::new(40.0, 60.0, 40.0, 30.0),
            with_specials(&[MediumPunch, LightKick]),
        ),
        frame_data(
            MediumPunch,
            Normal,
            (5, 3, 10),
            20,
            (16, 12),
            (4.0, 2.0),
            BoxShape::new(45.0, 60.0, 50.0, 30.0),
            with_specials(&[HeavyPunch, MediumKick]),
        ),
        frame_data(
            HeavyPunch,
            Normal,
            (8, 4, 14),
            30,
            (20, 16),
            (4.0, 2.0),
            BoxShape::new(50.0, 60.0, 60.0, 35.0),
            with_specials(&[]),
        ),
        frame_data(
            LightKick,
            Normal,
            (4, 2, 8),
            12,
            (14, 10),
            (4.0, 2.0),
            BoxShape::new(40.0, 30.0, 45.0, 30.0),
            with_specials(&[MediumKick, LightPunch]),
        ),
        frame_data(
            MediumKick,
            Normal,
            (6, 3, 12),
            22,
            (18, 14),
            (4.0, 2.0),
            BoxShape::new(50.0, 30.0, 55.0, 30.0),
            with_specials(&[HeavyKick, MediumPunch]),
        ),
        frame_data(
            HeavyKick,
            Normal,
            (10, 4, 16),
            35,
            (24, 18),
            (4.0, 2.0),
            BoxShape::new(55.0, 35.0, 65.0, 35.0),
            with_specials(&[]),
        ),
        frame_data(
            Fireball,
            Special,
            (13, 6, 30),
            30,
            (18, 14),
            (4.0, 2.0),
            BoxShape::new(60.0, 60.0, 100.0, 50.0),
            vec![SuperFireball],
        ),
        frame_data(
            RisingUppercut,
            Special,
            (3, 14, 24),
            60,
            (30, 20),
            (4.0, 2.0),
            BoxShape::new(40.0, 80.0, 60.0, 120.0),
            vec![SuperFireball],
        ),
        frame_data(
            WhirlwindKick,
            Special,
            (7, 10, 20),
            40,
            (20, 16),
            (4.0, 2.0),
            BoxShape::new(0.0, 60.0, 120.0, 40.0),
            vec![SuperFireball],
        ),
        frame_data(
            CrescentKick,
            Special,
            (9, 5, 22),
            45,
            (22, 16),
            (4.0, 2.0),
            BoxShape::new(55.0, 50.0, 80.0, 50.0),
            vec![SuperFireball],
        ),
        frame_data(
            SonicBoom,
            Special,
            (10, 6, 28),
            35,
            (18, 14),
            (4.0, 2.0),
            BoxShape::new(70.0, 60.0, 100.0, 40.0),
            vec![SuperFireball],
        ),
        frame_data(
            SpinningSlam,
            Special,
            (5, 3, 30),
            60,
            (40, 20),
            (4.0, 2.0),
            BoxShape::new(55.0, 50.0, 80.0, 100.0),
            vec![SuperFireball],
        ),
        frame_data(
            SuperFireball,
            Super,
            (10, 12, 50),
            80,
            (40, 30),
            (8.0, 4.0),
            BoxShape::new(80.0, 60.0, 160.0, 80.0),
            Vec::new(),
        ),
    ]
}
