//! Declarative special-move motion definitions.
//!
//! A motion is a token sequence matched by the input buffer. Tokens are data,
//! so new specials need no matcher code.

use serde::{Deserialize, Serialize};

use crate::enums::{ChargeDir, Limb, RelDir};
use crate::moves::MoveId;

/// One element of a motion input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "token", rename_all = "snake_case")]
pub enum MotionToken {
    Direction { dir: RelDir },
    Button { limb: Limb },
    /// A direction held for at least `frames` right before the rest of the sequence.
    Charge { dir: ChargeDir, frames: u32 },
}

impl MotionToken {
    pub const fn dir(dir: RelDir) -> Self {
        MotionToken::Direction { dir }
    }

    pub const fn button(limb: Limb) -> Self {
        MotionToken::Button { limb }
    }
}

/// A named motion that triggers `move_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionDefinition {
    pub name: String,
    pub move_id: MoveId,
    pub tokens: Vec<MotionToken>,
    /// How far back (frames) the first token may lie.
    pub lookback: u32,
}

impl MotionDefinition {
    /// Leading charge requirement, if any.
    pub fn charge(&self) -> Option<(ChargeDir, u32)> {
        self.tokens.iter().find_map(|t| match t {
            MotionToken::Charge { dir, frames } => Some((*dir, *frames)),
            _ => None,
        })
    }

    /// Tokens excluding the charge requirement.
    pub fn release_tokens(&self) -> Vec<MotionToken> {
        self.tokens
            .iter()
            .filter(|t| !matches!(t, MotionToken::Charge { .. }))
            .copied()
            .collect()
    }
}

/// Built-in motion table, highest priority first.
pub fn default_motions() -> Vec<MotionDefinition> {
    use MotionToken as T;
    use RelDir::*;

    let qcf = [T::dir(Down), T::dir(DownForward), T::dir(Forward)];
    let mut super_tokens = qcf.to_vec();
    super_tokens.extend(qcf);
    super_tokens.push(T::button(Limb::Punch));

    vec![
        MotionDefinition {
            name: "double-quarter-circle".into(),
            move_id: MoveId::SuperFireball,
            tokens: super_tokens,
            lookback: 40,
        },
        MotionDefinition {
            name: "full-circle".into(),
            move_id: MoveId::SpinningSlam,
            tokens: vec![
                T::dir(Forward),
                T::dir(DownForward),
                T::dir(Down),
                T::dir(DownBack),
                T::dir(Back),
                T::dir(UpBack),
                T::dir(Up),
                T::dir(UpForward),
                T::button(Limb::Punch),
            ],
            lookback: 40,
        },
        MotionDefinition {
            name: "half-circle-back".into(),
            move_id: MoveId::CrescentKick,
            tokens: vec![
                T::dir(Forward),
                T::dir(DownForward),
                T::dir(Down),
                T::dir(DownBack),
                T::dir(Back),
                T::button(Limb::Kick),
            ],
            lookback: 40,
        },
        MotionDefinition {
            name: "dragon-punch".into(),
            move_id: MoveId::RisingUppercut,
            tokens: vec![
                T::dir(Forward),
                T::dir(Down),
                T::dir(DownForward),
                T::button(Limb::Punch),
            ],
            lookback: 30,
        },
        MotionDefinition {
            name: "charge-back-release".into(),
            move_id: MoveId::SonicBoom,
            tokens: vec![
                T::Charge {
                    dir: ChargeDir::Back,
                    frames: 30,
                },
                T::dir(Forward),
                T::button(Limb::Punch),
            ],
            lookback: 30,
        },
        MotionDefinition {
            name: "quarter-circle-forward".into(),
            move_id: MoveId::Fireball,
            tokens: vec![
                T::dir(Down),
                T::dir(DownForward),
                T::dir(Forward),
                T::button(Limb::Punch),
            ],
            lookback: 30,
        },
        MotionDefinition {
            name: "quarter-circle-back".into(),
            move_id: MoveId::WhirlwindKick,
            tokens: vec![
                T::dir(Down),
                T::dir(DownBack),
                T::dir(Back),
                T::button(Limb::Kick),
            ],
            lookback: 30,
        },
    ]
}
