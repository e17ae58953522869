//! Frontend input events and their normalization.
//!
//! The frontend sends loosely-typed `{type, value, timestamp}` records. They are
//! normalized into [`InputEvent`] before reaching the simulation; anything that
//! does not parse is rejected with an [`InputError`].

use serde::{Deserialize, Serialize};

use crate::enums::{Direction, Limb, Strength};
use crate::error::InputError;

/// Category of a raw input record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawInputKind {
    Direction,
    Attack,
    Block,
    Jump,
}

/// Input record as delivered by the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInputEvent {
    #[serde(rename = "type")]
    pub kind: RawInputKind,
    pub value: String,
    /// Host wall-clock stamp. Diagnostic only.
    #[serde(rename = "timestamp", default)]
    pub timestamp_ms: f64,
}

impl RawInputEvent {
    pub fn new(kind: RawInputKind, value: impl Into<String>, timestamp_ms: f64) -> Self {
        Self {
            kind,
            value: value.into(),
            timestamp_ms,
        }
    }
}

/// Normalized player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputAction {
    /// Stick moved to a new absolute direction.
    Direction { direction: Direction },
    Attack { limb: Limb, strength: Strength },
    Block { pressed: bool },
    Jump,
}

/// A normalized input together with its wall-clock stamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub action: InputAction,
    pub timestamp_ms: f64,
}

impl TryFrom<&RawInputEvent> for InputEvent {
    type Error = InputError;

    fn try_from(raw: &RawInputEvent) -> Result<Self, Self::Error> {
        if !raw.timestamp_ms.is_finite() {
            return Err(InputError::BadTimestamp);
        }
        let value = raw.value.trim().to_ascii_lowercase();
        let action = match raw.kind {
            RawInputKind::Direction => InputAction::Direction {
                direction: parse_direction(&value).ok_or_else(|| unknown("direction", raw))?,
            },
            RawInputKind::Attack => {
                let (limb, strength) = parse_attack(&value).ok_or_else(|| unknown("attack", raw))?;
                InputAction::Attack { limb, strength }
            }
            RawInputKind::Block => match value.as_str() {
                "press" => InputAction::Block { pressed: true },
                "release" => InputAction::Block { pressed: false },
                _ => return Err(unknown("block", raw)),
            },
            RawInputKind::Jump => match value.as_str() {
                "press" => InputAction::Jump,
                _ => return Err(unknown("jump", raw)),
            },
        };
        Ok(InputEvent {
            action,
            timestamp_ms: raw.timestamp_ms,
        })
    }
}

fn unknown(kind: &'static str, raw: &RawInputEvent) -> InputError {
    InputError::UnknownValue {
        kind,
        value: raw.value.clone(),
    }
}

fn parse_direction(value: &str) -> Option<Direction> {
    Some(match value {
        "neutral" => Direction::Neutral,
        "up" => Direction::Up,
        "down" => Direction::Down,
        "left" => Direction::Left,
        "right" => Direction::Right,
        "upleft" => Direction::UpLeft,
        "upright" => Direction::UpRight,
        "downleft" => Direction::DownLeft,
        "downright" => Direction::DownRight,
        _ => return None,
    })
}

fn parse_attack(value: &str) -> Option<(Limb, Strength)> {
    let (strength, limb) = value.split_once('_')?;
    let strength = match strength {
        "light" => Strength::Light,
        "medium" => Strength::Medium,
        "heavy" => Strength::Heavy,
        _ => return None,
    };
    let limb = match limb {
        "punch" => Limb::Punch,
        "kick" => Limb::Kick,
        _ => return None,
    };
    Some((limb, strength))
}
