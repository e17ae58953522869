//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Horizontal facing. Right is +x.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// Facing that looks from `from_x` toward `to_x`. Ties keep `self`.
    pub fn toward(self, from_x: f32, to_x: f32) -> Facing {
        if to_x > from_x {
            Facing::Right
        } else if to_x < from_x {
            Facing::Left
        } else {
            self
        }
    }
}

/// Fighter state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FighterState {
    #[default]
    Idle,
    Walking,
    Crouching,
    Jumping,
    Attacking,
    Blocking,
    HitStun,
    BlockStun,
    Special,
    Ko,
}

impl FighterState {
    pub fn is_stunned(self) -> bool {
        matches!(self, FighterState::HitStun | FighterState::BlockStun)
    }

    /// States in which the fighter is executing a move.
    pub fn is_executing_move(self) -> bool {
        matches!(self, FighterState::Attacking | FighterState::Special)
    }
}

/// Attacking limb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Limb {
    Punch,
    Kick,
}

/// Attack strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strength {
    Light,
    Medium,
    Heavy,
}

/// Absolute stick direction as reported by the frontend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Neutral,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// Horizontal component: -1 left, 0 none, +1 right.
    pub fn horizontal(self) -> i8 {
        match self {
            Direction::Left | Direction::UpLeft | Direction::DownLeft => -1,
            Direction::Right | Direction::UpRight | Direction::DownRight => 1,
            _ => 0,
        }
    }

    pub fn is_down(self) -> bool {
        matches!(
            self,
            Direction::Down | Direction::DownLeft | Direction::DownRight
        )
    }

    pub fn is_up(self) -> bool {
        matches!(self, Direction::Up | Direction::UpLeft | Direction::UpRight)
    }

    /// Convert to a facing-relative direction.
    pub fn relative_to(self, facing: Facing) -> RelDir {
        let toward = match (self.horizontal(), facing) {
            (0, _) => 0,
            (h, Facing::Right) => h,
            (h, Facing::Left) => -h,
        };
        match (self.is_up(), self.is_down(), toward) {
            (false, false, 0) => RelDir::Neutral,
            (false, false, 1) => RelDir::Forward,
            (false, false, _) => RelDir::Back,
            (true, _, 0) => RelDir::Up,
            (true, _, 1) => RelDir::UpForward,
            (true, _, _) => RelDir::UpBack,
            (_, true, 0) => RelDir::Down,
            (_, true, 1) => RelDir::DownForward,
            (_, true, _) => RelDir::DownBack,
        }
    }
}

/// Facing-relative direction in numpad notation (6 = forward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelDir {
    DownBack,
    Down,
    DownForward,
    Back,
    #[default]
    Neutral,
    Forward,
    UpBack,
    Up,
    UpForward,
}

impl RelDir {
    /// Numpad digit for move-list display.
    pub fn numpad(self) -> u8 {
        match self {
            RelDir::DownBack => 1,
            RelDir::Down => 2,
            RelDir::DownForward => 3,
            RelDir::Back => 4,
            RelDir::Neutral => 5,
            RelDir::Forward => 6,
            RelDir::UpBack => 7,
            RelDir::Up => 8,
            RelDir::UpForward => 9,
        }
    }

    /// Whether this direction holds a charge in `charge`.
    pub fn charges(self, charge: ChargeDir) -> bool {
        match charge {
            ChargeDir::Back => matches!(self, RelDir::Back | RelDir::DownBack | RelDir::UpBack),
            ChargeDir::Down => matches!(
                self,
                RelDir::Down | RelDir::DownBack | RelDir::DownForward
            ),
        }
    }
}

/// Directions that can be charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeDir {
    Back,
    Down,
}

/// Move category. Determines fighter state and meter rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    #[default]
    Normal,
    Special,
    Super,
}

/// AI difficulty tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
}

/// Boss base-weight personality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiPattern {
    Aggressive,
    #[default]
    Balanced,
    Defensive,
}

/// Battle lifecycle phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Idle,
    Fighting,
    Paused,
    RoundOver,
    MatchOver,
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEndReason {
    Ko,
    Timeout,
}

/// Why a combo record was finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComboEndReason {
    /// No new hit within the combo window.
    Timeout,
    /// The attacker took an unblocked hit.
    Interrupted,
    /// The round ended while the combo was live.
    RoundOver,
}
