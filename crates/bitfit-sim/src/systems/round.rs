//! Round clock, round-end evaluation, and match scoring.

use hecs::World;
use serde::{Deserialize, Serialize};

use bitfit_core::components::{Combatant, FighterStatus, Vitals};
use bitfit_core::enums::{FighterState, RoundEndReason};
use bitfit_core::types::FighterId;

/// How a round ended. `winner` is `None` for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub winner: Option<FighterId>,
    pub reason: RoundEndReason,
}

/// Round counter, clock, and wins for the current match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// 1-based; 0 before the first round.
    pub round: u32,
    pub frames_remaining: u32,
    pub wins: [u8; 2],
    pub round_time_frames: u32,
    pub rounds_to_win: u8,
}

impl RoundState {
    pub fn new(round_time_frames: u32, rounds_to_win: u8) -> Self {
        Self {
            round: 0,
            frames_remaining: 0,
            wins: [0; 2],
            round_time_frames,
            rounds_to_win: rounds_to_win.max(1),
        }
    }

    pub fn reset_match(&mut self) {
        self.round = 0;
        self.wins = [0; 2];
        self.frames_remaining = 0;
    }

    /// Start the next round and return its number.
    pub fn begin_round(&mut self) -> u32 {
        self.round += 1;
        self.frames_remaining = self.round_time_frames;
        self.round
    }

    pub fn tick(&mut self) {
        self.frames_remaining = self.frames_remaining.saturating_sub(1);
    }

    /// Credit the round win. Returns the match winner once one side has enough.
    pub fn award(&mut self, winner: Option<FighterId>) -> Option<FighterId> {
        let winner = winner?;
        let wins = self.wins.get_mut(winner.index())?;
        *wins = wins.saturating_add(1);
        (*wins >= self.rounds_to_win).then_some(winner)
    }

    pub fn wins(&self, id: FighterId) -> u8 {
        self.wins.get(id.index()).copied().unwrap_or(0)
    }
}

fn health_frac(vitals: &Vitals) -> f64 {
    if vitals.max_health <= 0 {
        return 0.0;
    }
    vitals.health as f64 / vitals.max_health as f64
}

/// KO ends the round for the survivor; a double KO is a draw. When the clock
/// runs out, the higher health fraction wins and equal fractions draw.
pub fn check_outcome(world: &World, frames_remaining: u32) -> Option<RoundOutcome> {
    let mut fighters: Vec<(FighterId, bool, f64)> = world
        .query::<(&Combatant, &Vitals, &FighterStatus)>()
        .iter()
        .map(|(_, (c, v, s))| (c.id, s.state == FighterState::Ko, health_frac(v)))
        .collect();
    fighters.sort_by_key(|(id, ..)| *id);

    let knocked_out: Vec<FighterId> = fighters.iter().filter(|f| f.1).map(|f| f.0).collect();
    match knocked_out.as_slice() {
        [] => {}
        [loser] => {
            return Some(RoundOutcome {
                winner: Some(loser.opponent()),
                reason: RoundEndReason::Ko,
            })
        }
        _ => {
            return Some(RoundOutcome {
                winner: None,
                reason: RoundEndReason::Ko,
            })
        }
    }

    if frames_remaining > 0 {
        return None;
    }
    let winner = match fighters.as_slice() {
        [(a, _, fa), (_, _, fb)] if fa > fb => Some(*a),
        [(_, _, fa), (b, _, fb)] if fb > fa => Some(*b),
        _ => None,
    };
    Some(RoundOutcome {
        winner,
        reason: RoundEndReason::Timeout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_of_three_scoring() {
        let mut rounds = RoundState::new(100, 2);
        assert_eq!(rounds.begin_round(), 1);
        assert_eq!(rounds.award(Some(FighterId::BOSS)), None);
        assert_eq!(rounds.award(None), None);
        assert_eq!(rounds.award(Some(FighterId::PLAYER)), None);
        assert_eq!(rounds.award(Some(FighterId::PLAYER)), Some(FighterId::PLAYER));
        assert_eq!(rounds.wins(FighterId::BOSS), 1);

        rounds.reset_match();
        assert_eq!(rounds.wins, [0, 0]);
        assert_eq!(rounds.begin_round(), 1);
        assert_eq!(rounds.frames_remaining, 100);
    }

    #[test]
    fn test_clock_saturates() {
        let mut rounds = RoundState::new(2, 2);
        rounds.begin_round();
        rounds.tick();
        rounds.tick();
        rounds.tick();
        assert_eq!(rounds.frames_remaining, 0);
    }
}
