//! Input buffer and motion matcher.
//!
//! Entries are stored relative to the fighter's facing at record time, so a
//! quarter-circle reads the same on either side of the stage. Matching is a
//! subsequence search with a per-step frame gap limit; unrelated inputs between
//! matched tokens are ignored.

use std::collections::VecDeque;

use bitfit_core::constants::{INPUT_BUFFER_CAPACITY, INPUT_RETENTION_FRAMES};
use bitfit_core::enums::{ChargeDir, RelDir};
use bitfit_core::motions::{MotionDefinition, MotionToken};

/// One recorded input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferedInput {
    /// A `Direction` or `Button` token.
    pub token: MotionToken,
    pub frame: u64,
    /// Host wall-clock stamp, diagnostic only.
    pub timestamp_ms: f64,
}

/// Location of a successful match in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start_idx: usize,
    pub end_idx: usize,
    pub start_frame: u64,
    pub end_frame: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ChargeTrack {
    held: u32,
    /// Hold length and frame of the most recent release.
    last_release: Option<(u32, u64)>,
}

#[derive(Debug, Clone)]
pub struct InputBuffer {
    entries: VecDeque<BufferedInput>,
    retention_frames: u64,
    capacity: usize,
    held_dir: RelDir,
    back: ChargeTrack,
    down: ChargeTrack,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self {
            entries: VecDeque::with_capacity(INPUT_BUFFER_CAPACITY),
            retention_frames: INPUT_RETENTION_FRAMES as u64,
            capacity: INPUT_BUFFER_CAPACITY,
            held_dir: RelDir::Neutral,
            back: ChargeTrack::default(),
            down: ChargeTrack::default(),
        }
    }
}

impl InputBuffer {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &BufferedInput> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.held_dir = RelDir::Neutral;
        self.back = ChargeTrack::default();
        self.down = ChargeTrack::default();
    }

    /// Append an input and evict anything past the retention window.
    pub fn record(&mut self, token: MotionToken, frame: u64, timestamp_ms: f64) {
        self.entries.push_back(BufferedInput {
            token,
            frame,
            timestamp_ms,
        });
        self.prune(frame);
    }

    /// Drop entries older than the retention window, then enforce the cap.
    pub fn prune(&mut self, now: u64) {
        while let Some(front) = self.entries.front() {
            if now.saturating_sub(front.frame) > self.retention_frames {
                self.entries.pop_front();
            } else {
                break;
            }
        }
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Direction currently held, relative to facing.
    pub fn held(&self) -> RelDir {
        self.held_dir
    }

    /// Update the held direction. Leaving a charge direction records a release.
    pub fn hold(&mut self, dir: RelDir, frame: u64) {
        if dir == self.held_dir {
            return;
        }
        for (charge, track) in [
            (ChargeDir::Back, &mut self.back),
            (ChargeDir::Down, &mut self.down),
        ] {
            if self.held_dir.charges(charge) && !dir.charges(charge) {
                if track.held > 0 {
                    track.last_release = Some((track.held, frame));
                }
                track.held = 0;
            }
        }
        self.held_dir = dir;
    }

    /// Count one tick of the currently held direction toward any charge.
    pub fn advance_charge(&mut self) {
        let dir = self.held_dir;
        for (charge, track) in [
            (ChargeDir::Back, &mut self.back),
            (ChargeDir::Down, &mut self.down),
        ] {
            if dir.charges(charge) {
                track.held = track.held.saturating_add(1);
            }
        }
    }

    /// Frames the charge direction has been held continuously, right now.
    pub fn charge_frames(&self, charge: ChargeDir) -> u32 {
        self.track(charge).held
    }

    fn track(&self, charge: ChargeDir) -> &ChargeTrack {
        match charge {
            ChargeDir::Back => &self.back,
            ChargeDir::Down => &self.down,
        }
    }

    fn track_mut(&mut self, charge: ChargeDir) -> &mut ChargeTrack {
        match charge {
            ChargeDir::Back => &mut self.back,
            ChargeDir::Down => &mut self.down,
        }
    }

    /// Whether `tokens` appear in order with no step gap above `max_gap` frames.
    pub fn match_sequence(&self, tokens: &[MotionToken], max_gap: u32) -> bool {
        self.find_sequence(tokens, max_gap, 0).is_some()
    }

    /// Latest-ending match of `tokens` whose first token is at or after `earliest_frame`.
    ///
    /// `best[k]` holds the latest-ending feasible match of the first `k + 1`
    /// tokens among the entries scanned so far. Scanning `k` downward keeps one
    /// entry from satisfying two tokens.
    pub fn find_sequence(
        &self,
        tokens: &[MotionToken],
        max_gap: u32,
        earliest_frame: u64,
    ) -> Option<MatchSpan> {
        if tokens.is_empty() {
            return None;
        }
        let gap = max_gap as u64;
        let mut best: Vec<Option<MatchSpan>> = vec![None; tokens.len()];

        for (idx, entry) in self.entries.iter().enumerate() {
            for k in (0..tokens.len()).rev() {
                if entry.token != tokens[k] {
                    continue;
                }
                if k == 0 {
                    if entry.frame >= earliest_frame {
                        best[0] = Some(MatchSpan {
                            start_idx: idx,
                            end_idx: idx,
                            start_frame: entry.frame,
                            end_frame: entry.frame,
                        });
                    }
                } else if let Some(prev) = best[k - 1] {
                    if entry.frame.saturating_sub(prev.end_frame) <= gap {
                        best[k] = Some(MatchSpan {
                            end_idx: idx,
                            end_frame: entry.frame,
                            ..prev
                        });
                    }
                }
            }
        }
        best[tokens.len() - 1]
    }

    /// Match a motion whose final button was recorded at `now`.
    ///
    /// Charge motions also need a release of at least the required length,
    /// no more than `max_gap` frames before the release sequence starts.
    pub fn match_motion(
        &self,
        motion: &MotionDefinition,
        now: u64,
        max_gap: u32,
    ) -> Option<MatchSpan> {
        let tokens = motion.release_tokens();
        let earliest = now.saturating_sub(motion.lookback as u64);
        let span = self.find_sequence(&tokens, max_gap, earliest)?;
        if span.end_frame != now || span.end_idx + 1 != self.entries.len() {
            return None;
        }
        if let Some((charge, frames)) = motion.charge() {
            let (held, released_at) = self.track(charge).last_release?;
            let lead = span.start_frame.checked_sub(released_at)?;
            if held < frames || lead > max_gap as u64 {
                return None;
            }
        }
        Some(span)
    }

    /// Remove a matched window so it cannot trigger again. Consumes any charge
    /// the motion used.
    pub fn consume(&mut self, motion: &MotionDefinition, span: MatchSpan) {
        if span.start_idx <= span.end_idx && span.end_idx < self.entries.len() {
            self.entries.drain(span.start_idx..=span.end_idx);
        }
        if let Some((charge, _)) = motion.charge() {
            self.track_mut(charge).last_release = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitfit_core::enums::Limb;
    use bitfit_core::motions::default_motions;
    use bitfit_core::moves::MoveId;

    const GAP: u32 = 10;

    fn qcf_punch() -> Vec<MotionToken> {
        vec![
            MotionToken::dir(RelDir::Down),
            MotionToken::dir(RelDir::DownForward),
            MotionToken::dir(RelDir::Forward),
            MotionToken::button(Limb::Punch),
        ]
    }

    fn record_all(buf: &mut InputBuffer, inputs: &[(MotionToken, u64)]) {
        for (token, frame) in inputs {
            buf.record(*token, *frame, *frame as f64 * 16.7);
        }
    }

    fn motion(id: MoveId) -> MotionDefinition {
        default_motions()
            .into_iter()
            .find(|m| m.move_id == id)
            .unwrap()
    }

    #[test]
    fn test_sequence_with_small_gaps() {
        let mut buf = InputBuffer::default();
        let t = qcf_punch();
        record_all(&mut buf, &[(t[0], 1), (t[1], 4), (t[2], 7), (t[3], 9)]);
        assert!(buf.match_sequence(&t, GAP));
    }

    #[test]
    fn test_sequence_ignores_interleaved_token() {
        let mut buf = InputBuffer::default();
        let t = qcf_punch();
        record_all(
            &mut buf,
            &[
                (t[0], 1),
                (MotionToken::button(Limb::Kick), 2),
                (t[1], 3),
                (t[2], 5),
                (t[3], 6),
            ],
        );
        assert!(buf.match_sequence(&t, GAP));
    }

    #[test]
    fn test_sequence_out_of_order_fails() {
        let mut buf = InputBuffer::default();
        let t = qcf_punch();
        record_all(&mut buf, &[(t[1], 1), (t[0], 2), (t[2], 3), (t[3], 4)]);
        assert!(!buf.match_sequence(&t, GAP));
    }

    #[test]
    fn test_sequence_gap_too_large_fails() {
        let mut buf = InputBuffer::default();
        let t = qcf_punch();
        record_all(&mut buf, &[(t[0], 1), (t[1], 3), (t[2], 20), (t[3], 22)]);
        assert!(!buf.match_sequence(&t, GAP));
    }

    #[test]
    fn test_late_restart_still_matches() {
        // An abandoned early attempt must not hide a later valid one.
        let mut buf = InputBuffer::default();
        let t = qcf_punch();
        record_all(
            &mut buf,
            &[(t[0], 1), (t[1], 2), (t[0], 30), (t[1], 31), (t[2], 33), (t[3], 35)],
        );
        let span = buf.find_sequence(&t, GAP, 0).unwrap();
        assert_eq!(span.start_frame, 30);
        assert_eq!(span.end_frame, 35);
    }

    #[test]
    fn test_retention_and_capacity() {
        let mut buf = InputBuffer::default();
        buf.record(MotionToken::dir(RelDir::Down), 0, 0.0);
        buf.record(MotionToken::dir(RelDir::Up), 200, 0.0);
        assert_eq!(buf.len(), 1);

        for frame in 0..100u64 {
            buf.record(MotionToken::button(Limb::Punch), 300 + frame / 10, 0.0);
        }
        assert_eq!(buf.len(), INPUT_BUFFER_CAPACITY);
        buf.prune(1000);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_motion_match_purges_window() {
        let mut buf = InputBuffer::default();
        let fireball = motion(MoveId::Fireball);
        let t = qcf_punch();
        record_all(&mut buf, &[(t[0], 10), (t[1], 12), (t[2], 14), (t[3], 15)]);
        let span = buf.match_motion(&fireball, 15, GAP).unwrap();
        buf.consume(&fireball, span);
        assert!(buf.is_empty());
        assert!(buf.match_motion(&fireball, 15, GAP).is_none());
    }

    #[test]
    fn test_motion_requires_fresh_button() {
        let mut buf = InputBuffer::default();
        let fireball = motion(MoveId::Fireball);
        let t = qcf_punch();
        record_all(&mut buf, &[(t[0], 10), (t[1], 12), (t[2], 14), (t[3], 15)]);
        assert!(buf.match_motion(&fireball, 16, GAP).is_none());
    }

    #[test]
    fn test_motion_lookback_limit() {
        let mut buf = InputBuffer::default();
        let crescent = motion(MoveId::CrescentKick);
        let tokens = crescent.release_tokens();
        // Every step is within the gap but the whole motion spans 50 frames.
        let inputs: Vec<(MotionToken, u64)> = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (*t, i as u64 * 10))
            .collect();
        record_all(&mut buf, &inputs);
        assert!(buf.match_sequence(&tokens, GAP));
        assert!(buf.match_motion(&crescent, 50, GAP).is_none());
    }

    #[test]
    fn test_charge_counts_and_resets() {
        let mut buf = InputBuffer::default();
        buf.hold(RelDir::DownBack, 0);
        for _ in 0..12 {
            buf.advance_charge();
        }
        assert_eq!(buf.charge_frames(ChargeDir::Back), 12);
        assert_eq!(buf.charge_frames(ChargeDir::Down), 12);
        buf.hold(RelDir::Back, 12);
        buf.advance_charge();
        assert_eq!(buf.charge_frames(ChargeDir::Back), 13);
        assert_eq!(buf.charge_frames(ChargeDir::Down), 0);
        buf.hold(RelDir::Neutral, 13);
        assert_eq!(buf.charge_frames(ChargeDir::Back), 0);
    }

    fn charge_then_release(buf: &mut InputBuffer, hold_frames: u64) -> u64 {
        buf.record(MotionToken::dir(RelDir::Back), 0, 0.0);
        buf.hold(RelDir::Back, 0);
        for _ in 0..hold_frames {
            buf.advance_charge();
        }
        let release = hold_frames;
        buf.record(MotionToken::dir(RelDir::Forward), release, 0.0);
        buf.hold(RelDir::Forward, release);
        buf.record(MotionToken::button(Limb::Punch), release + 2, 0.0);
        release + 2
    }

    #[test]
    fn test_charge_motion_after_full_hold() {
        let mut buf = InputBuffer::default();
        let boom = motion(MoveId::SonicBoom);
        let now = charge_then_release(&mut buf, 30);
        let span = buf.match_motion(&boom, now, GAP).unwrap();
        buf.consume(&boom, span);
        // The charge is spent.
        buf.record(MotionToken::dir(RelDir::Forward), now + 1, 0.0);
        buf.record(MotionToken::button(Limb::Punch), now + 2, 0.0);
        assert!(buf.match_motion(&boom, now + 2, GAP).is_none());
    }

    #[test]
    fn test_charge_motion_short_hold_fails() {
        let mut buf = InputBuffer::default();
        let boom = motion(MoveId::SonicBoom);
        let now = charge_then_release(&mut buf, 20);
        assert!(buf.match_motion(&boom, now, GAP).is_none());
    }
}
