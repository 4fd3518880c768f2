//! Playback cursor over a phase sequence.

use super::segment::{Kinematic, KinematicState, Segment};

/// Phases shorter than this are consumed in the same call that reaches them.
pub const PHASE_EPSILON: f64 = 1e-12;

/// Lifecycle of a move or rotation during playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackState {
    /// Not yet reached on the timeline.
    #[default]
    Pending,
    /// Currently being played back.
    Active,
    /// Final phase fully consumed.
    Done,
}

/// Result of advancing a cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorSample<V> {
    /// Kinematic state at the cursor.
    pub state: KinematicState<V>,
    /// Whether the final phase has been consumed.
    pub done: bool,
}

/// Runtime position within a phase sequence.
///
/// The reported state is always evaluated on the phase the cursor points
/// at, so the index and the position never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseCursor {
    /// Index of the live phase.
    index: usize,

    /// Elapsed time within the live phase.
    elapsed: f64,

    /// Playback lifecycle.
    state: PlaybackState,
}

impl PhaseCursor {
    /// Create a cursor at the start of a sequence.
    pub const fn new() -> Self {
        Self {
            index: 0,
            elapsed: 0.0,
            state: PlaybackState::Pending,
        }
    }

    /// Index of the live phase.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Elapsed time within the live phase.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Check if playback is complete.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == PlaybackState::Done
    }

    /// Advance by `dt` and return the state at the new cursor position.
    ///
    /// Rolls over as many phases as `dt` covers, including zero-length
    /// ones. Past the end of the final phase the state is clamped to that
    /// phase's end and the cursor reports done. An empty sequence is done
    /// immediately and reports the default state.
    pub fn advance<V: Kinematic>(&mut self, segments: &[Segment<V>], dt: f64) -> CursorSample<V> {
        let Some(last) = segments.len().checked_sub(1) else {
            self.state = PlaybackState::Done;
            return CursorSample {
                state: KinematicState::default(),
                done: true,
            };
        };

        if self.state == PlaybackState::Done {
            return CursorSample {
                state: segments[last].end_state(),
                done: true,
            };
        }

        self.state = PlaybackState::Active;
        self.elapsed += dt.max(0.0);

        loop {
            let seg = &segments[self.index];
            let exceeded = self.elapsed > seg.duration
                || (seg.duration < PHASE_EPSILON && self.elapsed >= seg.duration && self.index < last);
            if !exceeded {
                return CursorSample {
                    state: seg.state_at(self.elapsed),
                    done: false,
                };
            }
            if self.index < last {
                self.elapsed -= seg.duration;
                self.index += 1;
            } else {
                self.elapsed = seg.duration;
                self.state = PlaybackState::Done;
                return CursorSample {
                    state: seg.end_state(),
                    done: true,
                };
            }
        }
    }

    /// State at the cursor without advancing.
    pub fn current<V: Kinematic>(&self, segments: &[Segment<V>]) -> KinematicState<V> {
        match segments.get(self.index) {
            Some(seg) => seg.state_at(self.elapsed.min(seg.duration)),
            None => KinematicState::default(),
        }
    }

    /// Reset the cursor to the beginning.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::moves::MoveType;
    use crate::motion::segment::RotateSegment;

    fn ramp(pos: f64, vel: f64, duration: f64) -> RotateSegment {
        RotateSegment {
            pos,
            vel,
            acc: 0.0,
            jerk: 0.0,
            duration,
            move_type: MoveType::Normal,
        }
    }

    #[test]
    fn test_cursor_completes() {
        let segments = [ramp(0.0, 1.0, 1.0), ramp(1.0, 1.0, 1.0)];
        let mut cursor = PhaseCursor::new();

        assert_eq!(cursor.state(), PlaybackState::Pending);
        let s = cursor.advance(&segments, 1.5);
        assert!(!s.done);
        assert_eq!(cursor.index(), 1);
        assert!((s.state.pos - 1.5).abs() < 1e-12);

        let s = cursor.advance(&segments, 1.0);
        assert!(s.done);
        assert!(cursor.is_done());
        assert!((s.state.pos - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_sequence_is_done() {
        let mut cursor = PhaseCursor::new();
        let s = cursor.advance::<f64>(&[], 0.1);
        assert!(s.done);
    }

    #[test]
    fn test_zero_length_phase_consumed() {
        let segments = [ramp(0.0, 1.0, 1.0), ramp(1.0, 0.0, 0.0), ramp(1.0, -1.0, 1.0)];
        let mut cursor = PhaseCursor::new();

        // Exactly on the boundary: stays on the first phase's end
        let s = cursor.advance(&segments, 1.0);
        assert_eq!(cursor.index(), 0);
        assert!((s.state.pos - 1.0).abs() < 1e-12);

        let s = cursor.advance(&segments, 0.25);
        assert_eq!(cursor.index(), 2);
        assert!((s.state.pos - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_reset() {
        let segments = [ramp(0.0, 1.0, 1.0)];
        let mut cursor = PhaseCursor::new();
        cursor.advance(&segments, 5.0);
        assert!(cursor.is_done());

        cursor.reset();
        assert_eq!(cursor.state(), PlaybackState::Pending);
        assert_eq!(cursor.index(), 0);
    }
}
