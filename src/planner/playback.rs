//! Trajectory playback strategies.
//!
//! Overlapping playback sums the motion of every move inside its scheduled
//! window, so blended moves add up during their overlap. Collated playback
//! walks one flat phase list with a single cursor.

use alloc::vec::Vec;

use crate::motion::{Move, PhaseCursor, PlaybackState, Segment, Vec3};

/// Motion reported for one playback step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Tool position.
    pub position: Vec3,
    /// Tool velocity.
    pub velocity: Vec3,
    /// Whether all motion has finished.
    pub done: bool,
}

/// Common interface of the playback strategies.
pub trait Playback {
    /// Advance to absolute time `now`, `dt` after the previous call.
    fn advance(&mut self, moves: &mut [Move], now: f64, dt: f64) -> MotionSample;

    /// Rewind to the start of the trajectory.
    fn reset(&mut self);
}

/// Sums the contributions of every move inside its scheduled window.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlappingPlayback {
    first_active: usize,
    start: Vec3,
    rest: Vec3,
}

impl OverlappingPlayback {
    /// Create a playback resting at `start` until the first move begins.
    pub fn new(start: Vec3) -> Self {
        Self {
            first_active: 0,
            start,
            rest: start,
        }
    }

    fn skip_done(&mut self, moves: &[Move]) {
        while moves
            .get(self.first_active)
            .map_or(false, |mv| mv.cursor().is_done())
        {
            self.first_active += 1;
        }
    }
}

impl Playback for OverlappingPlayback {
    fn advance(&mut self, moves: &mut [Move], now: f64, dt: f64) -> MotionSample {
        self.skip_done(moves);

        let mut position = Vec3::ZERO;
        let mut velocity = Vec3::ZERO;
        let mut contributors = 0;

        for mv in moves.iter_mut().skip(self.first_active) {
            if mv.schedule_time > now {
                break;
            }
            if mv.cursor().is_done() {
                continue;
            }

            let step = match mv.cursor().state() {
                PlaybackState::Pending => now - mv.schedule_time,
                _ => dt,
            };
            let sample = mv.advance(step);
            if mv.segments().is_empty() {
                continue;
            }

            position += sample.state.pos;
            velocity += sample.state.vel;
            if contributors > 0 {
                // Blended moves share the previous move's end point
                position -= mv.src;
            }
            contributors += 1;
        }

        if contributors > 0 {
            self.rest = position;
        }
        self.skip_done(moves);

        MotionSample {
            position: self.rest,
            velocity,
            done: self.first_active >= moves.len(),
        }
    }

    fn reset(&mut self) {
        self.first_active = 0;
        self.rest = self.start;
    }
}

/// Walks one flat, non-overlapping phase list.
#[derive(Debug, Clone, PartialEq)]
pub struct CollatedPlayback {
    segments: Vec<Segment>,
    cursor: PhaseCursor,
    start: Vec3,
}

impl CollatedPlayback {
    /// Create a playback over `segments`, resting at `start` if there are none.
    pub fn new(segments: Vec<Segment>, start: Vec3) -> Self {
        Self {
            segments,
            cursor: PhaseCursor::new(),
            start,
        }
    }

    /// The flat phase list.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl Playback for CollatedPlayback {
    fn advance(&mut self, _moves: &mut [Move], _now: f64, dt: f64) -> MotionSample {
        if self.segments.is_empty() {
            return MotionSample {
                position: self.start,
                velocity: Vec3::ZERO,
                done: true,
            };
        }

        let sample = self.cursor.advance(&self.segments, dt);
        MotionSample {
            position: sample.state.pos,
            velocity: sample.state.vel,
            done: sample.done,
        }
    }

    fn reset(&mut self) {
        self.cursor.reset();
    }
}

/// Playback strategy chosen when the plan is finalized.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackStrategy {
    /// Moves overlap in time during blends.
    Overlapping(OverlappingPlayback),
    /// One flat phase list.
    Collated(CollatedPlayback),
}

impl PlaybackStrategy {
    /// Flat phase list of a collated strategy.
    pub fn collated_segments(&self) -> Option<&[Segment]> {
        match self {
            PlaybackStrategy::Collated(c) => Some(c.segments()),
            PlaybackStrategy::Overlapping(_) => None,
        }
    }
}

impl Playback for PlaybackStrategy {
    fn advance(&mut self, moves: &mut [Move], now: f64, dt: f64) -> MotionSample {
        match self {
            PlaybackStrategy::Overlapping(p) => p.advance(moves, now, dt),
            PlaybackStrategy::Collated(p) => p.advance(moves, now, dt),
        }
    }

    fn reset(&mut self) {
        match self {
            PlaybackStrategy::Overlapping(p) => p.reset(),
            PlaybackStrategy::Collated(p) => p.reset(),
        }
    }
}
