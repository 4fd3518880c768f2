//! Moves, rotations and their segment generation.
//!
//! A [`Move`] is one straight-line leg of the tool path; a [`Rotation`] is
//! one single-axis angular move. Both wrap the [`SCurveProfile`] solver and
//! own the directed phase sequence it produces.

use core::fmt;

use heapless::Vec;
use libm::fabs;

use super::cursor::{CursorSample, PhaseCursor};
use super::profile::{ProfilePhase, SCurveProfile};
use super::push_phase;
use super::segment::{total_duration, Kinematic, KinematicState, RotateSegment, Segment};
use super::vec3::Vec3;
use crate::config::{MachineLimits, RotationLimits};
use crate::error::PlanError;

/// Maximum number of phases a move or rotation holds.
pub const MAX_MOVE_SEGMENTS: usize = 8;

/// Distances below this are treated as zero-length.
pub const MIN_MOVE_LENGTH: f64 = 1e-9;

/// Phase sequence of a linear move.
pub type SegmentList = Vec<Segment, MAX_MOVE_SEGMENTS>;

/// Phase sequence of a rotation.
pub type RotateSegmentList = Vec<RotateSegment, MAX_MOVE_SEGMENTS>;

/// Kind of move in the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveType {
    /// Point-to-point S-curve move.
    #[default]
    Normal,
    /// Dwell at the current position.
    Wait,
    /// Barrier waiting on delayable events.
    Sync,
    /// Deceleration-only stop from a moving state.
    EStop,
}

impl MoveType {
    /// Short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            MoveType::Normal => "normal",
            MoveType::Wait => "wait",
            MoveType::Sync => "sync",
            MoveType::EStop => "estop",
        }
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// How a move blends into the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlendType {
    /// Stop at the corner.
    #[default]
    None,
    /// Longest transition the corner allows (lowest jerk).
    MinJerk,
    /// Shortest transition the machine limits allow.
    MaxJerk,
}

/// One leg of the tool path.
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    /// Start position.
    pub src: Vec3,
    /// End position.
    pub dst: Vec3,
    /// Requested velocity, capped per axis once generated.
    pub vel: f64,
    /// Requested acceleration, capped per axis once generated.
    pub acc: f64,
    /// Requested jerk, capped per axis once generated.
    pub jerk: f64,
    /// Kind of move.
    pub move_type: MoveType,
    /// Blend into the previous move.
    pub blend: BlendType,
    /// Maximum distance from the corner a blend may start or end (0 = unlimited).
    pub blend_clearance: f64,
    /// Scheduled start time.
    pub schedule_time: f64,
    /// Total duration of the phases.
    pub duration: f64,
    /// Whether a blend patch was appended to this move.
    pub blended: bool,

    pub(crate) segments: SegmentList,
    pub(crate) blended_in: bool,
    pub(crate) cruise: Option<usize>,
    pub(crate) cruise_length: f64,
    pub(crate) cursor: PhaseCursor,
    initial_velocity: Vec3,
}

impl Move {
    fn base(src: Vec3, dst: Vec3, move_type: MoveType) -> Self {
        Self {
            src,
            dst,
            vel: 0.0,
            acc: 0.0,
            jerk: 0.0,
            move_type,
            blend: BlendType::None,
            blend_clearance: 0.0,
            schedule_time: 0.0,
            duration: 0.0,
            blended: false,
            segments: SegmentList::new(),
            blended_in: false,
            cruise: None,
            cruise_length: 0.0,
            cursor: PhaseCursor::new(),
            initial_velocity: Vec3::ZERO,
        }
    }

    /// Straight-line move from `src` to `dst`.
    pub fn linear(src: Vec3, dst: Vec3, vel: f64, acc: f64, jerk: f64) -> Self {
        Self {
            vel,
            acc,
            jerk,
            ..Self::base(src, dst, MoveType::Normal)
        }
    }

    /// Dwell at `pos` for `duration` seconds.
    pub fn wait(pos: Vec3, duration: f64) -> Self {
        Self {
            duration,
            ..Self::base(pos, pos, MoveType::Wait)
        }
    }

    /// Sync barrier at `pos`; its duration is resolved by the scheduler.
    pub fn sync(pos: Vec3) -> Self {
        Self::base(pos, pos, MoveType::Sync)
    }

    /// Decelerate to rest from `pos` travelling at `velocity`.
    ///
    /// The destination is only known after [`generate`](Self::generate).
    pub fn emergency_stop(pos: Vec3, velocity: Vec3, acc: f64, jerk: f64) -> Self {
        Self {
            vel: velocity.length(),
            acc,
            jerk,
            initial_velocity: velocity,
            ..Self::base(pos, pos, MoveType::EStop)
        }
    }

    /// Set how this move blends into the previous one.
    pub fn with_blend(mut self, blend: BlendType, clearance: f64) -> Self {
        self.blend = blend;
        self.blend_clearance = clearance.max(0.0);
        self
    }

    /// Check the move's own parameters.
    pub fn validate(&self) -> Result<(), PlanError> {
        match self.move_type {
            MoveType::Normal => {
                if !(is_positive(self.vel) && is_positive(self.acc) && is_positive(self.jerk)) {
                    return Err(PlanError::ZeroParameter);
                }
                if !(self.src.is_finite() && self.dst.is_finite()) {
                    return Err(PlanError::NonFiniteTarget);
                }
                if self.length() < MIN_MOVE_LENGTH {
                    return Err(PlanError::ZeroLength);
                }
            }
            MoveType::EStop => {
                if !(is_positive(self.acc) && is_positive(self.jerk)) {
                    return Err(PlanError::ZeroParameter);
                }
                if !(self.src.is_finite() && self.vel.is_finite()) {
                    return Err(PlanError::NonFiniteTarget);
                }
                if self.vel < MIN_MOVE_LENGTH {
                    return Err(PlanError::NothingToStop);
                }
            }
            MoveType::Wait => {
                if !self.duration.is_finite() || self.duration < 0.0 {
                    return Err(PlanError::InvalidDelay);
                }
            }
            MoveType::Sync => {}
        }
        Ok(())
    }

    /// Straight-line distance from `src` to `dst`.
    #[inline]
    pub fn length(&self) -> f64 {
        self.src.distance(self.dst)
    }

    /// Unit direction of travel (zero for stationary moves).
    #[inline]
    pub fn direction(&self) -> Vec3 {
        match self.move_type {
            MoveType::EStop => self.initial_velocity.normalized(),
            _ => (self.dst - self.src).normalized(),
        }
    }

    /// Generated phases.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Scheduled end time.
    #[inline]
    pub fn end_time(&self) -> f64 {
        self.schedule_time + self.duration
    }

    /// Whether this move can take part in a corner blend.
    #[inline]
    pub fn is_blendable(&self) -> bool {
        self.move_type == MoveType::Normal && self.cruise.is_some()
    }

    /// Whether a blend patch leads into this move.
    #[inline]
    pub fn is_blended_in(&self) -> bool {
        self.blended_in
    }

    /// Playback cursor.
    #[inline]
    pub fn cursor(&self) -> &PhaseCursor {
        &self.cursor
    }

    /// Build the phase sequence, capping the requested limits per axis.
    ///
    /// The capped limits replace the requested ones. Normal moves always
    /// carry a cruise phase, possibly of zero length, so they hold exactly
    /// 5 or 7 phases. Sync moves hold none until the
    /// scheduler resolves them.
    pub fn generate(&mut self, limits: &MachineLimits) {
        self.cursor.reset();
        self.segments.clear();
        self.blended = false;
        self.blended_in = false;
        self.cruise = None;
        self.cruise_length = 0.0;

        match self.move_type {
            MoveType::Normal => {
                let dir = self.direction();
                let vel = self.vel.min(dir.axis_capped(limits.velocity));
                let acc = self.acc.min(dir.axis_capped(limits.acceleration));
                let jerk = self.jerk.min(dir.axis_capped(limits.jerk));
                self.vel = vel;
                self.acc = acc;
                self.jerk = jerk;

                let profile = SCurveProfile::solve(self.length(), vel, acc, jerk);
                self.segments = directed(
                    &profile.phases(),
                    KinematicState::at_rest(0.0),
                    self.src,
                    dir,
                    MoveType::Normal,
                );
                self.cruise = Some(profile.side_phase_count());
                self.cruise_length = profile.cruise_time * profile.cruise_velocity;
                self.duration = total_duration(&self.segments);
            }
            MoveType::Wait => {
                let hold = Segment::hold(self.src, self.duration, MoveType::Wait);
                push_phase(&mut self.segments, hold);
            }
            MoveType::Sync => {
                self.duration = 0.0;
            }
            MoveType::EStop => {
                let dir = self.direction();
                let acc = self.acc.min(dir.axis_capped(limits.acceleration));
                let jerk = self.jerk.min(dir.axis_capped(limits.jerk));

                let profile = SCurveProfile::unbounded(self.vel, acc, jerk);
                let start = KinematicState {
                    pos: 0.0,
                    vel: profile.cruise_velocity,
                    acc: 0.0,
                };
                self.segments = directed(&profile.fall_phases(), start, self.src, dir, MoveType::EStop);
                self.dst = self.segments.last().map_or(self.src, Segment::end_pos);
                self.duration = total_duration(&self.segments);
            }
        }
    }

    /// Turn an unresolved sync into a dwell of `shortfall` seconds.
    ///
    /// Without a shortfall the sync keeps zero phases and zero duration.
    pub(crate) fn resolve_sync(&mut self, shortfall: f64) {
        self.segments.clear();
        if shortfall > 0.0 {
            self.move_type = MoveType::Wait;
            push_phase(&mut self.segments, Segment::hold(self.src, shortfall, MoveType::Wait));
            self.duration = shortfall;
        } else {
            self.duration = 0.0;
        }
    }

    /// Advance this move's playback cursor.
    pub(crate) fn advance(&mut self, dt: f64) -> CursorSample<Vec3> {
        self.cursor.advance(&self.segments, dt)
    }
}

/// One single-axis angular move.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotation {
    /// Rotation axis index.
    pub axis: usize,
    /// Start angle.
    pub src: f64,
    /// End angle.
    pub dst: f64,
    /// Requested angular velocity.
    pub vel: f64,
    /// Requested angular acceleration.
    pub acc: f64,
    /// Requested angular jerk.
    pub jerk: f64,
    /// Total duration of the phases.
    pub duration: f64,

    pub(crate) segments: RotateSegmentList,
    pub(crate) cursor: PhaseCursor,
}

impl Rotation {
    /// Rotation of `axis` from `src` to `dst`.
    pub fn new(axis: usize, src: f64, dst: f64, vel: f64, acc: f64, jerk: f64) -> Self {
        Self {
            axis,
            src,
            dst,
            vel,
            acc,
            jerk,
            duration: 0.0,
            segments: RotateSegmentList::new(),
            cursor: PhaseCursor::new(),
        }
    }

    /// Check the rotation's own parameters.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !(is_positive(self.vel) && is_positive(self.acc) && is_positive(self.jerk)) {
            return Err(PlanError::ZeroParameter);
        }
        if !(self.src.is_finite() && self.dst.is_finite()) {
            return Err(PlanError::NonFiniteTarget);
        }
        if fabs(self.dst - self.src) < MIN_MOVE_LENGTH {
            return Err(PlanError::ZeroLength);
        }
        Ok(())
    }

    /// Generated phases.
    #[inline]
    pub fn segments(&self) -> &[RotateSegment] {
        &self.segments
    }

    /// Build the phase sequence, capping the requested limits.
    pub fn generate(&mut self, limits: &RotationLimits) {
        self.cursor.reset();

        let delta = self.dst - self.src;
        let sign = if delta < 0.0 { -1.0 } else { 1.0 };
        let vel = self.vel.min(limits.velocity);
        let acc = self.acc.min(limits.acceleration);
        let jerk = self.jerk.min(limits.jerk);

        let profile = SCurveProfile::solve(fabs(delta), vel, acc, jerk);
        self.segments = directed(
            &profile.phases(),
            KinematicState::at_rest(0.0),
            self.src,
            sign,
            MoveType::Normal,
        );
        self.duration = total_duration(&self.segments);
    }

    /// Advance this rotation's playback cursor.
    pub(crate) fn advance(&mut self, dt: f64) -> CursorSample<f64> {
        self.cursor.advance(&self.segments, dt)
    }
}

fn is_positive(v: f64) -> bool {
    v > 0.0
}

/// Lay scalar profile phases along `dir`, starting at `origin`.
fn directed<V: Kinematic>(
    phases: &[ProfilePhase],
    start: KinematicState<f64>,
    origin: V,
    dir: V,
    move_type: MoveType,
) -> Vec<Segment<V>, MAX_MOVE_SEGMENTS> {
    let mut out = Vec::new();
    let mut state = start;
    for phase in phases {
        push_phase(&mut out, Segment {
            pos: origin + dir * state.pos,
            vel: dir * state.vel,
            acc: dir * state.acc,
            jerk: dir * phase.jerk,
            duration: phase.duration,
            move_type,
        });
        state = RotateSegment::from_state(state, phase.jerk, phase.duration, move_type).end_state();
    }
    out
}
