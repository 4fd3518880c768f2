//! Constant-jerk trajectory phases.
//!
//! A [`Segment`] is one constant-jerk interval with a fixed start state.
//! Linear moves use 3-vector segments, rotations use the scalar
//! [`RotateSegment`] with identical closed-form evolution:
//!
//! ```text
//! pos(t) = pos0 + v0·t + ½·a0·t² + ⅙·j·t³
//! vel(t) = v0 + a0·t + ½·j·t²
//! acc(t) = a0 + j·t
//! ```

use core::fmt;
use core::ops::{Add, Mul, Sub};

use super::moves::MoveType;
use super::vec3::Vec3;

/// Quantities a segment can evolve: `f64` for a single axis, [`Vec3`] for XYZ.
pub trait Kinematic:
    Copy + Default + PartialEq + Add<Output = Self> + Sub<Output = Self> + Mul<f64, Output = Self>
{
}

impl<T> Kinematic for T where
    T: Copy + Default + PartialEq + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T>
{
}

/// Position, velocity and acceleration at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicState<V = Vec3> {
    /// Position.
    pub pos: V,
    /// Velocity.
    pub vel: V,
    /// Acceleration.
    pub acc: V,
}

impl<V: Kinematic> KinematicState<V> {
    /// State at rest at `pos`.
    pub fn at_rest(pos: V) -> Self {
        Self {
            pos,
            vel: V::default(),
            acc: V::default(),
        }
    }
}

/// One constant-jerk phase of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<V = Vec3> {
    /// Start position.
    pub pos: V,
    /// Start velocity.
    pub vel: V,
    /// Start acceleration.
    pub acc: V,
    /// Constant jerk over the whole phase.
    pub jerk: V,
    /// Phase duration in seconds.
    pub duration: f64,
    /// Type of the move that produced this phase.
    pub move_type: MoveType,
}

/// Single-axis phase used by rotations.
pub type RotateSegment = Segment<f64>;

impl<V: Kinematic> Segment<V> {
    /// Create a phase starting from `state` with constant `jerk`.
    pub fn from_state(state: KinematicState<V>, jerk: V, duration: f64, move_type: MoveType) -> Self {
        Self {
            pos: state.pos,
            vel: state.vel,
            acc: state.acc,
            jerk,
            duration,
            move_type,
        }
    }

    /// Zero-kinematic phase holding `pos` for `duration`.
    pub fn hold(pos: V, duration: f64, move_type: MoveType) -> Self {
        Self::from_state(KinematicState::at_rest(pos), V::default(), duration, move_type)
    }

    /// Start state of the phase.
    #[inline]
    pub fn start_state(&self) -> KinematicState<V> {
        KinematicState {
            pos: self.pos,
            vel: self.vel,
            acc: self.acc,
        }
    }

    /// Evaluate the closed form at offset `t` into the phase.
    pub fn state_at(&self, t: f64) -> KinematicState<V> {
        let t2 = t * t;
        let t3 = t2 * t;
        KinematicState {
            pos: self.pos + self.vel * t + self.acc * (0.5 * t2) + self.jerk * (t3 / 6.0),
            vel: self.vel + self.acc * t + self.jerk * (0.5 * t2),
            acc: self.acc + self.jerk * t,
        }
    }

    /// State at the end of the phase.
    #[inline]
    pub fn end_state(&self) -> KinematicState<V> {
        self.state_at(self.duration)
    }

    /// Position at the end of the phase.
    #[inline]
    pub fn end_pos(&self) -> V {
        self.end_state().pos
    }
}

impl<V: fmt::Display> fmt::Display for Segment<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<7} t={:.5}s pos={} vel={} acc={} jerk={}",
            self.move_type, self.duration, self.pos, self.vel, self.acc, self.jerk
        )
    }
}

/// Sum of all phase durations.
pub fn total_duration<V>(segments: &[Segment<V>]) -> f64 {
    segments.iter().map(|s| s.duration).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_form_scalar() {
        let seg = RotateSegment {
            pos: 1.0,
            vel: 2.0,
            acc: 3.0,
            jerk: 6.0,
            duration: 1.0,
            move_type: MoveType::Normal,
        };
        let end = seg.end_state();
        // 1 + 2 + 1.5 + 1
        assert!((end.pos - 5.5).abs() < 1e-12);
        // 2 + 3 + 3
        assert!((end.vel - 8.0).abs() < 1e-12);
        assert!((end.acc - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_hold_stays_put() {
        let seg = Segment::hold(Vec3::new(1.0, 2.0, 3.0), 0.5, MoveType::Wait);
        assert_eq!(seg.end_pos(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(seg.end_state().vel, Vec3::ZERO);
    }
}
