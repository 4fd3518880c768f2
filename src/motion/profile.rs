//! Jerk-limited S-curve profile calculation.
//!
//! Produces a symmetric profile of up to seven constant-jerk phases:
//! concave rise, optional linear rise, convex rise, cruise, convex fall,
//! optional linear fall, concave fall. The fall side mirrors the rise
//! side with negated jerk. The cruise phase is always emitted, with zero
//! duration when the rise and fall meet in the middle.

use heapless::Vec;
use libm::{cbrt, sqrt};

use super::moves::MoveType;
use super::push_phase;
use super::segment::{KinematicState, RotateSegment};

/// Cruise durations at or below this are treated as zero.
pub const CRUISE_EPSILON: f64 = 1e-9;

/// Maximum number of phases a profile can produce.
pub const MAX_PROFILE_PHASES: usize = 7;

/// Phase list of a solved profile.
pub type PhaseList = Vec<ProfilePhase, MAX_PROFILE_PHASES>;

/// One scalar constant-jerk phase along the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilePhase {
    /// Signed jerk along the direction of travel.
    pub jerk: f64,
    /// Phase duration in seconds.
    pub duration: f64,
}

/// Solved symmetric S-curve for one move or rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SCurveProfile {
    /// Total travel distance covered by the profile.
    pub distance: f64,
    /// Jerk magnitude of the curved phases.
    pub jerk: f64,
    /// Duration of each curved phase (`T1 == T2`).
    pub ramp_time: f64,
    /// Duration of each constant-acceleration phase (0 if absent).
    pub linear_time: f64,
    /// Duration of the cruise phase (may be 0).
    pub cruise_time: f64,
    /// Velocity actually reached at the end of the rise.
    pub cruise_velocity: f64,
    /// Distance covered by the rise (and, mirrored, by the fall).
    pub ramp_distance: f64,
}

impl SCurveProfile {
    /// Solve a profile covering `distance` with the given limits.
    ///
    /// `vel`, `acc` and `jerk` must be positive and already capped against
    /// any machine limits. When the distance is too short to reach `vel`,
    /// the reached cruise velocity is lower than requested.
    pub fn solve(distance: f64, vel: f64, acc: f64, jerk: f64) -> Self {
        let distance = distance.max(0.0);
        Self::build(distance, vel, acc, jerk, Some(0.5 * distance))
    }

    /// Solve the rise and fall for `vel` with no distance budget.
    ///
    /// Used for decelerate-to-stop trajectories, where only the fall side
    /// matters and the requested velocity is always reached.
    pub fn unbounded(vel: f64, acc: f64, jerk: f64) -> Self {
        Self::build(0.0, vel, acc, jerk, None)
    }

    fn build(distance: f64, vel: f64, acc: f64, jerk: f64, half_budget: Option<f64>) -> Self {
        // Nominal ramp time for one curved phase: T/2 with T = 2·acc/jerk
        let mut ramp = acc / jerk;
        let dv_curve = acc * acc / (2.0 * jerk);
        let v1 = dv_curve;
        let v2 = vel - dv_curve;

        let mut linear = 0.0;
        if v1 > v2 {
            // Acceleration limit is never reached: T = √(4·vel/jerk)
            ramp = 0.5 * sqrt(4.0 * vel / jerk);
        } else if v2 > v1 {
            linear = (v2 - v1) / acc;
        }

        if let Some(half) = half_budget {
            if jerk * ramp * ramp * ramp > half {
                // Velocity unreachable in the available distance
                ramp = cbrt(half / jerk);
                linear = 0.0;
            } else if linear > 0.0 && rise_end(jerk, ramp, linear).pos > half {
                linear = fit_linear_time(jerk * ramp, ramp, half).min(linear);
            }
        }

        let rise = rise_end(jerk, ramp, linear);
        let cruise_velocity = rise.vel;

        let (distance, cruise_time) = match half_budget {
            Some(_) => {
                let remaining = distance - 2.0 * rise.pos;
                let cruise = if cruise_velocity > 0.0 {
                    remaining / cruise_velocity
                } else {
                    0.0
                };
                (distance, if cruise > CRUISE_EPSILON { cruise } else { 0.0 })
            }
            None => (2.0 * rise.pos, 0.0),
        };

        Self {
            distance,
            jerk,
            ramp_time: ramp,
            linear_time: linear,
            cruise_time,
            cruise_velocity,
            ramp_distance: rise.pos,
        }
    }

    /// Whether the profile contains constant-acceleration phases.
    #[inline]
    pub fn has_linear(&self) -> bool {
        self.linear_time > 0.0
    }

    /// Number of phases on each side of the cruise (2 or 3).
    #[inline]
    pub fn side_phase_count(&self) -> usize {
        if self.has_linear() {
            3
        } else {
            2
        }
    }

    /// Total duration of all phases.
    pub fn duration(&self) -> f64 {
        4.0 * self.ramp_time + 2.0 * self.linear_time + self.cruise_time
    }

    /// Rise phases, in order.
    pub fn rise_phases(&self) -> PhaseList {
        let mut phases = PhaseList::new();
        self.push_side(&mut phases, 1.0);
        phases
    }

    /// Fall phases, in order.
    pub fn fall_phases(&self) -> PhaseList {
        let mut phases = PhaseList::new();
        self.push_side(&mut phases, -1.0);
        phases
    }

    /// All phases in order, including the (possibly zero-length) cruise.
    pub fn phases(&self) -> PhaseList {
        let mut phases = PhaseList::new();
        self.push_side(&mut phases, 1.0);
        push_phase(&mut phases, ProfilePhase {
            jerk: 0.0,
            duration: self.cruise_time,
        });
        self.push_side(&mut phases, -1.0);
        phases
    }

    fn push_side(&self, phases: &mut PhaseList, sign: f64) {
        let j = sign * self.jerk;
        push_phase(phases, ProfilePhase {
            jerk: j,
            duration: self.ramp_time,
        });
        if self.has_linear() {
            push_phase(phases, ProfilePhase {
                jerk: 0.0,
                duration: self.linear_time,
            });
        }
        push_phase(phases, ProfilePhase {
            jerk: -j,
            duration: self.ramp_time,
        });
    }
}

/// Scalar state at the end of the rise phases, starting from rest.
fn rise_end(jerk: f64, ramp: f64, linear: f64) -> KinematicState<f64> {
    let mut state = KinematicState::at_rest(0.0);
    for (j, t) in [(jerk, ramp), (0.0, linear), (-jerk, ramp)] {
        state = RotateSegment::from_state(state, j, t, MoveType::Normal).end_state();
    }
    state
}

/// Largest linear-phase duration whose rise distance fits `half`.
///
/// The three-phase rise distance with peak acceleration `a = jerk·T1` is
/// `½·a·TL² + 1.5·a·T1·TL + a·T1²`.
fn fit_linear_time(acc: f64, ramp: f64, half: f64) -> f64 {
    let qa = 0.5 * acc;
    let qb = 1.5 * acc * ramp;
    let qc = acc * ramp * ramp - half;
    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 || qa <= 0.0 {
        return 0.0;
    }
    ((-qb + sqrt(disc)) / (2.0 * qa)).max(0.0)
}
