//! Builder for programmatic move creation.

use crate::motion::{BlendType, Vec3};

/// Builder for a linear move, consumed by [`Planner::add`](super::Planner::add).
///
/// Limits left unset fall back to the machine's per-axis limits.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveBuilder {
    dst: Vec3,
    velocity: Option<f64>,
    acceleration: Option<f64>,
    jerk: Option<f64>,
    blend: BlendType,
    clearance: f64,
}

impl MoveBuilder {
    /// Start a move to `dst`.
    pub fn to(dst: Vec3) -> Self {
        Self {
            dst,
            velocity: None,
            acceleration: None,
            jerk: None,
            blend: BlendType::None,
            clearance: 0.0,
        }
    }

    /// Set the requested velocity.
    pub fn velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Set the requested acceleration.
    pub fn acceleration(mut self, acceleration: f64) -> Self {
        self.acceleration = Some(acceleration);
        self
    }

    /// Set the requested jerk.
    pub fn jerk(mut self, jerk: f64) -> Self {
        self.jerk = Some(jerk);
        self
    }

    /// Blend into the previous move, staying within `clearance` of the corner (0 = unlimited).
    pub fn blend(mut self, blend: BlendType, clearance: f64) -> Self {
        self.blend = blend;
        self.clearance = clearance;
        self
    }

    /// Destination of the move.
    pub fn destination(&self) -> Vec3 {
        self.dst
    }

    /// Resolve into `(dst, vel, acc, jerk, blend, clearance)`.
    pub(crate) fn into_parts(self) -> (Vec3, f64, f64, f64, BlendType, f64) {
        (
            self.dst,
            self.velocity.unwrap_or(f64::INFINITY),
            self.acceleration.unwrap_or(f64::INFINITY),
            self.jerk.unwrap_or(f64::INFINITY),
            self.blend,
            self.clearance,
        )
    }
}
