//! Machine limit configuration and types.

use serde::{Deserialize, Deserializer};

use crate::motion::Vec3;

/// Lower bound of the blend overlap fraction.
pub const MIN_OVERLAP_FRACTION: f64 = 0.01;

/// Upper bound of the blend overlap fraction.
pub const MAX_OVERLAP_FRACTION: f64 = 1.0;

/// How consecutive moves are joined at corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum CornerBlendMethod {
    /// Every move runs to a stop before the next starts.
    #[default]
    None,
    /// Blended moves overlap in time and their motions are summed.
    InterpolatedMoves,
    /// Corners are replaced by explicit transition phases on one flat timeline.
    DiscreteSegments,
}

/// Axis-aligned box the tool must stay within.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PositionBounds {
    /// Minimum allowed position per axis.
    pub min: Vec3,

    /// Maximum allowed position per axis.
    pub max: Vec3,
}

impl PositionBounds {
    /// Create new position bounds.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Check if bounds are valid (min < max on every axis).
    pub fn is_valid(&self) -> bool {
        self.min.x < self.max.x && self.min.y < self.max.y && self.min.z < self.max.z
    }

    /// Check if a position is within bounds (inclusive).
    pub fn contains(&self, p: Vec3) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }
}

/// Limits shared by every rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct RotationLimits {
    /// Maximum angular velocity.
    pub velocity: f64,

    /// Maximum angular acceleration.
    pub acceleration: f64,

    /// Maximum angular jerk.
    pub jerk: f64,
}

impl RotationLimits {
    /// Create new rotation limits.
    pub fn new(velocity: f64, acceleration: f64, jerk: f64) -> Self {
        Self {
            velocity,
            acceleration,
            jerk,
        }
    }
}

/// Global machine limits applied while planning.
///
/// Loaded from TOML or built in code and handed to the planner before
/// finalizing. All kinematic limits must be positive.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MachineLimits {
    /// Optional position bounds.
    #[serde(default)]
    pub position: Option<PositionBounds>,

    /// Maximum velocity per axis.
    pub velocity: Vec3,

    /// Maximum acceleration per axis.
    pub acceleration: Vec3,

    /// Maximum jerk per axis.
    pub jerk: Vec3,

    /// Rotation axis limits.
    #[serde(default)]
    pub rotation: RotationLimits,

    /// Corner blend method.
    #[serde(default)]
    pub corner_blend: CornerBlendMethod,

    /// Maximum share of a move's duration consumed by blending.
    #[serde(
        default = "default_overlap_fraction",
        deserialize_with = "deserialize_overlap_fraction"
    )]
    max_overlap_fraction: f64,
}

fn default_overlap_fraction() -> f64 {
    MAX_OVERLAP_FRACTION
}

fn deserialize_overlap_fraction<'de, D>(deserializer: D) -> core::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_overlap_fraction)
}

/// Clamp an overlap fraction into `[0.01, 1.0]`.
pub fn clamp_overlap_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        return MAX_OVERLAP_FRACTION;
    }
    fraction.clamp(MIN_OVERLAP_FRACTION, MAX_OVERLAP_FRACTION)
}

impl Default for MachineLimits {
    fn default() -> Self {
        Self {
            position: None,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            jerk: Vec3::ZERO,
            rotation: RotationLimits::default(),
            corner_blend: CornerBlendMethod::None,
            max_overlap_fraction: MAX_OVERLAP_FRACTION,
        }
    }
}

impl MachineLimits {
    /// Create limits with the given per-axis velocity, acceleration and jerk.
    pub fn new(velocity: Vec3, acceleration: Vec3, jerk: Vec3) -> Self {
        Self {
            velocity,
            acceleration,
            jerk,
            ..Self::default()
        }
    }

    /// Set rotation limits.
    pub fn with_rotation(mut self, rotation: RotationLimits) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set position bounds.
    pub fn with_position(mut self, bounds: PositionBounds) -> Self {
        self.position = Some(bounds);
        self
    }

    /// Set the corner blend method.
    pub fn with_corner_blend(mut self, method: CornerBlendMethod) -> Self {
        self.corner_blend = method;
        self
    }

    /// Set the maximum overlap fraction (clamped).
    pub fn with_max_overlap_fraction(mut self, fraction: f64) -> Self {
        self.set_max_overlap_fraction(fraction);
        self
    }

    /// Maximum share of a move's duration consumed by blending.
    #[inline]
    pub fn max_overlap_fraction(&self) -> f64 {
        self.max_overlap_fraction
    }

    /// Set the maximum overlap fraction, clamped into `[0.01, 1.0]`.
    pub fn set_max_overlap_fraction(&mut self, fraction: f64) {
        self.max_overlap_fraction = clamp_overlap_fraction(fraction);
    }

    /// Check if a position is allowed by the bounds (always true when unbounded).
    pub fn allows(&self, p: Vec3) -> bool {
        self.position.map_or(true, |b| b.contains(p))
    }
}
