//! Configuration validation.

use core::cmp::Ordering;

use crate::error::{ConfigError, Error, Result};

use super::MachineLimits;

const AXES: [char; 3] = ['X', 'Y', 'Z'];

/// Validate machine limits.
///
/// Checks:
/// - Per-axis velocity/acceleration/jerk limits are positive
/// - Rotation limits are positive
/// - Position bounds are valid (min < max)
pub fn validate_limits(limits: &MachineLimits) -> Result<()> {
    for (i, axis) in AXES.into_iter().enumerate() {
        let value = limits.velocity[i];
        if !is_positive(value) {
            return Err(Error::Config(ConfigError::InvalidVelocityLimit { axis, value }));
        }

        let value = limits.acceleration[i];
        if !is_positive(value) {
            return Err(Error::Config(ConfigError::InvalidAccelerationLimit { axis, value }));
        }

        let value = limits.jerk[i];
        if !is_positive(value) {
            return Err(Error::Config(ConfigError::InvalidJerkLimit { axis, value }));
        }
    }

    let rotation = &limits.rotation;
    for value in [rotation.velocity, rotation.acceleration, rotation.jerk] {
        if !is_positive(value) {
            return Err(Error::Config(ConfigError::InvalidRotationLimit(value)));
        }
    }

    if let Some(ref bounds) = limits.position {
        for (i, axis) in AXES.into_iter().enumerate() {
            if bounds.min[i].partial_cmp(&bounds.max[i]) != Some(Ordering::Less) {
                return Err(Error::Config(ConfigError::InvalidPositionBounds {
                    axis,
                    min: bounds.min[i],
                    max: bounds.max[i],
                }));
            }
        }
    }

    Ok(())
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
