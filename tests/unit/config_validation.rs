//! Unit tests for limit validation.

use pnp_motion::config::{validate_limits, MachineLimits, PositionBounds, RotationLimits};
use pnp_motion::error::{ConfigError, Error};
use pnp_motion::Vec3;

fn valid_limits() -> MachineLimits {
    MachineLimits::new(
        Vec3::new(500.0, 500.0, 100.0),
        Vec3::new(5000.0, 5000.0, 1000.0),
        Vec3::new(50000.0, 50000.0, 10000.0),
    )
    .with_rotation(RotationLimits::new(720.0, 7200.0, 72000.0))
}

/// Test validation of a valid configuration.
#[test]
fn test_valid_limits_pass_validation() {
    assert!(validate_limits(&valid_limits()).is_ok());

    let bounded = valid_limits().with_position(PositionBounds::new(
        Vec3::new(0.0, 0.0, -20.0),
        Vec3::new(400.0, 300.0, 0.0),
    ));
    assert!(validate_limits(&bounded).is_ok());
}

/// Test unset limits are rejected.
#[test]
fn test_default_limits_rejected() {
    let result = validate_limits(&MachineLimits::default());
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidVelocityLimit { axis: 'X', .. }))
    ));
}

/// Test each kinematic limit names the failing axis.
#[test]
fn test_non_positive_axis_limit_rejected() {
    let mut limits = valid_limits();
    limits.acceleration.y = -1.0;
    assert_eq!(
        validate_limits(&limits),
        Err(Error::Config(ConfigError::InvalidAccelerationLimit { axis: 'Y', value: -1.0 }))
    );

    let mut limits = valid_limits();
    limits.jerk.z = 0.0;
    assert_eq!(
        validate_limits(&limits),
        Err(Error::Config(ConfigError::InvalidJerkLimit { axis: 'Z', value: 0.0 }))
    );
}

/// Test non-finite limits are rejected.
#[test]
fn test_non_finite_limit_rejected() {
    let mut limits = valid_limits();
    limits.velocity.z = f64::INFINITY;
    assert!(matches!(
        validate_limits(&limits),
        Err(Error::Config(ConfigError::InvalidVelocityLimit { axis: 'Z', .. }))
    ));

    let mut limits = valid_limits();
    limits.rotation.acceleration = f64::NAN;
    assert!(matches!(
        validate_limits(&limits),
        Err(Error::Config(ConfigError::InvalidRotationLimit(_)))
    ));
}

/// Test inverted or empty position bounds are rejected.
#[test]
fn test_invalid_position_bounds_rejected() {
    let inverted = valid_limits().with_position(PositionBounds::new(
        Vec3::new(0.0, 300.0, -20.0),
        Vec3::new(400.0, 0.0, 0.0),
    ));
    assert_eq!(
        validate_limits(&inverted),
        Err(Error::Config(ConfigError::InvalidPositionBounds { axis: 'Y', min: 300.0, max: 0.0 }))
    );

    let flat = valid_limits().with_position(PositionBounds::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)));
    assert!(validate_limits(&flat).is_err());
}
