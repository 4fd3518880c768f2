//! Unit tests for TOML limit parsing.

use pnp_motion::config::{load_limits, parse_limits, CornerBlendMethod, MachineLimits};
use pnp_motion::error::{ConfigError, Error};
use pnp_motion::Vec3;

const AXES: &str = r#"
velocity = { x = 500.0, y = 400.0, z = 100.0 }
acceleration = { x = 5000.0, y = 4000.0, z = 1000.0 }
jerk = { x = 50000.0, y = 40000.0, z = 10000.0 }
"#;

const ROTATION: &str = r#"
[rotation]
velocity = 720.0
acceleration = 7200.0
jerk = 72000.0
"#;

/// Test parsing per-axis limits and rotation limits from TOML.
#[test]
fn test_parse_axis_limits() {
    let toml_str = format!("{}{}", AXES, ROTATION);
    let limits: MachineLimits = toml::from_str(&toml_str).expect("Failed to parse TOML");

    assert_eq!(limits.velocity, Vec3::new(500.0, 400.0, 100.0));
    assert_eq!(limits.acceleration.y, 4000.0);
    assert_eq!(limits.jerk.z, 10000.0);
    assert_eq!(limits.rotation.velocity, 720.0);
    assert_eq!(limits.rotation.jerk, 72000.0);
}

/// Test defaults for optional settings.
#[test]
fn test_parse_defaults() {
    let limits = parse_limits(&format!("{}{}", AXES, ROTATION)).expect("Failed to parse limits");

    assert!(limits.position.is_none());
    assert_eq!(limits.corner_blend, CornerBlendMethod::None);
    assert_eq!(limits.max_overlap_fraction(), 1.0);
}

/// Test parsing position bounds and blend settings.
#[test]
fn test_parse_bounds_and_blending() {
    let toml_str = format!(
        r#"
corner_blend = "discrete_segments"
max_overlap_fraction = 0.4
{}
[position]
min = {{ x = 0.0, y = 0.0, z = -20.0 }}
max = {{ x = 400.0, y = 300.0, z = 0.0 }}
{}"#,
        AXES, ROTATION
    );

    let limits = parse_limits(&toml_str).expect("Failed to parse limits");
    let bounds = limits.position.expect("bounds missing");

    assert_eq!(limits.corner_blend, CornerBlendMethod::DiscreteSegments);
    assert_eq!(limits.max_overlap_fraction(), 0.4);
    assert_eq!(bounds.min.z, -20.0);
    assert_eq!(bounds.max.x, 400.0);
    assert!(limits.allows(Vec3::new(200.0, 150.0, -10.0)));
    assert!(!limits.allows(Vec3::new(200.0, 150.0, 5.0)));
}

/// Test every corner blend method name.
#[test]
fn test_parse_corner_blend_methods() {
    for (name, method) in [
        ("none", CornerBlendMethod::None),
        ("interpolated_moves", CornerBlendMethod::InterpolatedMoves),
        ("discrete_segments", CornerBlendMethod::DiscreteSegments),
    ] {
        let toml_str = format!("corner_blend = \"{}\"\n{}{}", name, AXES, ROTATION);
        let limits = parse_limits(&toml_str).expect("Failed to parse limits");
        assert_eq!(limits.corner_blend, method);
    }
}

/// Test overlap fractions outside the allowed range are clamped on load.
#[test]
fn test_parse_clamps_overlap_fraction() {
    for (raw, clamped) in [(1.5, 1.0), (0.0, 0.01), (-3.0, 0.01), (0.5, 0.5)] {
        let toml_str = format!("max_overlap_fraction = {:?}\n{}{}", raw, AXES, ROTATION);
        let limits = parse_limits(&toml_str).expect("Failed to parse limits");
        assert_eq!(limits.max_overlap_fraction(), clamped, "raw {}", raw);
    }
}

/// Test malformed TOML is reported as a parse error.
#[test]
fn test_parse_malformed_toml() {
    let result = parse_limits("velocity = { x = 500.0, y = ");
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));

    let result = parse_limits(&format!("corner_blend = \"smooth\"\n{}{}", AXES, ROTATION));
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Test loading from a file and a missing file.
#[test]
fn test_load_limits_from_file() {
    let path = std::env::temp_dir().join(format!("pnp-motion-limits-{}.toml", std::process::id()));
    std::fs::write(&path, format!("{}{}", AXES, ROTATION)).expect("Failed to write temp file");

    let limits = load_limits(&path).expect("Failed to load limits");
    assert_eq!(limits.velocity.x, 500.0);
    std::fs::remove_file(&path).ok();

    let result = load_limits(&path);
    assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
}
