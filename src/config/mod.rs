//! Configuration module for pnp-motion.
//!
//! Provides machine limit types and their validation, loaded from TOML files
//! (with `std` feature) or built in code.

mod limits;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use limits::{
    clamp_overlap_fraction, CornerBlendMethod, MachineLimits, PositionBounds, RotationLimits,
    MAX_OVERLAP_FRACTION, MIN_OVERLAP_FRACTION,
};
pub use validation::validate_limits;

#[cfg(feature = "std")]
pub use loader::{load_limits, parse_limits};
