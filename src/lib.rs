//! # pnp-motion
//!
//! Jerk-limited trajectory planning and playback for pick-and-place machines.
//!
//! ## Features
//!
//! - **S-curve profiles**: Up to seven constant-jerk phases per move, closed-form evaluation
//! - **Corner blending**: Replace corner stops with smooth transition patches
//! - **Delayable events**: Digital/PWM outputs and rotations timed against the motion
//! - **Sync barriers**: Hold the timeline until selected events have completed
//! - **Incremental playback**: Poll position, velocity and outputs from a control loop
//! - **no_std compatible**: Core library works without standard library (requires `alloc`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pnp_motion::{BlendType, MoveBuilder, Planner, Vec3};
//!
//! // Load machine limits from TOML
//! let limits = pnp_motion::load_limits("machine.toml")?;
//!
//! let mut planner = Planner::with_limits(limits);
//! planner.add(MoveBuilder::to(Vec3::new(100.0, 0.0, 0.0)).velocity(200.0))?;
//! let vacuum = planner.add_digital_output(0b1, 0b1, 0.0)?;
//! planner.add_sync(&[vacuum])?;
//! planner.add(MoveBuilder::to(Vec3::new(100.0, 50.0, 0.0)).blend(BlendType::MinJerk, 0.0))?;
//! planner.calculate_moves()?;
//!
//! // Play back from the control loop
//! loop {
//!     let tick = planner.advance(0.001, 1.0)?;
//!     if !tick.running {
//!         break;
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt formatting of public enums for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

extern crate alloc;

// Core modules
pub mod config;
pub mod error;
pub mod io;
pub mod motion;
pub mod planner;

// Re-exports for ergonomic API
pub use config::{
    validate_limits, CornerBlendMethod, MachineLimits, PositionBounds, RotationLimits,
};
pub use error::{Error, Result};
pub use io::OutputBank;
pub use motion::{
    BlendType, Move, MoveType, Rotation, RotateSegment, SCurveProfile, Segment, Vec3,
};
pub use planner::{EventId, MoveBuilder, Planner, Tick};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_limits, parse_limits};
