//! Error types for pnp-motion.
//!
//! Provides unified error handling across limit configuration, trajectory planning and outputs.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all pnp-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Planning or traversal error
    Plan(PlanError),
    /// Output pin error
    Output(OutputError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid velocity limit (must be > 0)
    InvalidVelocityLimit {
        /// Axis name
        axis: char,
        /// Configured value
        value: f64,
    },
    /// Invalid acceleration limit (must be > 0)
    InvalidAccelerationLimit {
        /// Axis name
        axis: char,
        /// Configured value
        value: f64,
    },
    /// Invalid jerk limit (must be > 0)
    InvalidJerkLimit {
        /// Axis name
        axis: char,
        /// Configured value
        value: f64,
    },
    /// Invalid rotation velocity, acceleration or jerk limit (must be > 0)
    InvalidRotationLimit(f64),
    /// Invalid position bounds (min must be < max on every axis)
    InvalidPositionBounds {
        /// Axis name
        axis: char,
        /// Minimum bound
        min: f64,
        /// Maximum bound
        max: f64,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Planning and traversal errors.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Velocity, acceleration or jerk is zero, negative or NaN
    ZeroParameter,
    /// Source and destination coincide
    ZeroLength,
    /// Position or angle is NaN or infinite
    NonFiniteTarget,
    /// Destination lies outside the configured position bounds
    OutOfBounds,
    /// Rotation axis index out of range
    InvalidAxis(usize),
    /// Event delay or wait duration is not a finite value
    InvalidDelay,
    /// Sync barrier references an event that does not exist yet
    UnknownEvent(u32),
    /// A queued move has invalid parameters (fatal at finalize)
    InvalidMoveParameters {
        /// Index of the offending move
        index: usize,
    },
    /// Entries cannot be appended after the plan is finalized
    AlreadyCalculated,
    /// Traversal requested before the plan was finalized
    NotCalculated,
    /// Emergency stop requested with no motion to stop
    NothingToStop,
}

/// Output pin errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputError {
    /// Pin operation failed
    PinError {
        /// Output channel of the failing pin
        channel: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Plan(e) => write!(f, "Planning error: {}", e),
            Error::Output(e) => write!(f, "Output error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidVelocityLimit { axis, value } => {
                write!(f, "Invalid {} velocity limit: {}. Must be > 0", axis, value)
            }
            ConfigError::InvalidAccelerationLimit { axis, value } => {
                write!(f, "Invalid {} acceleration limit: {}. Must be > 0", axis, value)
            }
            ConfigError::InvalidJerkLimit { axis, value } => {
                write!(f, "Invalid {} jerk limit: {}. Must be > 0", axis, value)
            }
            ConfigError::InvalidRotationLimit(v) => {
                write!(f, "Invalid rotation limit: {}. Must be > 0", v)
            }
            ConfigError::InvalidPositionBounds { axis, min, max } => {
                write!(f, "Invalid {} position bounds: min ({}) must be < max ({})", axis, min, max)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::ZeroParameter => write!(f, "Velocity, acceleration and jerk must be > 0"),
            PlanError::ZeroLength => write!(f, "Source and destination are identical"),
            PlanError::NonFiniteTarget => write!(f, "Position or angle is not finite"),
            PlanError::OutOfBounds => write!(f, "Destination outside position bounds"),
            PlanError::InvalidAxis(axis) => write!(f, "Invalid rotation axis: {}", axis),
            PlanError::InvalidDelay => write!(f, "Delay must be a finite value"),
            PlanError::UnknownEvent(id) => write!(f, "Unknown event id: {}", id),
            PlanError::InvalidMoveParameters { index } => {
                write!(f, "Move {} has invalid velocity, acceleration or jerk", index)
            }
            PlanError::AlreadyCalculated => write!(f, "Plan is already finalized"),
            PlanError::NotCalculated => write!(f, "Plan has not been finalized"),
            PlanError::NothingToStop => write!(f, "No motion to stop"),
        }
    }
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::PinError { channel } => {
                write!(f, "GPIO pin operation failed on channel {}", channel)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<PlanError> for Error {
    fn from(e: PlanError) -> Self {
        Error::Plan(e)
    }
}

impl From<OutputError> for Error {
    fn from(e: OutputError) -> Self {
        Error::Output(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for PlanError {}

#[cfg(feature = "std")]
impl std::error::Error for OutputError {}
