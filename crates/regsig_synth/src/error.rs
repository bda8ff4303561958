//! Error types for signal synthesis.
//!
//! - [`ConfigError`]: Invalid synthesis parameters
//! - [`UsageError`]: Step generator operations called in the wrong state
//! - [`SynthesisError`]: Umbrella error returned by generation calls
//! - [`SettingsError`]: TOML settings loading failures
//!
//! Clamping to the amplitude or ramp bound is deterministic policy and never
//! produces an error.

use chrono::{Duration, NaiveDateTime};
use regsig_core::types::BoundsError;
use regsig_models::{CalibrationError, ProfileError};
use thiserror::Error;

/// Configuration error for signal synthesis.
///
/// These errors occur during construction or at generation start, before
/// any sample is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Timestep is zero or negative.
    #[error("Invalid timestep {0:?}: must be positive")]
    NonPositiveTimestep(Duration),

    /// Timestep differs from the interval the profiles were fitted at.
    #[error("Timestep {got:?} does not match the profile sampling interval {expected:?}")]
    TimestepMismatch {
        /// Sampling interval of the profile store
        expected: Duration,
        /// Requested timestep
        got: Duration,
    },

    /// Horizon above the supported maximum.
    #[error("Invalid horizon {horizon}: must be at most {max}")]
    HorizonTooLong {
        /// Requested horizon
        horizon: usize,
        /// Supported maximum
        max: usize,
    },

    /// Simulated clock would leave chrono's supported range.
    #[error("Simulated time out of supported range: {start} + {steps} steps")]
    StartTimeOutOfRange {
        /// Start time
        start: NaiveDateTime,
        /// Step count at which the overflow occurs
        steps: usize,
    },

    /// Ramp bound not finite and positive.
    #[error("Invalid ramp rate {0}: must be finite and positive")]
    InvalidRampRate(f64),

    /// Explicit initial level outside the amplitude bounds.
    #[error("Initial level {level} outside amplitude bounds [{lower}, {upper}]")]
    InvalidInitialLevel {
        /// Requested level
        level: f64,
        /// Lower amplitude bound
        lower: f64,
        /// Upper amplitude bound
        upper: f64,
    },

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the invalid value
        value: String,
    },

    /// Invalid amplitude bounds.
    #[error(transparent)]
    Bounds(#[from] BoundsError),
}

/// Step generator sequencing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// `do_step` before `init`.
    #[error("Step generator used before initialisation")]
    NotInitialised,

    /// `init` on a generator that was already initialised.
    #[error("Step generator is already initialised")]
    AlreadyInitialised,

    /// `do_step` after the configured horizon was reached.
    #[error("Step generator exhausted after {steps} steps")]
    Exhausted {
        /// Steps taken before exhaustion
        steps: usize,
    },
}

/// Errors surfaced by batch and step synthesis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthesisError {
    /// Invalid synthesis configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Operation called in the wrong generator state.
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    /// Profile store lacks coverage for a required bin.
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

/// Settings loading errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings file could not be read.
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Settings are not valid TOML for the expected schema.
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// `[calibration]` values rejected.
    #[error("Invalid calibration settings: {0}")]
    Calibration(#[from] CalibrationError),

    /// `[synthesis]` values rejected.
    #[error("Invalid synthesis settings: {0}")]
    Config(#[from] ConfigError),
}
