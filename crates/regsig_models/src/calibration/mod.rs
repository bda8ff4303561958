//! Profile calibration from historical dispatch records.
//!
//! - [`CalibrationConfig`] and its builder
//! - [`ProfileCalibrator`], the offline fitting pass
//!
//! # Algorithm
//!
//! 1. Assign every reference sample to its time bin
//! 2. Accumulate the level distribution per bin
//! 3. Accumulate step dynamics from consecutive samples spaced exactly one
//!    sampling interval apart; the pair belongs to the bin of its first sample
//! 4. Reject the calibration if any bin holds fewer than the configured
//!    minimum number of observations or of step pairs

mod calibrator;
mod config;

pub use calibrator::ProfileCalibrator;
pub use config::{
    CalibrationConfig, CalibrationConfigBuilder, DynamicsModel, DEFAULT_MARKOV_LEVELS,
    MAX_MARKOV_LEVELS,
};
