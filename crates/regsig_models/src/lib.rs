//! # regsig_models: Statistical Profiles (Layer 2)
//!
//! ## Layer 2 Role
//!
//! regsig_models encodes the historical dispatch record compactly, per
//! [`TimeBin`](regsig_core::types::TimeBin):
//! - [`profile`]: Level distribution and step dynamics for one bin
//! - [`store`]: The immutable, completely covered `TimeBin -> Profile` map
//! - [`calibration`]: Building a store from a reference series
//! - [`error`]: Calibration and profile errors
//!
//! ## Dynamics Models
//!
//! Two step-dynamics encodings are supported, selected by
//! [`DynamicsModel`](calibration::DynamicsModel):
//!
//! - **Ramp increment** (default): a mean-reverting increment whose pull and
//!   innovation spread are fitted per bin, so that the stationary level
//!   distribution matches the bin's mean and spread.
//! - **Markov**: a transition-frequency table over equal-width discretised
//!   levels spanning the amplitude bounds.
//!
//! ## Usage Example
//!
//! ```rust
//! use chrono::{Duration, NaiveDate};
//! use regsig_core::types::ReferenceSeries;
//! use regsig_models::calibration::{CalibrationConfig, ProfileCalibrator};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let values = (0..21_600).map(|i| 0.3 * ((i as f64) / 50.0).sin());
//! let series = ReferenceSeries::from_values(start, Duration::seconds(4), values).unwrap();
//!
//! let config = CalibrationConfig::builder()
//!     .bin_width_secs(3600)
//!     .min_observations_per_bin(100)
//!     .build()
//!     .unwrap();
//! let store = ProfileCalibrator::new(config).calibrate(&series).unwrap();
//! assert_eq!(store.len(), 24);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod calibration;
pub mod error;
pub mod profile;
pub mod store;

pub use calibration::{CalibrationConfig, DynamicsModel, ProfileCalibrator};
pub use error::{CalibrationError, ProfileError};
pub use profile::{DrawKind, Dynamics, LevelStats, Profile, RampIncrement, TransitionTable};
pub use store::ProfileStore;
