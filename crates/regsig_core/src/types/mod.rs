//! Core time, sample and bound types.
//!
//! This module provides:
//! - `time`: Time-of-period binning (`TimeBin`, `BinningScheme`, `Seasonality`)
//! - `series`: Typed `(timestamp, value)` samples and validated reference series
//! - `bounds`: Amplitude clamp range and regulation direction
//! - `error`: Structured error types for binning, bounds and series validation
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level.

pub mod bounds;
pub mod error;
pub mod series;
pub mod time;

pub use bounds::{AmplitudeBounds, RegulationDirection};
pub use error::{BinningError, BoundsError, SeriesError};
pub use series::{ReferenceSeries, Sample};
pub use time::{BinningScheme, Seasonality, TimeBin, SECONDS_PER_DAY};
