//! Numerical helpers.
//!
//! - [`stats`]: Single-pass mean, variance and extrema accumulation

pub mod stats;

pub use stats::RunningStats;
