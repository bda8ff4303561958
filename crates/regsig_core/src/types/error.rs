//! Error types for structured error handling.
//!
//! This module provides:
//! - `BinningError`: Errors from time-bin scheme construction
//! - `BoundsError`: Errors from amplitude bound construction
//! - `SeriesError`: Errors from reference series validation

use thiserror::Error;

/// Time-binning errors.
///
/// # Examples
/// ```
/// use regsig_core::types::BinningError;
///
/// let err = BinningError::InvalidBinWidth(0);
/// assert!(format!("{}", err).contains("Invalid bin width 0s"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BinningError {
    /// Bin width outside the valid range [1, 86400] seconds.
    #[error("Invalid bin width {0}s: must be in range [1, 86400]")]
    InvalidBinWidth(u32),
}

/// Amplitude bound errors.
///
/// # Examples
/// ```
/// use regsig_core::types::BoundsError;
///
/// let err = BoundsError::InvalidBounds { lower: 1.0, upper: -1.0 };
/// assert!(format!("{}", err).contains("[1, -1]"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    /// Lower bound not finite or not strictly below the upper bound.
    #[error("Invalid amplitude bounds [{lower}, {upper}]: both must be finite with lower < upper")]
    InvalidBounds {
        /// Requested lower bound
        lower: f64,
        /// Requested upper bound
        upper: f64,
    },
}

/// Reference series errors.
///
/// Raised while constructing a [`ReferenceSeries`](super::ReferenceSeries)
/// from raw records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// Timestamps must be strictly increasing.
    #[error("Timestamps not strictly increasing at index {index}")]
    Unordered {
        /// Index of the first offending record
        index: usize,
    },

    /// Values must be finite.
    #[error("Non-finite value {value} at index {index}")]
    NonFinite {
        /// Index of the offending record
        index: usize,
        /// The offending value
        value: f64,
    },

    /// Sampling interval must be strictly positive.
    #[error("Invalid sampling interval {0:?}: must be positive")]
    InvalidInterval(chrono::Duration),

    /// Timestamp arithmetic left chrono's supported range.
    #[error("Timestamp out of supported range at index {index}")]
    TimestampOverflow {
        /// Index of the record whose timestamp overflowed
        index: usize,
    },

    /// Peak normalisation requested on an all-zero series.
    #[error("Cannot normalise a series whose peak magnitude is zero")]
    ZeroPeak,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SeriesError::Unordered { index: 7 };
        assert_eq!(err.to_string(), "Timestamps not strictly increasing at index 7");

        let err = SeriesError::NonFinite {
            index: 2,
            value: f64::NAN,
        };
        assert!(err.to_string().contains("index 2"));

        assert!(SeriesError::ZeroPeak.to_string().contains("zero"));
    }
}
