//! Calibration and profile error types.

use regsig_core::types::{BinningError, BoundsError, SeriesError, TimeBin};
use thiserror::Error;

/// Profile and profile-store errors.
///
/// # Examples
/// ```
/// use regsig_core::types::TimeBin;
/// use regsig_models::ProfileError;
///
/// let err = ProfileError::Incomplete { bin: TimeBin::new(0, 5) };
/// assert_eq!(format!("{}", err), "Profile store has no entry for season 0 slot 5");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// A bin required by the scheme has no profile.
    #[error("Profile store has no entry for {bin}")]
    Incomplete {
        /// The uncovered bin
        bin: TimeBin,
    },

    /// A profile was supplied for a bin outside the scheme.
    #[error("{bin} is not part of the binning scheme")]
    UnknownBin {
        /// The foreign bin
        bin: TimeBin,
    },

    /// Profile parameters are not usable for sampling.
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
}

/// Calibration failures.
///
/// Calibration either produces a complete [`ProfileStore`](crate::ProfileStore)
/// or fails outright; no bin is ever defaulted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// A bin holds fewer observations than the configured minimum.
    #[error("Insufficient observations in {bin}: got {got}, need at least {need}")]
    InsufficientObservations {
        /// The under-populated bin
        bin: TimeBin,
        /// Observations found
        got: usize,
        /// Configured minimum
        need: usize,
    },

    /// A bin holds fewer step pairs one sampling interval apart than the
    /// configured minimum, so its dynamics cannot be fitted.
    #[error("Insufficient transitions in {bin}: got {got} step pairs, need at least {need}")]
    InsufficientTransitions {
        /// The under-sampled bin
        bin: TimeBin,
        /// Step pairs found
        got: usize,
        /// Configured minimum
        need: usize,
    },

    /// The reference series has no records.
    #[error("Reference series is empty")]
    EmptySeries,

    /// A reference value lies outside the amplitude bounds.
    #[error("Reference value {value} at index {index} outside amplitude bounds [{lower}, {upper}]")]
    SampleOutOfBounds {
        /// Index of the offending record
        index: usize,
        /// The offending value
        value: f64,
        /// Lower amplitude bound
        lower: f64,
        /// Upper amplitude bound
        upper: f64,
    },

    /// Invalid configuration value.
    #[error("Invalid calibration parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the problem
        reason: String,
    },

    /// Invalid bin width.
    #[error(transparent)]
    Binning(#[from] BinningError),

    /// Invalid amplitude bounds.
    #[error(transparent)]
    Bounds(#[from] BoundsError),

    /// Invalid reference series.
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// Fitted profile rejected.
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_display_names_bin() {
        let err = CalibrationError::InsufficientObservations {
            bin: TimeBin::new(2, 17),
            got: 3,
            need: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("season 2 slot 17"));
        assert!(msg.contains("got 3"));
        assert!(msg.contains("need at least 10"));
    }

    #[test]
    fn test_insufficient_transitions_display() {
        let err = CalibrationError::InsufficientTransitions {
            bin: TimeBin::new(0, 5),
            got: 0,
            need: 100,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient transitions in season 0 slot 5: got 0 step pairs, need at least 100"
        );
    }

    #[test]
    fn test_transparent_wrapping() {
        let err: CalibrationError = BinningError::InvalidBinWidth(0).into();
        assert_eq!(err.to_string(), BinningError::InvalidBinWidth(0).to_string());
    }
}
