//! Calibration configuration.

use crate::error::CalibrationError;
use chrono::Duration;
use regsig_core::types::{AmplitudeBounds, BinningScheme, Seasonality};

/// Default number of discretised levels for the Markov model.
pub const DEFAULT_MARKOV_LEVELS: usize = 41;

/// Upper limit on discretised levels.
pub const MAX_MARKOV_LEVELS: usize = 1024;

/// Step-dynamics encoding fitted per bin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "model", rename_all = "snake_case"))]
pub enum DynamicsModel {
    /// Transition frequencies over equal-width level cells.
    Markov {
        /// Number of level cells spanning the amplitude bounds.
        #[cfg_attr(feature = "serde", serde(default = "default_markov_levels"))]
        levels: usize,
    },
    /// Mean-reverting continuous increment.
    #[default]
    RampIncrement,
}

impl DynamicsModel {
    /// Markov model with [`DEFAULT_MARKOV_LEVELS`] cells.
    #[inline]
    pub fn markov() -> Self {
        Self::Markov {
            levels: DEFAULT_MARKOV_LEVELS,
        }
    }
}

#[cfg(feature = "serde")]
fn default_markov_levels() -> usize {
    DEFAULT_MARKOV_LEVELS
}

/// Calibration configuration.
///
/// Immutable once built; use [`CalibrationConfig::builder`].
///
/// # Examples
///
/// ```rust
/// use chrono::Duration;
/// use regsig_models::calibration::{CalibrationConfig, DynamicsModel};
///
/// let config = CalibrationConfig::builder()
///     .bin_width_secs(1800)
///     .sampling_interval(Duration::seconds(2))
///     .dynamics(DynamicsModel::Markov { levels: 21 })
///     .min_observations_per_bin(50)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.binning().bin_count(), 48);
/// assert_eq!(config.min_observations_per_bin(), 50);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CalibrationConfig {
    binning: BinningScheme,
    sampling_interval: Duration,
    min_observations_per_bin: usize,
    dynamics: DynamicsModel,
    amplitude_bounds: AmplitudeBounds,
    max_ramp_rate: Option<f64>,
}

impl CalibrationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> CalibrationConfigBuilder {
        CalibrationConfigBuilder::default()
    }

    /// Time binning.
    #[inline]
    pub fn binning(&self) -> &BinningScheme {
        &self.binning
    }

    /// Spacing of the reference records.
    #[inline]
    pub fn sampling_interval(&self) -> Duration {
        self.sampling_interval
    }

    /// Minimum observations required in every bin.
    #[inline]
    pub fn min_observations_per_bin(&self) -> usize {
        self.min_observations_per_bin
    }

    /// Dynamics encoding.
    #[inline]
    pub fn dynamics(&self) -> DynamicsModel {
        self.dynamics
    }

    /// Valid amplitude range of the reference values.
    #[inline]
    pub fn amplitude_bounds(&self) -> AmplitudeBounds {
        self.amplitude_bounds
    }

    /// Configured per-step ramp bound; `None` uses the observed maximum.
    #[inline]
    pub fn max_ramp_rate(&self) -> Option<f64> {
        self.max_ramp_rate
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::InvalidParameter` if:
    /// - `sampling_interval` is not positive
    /// - `min_observations_per_bin` is 0
    /// - Markov `levels` is outside [2, 1024]
    /// - `max_ramp_rate` is set but not finite and positive
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.sampling_interval <= Duration::zero() {
            return Err(CalibrationError::InvalidParameter {
                name: "sampling_interval",
                reason: format!("{:?} must be positive", self.sampling_interval),
            });
        }
        if self.min_observations_per_bin == 0 {
            return Err(CalibrationError::InvalidParameter {
                name: "min_observations_per_bin",
                reason: "must be at least 1".to_string(),
            });
        }
        if let DynamicsModel::Markov { levels } = self.dynamics {
            if !(2..=MAX_MARKOV_LEVELS).contains(&levels) {
                return Err(CalibrationError::InvalidParameter {
                    name: "levels",
                    reason: format!("{} outside [2, {}]", levels, MAX_MARKOV_LEVELS),
                });
            }
        }
        if let Some(rate) = self.max_ramp_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(CalibrationError::InvalidParameter {
                    name: "max_ramp_rate",
                    reason: format!("{} must be finite and positive", rate),
                });
            }
        }
        Ok(())
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            binning: BinningScheme::hourly(),
            sampling_interval: Duration::seconds(4),
            min_observations_per_bin: 1,
            dynamics: DynamicsModel::default(),
            amplitude_bounds: AmplitudeBounds::symmetric(),
            max_ramp_rate: None,
        }
    }
}

/// Builder for [`CalibrationConfig`].
#[derive(Clone, Debug)]
pub struct CalibrationConfigBuilder {
    bin_width_secs: u32,
    seasonality: Seasonality,
    sampling_interval: Duration,
    min_observations_per_bin: usize,
    dynamics: DynamicsModel,
    amplitude_bounds: AmplitudeBounds,
    max_ramp_rate: Option<f64>,
}

impl Default for CalibrationConfigBuilder {
    fn default() -> Self {
        let defaults = CalibrationConfig::default();
        Self {
            bin_width_secs: defaults.binning.bin_width_secs(),
            seasonality: defaults.binning.seasonality(),
            sampling_interval: defaults.sampling_interval,
            min_observations_per_bin: defaults.min_observations_per_bin,
            dynamics: defaults.dynamics,
            amplitude_bounds: defaults.amplitude_bounds,
            max_ramp_rate: defaults.max_ramp_rate,
        }
    }
}

impl CalibrationConfigBuilder {
    /// Sets the slot width in seconds (default 3600).
    #[inline]
    pub fn bin_width_secs(mut self, secs: u32) -> Self {
        self.bin_width_secs = secs;
        self
    }

    /// Sets the period-of-year partition (default none).
    #[inline]
    pub fn seasonality(mut self, seasonality: Seasonality) -> Self {
        self.seasonality = seasonality;
        self
    }

    /// Sets the reference sampling interval (default 4 s).
    #[inline]
    pub fn sampling_interval(mut self, interval: Duration) -> Self {
        self.sampling_interval = interval;
        self
    }

    /// Sets the per-bin sufficiency threshold (default 1).
    #[inline]
    pub fn min_observations_per_bin(mut self, n: usize) -> Self {
        self.min_observations_per_bin = n;
        self
    }

    /// Sets the dynamics encoding (default ramp increment).
    #[inline]
    pub fn dynamics(mut self, dynamics: DynamicsModel) -> Self {
        self.dynamics = dynamics;
        self
    }

    /// Sets the valid amplitude range (default `[-1, 1]`).
    #[inline]
    pub fn amplitude_bounds(mut self, bounds: AmplitudeBounds) -> Self {
        self.amplitude_bounds = bounds;
        self
    }

    /// Sets a fixed ramp bound for every bin.
    #[inline]
    pub fn max_ramp_rate(mut self, rate: f64) -> Self {
        self.max_ramp_rate = Some(rate);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - `CalibrationError::Binning` for an invalid bin width
    /// - `CalibrationError::InvalidParameter` per [`CalibrationConfig::validate`]
    pub fn build(self) -> Result<CalibrationConfig, CalibrationError> {
        let binning = BinningScheme::new(self.bin_width_secs, self.seasonality)?;
        let config = CalibrationConfig {
            binning,
            sampling_interval: self.sampling_interval,
            min_observations_per_bin: self.min_observations_per_bin,
            dynamics: self.dynamics,
            amplitude_bounds: self.amplitude_bounds,
            max_ramp_rate: self.max_ramp_rate,
        };
        config.validate()?;
        Ok(config)
    }
}
