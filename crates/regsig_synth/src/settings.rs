//! TOML settings for calibration and synthesis.
//!
//! A settings file has two optional tables; omitted keys take the builder
//! defaults.
//!
//! ```toml
//! [calibration]
//! bin_width_secs = 3600
//! seasonality = "monthly"
//! sampling_interval_secs = 4
//! min_observations_per_bin = 100
//! dynamics = { model = "markov", levels = 41 }
//!
//! [synthesis]
//! horizon = 21600
//! start_time = "2024-07-01T00:00:00"
//! seed = 42
//! direction = "up_only"
//! max_ramp_rate = 0.05
//! ```
//!
//! `amplitude_bounds = [lower, upper]` overrides `direction` in either table.
//! A Markov model without `levels` uses
//! [`DEFAULT_MARKOV_LEVELS`](regsig_models::calibration::DEFAULT_MARKOV_LEVELS).

use crate::config::{SynthesisConfig, DEFAULT_TIMESTEP_SECS};
use crate::error::{ConfigError, SettingsError};
use chrono::{Duration, NaiveDateTime};
use regsig_core::types::{AmplitudeBounds, BoundsError, RegulationDirection, Seasonality};
use regsig_models::calibration::{CalibrationConfig, DynamicsModel};
use regsig_models::CalibrationError;
use serde::Deserialize;
use std::path::Path;

/// `[calibration]` table.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalibrationSettings {
    /// Bin width in seconds.
    pub bin_width_secs: Option<u32>,
    /// Seasonal split of bins.
    pub seasonality: Option<Seasonality>,
    /// Reference sampling interval in seconds.
    pub sampling_interval_secs: Option<i64>,
    /// Minimum observations required per bin.
    pub min_observations_per_bin: Option<usize>,
    /// Dynamics model.
    pub dynamics: Option<DynamicsModel>,
    /// Regulation direction.
    pub direction: Option<RegulationDirection>,
    /// Explicit `[lower, upper]` bounds.
    pub amplitude_bounds: Option<[f64; 2]>,
    /// Configured ramp bound per sampling interval.
    pub max_ramp_rate: Option<f64>,
}

/// `[synthesis]` table.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthesisSettings {
    /// Timestep in seconds.
    pub timestep_secs: Option<i64>,
    /// Steps after the initial sample; omitted for unbounded runs.
    pub horizon: Option<usize>,
    /// Start time, e.g. `"2024-07-01T00:00:00"`.
    pub start_time: Option<NaiveDateTime>,
    /// Random seed.
    pub seed: Option<u64>,
    /// Regulation direction.
    pub direction: Option<RegulationDirection>,
    /// Explicit `[lower, upper]` bounds.
    pub amplitude_bounds: Option<[f64; 2]>,
    /// Global ramp bound per timestep.
    pub max_ramp_rate: Option<f64>,
    /// Explicit initial level.
    pub initial_level: Option<f64>,
}

/// Complete settings file.
///
/// # Examples
///
/// ```rust
/// use regsig_synth::SignalSettings;
///
/// let settings = SignalSettings::from_toml_str(
///     r#"
///     [synthesis]
///     horizon = 100
///     seed = 42
///     "#,
/// )
/// .unwrap();
///
/// let config = settings.synthesis_config().unwrap();
/// assert_eq!(config.horizon(), Some(100));
/// assert_eq!(config.seed(), 42);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalSettings {
    /// Calibration settings.
    pub calibration: CalibrationSettings,
    /// Synthesis settings.
    pub synthesis: SynthesisSettings,
}

impl SignalSettings {
    /// Parses settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Parse` for malformed TOML or unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a TOML settings file.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Io` if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Builds a validated calibration configuration.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError` for out-of-range values.
    pub fn calibration_config(&self) -> Result<CalibrationConfig, CalibrationError> {
        let table = &self.calibration;
        let mut builder = CalibrationConfig::builder();
        if let Some(width) = table.bin_width_secs {
            builder = builder.bin_width_secs(width);
        }
        if let Some(seasonality) = table.seasonality {
            builder = builder.seasonality(seasonality);
        }
        if let Some(secs) = table.sampling_interval_secs {
            builder = builder.sampling_interval(seconds(secs).ok_or_else(|| {
                CalibrationError::InvalidParameter {
                    name: "sampling_interval_secs",
                    reason: format!("{} s is out of range", secs),
                }
            })?);
        }
        if let Some(n) = table.min_observations_per_bin {
            builder = builder.min_observations_per_bin(n);
        }
        if let Some(dynamics) = table.dynamics {
            builder = builder.dynamics(dynamics);
        }
        if let Some(bounds) = amplitude_bounds(table.amplitude_bounds, table.direction)? {
            builder = builder.amplitude_bounds(bounds);
        }
        if let Some(rate) = table.max_ramp_rate {
            builder = builder.max_ramp_rate(rate);
        }
        builder.build()
    }

    /// Builds a validated synthesis configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for out-of-range values.
    pub fn synthesis_config(&self) -> Result<SynthesisConfig, ConfigError> {
        let table = &self.synthesis;
        let secs = table.timestep_secs.unwrap_or(DEFAULT_TIMESTEP_SECS);
        let timestep = seconds(secs).ok_or_else(|| ConfigError::InvalidParameter {
            name: "timestep_secs",
            value: format!("{} s is out of range", secs),
        })?;
        let mut builder = SynthesisConfig::builder().timestep(timestep);
        if let Some(horizon) = table.horizon {
            builder = builder.horizon(horizon);
        }
        if let Some(start) = table.start_time {
            builder = builder.start_time(start);
        }
        if let Some(seed) = table.seed {
            builder = builder.seed(seed);
        }
        if let Some(bounds) = amplitude_bounds(table.amplitude_bounds, table.direction)? {
            builder = builder.amplitude_bounds(bounds);
        }
        if let Some(rate) = table.max_ramp_rate {
            builder = builder.max_ramp_rate(rate);
        }
        if let Some(level) = table.initial_level {
            builder = builder.initial_level(level);
        }
        builder.build()
    }
}

fn seconds(secs: i64) -> Option<Duration> {
    Duration::try_seconds(secs)
}

fn amplitude_bounds(
    explicit: Option<[f64; 2]>,
    direction: Option<RegulationDirection>,
) -> Result<Option<AmplitudeBounds>, BoundsError> {
    match (explicit, direction) {
        (Some([lower, upper]), _) => Ok(Some(AmplitudeBounds::new(lower, upper)?)),
        (None, Some(direction)) => Ok(Some(direction.bounds())),
        (None, None) => Ok(None),
    }
}
