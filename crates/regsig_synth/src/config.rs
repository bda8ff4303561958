//! Synthesis run configuration.
//!
//! [`SynthesisConfig`] carries everything a single run needs besides the
//! profile store: timestep, horizon, start time, seed and bounds. The same
//! configuration drives batch and step synthesis.

use crate::error::ConfigError;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use regsig_core::types::{AmplitudeBounds, RegulationDirection};
use regsig_models::ProfileStore;

/// Maximum number of steps in a bounded run.
///
/// About 460 days at a 4 s timestep.
pub const MAX_HORIZON: usize = 10_000_000;

/// Default timestep in seconds.
pub const DEFAULT_TIMESTEP_SECS: i64 = 4;

fn default_start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Signal synthesis configuration.
///
/// Immutable once built; use [`SynthesisConfigBuilder`] to construct.
///
/// # Examples
///
/// ```rust
/// use chrono::Duration;
/// use regsig_synth::SynthesisConfig;
///
/// let config = SynthesisConfig::builder()
///     .horizon(900)
///     .seed(42)
///     .max_ramp_rate(0.05)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.timestep(), Duration::seconds(4));
/// assert_eq!(config.horizon(), Some(900));
/// assert_eq!(config.max_ramp_rate(), Some(0.05));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SynthesisConfig {
    timestep: Duration,
    horizon: Option<usize>,
    start_time: NaiveDateTime,
    seed: u64,
    amplitude_bounds: AmplitudeBounds,
    max_ramp_rate: Option<f64>,
    initial_level: Option<f64>,
}

impl SynthesisConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SynthesisConfigBuilder {
        SynthesisConfigBuilder::default()
    }

    /// Simulated time between consecutive samples.
    #[inline]
    pub fn timestep(&self) -> Duration {
        self.timestep
    }

    /// Number of steps after the initial sample, `None` for an unbounded run.
    #[inline]
    pub fn horizon(&self) -> Option<usize> {
        self.horizon
    }

    /// Timestamp of the initial sample.
    #[inline]
    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    /// Seed of the run's random stream.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Bounds every generated level is clamped to.
    #[inline]
    pub fn amplitude_bounds(&self) -> AmplitudeBounds {
        self.amplitude_bounds
    }

    /// Global ramp bound overriding each bin's own bound.
    #[inline]
    pub fn max_ramp_rate(&self) -> Option<f64> {
        self.max_ramp_rate
    }

    /// Explicit initial level; when set the initial draw is skipped.
    #[inline]
    pub fn initial_level(&self) -> Option<f64> {
        self.initial_level
    }

    /// Copy of this configuration with a different seed.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    /// Validates the configuration on its own.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - the timestep is not positive
    /// - the horizon exceeds [`MAX_HORIZON`]
    /// - the ramp bound is not finite and positive
    /// - the initial level is non-finite or outside the amplitude bounds
    /// - the last timestamp of a bounded run is not representable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timestep <= Duration::zero() {
            return Err(ConfigError::NonPositiveTimestep(self.timestep));
        }
        if let Some(rate) = self.max_ramp_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConfigError::InvalidRampRate(rate));
            }
        }
        if let Some(level) = self.initial_level {
            if !level.is_finite() || !self.amplitude_bounds.contains(level) {
                return Err(ConfigError::InvalidInitialLevel {
                    level,
                    lower: self.amplitude_bounds.lower(),
                    upper: self.amplitude_bounds.upper(),
                });
            }
        }
        if let Some(horizon) = self.horizon {
            if horizon > MAX_HORIZON {
                return Err(ConfigError::HorizonTooLong {
                    horizon,
                    max: MAX_HORIZON,
                });
            }
            let end = i32::try_from(horizon)
                .ok()
                .and_then(|steps| self.timestep.checked_mul(steps))
                .and_then(|span| self.start_time.checked_add_signed(span));
            if end.is_none() {
                return Err(ConfigError::StartTimeOutOfRange {
                    start: self.start_time,
                    steps: horizon,
                });
            }
        }
        Ok(())
    }

    /// Checks that this configuration can run against `store`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TimestepMismatch`] when the timestep differs
    /// from the interval the profiles were calibrated at.
    pub fn check_store(&self, store: &ProfileStore) -> Result<(), ConfigError> {
        let expected = store.sampling_interval();
        if self.timestep != expected {
            return Err(ConfigError::TimestepMismatch {
                expected,
                got: self.timestep,
            });
        }
        Ok(())
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            timestep: Duration::seconds(DEFAULT_TIMESTEP_SECS),
            horizon: None,
            start_time: default_start_time(),
            seed: 0,
            amplitude_bounds: AmplitudeBounds::default(),
            max_ramp_rate: None,
            initial_level: None,
        }
    }
}

/// Builder for [`SynthesisConfig`].
///
/// Unset fields take the [`SynthesisConfig::default`] values; validation
/// happens in [`build`](Self::build).
#[derive(Clone, Debug, Default)]
pub struct SynthesisConfigBuilder {
    config: SynthesisConfig,
}

impl SynthesisConfigBuilder {
    /// Sets the timestep.
    #[inline]
    pub fn timestep(mut self, timestep: Duration) -> Self {
        self.config.timestep = timestep;
        self
    }

    /// Sets a finite horizon in steps.
    #[inline]
    pub fn horizon(mut self, horizon: usize) -> Self {
        self.config.horizon = Some(horizon);
        self
    }

    /// Removes the horizon; a step generator then runs until dropped.
    #[inline]
    pub fn unbounded(mut self) -> Self {
        self.config.horizon = None;
        self
    }

    /// Sets the start time.
    #[inline]
    pub fn start_time(mut self, start_time: NaiveDateTime) -> Self {
        self.config.start_time = start_time;
        self
    }

    /// Sets the seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Sets the amplitude bounds.
    #[inline]
    pub fn amplitude_bounds(mut self, bounds: AmplitudeBounds) -> Self {
        self.config.amplitude_bounds = bounds;
        self
    }

    /// Sets the amplitude bounds from a regulation direction.
    #[inline]
    pub fn direction(mut self, direction: RegulationDirection) -> Self {
        self.config.amplitude_bounds = direction.bounds();
        self
    }

    /// Sets a global ramp bound per timestep.
    #[inline]
    pub fn max_ramp_rate(mut self, rate: f64) -> Self {
        self.config.max_ramp_rate = Some(rate);
        self
    }

    /// Sets an explicit initial level.
    #[inline]
    pub fn initial_level(mut self, level: f64) -> Self {
        self.config.initial_level = Some(level);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// See [`SynthesisConfig::validate`].
    pub fn build(self) -> Result<SynthesisConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
