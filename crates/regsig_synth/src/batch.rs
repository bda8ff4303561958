//! Full-horizon batch synthesis.

use crate::config::SynthesisConfig;
use crate::error::{ConfigError, SynthesisError};
use crate::kernel::SignalState;
use crate::series::GeneratedSeries;
use chrono::{Duration, NaiveDateTime};
use regsig_models::ProfileStore;
use tracing::{debug, info};

/// Generates a complete signal for a finite horizon in one call.
///
/// # Examples
///
/// ```rust
/// use chrono::{Duration, NaiveDate};
/// use regsig_core::types::ReferenceSeries;
/// use regsig_models::ProfileCalibrator;
/// use regsig_synth::{BatchSynthesizer, SynthesisConfig};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let values = (0..21_600).map(|i| 0.5 * ((i as f64) / 60.0).sin());
/// let reference = ReferenceSeries::from_values(start, Duration::seconds(4), values).unwrap();
/// let store = ProfileCalibrator::with_defaults().calibrate(&reference).unwrap();
///
/// let config = SynthesisConfig::builder()
///     .horizon(0)
///     .start_time(start)
///     .build()
///     .unwrap();
/// let series = BatchSynthesizer::new(&store).generate(&config).unwrap();
/// assert_eq!(series.len(), 1);
/// assert_eq!(series.start(), start);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct BatchSynthesizer<'a> {
    store: &'a ProfileStore,
}

impl<'a> BatchSynthesizer<'a> {
    /// Creates a synthesizer over a calibrated store.
    #[inline]
    pub fn new(store: &'a ProfileStore) -> Self {
        Self { store }
    }

    /// Profile store this synthesizer samples from.
    #[inline]
    pub fn store(&self) -> &'a ProfileStore {
        self.store
    }

    /// Generates `horizon + 1` samples starting at the configured start time.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidParameter` if the configuration has no horizon
    /// - `ConfigError::TimestepMismatch` if the timestep differs from the
    ///   store's sampling interval
    /// - `SynthesisError::Profile` if a visited bin has no profile
    pub fn generate(&self, config: &SynthesisConfig) -> Result<GeneratedSeries, SynthesisError> {
        let horizon = config.horizon().ok_or(ConfigError::InvalidParameter {
            name: "horizon",
            value: "batch synthesis needs a finite horizon".to_string(),
        })?;
        config.validate()?;
        config.check_store(self.store)?;

        let mut state = SignalState::initialise(self.store, config)?;
        let mut samples = Vec::with_capacity(horizon + 1);
        samples.push(state.current());
        for _ in 0..horizon {
            samples.push(state.advance(self.store, config)?);
        }

        debug!(
            seed = config.seed(),
            draws = state.draws(),
            "batch synthesis finished"
        );
        info!(
            samples = samples.len(),
            start = %config.start_time(),
            "generated regulation signal"
        );
        Ok(GeneratedSeries::new(config.timestep(), samples))
    }
}

/// Generates a signal with default bounds and no global ramp override.
///
/// Shorthand for building a [`SynthesisConfig`] from the arguments and
/// calling [`BatchSynthesizer::generate`].
///
/// # Errors
///
/// See [`SynthesisConfig::validate`] and [`BatchSynthesizer::generate`].
pub fn generate(
    store: &ProfileStore,
    horizon: usize,
    timestep: Duration,
    start_time: NaiveDateTime,
    seed: u64,
) -> Result<GeneratedSeries, SynthesisError> {
    let config = SynthesisConfig::builder()
        .horizon(horizon)
        .timestep(timestep)
        .start_time(start_time)
        .seed(seed)
        .build()?;
    BatchSynthesizer::new(store).generate(&config)
}
