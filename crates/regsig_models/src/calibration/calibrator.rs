//! Offline fitting of per-bin profiles.

use super::config::{CalibrationConfig, DynamicsModel};
use crate::error::{CalibrationError, ProfileError};
use crate::profile::{Dynamics, LevelStats, Profile, RampIncrement, TransitionTable};
use crate::store::ProfileStore;
use regsig_core::math::RunningStats;
use regsig_core::types::{AmplitudeBounds, BinningScheme, ReferenceSeries, TimeBin};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Builds a [`ProfileStore`] from a historical reference series.
///
/// Calibration is all-or-nothing: a single under-populated bin fails the
/// whole run with [`CalibrationError::InsufficientObservations`], and a bin
/// whose records are never one sampling interval apart fails it with
/// [`CalibrationError::InsufficientTransitions`].
///
/// # Example
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use regsig_core::types::ReferenceSeries;
/// use regsig_models::calibration::{CalibrationConfig, ProfileCalibrator};
/// use regsig_models::CalibrationError;
///
/// // Two hours of data cannot cover 24 hourly bins
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let series = ReferenceSeries::from_values(start, Duration::seconds(4), vec![0.0; 1800]).unwrap();
///
/// let calibrator = ProfileCalibrator::new(CalibrationConfig::default());
/// let err = calibrator.calibrate(&series).unwrap_err();
/// assert!(matches!(err, CalibrationError::InsufficientObservations { got: 0, .. }));
/// ```
#[derive(Clone, Debug)]
pub struct ProfileCalibrator {
    config: CalibrationConfig,
}

impl ProfileCalibrator {
    /// Creates a calibrator.
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// Creates a calibrator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CalibrationConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Fits one profile per bin.
    ///
    /// # Errors
    ///
    /// - `CalibrationError::InvalidParameter` for an invalid configuration
    /// - `CalibrationError::EmptySeries` for an empty series
    /// - `CalibrationError::SampleOutOfBounds` for a value outside the amplitude bounds
    /// - `CalibrationError::InsufficientObservations` for the first under-populated bin
    /// - `CalibrationError::InsufficientTransitions` for the first bin with too
    ///   few step pairs
    pub fn calibrate(&self, series: &ReferenceSeries) -> Result<ProfileStore, CalibrationError> {
        let config = &self.config;
        config.validate()?;
        if series.is_empty() {
            return Err(CalibrationError::EmptySeries);
        }

        let bounds = config.amplitude_bounds();
        if let Some((index, sample)) = series
            .iter()
            .enumerate()
            .find(|(_, s)| !bounds.contains(s.value))
        {
            return Err(CalibrationError::SampleOutOfBounds {
                index,
                value: sample.value,
                lower: bounds.lower(),
                upper: bounds.upper(),
            });
        }

        let scheme = *config.binning();
        let mut accumulators: Vec<BinAccumulator> = (0..scheme.bin_count())
            .map(|_| BinAccumulator::new(config.dynamics(), bounds))
            .collect();

        for sample in series {
            let index = dense_index(&scheme, scheme.bin_of(sample.timestamp))?;
            accumulators[index].push_level(sample.value);
        }

        for (bin, acc) in scheme.bins().zip(&accumulators) {
            let got = acc.levels.count();
            if got < config.min_observations_per_bin() {
                return Err(CalibrationError::InsufficientObservations {
                    bin,
                    got,
                    need: config.min_observations_per_bin(),
                });
            }
        }

        let interval = config.sampling_interval();
        let mut pairs = 0usize;
        for pair in series.samples().windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.timestamp - prev.timestamp != interval {
                continue;
            }
            let index = dense_index(&scheme, scheme.bin_of(prev.timestamp))?;
            accumulators[index].push_pair(prev.value, next.value);
            pairs += 1;
        }

        for (bin, acc) in scheme.bins().zip(&accumulators) {
            let got = acc.increments.count();
            if got < config.min_observations_per_bin() {
                return Err(CalibrationError::InsufficientTransitions {
                    bin,
                    got,
                    need: config.min_observations_per_bin(),
                });
            }
        }

        let mut profiles = BTreeMap::new();
        for (bin, acc) in scheme.bins().zip(accumulators) {
            let profile = acc.finish(config.max_ramp_rate())?;
            debug!(
                %bin,
                count = profile.level().count,
                mean = profile.level().mean,
                std_dev = profile.level().std_dev,
                max_ramp = profile.max_ramp(),
                "calibrated bin"
            );
            profiles.insert(bin, profile);
        }

        let store = ProfileStore::new(scheme, interval, bounds, profiles)?;
        info!(
            bins = store.len(),
            samples = series.len(),
            pairs,
            model = ?config.dynamics(),
            "profile calibration complete"
        );
        Ok(store)
    }
}

fn dense_index(scheme: &BinningScheme, bin: TimeBin) -> Result<usize, ProfileError> {
    scheme.index_of(bin).ok_or(ProfileError::UnknownBin { bin })
}

/// Per-bin streaming accumulator.
struct BinAccumulator {
    bounds: AmplitudeBounds,
    levels: RunningStats,
    increments: RunningStats,
    markov: Option<MarkovCounts>,
    /// Raw pairs, kept for the autocorrelation pass around the final mean.
    pairs: Vec<(f64, f64)>,
}

struct MarkovCounts {
    marginal: Vec<u64>,
    transitions: Vec<Vec<u64>>,
}

impl BinAccumulator {
    fn new(model: DynamicsModel, bounds: AmplitudeBounds) -> Self {
        let markov = match model {
            DynamicsModel::Markov { levels } => Some(MarkovCounts {
                marginal: vec![0; levels],
                transitions: vec![vec![0; levels]; levels],
            }),
            DynamicsModel::RampIncrement => None,
        };
        Self {
            bounds,
            levels: RunningStats::new(),
            increments: RunningStats::new(),
            markov,
            pairs: Vec::new(),
        }
    }

    fn level_index(&self, levels: usize, value: f64) -> usize {
        let cell = self.bounds.width() / levels as f64;
        let raw = ((value - self.bounds.lower()) / cell).floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(levels - 1)
        }
    }

    fn push_level(&mut self, value: f64) {
        self.levels.push(value);
        if let Some(levels) = self.markov.as_ref().map(|m| m.marginal.len()) {
            let i = self.level_index(levels, value);
            if let Some(markov) = self.markov.as_mut() {
                markov.marginal[i] += 1;
            }
        }
    }

    fn push_pair(&mut self, prev: f64, next: f64) {
        self.increments.push(next - prev);
        if let Some(levels) = self.markov.as_ref().map(|m| m.marginal.len()) {
            let from = self.level_index(levels, prev);
            let to = self.level_index(levels, next);
            if let Some(markov) = self.markov.as_mut() {
                markov.transitions[from][to] += 1;
            }
        } else {
            self.pairs.push((prev, next));
        }
    }

    fn finish(self, configured_ramp: Option<f64>) -> Result<Profile, ProfileError> {
        let level = LevelStats {
            mean: self.levels.mean(),
            std_dev: self.levels.std_dev(),
            min: self.levels.min().unwrap_or(0.0),
            max: self.levels.max().unwrap_or(0.0),
            count: self.levels.count(),
        };
        let observed_ramp = match (self.increments.min(), self.increments.max()) {
            (Some(lo), Some(hi)) => lo.abs().max(hi.abs()),
            _ => 0.0,
        };
        let max_ramp = configured_ramp.unwrap_or(observed_ramp);

        let dynamics = match self.markov {
            Some(counts) => Dynamics::Markov(TransitionTable::from_counts(
                self.bounds,
                &counts.marginal,
                &counts.transitions,
            )?),
            None => {
                let rho = lag_one_autocorrelation(&self.pairs, level.mean);
                Dynamics::Ramp(RampIncrement {
                    mean: self.increments.mean(),
                    std_dev: self.increments.std_dev(),
                    autocorrelation: rho,
                    innovation_std: level.std_dev * (1.0 - rho * rho).max(0.0).sqrt(),
                    max_abs: observed_ramp,
                })
            }
        };

        Profile::new(level, dynamics, max_ramp)
    }
}

/// `Σ(x-μ)(y-μ) / Σ(x-μ)²` over consecutive pairs, clamped to [-1, 1].
fn lag_one_autocorrelation(pairs: &[(f64, f64)], mean: f64) -> f64 {
    let (sxy, sxx) = pairs.iter().fold((0.0, 0.0), |(sxy, sxx), &(x, y)| {
        let dx = x - mean;
        (sxy + dx * (y - mean), sxx + dx * dx)
    });
    if sxx > 0.0 {
        (sxy / sxx).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use regsig_core::types::{Sample, Seasonality};

    fn midnight() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// One day at 4 s, each hour alternating between `h/100` and `-h/100`.
    fn alternating_day() -> ReferenceSeries {
        let values = (0..21_600).map(|i| {
            let hour = (i / 900) as f64;
            if i % 2 == 0 {
                hour / 100.0
            } else {
                -hour / 100.0
            }
        });
        ReferenceSeries::from_values(midnight(), Duration::seconds(4), values).unwrap()
    }

    #[test]
    fn test_empty_series() {
        let calibrator = ProfileCalibrator::with_defaults();
        let result = calibrator.calibrate(&ReferenceSeries::default());
        assert_eq!(result, Err(CalibrationError::EmptySeries));
    }

    #[test]
    fn test_out_of_bounds_sample() {
        let series =
            ReferenceSeries::from_values(midnight(), Duration::seconds(4), [0.0, 1.5]).unwrap();
        let result = ProfileCalibrator::with_defaults().calibrate(&series);
        assert!(matches!(
            result,
            Err(CalibrationError::SampleOutOfBounds { index: 1, .. })
        ));
    }

    #[test]
    fn test_ramp_profile_statistics() {
        let store = ProfileCalibrator::with_defaults()
            .calibrate(&alternating_day())
            .unwrap();
        assert_eq!(store.len(), 24);

        let profile = store.profile(TimeBin::new(0, 10)).unwrap();
        assert_eq!(profile.level().count, 900);
        assert_relative_eq!(profile.level().mean, 0.0, epsilon = 1e-12);
        assert_relative_eq!(profile.level().std_dev, 0.1, epsilon = 1e-3);

        // Perfect alternation: rho = -1, no innovation, increments of 0.2
        match profile.dynamics() {
            Dynamics::Ramp(ramp) => {
                assert_relative_eq!(ramp.autocorrelation, -1.0, epsilon = 1e-9);
                assert_relative_eq!(ramp.innovation_std, 0.0, epsilon = 1e-6);
            }
            other => panic!("expected ramp dynamics, got {:?}", other),
        }
        // Largest step in slot 10 crosses into slot 11: -0.10 -> 0.11
        assert_relative_eq!(profile.max_ramp(), 0.21, epsilon = 1e-12);
    }

    #[test]
    fn test_configured_ramp_rate_overrides_observed() {
        let config = CalibrationConfig::builder()
            .max_ramp_rate(0.05)
            .build()
            .unwrap();
        let store = ProfileCalibrator::new(config)
            .calibrate(&alternating_day())
            .unwrap();
        for (_, profile) in store.iter() {
            assert_eq!(profile.max_ramp(), 0.05);
        }
    }

    #[test]
    fn test_markov_profile_transitions() {
        let config = CalibrationConfig::builder()
            .dynamics(DynamicsModel::Markov { levels: 4 })
            .build()
            .unwrap();
        let store = ProfileCalibrator::new(config)
            .calibrate(&alternating_day())
            .unwrap();

        // Slot 10: values +0.1 (cell 2) and -0.1 (cell 1), strictly alternating
        let profile = store.profile(TimeBin::new(0, 10)).unwrap();
        match profile.dynamics() {
            Dynamics::Markov(table) => {
                assert_eq!(table.levels(), 4);
                assert_relative_eq!(table.probability(2, 1).unwrap(), 1.0);
                // Last pair of the slot leaves towards slot 11 (+0.11, cell 2)
                assert!(table.probability(1, 2).unwrap() > 0.99);
            }
            other => panic!("expected markov dynamics, got {:?}", other),
        }
    }

    #[test]
    fn test_insufficient_bin_reported() {
        // Skip hour 5 entirely
        let samples: Vec<Sample> = (0..21_600)
            .filter(|i| i / 900 != 5)
            .map(|i| Sample::new(midnight() + Duration::seconds(4 * i), 0.0))
            .collect();
        let series = ReferenceSeries::new(samples).unwrap();
        let config = CalibrationConfig::builder()
            .min_observations_per_bin(10)
            .build()
            .unwrap();

        let result = ProfileCalibrator::new(config).calibrate(&series);
        assert_eq!(
            result,
            Err(CalibrationError::InsufficientObservations {
                bin: TimeBin::new(0, 5),
                got: 0,
                need: 10,
            })
        );
    }

    #[test]
    fn test_gaps_are_not_counted_as_steps() {
        // Two samples 8 s apart with a 4 s sampling interval: no pair
        let samples = vec![
            Sample::new(midnight(), -0.5),
            Sample::new(midnight() + Duration::seconds(8), 0.5),
        ];
        let series = ReferenceSeries::new(samples).unwrap();
        let config = CalibrationConfig::builder()
            .bin_width_secs(86_400)
            .build()
            .unwrap();
        let result = ProfileCalibrator::new(config).calibrate(&series);
        assert_eq!(
            result,
            Err(CalibrationError::InsufficientTransitions {
                bin: TimeBin::new(0, 0),
                got: 0,
                need: 1,
            })
        );
    }

    /// One day at 4 s except hour 5, which is recorded every 8 s.
    fn coarse_hour_five() -> ReferenceSeries {
        let samples: Vec<Sample> = (0..21_600)
            .filter(|i| i / 900 != 5 || i % 2 == 0)
            .map(|i| {
                let value = 0.3 * ((i as f64) / 30.0).sin();
                Sample::new(midnight() + Duration::seconds(4 * i), value)
            })
            .collect();
        ReferenceSeries::new(samples).unwrap()
    }

    #[test]
    fn test_bin_without_steps_is_not_defaulted() {
        for dynamics in [DynamicsModel::RampIncrement, DynamicsModel::Markov { levels: 10 }] {
            let config = CalibrationConfig::builder()
                .dynamics(dynamics)
                .min_observations_per_bin(100)
                .build()
                .unwrap();
            let result = ProfileCalibrator::new(config).calibrate(&coarse_hour_five());
            assert_eq!(
                result,
                Err(CalibrationError::InsufficientTransitions {
                    bin: TimeBin::new(0, 5),
                    got: 0,
                    need: 100,
                }),
                "{:?}",
                dynamics
            );
        }
    }

    #[test]
    fn test_every_bin_has_fitted_dynamics() {
        let store = ProfileCalibrator::with_defaults()
            .calibrate(&alternating_day())
            .unwrap();
        for (bin, profile) in store.iter() {
            assert!(profile.max_ramp() > 0.0, "{}", bin);
        }
    }

    #[test]
    fn test_seasonal_calibration_requires_every_season() {
        let series = alternating_day();
        let config = CalibrationConfig::builder()
            .seasonality(Seasonality::Quarterly)
            .build()
            .unwrap();
        let result = ProfileCalibrator::new(config).calibrate(&series);
        assert!(matches!(
            result,
            Err(CalibrationError::InsufficientObservations { bin, .. }) if bin.season() == 1
        ));
    }

    #[test]
    fn test_autocorrelation_helper() {
        assert_eq!(lag_one_autocorrelation(&[], 0.0), 0.0);
        assert_relative_eq!(lag_one_autocorrelation(&[(1.0, 1.0), (-1.0, -1.0)], 0.0), 1.0);
        assert_relative_eq!(lag_one_autocorrelation(&[(1.0, -1.0), (-1.0, 1.0)], 0.0), -1.0);
    }
}
