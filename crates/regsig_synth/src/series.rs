//! Generated signal output.

use chrono::{Duration, NaiveDateTime};
use regsig_core::math::RunningStats;
use regsig_core::types::Sample;

/// Unit for elapsed-time timestamps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Seconds since the first sample.
    #[default]
    Seconds,
    /// Minutes since the first sample.
    Minutes,
    /// Hours since the first sample.
    Hours,
}

impl TimeUnit {
    /// Seconds per unit.
    #[inline]
    pub fn seconds(&self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3600.0,
        }
    }
}

/// Chronological synthetic signal of `horizon + 1` samples.
///
/// Produced by batch synthesis; immutable.
///
/// # Examples
///
/// ```rust
/// use chrono::{Duration, NaiveDate};
/// use regsig_core::types::ReferenceSeries;
/// use regsig_models::ProfileCalibrator;
/// use regsig_synth::{generate, TimeUnit};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let values = (0..21_600).map(|i| 0.3 * ((i as f64) / 45.0).cos());
/// let reference = ReferenceSeries::from_values(start, Duration::seconds(4), values).unwrap();
/// let store = ProfileCalibrator::with_defaults().calibrate(&reference).unwrap();
///
/// let series = generate(&store, 900, Duration::seconds(4), start, 1).unwrap();
/// assert_eq!(series.len(), 901);
/// assert_eq!(series.elapsed(TimeUnit::Hours).last(), Some(&1.0));
/// assert_eq!(series.scaled(500.0).len(), 901);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedSeries {
    timestep: Duration,
    samples: Vec<Sample>,
}

impl GeneratedSeries {
    pub(crate) fn new(timestep: Duration, samples: Vec<Sample>) -> Self {
        debug_assert!(!samples.is_empty());
        Self { timestep, samples }
    }

    /// All samples in chronological order.
    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Normalised levels in chronological order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    /// Number of samples (horizon + 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`: a series holds at least the initial sample.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamp of the initial sample.
    pub fn start(&self) -> NaiveDateTime {
        self.samples[0].timestamp
    }

    /// Timestamp of the last sample.
    pub fn end(&self) -> NaiveDateTime {
        self.samples[self.samples.len() - 1].timestamp
    }

    /// Simulated time between samples.
    #[inline]
    pub fn timestep(&self) -> Duration {
        self.timestep
    }

    /// Time since the first sample, in `unit`, for every sample.
    pub fn elapsed(&self, unit: TimeUnit) -> Vec<f64> {
        let start = self.start();
        self.samples
            .iter()
            .map(|s| elapsed_seconds(s.timestamp - start) / unit.seconds())
            .collect()
    }

    /// Levels multiplied by a capacity, e.g. kW for a capacity in kW.
    pub fn scaled(&self, capacity: f64) -> Vec<f64> {
        self.values().map(|v| v * capacity).collect()
    }

    /// Mean level.
    pub fn mean(&self) -> f64 {
        self.stats().mean()
    }

    /// Sample standard deviation of the level.
    pub fn std_dev(&self) -> f64 {
        self.stats().std_dev()
    }

    /// Largest absolute change between adjacent samples.
    pub fn max_abs_step(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|w| (w[1].value - w[0].value).abs())
            .fold(0.0, f64::max)
    }

    /// Consumes the series, returning its samples.
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    fn stats(&self) -> RunningStats {
        self.values().collect()
    }
}

impl<'a> IntoIterator for &'a GeneratedSeries {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

fn elapsed_seconds(span: Duration) -> f64 {
    span.num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> GeneratedSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let step = Duration::seconds(4);
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Sample::new(start + step * i as i32, v))
            .collect();
        GeneratedSeries::new(step, samples)
    }

    #[test]
    fn test_elapsed_units() {
        let s = series(&[0.0; 901]);
        let secs = s.elapsed(TimeUnit::Seconds);
        assert_eq!(secs[1], 4.0);
        assert_eq!(secs[900], 3600.0);
        assert_relative_eq!(s.elapsed(TimeUnit::Minutes)[15], 1.0);
        assert_relative_eq!(s.elapsed(TimeUnit::Hours)[900], 1.0);
    }

    #[test]
    fn test_statistics() {
        let s = series(&[0.1, 0.3, 0.2, 0.4]);
        assert_relative_eq!(s.mean(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(s.std_dev(), (0.05f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(s.max_abs_step(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_scaled_to_capacity() {
        let s = series(&[0.5, -0.25]);
        assert_eq!(s.scaled(200.0), vec![100.0, -50.0]);
    }

    #[test]
    fn test_single_sample_series() {
        let s = series(&[0.7]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.start(), s.end());
        assert_eq!(s.max_abs_step(), 0.0);
        assert!(!s.is_empty());
    }
}
