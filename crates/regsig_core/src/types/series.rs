//! Typed `(timestamp, value)` samples and validated reference series.
//!
//! A [`ReferenceSeries`] replaces column-labelled tabular input with an
//! ordered vector of [`Sample`]s whose ordering and finiteness are checked
//! once, at construction.

use super::error::SeriesError;
use chrono::{Duration, NaiveDateTime};

/// One signal observation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Observation time.
    pub timestamp: NaiveDateTime,
    /// Normalised power level.
    pub value: f64,
}

impl Sample {
    /// Creates a sample.
    #[inline]
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Historical dispatch record in chronological order.
///
/// # Invariants
///
/// - Timestamps strictly increase
/// - Every value is finite
///
/// # Examples
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use regsig_core::types::ReferenceSeries;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let series = ReferenceSeries::from_values(start, Duration::seconds(4), [0.1, -0.2, 0.05]).unwrap();
/// assert_eq!(series.len(), 3);
/// assert_eq!(series.samples()[2].timestamp, start + Duration::seconds(8));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReferenceSeries {
    samples: Vec<Sample>,
}

impl ReferenceSeries {
    /// Builds a series from explicit records.
    ///
    /// # Errors
    ///
    /// - `SeriesError::NonFinite` for a NaN or infinite value
    /// - `SeriesError::Unordered` if a timestamp does not exceed its predecessor
    pub fn new(samples: Vec<Sample>) -> Result<Self, SeriesError> {
        for (index, sample) in samples.iter().enumerate() {
            if !sample.value.is_finite() {
                return Err(SeriesError::NonFinite {
                    index,
                    value: sample.value,
                });
            }
            if index > 0 && sample.timestamp <= samples[index - 1].timestamp {
                return Err(SeriesError::Unordered { index });
            }
        }
        Ok(Self { samples })
    }

    /// Builds a series from values sampled at a fixed interval.
    ///
    /// # Errors
    ///
    /// - `SeriesError::InvalidInterval` for a non-positive interval
    /// - `SeriesError::TimestampOverflow` when timestamps leave chrono's range
    /// - `SeriesError::NonFinite` for a NaN or infinite value
    pub fn from_values(
        start: NaiveDateTime,
        interval: Duration,
        values: impl IntoIterator<Item = f64>,
    ) -> Result<Self, SeriesError> {
        if interval <= Duration::zero() {
            return Err(SeriesError::InvalidInterval(interval));
        }
        let mut samples = Vec::new();
        let mut timestamp = start;
        for (index, value) in values.into_iter().enumerate() {
            if index > 0 {
                timestamp = timestamp
                    .checked_add_signed(interval)
                    .ok_or(SeriesError::TimestampOverflow { index })?;
            }
            samples.push(Sample::new(timestamp, value));
        }
        Self::new(samples)
    }

    /// Rescales the series so that its peak magnitude is 1.
    ///
    /// Raw dispatch records are typically stored in kW; this maps them onto
    /// the normalised `[-1, 1]` range.
    ///
    /// # Errors
    ///
    /// Returns `SeriesError::ZeroPeak` if every value is zero (or the
    /// series is empty).
    pub fn normalised_by_peak(&self) -> Result<Self, SeriesError> {
        let peak = self
            .samples
            .iter()
            .map(|s| s.value.abs())
            .fold(0.0_f64, f64::max);
        if peak == 0.0 {
            return Err(SeriesError::ZeroPeak);
        }
        let samples = self
            .samples
            .iter()
            .map(|s| Sample::new(s.timestamp, s.value / peak))
            .collect();
        Ok(Self { samples })
    }

    /// Records in chronological order.
    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if there are no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterates over records in chronological order.
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }
}

impl<'a> IntoIterator for &'a ReferenceSeries {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_rejects_unordered() {
        let samples = vec![
            Sample::new(t0(), 0.0),
            Sample::new(t0() + Duration::seconds(4), 0.1),
            Sample::new(t0() + Duration::seconds(4), 0.2),
        ];
        assert_eq!(
            ReferenceSeries::new(samples),
            Err(SeriesError::Unordered { index: 2 })
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        let result = ReferenceSeries::from_values(t0(), Duration::seconds(4), [0.0, f64::INFINITY]);
        assert!(matches!(result, Err(SeriesError::NonFinite { index: 1, .. })));
    }

    #[test]
    fn test_rejects_non_positive_interval() {
        let result = ReferenceSeries::from_values(t0(), Duration::zero(), [0.0]);
        assert!(matches!(result, Err(SeriesError::InvalidInterval(_))));
    }

    #[test]
    fn test_normalise_by_peak() {
        let series =
            ReferenceSeries::from_values(t0(), Duration::seconds(4), [50.0, -200.0, 100.0]).unwrap();
        let normalised = series.normalised_by_peak().unwrap();
        let values: Vec<f64> = normalised.iter().map(|s| s.value).collect();
        assert_relative_eq!(values[0], 0.25);
        assert_relative_eq!(values[1], -1.0);
        assert_relative_eq!(values[2], 0.5);
        assert_eq!(normalised.samples()[1].timestamp, series.samples()[1].timestamp);
    }

    #[test]
    fn test_normalise_zero_series() {
        let series = ReferenceSeries::from_values(t0(), Duration::seconds(4), [0.0, 0.0]).unwrap();
        assert_eq!(series.normalised_by_peak(), Err(SeriesError::ZeroPeak));
    }
}
