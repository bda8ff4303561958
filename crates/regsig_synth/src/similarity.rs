//! Statistical comparison of synthetic output against calibrated profiles.
//!
//! For each time bin visited by a generated series, the synthetic mean and
//! spread are compared with the profile's level statistics. Bins outside
//! tolerance are logged at `warn!`.

use crate::error::SynthesisError;
use crate::series::GeneratedSeries;
use regsig_core::math::RunningStats;
use regsig_core::types::TimeBin;
use regsig_models::ProfileStore;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Acceptable absolute deviations between synthetic and profile statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarityTolerance {
    /// Maximum absolute difference of means.
    pub mean: f64,
    /// Maximum absolute difference of standard deviations.
    pub std_dev: f64,
    /// Bins with fewer synthetic samples are reported but not judged.
    pub min_samples: usize,
}

impl Default for SimilarityTolerance {
    fn default() -> Self {
        Self {
            mean: 0.1,
            std_dev: 0.1,
            min_samples: 30,
        }
    }
}

/// Comparison for one bin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinComparison {
    /// Compared bin.
    pub bin: TimeBin,
    /// Synthetic samples in the bin.
    pub count: usize,
    /// Synthetic mean.
    pub mean: f64,
    /// Synthetic standard deviation.
    pub std_dev: f64,
    /// Calibrated mean.
    pub profile_mean: f64,
    /// Calibrated standard deviation.
    pub profile_std: f64,
    /// Whether both statistics fall within tolerance.
    ///
    /// Always `true` for bins with fewer than `min_samples` samples.
    pub within_tolerance: bool,
}

/// Per-bin comparison results in bin order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimilarityReport {
    bins: Vec<BinComparison>,
}

impl SimilarityReport {
    /// All compared bins.
    pub fn bins(&self) -> &[BinComparison] {
        &self.bins
    }

    /// Bins outside tolerance.
    pub fn outliers(&self) -> impl Iterator<Item = &BinComparison> {
        self.bins.iter().filter(|b| !b.within_tolerance)
    }

    /// `true` when every judged bin is within tolerance.
    pub fn is_similar(&self) -> bool {
        self.bins.iter().all(|b| b.within_tolerance)
    }
}

/// Compares a generated series with the profiles it was drawn from.
///
/// # Errors
///
/// Returns `SynthesisError::Profile` if a visited bin has no profile.
pub fn compare(
    series: &GeneratedSeries,
    store: &ProfileStore,
    tolerance: SimilarityTolerance,
) -> Result<SimilarityReport, SynthesisError> {
    let mut per_bin: BTreeMap<TimeBin, RunningStats> = BTreeMap::new();
    for sample in series {
        per_bin
            .entry(store.scheme().bin_of(sample.timestamp))
            .or_default()
            .push(sample.value);
    }

    let mut bins = Vec::with_capacity(per_bin.len());
    for (bin, stats) in per_bin {
        let level = store.profile(bin)?.level();
        let judged = stats.count() >= tolerance.min_samples;
        let within_tolerance = !judged
            || ((stats.mean() - level.mean).abs() <= tolerance.mean
                && (stats.std_dev() - level.std_dev).abs() <= tolerance.std_dev);
        if !within_tolerance {
            warn!(
                %bin,
                mean = stats.mean(),
                profile_mean = level.mean,
                std_dev = stats.std_dev(),
                profile_std = level.std_dev,
                "synthetic statistics outside tolerance"
            );
        }
        bins.push(BinComparison {
            bin,
            count: stats.count(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
            profile_mean: level.mean,
            profile_std: level.std_dev,
            within_tolerance,
        });
    }

    debug!(bins = bins.len(), "similarity comparison finished");
    Ok(SimilarityReport { bins })
}
