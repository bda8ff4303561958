//! Single-pass moment accumulation.
//!
//! Uses Welford's online algorithm so that per-bin statistics can be
//! accumulated while streaming through a reference series once.

/// Running count, mean, variance and extrema.
///
/// # Examples
///
/// ```
/// use regsig_core::math::RunningStats;
///
/// let stats: RunningStats = [1.0, 2.0, 3.0, 4.0].into_iter().collect();
/// assert_eq!(stats.count(), 4);
/// assert!((stats.mean() - 2.5).abs() < 1e-12);
/// assert_eq!(stats.max(), Some(4.0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    m2: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl RunningStats {
    /// Creates an empty accumulator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one observation.
    #[inline]
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
        self.min = Some(self.min.map_or(x, |m| m.min(x)));
        self.max = Some(self.max.map_or(x, |m| m.max(x)));
    }

    /// Number of observations.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Sample mean (0 when empty).
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Unbiased sample variance (0 with fewer than two observations).
    #[inline]
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Square root of [`variance`](Self::variance).
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Smallest observation.
    #[inline]
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Largest observation.
    #[inline]
    pub fn max(&self) -> Option<f64> {
        self.max
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        for x in iter {
            stats.push(x);
        }
        stats
    }
}
