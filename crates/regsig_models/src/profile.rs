//! Per-bin calibrated parameters.
//!
//! A [`Profile`] maps pseudo-random draws onto signal levels. It does not own
//! a random source: the caller draws a value of the [`DrawKind`] the profile
//! asks for and passes it in. This keeps the profile immutable and lets the
//! batch and step generators share one draw order.

use crate::error::ProfileError;
use regsig_core::types::AmplitudeBounds;

/// Kind of pseudo-random value a profile consumes per draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawKind {
    /// Uniform in `[0, 1)`.
    Uniform,
    /// Standard normal.
    Normal,
}

/// Distribution summary of the normalised level within one bin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelStats {
    /// Sample mean.
    pub mean: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    /// Smallest observed level.
    pub min: f64,
    /// Largest observed level.
    pub max: f64,
    /// Number of observations.
    pub count: usize,
}

/// Transition-frequency table over discretised levels.
///
/// The amplitude range is split into `levels` equal-width cells; a level is
/// represented by its cell centre. Rows are stored as cumulative
/// distributions so a single uniform draw selects the next cell.
///
/// # Examples
///
/// ```
/// use regsig_core::types::AmplitudeBounds;
/// use regsig_models::TransitionTable;
///
/// // Two cells: [-1, 0) and [0, 1]
/// let table = TransitionTable::from_counts(
///     AmplitudeBounds::symmetric(),
///     &[1, 1],
///     &[vec![0, 4], vec![1, 3]],
/// )
/// .unwrap();
///
/// assert_eq!(table.level_of(-0.3), 0);
/// assert_eq!(table.level_value(1), 0.5);
/// assert_eq!(table.sample_next(0, 0.1), 1);
/// assert_eq!(table.sample_next(1, 0.1), 0);
/// assert_eq!(table.sample_next(1, 0.3), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionTable {
    bounds: AmplitudeBounds,
    marginal: Vec<f64>,
    rows: Vec<Vec<f64>>,
}

impl TransitionTable {
    /// Builds a table from raw frequencies.
    ///
    /// Rows without any outgoing transition fall back to the marginal
    /// distribution.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidProfile` if there are fewer than two
    /// levels, the row count does not match the level count, or the marginal
    /// distribution is empty.
    pub fn from_counts(
        bounds: AmplitudeBounds,
        marginal_counts: &[u64],
        transition_counts: &[Vec<u64>],
    ) -> Result<Self, ProfileError> {
        let levels = marginal_counts.len();
        if levels < 2 {
            return Err(ProfileError::InvalidProfile(format!(
                "transition table needs at least 2 levels, got {}",
                levels
            )));
        }
        if transition_counts.len() != levels || transition_counts.iter().any(|r| r.len() != levels)
        {
            return Err(ProfileError::InvalidProfile(
                "transition rows must be square with the level count".to_string(),
            ));
        }
        let marginal = cumulative(marginal_counts).ok_or_else(|| {
            ProfileError::InvalidProfile("marginal level distribution is empty".to_string())
        })?;
        let rows = transition_counts
            .iter()
            .map(|row| cumulative(row).unwrap_or_else(|| marginal.clone()))
            .collect();

        Ok(Self {
            bounds,
            marginal,
            rows,
        })
    }

    /// Number of discretised levels.
    #[inline]
    pub fn levels(&self) -> usize {
        self.marginal.len()
    }

    /// Width of one level cell.
    #[inline]
    pub fn cell_width(&self) -> f64 {
        self.bounds.width() / self.levels() as f64
    }

    /// Cell index containing `value` (values outside the bounds saturate).
    pub fn level_of(&self, value: f64) -> usize {
        let raw = ((value - self.bounds.lower()) / self.cell_width()).floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.levels() - 1)
        }
    }

    /// Centre of a level cell.
    #[inline]
    pub fn level_value(&self, level: usize) -> f64 {
        self.bounds.lower() + (level as f64 + 0.5) * self.cell_width()
    }

    /// Selects a level from the marginal distribution.
    #[inline]
    pub fn sample_marginal(&self, u: f64) -> usize {
        pick(&self.marginal, u)
    }

    /// Selects the next level given the current one.
    #[inline]
    pub fn sample_next(&self, from: usize, u: f64) -> usize {
        pick(&self.rows[from.min(self.levels() - 1)], u)
    }

    /// Transition probability `P(to | from)`, `None` for a level outside
    /// the table.
    pub fn probability(&self, from: usize, to: usize) -> Option<f64> {
        let row = self.rows.get(from)?;
        let cumulative = *row.get(to)?;
        let below = match to.checked_sub(1) {
            Some(prev) => row[prev],
            None => 0.0,
        };
        Some(cumulative - below)
    }
}

/// Continuous mean-reverting increment model.
///
/// The increment from level `x` is
///
/// ```text
/// Δ = (1 - ρ)(μ - x) + σ_ε z,    σ_ε = σ √(1 - ρ²),   z ~ N(0, 1)
/// ```
///
/// where `μ`, `σ` are the bin's level mean and spread and `ρ` its lag-one
/// autocorrelation. Its stationary distribution has mean `μ` and spread `σ`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RampIncrement {
    /// Mean of observed increments.
    pub mean: f64,
    /// Standard deviation of observed increments.
    pub std_dev: f64,
    /// Lag-one autocorrelation of the level around the bin mean.
    pub autocorrelation: f64,
    /// Innovation spread `σ √(1 - ρ²)`.
    pub innovation_std: f64,
    /// Largest observed absolute increment.
    pub max_abs: f64,
}

/// Step-to-step dynamics of one bin.
#[derive(Clone, Debug, PartialEq)]
pub enum Dynamics {
    /// Discretised-level transition table.
    Markov(TransitionTable),
    /// Continuous mean-reverting increment.
    Ramp(RampIncrement),
}

impl Dynamics {
    /// Draw kind consumed by one initial draw or one step.
    #[inline]
    pub fn draw_kind(&self) -> DrawKind {
        match self {
            Dynamics::Markov(_) => DrawKind::Uniform,
            Dynamics::Ramp(_) => DrawKind::Normal,
        }
    }
}

/// Calibrated parameters for one [`TimeBin`](regsig_core::types::TimeBin).
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    level: LevelStats,
    dynamics: Dynamics,
    max_ramp: f64,
}

impl Profile {
    /// Creates a profile.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidProfile` if any statistic is non-finite,
    /// the spread is negative or the ramp bound is negative.
    pub fn new(level: LevelStats, dynamics: Dynamics, max_ramp: f64) -> Result<Self, ProfileError> {
        if !level.mean.is_finite() || !level.std_dev.is_finite() || level.std_dev < 0.0 {
            return Err(ProfileError::InvalidProfile(format!(
                "level mean {} / std {} must be finite with non-negative spread",
                level.mean, level.std_dev
            )));
        }
        if !max_ramp.is_finite() || max_ramp < 0.0 {
            return Err(ProfileError::InvalidProfile(format!(
                "max ramp {} must be finite and non-negative",
                max_ramp
            )));
        }
        if let Dynamics::Ramp(ramp) = &dynamics {
            if !(-1.0..=1.0).contains(&ramp.autocorrelation) || !ramp.innovation_std.is_finite() {
                return Err(ProfileError::InvalidProfile(format!(
                    "autocorrelation {} must lie in [-1, 1]",
                    ramp.autocorrelation
                )));
            }
        }
        Ok(Self {
            level,
            dynamics,
            max_ramp,
        })
    }

    /// Level distribution summary.
    #[inline]
    pub fn level(&self) -> &LevelStats {
        &self.level
    }

    /// Step dynamics.
    #[inline]
    pub fn dynamics(&self) -> &Dynamics {
        &self.dynamics
    }

    /// Maximum absolute change per timestep.
    #[inline]
    pub fn max_ramp(&self) -> f64 {
        self.max_ramp
    }

    /// Draw kind this profile consumes.
    #[inline]
    pub fn draw_kind(&self) -> DrawKind {
        self.dynamics.draw_kind()
    }

    /// Maps one draw onto an initial level (unclamped).
    pub fn initial_level(&self, draw: f64) -> f64 {
        match &self.dynamics {
            Dynamics::Markov(table) => table.level_value(table.sample_marginal(draw)),
            Dynamics::Ramp(_) => self.level.mean + self.level.std_dev * draw,
        }
    }

    /// Maps one draw onto the proposed next level (unclamped, unbounded ramp).
    pub fn propose(&self, current: f64, draw: f64) -> f64 {
        match &self.dynamics {
            Dynamics::Markov(table) => {
                table.level_value(table.sample_next(table.level_of(current), draw))
            }
            Dynamics::Ramp(ramp) => {
                let pull = (1.0 - ramp.autocorrelation) * (self.level.mean - current);
                current + pull + ramp.innovation_std * draw
            }
        }
    }
}

fn cumulative(counts: &[u64]) -> Option<Vec<f64>> {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return None;
    }
    let mut running = 0u64;
    let mut cdf: Vec<f64> = counts
        .iter()
        .map(|&c| {
            running += c;
            running as f64 / total as f64
        })
        .collect();
    if let Some(last) = cdf.last_mut() {
        *last = 1.0;
    }
    Some(cdf)
}

/// First index whose cumulative probability exceeds `u`.
fn pick(cdf: &[f64], u: f64) -> usize {
    cdf.partition_point(|&c| c <= u).min(cdf.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stats(mean: f64, std_dev: f64) -> LevelStats {
        LevelStats {
            mean,
            std_dev,
            min: mean - 3.0 * std_dev,
            max: mean + 3.0 * std_dev,
            count: 100,
        }
    }

    fn ramp(rho: f64, innovation_std: f64) -> Dynamics {
        Dynamics::Ramp(RampIncrement {
            mean: 0.0,
            std_dev: innovation_std,
            autocorrelation: rho,
            innovation_std,
            max_abs: 0.1,
        })
    }

    #[test]
    fn test_cumulative_skips_empty_cells() {
        let cdf = cumulative(&[0, 2, 0, 2]).unwrap();
        assert_eq!(cdf, vec![0.0, 0.5, 0.5, 1.0]);
        assert_eq!(pick(&cdf, 0.0), 1);
        assert_eq!(pick(&cdf, 0.49), 1);
        assert_eq!(pick(&cdf, 0.5), 3);
        assert_eq!(pick(&cdf, 0.999_999), 3);
        assert!(cumulative(&[0, 0]).is_none());
    }

    #[test]
    fn test_transition_table_row_fallback() {
        let table = TransitionTable::from_counts(
            AmplitudeBounds::symmetric(),
            &[3, 1, 0, 0],
            &[vec![1, 1, 0, 0], vec![0; 4], vec![0; 4], vec![0; 4]],
        )
        .unwrap();
        // Row 1 never observed: uses marginal (0.75 / 0.25)
        assert_relative_eq!(table.probability(1, 0).unwrap(), 0.75);
        assert_relative_eq!(table.probability(1, 1).unwrap(), 0.25);
        assert_relative_eq!(table.probability(0, 1).unwrap(), 0.5);
        assert_eq!(table.probability(0, 3), Some(0.0));
    }

    #[test]
    fn test_transition_probability_out_of_range() {
        let table = TransitionTable::from_counts(
            AmplitudeBounds::symmetric(),
            &[1, 1],
            &[vec![1, 1], vec![1, 1]],
        )
        .unwrap();
        assert_eq!(table.probability(2, 0), None);
        assert_eq!(table.probability(0, 2), None);
        // Sampling saturates instead
        assert!(table.sample_next(5, 0.5) < 2);
    }

    #[test]
    fn test_transition_table_validation() {
        let bounds = AmplitudeBounds::symmetric();
        assert!(TransitionTable::from_counts(bounds, &[1], &[vec![1]]).is_err());
        assert!(TransitionTable::from_counts(bounds, &[0, 0], &[vec![0, 0], vec![0, 0]]).is_err());
        assert!(TransitionTable::from_counts(bounds, &[1, 1], &[vec![1, 1]]).is_err());
    }

    #[test]
    fn test_level_discretisation() {
        let table = TransitionTable::from_counts(
            AmplitudeBounds::symmetric(),
            &[1; 8],
            &vec![vec![1; 8]; 8],
        )
        .unwrap();
        assert_relative_eq!(table.cell_width(), 0.25);
        assert_eq!(table.level_of(-1.0), 0);
        assert_eq!(table.level_of(-5.0), 0);
        assert_eq!(table.level_of(1.0), 7);
        assert_eq!(table.level_of(0.0), 4);
        assert_relative_eq!(table.level_value(0), -0.875);
        assert_relative_eq!(table.level_value(7), 0.875);
    }

    #[test]
    fn test_ramp_initial_and_proposal() {
        let profile = Profile::new(stats(0.1, 0.2), ramp(0.9, 0.05), 0.1).unwrap();
        assert_eq!(profile.draw_kind(), DrawKind::Normal);
        assert_relative_eq!(profile.initial_level(1.0), 0.3);

        // Zero innovation: pure pull towards the mean
        assert_relative_eq!(profile.propose(0.5, 0.0), 0.5 + 0.1 * (0.1 - 0.5), epsilon = 1e-12);
        assert_relative_eq!(profile.propose(0.1, 2.0), 0.1 + 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_profile_validation() {
        assert!(Profile::new(stats(0.0, -0.1), ramp(0.5, 0.1), 0.1).is_err());
        assert!(Profile::new(stats(0.0, 0.1), ramp(0.5, 0.1), -0.1).is_err());
        assert!(Profile::new(stats(0.0, 0.1), ramp(1.5, 0.1), 0.1).is_err());
        assert!(Profile::new(stats(f64::NAN, 0.1), ramp(0.5, 0.1), 0.1).is_err());
    }
}
