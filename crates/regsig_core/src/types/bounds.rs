//! Amplitude bounds and regulation direction.

use super::error::BoundsError;

/// Closed clamp range `[lower, upper]` for normalised signal levels.
///
/// # Examples
///
/// ```
/// use regsig_core::types::AmplitudeBounds;
///
/// let bounds = AmplitudeBounds::new(0.0, 1.0).unwrap();
/// assert_eq!(bounds.clamp(-0.3), 0.0);
/// assert!(bounds.contains(0.5));
/// assert!(AmplitudeBounds::new(1.0, 1.0).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AmplitudeBounds {
    lower: f64,
    upper: f64,
}

impl AmplitudeBounds {
    /// Creates a bound pair.
    ///
    /// # Errors
    ///
    /// Returns `BoundsError::InvalidBounds` unless both ends are finite and
    /// `lower < upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, BoundsError> {
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(BoundsError::InvalidBounds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// The normalised range `[-1, 1]`.
    #[inline]
    pub fn symmetric() -> Self {
        Self {
            lower: -1.0,
            upper: 1.0,
        }
    }

    /// Lower end.
    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper end.
    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// `upper - lower`.
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Clamps a level into the range.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }

    /// Returns `true` if `value` lies inside the closed range.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

impl Default for AmplitudeBounds {
    fn default() -> Self {
        Self::symmetric()
    }
}

/// Which regulation services the synthetic resource provides.
///
/// Regulation up injects power (positive setpoints), regulation down absorbs
/// it (negative setpoints).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RegulationDirection {
    /// Both directions, `[-1, 1]`.
    #[default]
    Both,
    /// Regulation up only, `[0, 1]`.
    UpOnly,
    /// Regulation down only, `[-1, 0]`.
    DownOnly,
}

impl RegulationDirection {
    /// Amplitude range implied by the direction.
    pub fn bounds(&self) -> AmplitudeBounds {
        match self {
            RegulationDirection::Both => AmplitudeBounds::symmetric(),
            RegulationDirection::UpOnly => AmplitudeBounds {
                lower: 0.0,
                upper: 1.0,
            },
            RegulationDirection::DownOnly => AmplitudeBounds {
                lower: -1.0,
                upper: 0.0,
            },
        }
    }
}
