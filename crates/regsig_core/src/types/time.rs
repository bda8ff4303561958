//! Time-of-period binning.
//!
//! This module provides:
//! - [`Seasonality`]: Optional period-of-year partition (none, quarters, months)
//! - [`TimeBin`]: A discrete `(season, slot-of-day)` index
//! - [`BinningScheme`]: Deterministic mapping from timestamps to bins
//!
//! # Partition
//!
//! A day is split into `ceil(86400 / bin_width)` contiguous slots starting at
//! midnight. When the width does not divide the day evenly, the final slot is
//! shorter. Every timestamp therefore maps to exactly one slot, and slots
//! neither overlap nor leave gaps.

use super::error::BinningError;
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::fmt;

/// Number of seconds in a civil day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Period-of-year partition applied on top of the period-of-day slots.
///
/// # Examples
///
/// ```
/// use regsig_core::types::Seasonality;
///
/// assert_eq!(Seasonality::Quarterly.season_count(), 4);
/// assert_eq!(Seasonality::Quarterly.season_of_month(5), 1);
/// assert_eq!(Seasonality::None.season_of_month(11), 0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Seasonality {
    /// Single season covering the whole year.
    #[default]
    None,
    /// Calendar quarters (Jan-Mar, Apr-Jun, Jul-Sep, Oct-Dec).
    Quarterly,
    /// Calendar months.
    Monthly,
}

impl Seasonality {
    /// Number of seasons in one year.
    #[inline]
    pub fn season_count(&self) -> u8 {
        match self {
            Seasonality::None => 1,
            Seasonality::Quarterly => 4,
            Seasonality::Monthly => 12,
        }
    }

    /// Season index for a calendar month in `1..=12`.
    #[inline]
    pub fn season_of_month(&self, month: u32) -> u8 {
        let month0 = month.saturating_sub(1).min(11) as u8;
        match self {
            Seasonality::None => 0,
            Seasonality::Quarterly => month0 / 3,
            Seasonality::Monthly => month0,
        }
    }
}

/// A discrete period-of-day (and optionally period-of-year) bucket.
///
/// Ordering is by season first, then by slot of day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeBin {
    season: u8,
    slot: u32,
}

impl TimeBin {
    /// Creates a bin from its season and slot indices.
    #[inline]
    pub fn new(season: u8, slot: u32) -> Self {
        Self { season, slot }
    }

    /// Season index (always 0 without seasonality).
    #[inline]
    pub fn season(&self) -> u8 {
        self.season
    }

    /// Slot-of-day index, counted from midnight.
    #[inline]
    pub fn slot(&self) -> u32 {
        self.slot
    }
}

impl fmt::Display for TimeBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "season {} slot {}", self.season, self.slot)
    }
}

/// Deterministic mapping from timestamps to [`TimeBin`]s.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use regsig_core::types::{BinningScheme, Seasonality, TimeBin};
///
/// let scheme = BinningScheme::new(900, Seasonality::Quarterly).unwrap();
/// assert_eq!(scheme.slots_per_day(), 96);
/// assert_eq!(scheme.bin_count(), 384);
///
/// let ts = NaiveDate::from_ymd_opt(2023, 8, 14)
///     .unwrap()
///     .and_hms_opt(0, 20, 0)
///     .unwrap();
/// assert_eq!(scheme.bin_of(ts), TimeBin::new(2, 1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BinningScheme {
    bin_width_secs: u32,
    seasonality: Seasonality,
}

impl BinningScheme {
    /// Creates a scheme with the given slot width and seasonality.
    ///
    /// # Errors
    ///
    /// Returns `BinningError::InvalidBinWidth` if the width is zero or
    /// longer than one day.
    pub fn new(bin_width_secs: u32, seasonality: Seasonality) -> Result<Self, BinningError> {
        if bin_width_secs == 0 || bin_width_secs > SECONDS_PER_DAY {
            return Err(BinningError::InvalidBinWidth(bin_width_secs));
        }
        Ok(Self {
            bin_width_secs,
            seasonality,
        })
    }

    /// One-hour slots, no seasonality (24 bins).
    pub fn hourly() -> Self {
        Self {
            bin_width_secs: 3600,
            seasonality: Seasonality::None,
        }
    }

    /// Slot width in seconds.
    #[inline]
    pub fn bin_width_secs(&self) -> u32 {
        self.bin_width_secs
    }

    /// Period-of-year partition.
    #[inline]
    pub fn seasonality(&self) -> Seasonality {
        self.seasonality
    }

    /// Number of slots in one day.
    #[inline]
    pub fn slots_per_day(&self) -> u32 {
        SECONDS_PER_DAY.div_ceil(self.bin_width_secs)
    }

    /// Total number of bins (slots per day times seasons).
    #[inline]
    pub fn bin_count(&self) -> usize {
        self.slots_per_day() as usize * self.seasonality.season_count() as usize
    }

    /// Maps a timestamp to its bin.
    pub fn bin_of(&self, timestamp: NaiveDateTime) -> TimeBin {
        // Leap-second representations report up to 86399 here as well.
        let secs = timestamp.time().num_seconds_from_midnight();
        let slot = (secs / self.bin_width_secs).min(self.slots_per_day() - 1);
        let season = self.seasonality.season_of_month(timestamp.month());
        TimeBin::new(season, slot)
    }

    /// Returns `true` if the bin belongs to this scheme.
    #[inline]
    pub fn contains(&self, bin: TimeBin) -> bool {
        bin.season < self.seasonality.season_count() && bin.slot < self.slots_per_day()
    }

    /// Dense index of a bin in `0..bin_count()`, or `None` if foreign.
    #[inline]
    pub fn index_of(&self, bin: TimeBin) -> Option<usize> {
        self.contains(bin).then(|| {
            bin.season as usize * self.slots_per_day() as usize + bin.slot as usize
        })
    }

    /// Start and end (exclusive) of a slot, in seconds from midnight.
    pub fn slot_span(&self, slot: u32) -> (u32, u32) {
        let start = slot.saturating_mul(self.bin_width_secs).min(SECONDS_PER_DAY);
        let end = start.saturating_add(self.bin_width_secs).min(SECONDS_PER_DAY);
        (start, end)
    }

    /// Iterates over every bin of the scheme in ascending order.
    pub fn bins(&self) -> impl Iterator<Item = TimeBin> {
        let slots = self.slots_per_day();
        let seasons = self.seasonality.season_count();
        (0..seasons).flat_map(move |season| (0..slots).map(move |slot| TimeBin::new(season, slot)))
    }
}

impl Default for BinningScheme {
    fn default() -> Self {
        Self::hourly()
    }
}
