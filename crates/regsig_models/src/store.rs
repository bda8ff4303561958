//! Immutable, completely covered `TimeBin -> Profile` map.

use crate::error::ProfileError;
use crate::profile::Profile;
use chrono::{Duration, NaiveDateTime};
use regsig_core::types::{AmplitudeBounds, BinningScheme, TimeBin};
use std::collections::BTreeMap;

/// Calibrated profiles for every bin of a [`BinningScheme`].
///
/// # Invariants
///
/// - Every bin of `scheme` has exactly one profile
/// - No profile belongs to a bin outside `scheme`
/// - Contents never change after construction
///
/// The store is `Send + Sync`; share it between independent synthesis runs
/// through an `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileStore {
    scheme: BinningScheme,
    sampling_interval: Duration,
    bounds: AmplitudeBounds,
    profiles: BTreeMap<TimeBin, Profile>,
}

impl ProfileStore {
    /// Assembles a store, verifying complete coverage.
    ///
    /// # Arguments
    ///
    /// * `scheme` - Binning the profiles are indexed by
    /// * `sampling_interval` - Timestep the dynamics were fitted at
    /// * `bounds` - Amplitude range the profiles were fitted within
    /// * `profiles` - One profile per bin
    ///
    /// # Errors
    ///
    /// - `ProfileError::UnknownBin` if a profile's bin is outside the scheme
    /// - `ProfileError::Incomplete` for the first uncovered bin
    /// - `ProfileError::InvalidProfile` for a non-positive sampling interval
    pub fn new(
        scheme: BinningScheme,
        sampling_interval: Duration,
        bounds: AmplitudeBounds,
        profiles: BTreeMap<TimeBin, Profile>,
    ) -> Result<Self, ProfileError> {
        if sampling_interval <= Duration::zero() {
            return Err(ProfileError::InvalidProfile(format!(
                "sampling interval {:?} must be positive",
                sampling_interval
            )));
        }
        if let Some(bin) = profiles.keys().find(|bin| !scheme.contains(**bin)) {
            return Err(ProfileError::UnknownBin { bin: *bin });
        }
        if let Some(bin) = scheme.bins().find(|bin| !profiles.contains_key(bin)) {
            return Err(ProfileError::Incomplete { bin });
        }
        Ok(Self {
            scheme,
            sampling_interval,
            bounds,
            profiles,
        })
    }

    /// Binning scheme.
    #[inline]
    pub fn scheme(&self) -> &BinningScheme {
        &self.scheme
    }

    /// Timestep the dynamics describe.
    #[inline]
    pub fn sampling_interval(&self) -> Duration {
        self.sampling_interval
    }

    /// Amplitude range the profiles were fitted within.
    #[inline]
    pub fn bounds(&self) -> AmplitudeBounds {
        self.bounds
    }

    /// Number of profiles.
    #[inline]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Always `false` for a constructed store.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profile of a bin.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Incomplete` if the bin has no profile.
    pub fn profile(&self, bin: TimeBin) -> Result<&Profile, ProfileError> {
        self.profiles.get(&bin).ok_or(ProfileError::Incomplete { bin })
    }

    /// Profile of the bin containing `timestamp`, together with that bin.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Incomplete` if the bin has no profile.
    pub fn profile_at(&self, timestamp: NaiveDateTime) -> Result<(TimeBin, &Profile), ProfileError> {
        let bin = self.scheme.bin_of(timestamp);
        self.profile(bin).map(|profile| (bin, profile))
    }

    /// Iterates over `(bin, profile)` pairs in bin order.
    pub fn iter(&self) -> impl Iterator<Item = (&TimeBin, &Profile)> {
        self.profiles.iter()
    }
}
