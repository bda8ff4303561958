//! Single-step sampling kernel shared by batch and step synthesis.
//!
//! Both [`BatchSynthesizer`](crate::BatchSynthesizer) and
//! [`StepGenerator`](crate::StepGenerator) hold a [`SignalState`] and call
//! [`SignalState::advance`] once per timestep. Because the draw order lives
//! in one place, equal seeds give equal samples in either mode.
//!
//! ## Step order
//!
//! 1. Look up the profile of the bin containing the current time
//! 2. Draw one value of the profile's [`DrawKind`](regsig_models::DrawKind)
//! 3. Propose the next level and clamp it to the amplitude bounds
//! 4. Truncate the move to the signed ramp bound
//! 5. Advance the clock by one timestep

use crate::config::SynthesisConfig;
use crate::error::{ConfigError, SynthesisError};
use crate::rng::SignalRng;
use chrono::NaiveDateTime;
use regsig_core::types::Sample;
use regsig_models::ProfileStore;
use tracing::trace;

/// Evolving state of one synthesis run.
#[derive(Debug)]
pub struct SignalState {
    level: f64,
    time: NaiveDateTime,
    steps: usize,
    rng: SignalRng,
}

impl SignalState {
    /// Seeds the run's random stream and sets the initial level.
    ///
    /// An explicit initial level in `config` consumes no draw; otherwise one
    /// draw from the start bin's profile is taken and clamped to the
    /// amplitude bounds.
    ///
    /// # Errors
    ///
    /// Returns `SynthesisError::Profile` if the start bin has no profile.
    pub fn initialise(store: &ProfileStore, config: &SynthesisConfig) -> Result<Self, SynthesisError> {
        let mut rng = SignalRng::from_seed(config.seed());
        let start = config.start_time();
        let level = match config.initial_level() {
            Some(level) => level,
            None => {
                let (_, profile) = store.profile_at(start)?;
                let draw = rng.draw(profile.draw_kind());
                config.amplitude_bounds().clamp(profile.initial_level(draw))
            }
        };
        Ok(Self {
            level,
            time: start,
            steps: 0,
            rng,
        })
    }

    /// Current level.
    #[inline]
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Current simulated time.
    #[inline]
    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    /// Steps taken since initialisation.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Draws consumed from the run's random stream.
    #[inline]
    pub fn draws(&self) -> u64 {
        self.rng.position()
    }

    /// Current state as a sample.
    #[inline]
    pub fn current(&self) -> Sample {
        Sample::new(self.time, self.level)
    }

    /// Runs one step and returns the new sample.
    ///
    /// On error the state is left unchanged.
    ///
    /// # Errors
    ///
    /// - `SynthesisError::Profile` if the current bin has no profile
    /// - `ConfigError::StartTimeOutOfRange` if the next timestamp is not
    ///   representable
    pub fn advance(&mut self, store: &ProfileStore, config: &SynthesisConfig) -> Result<Sample, SynthesisError> {
        let next_time = self.time.checked_add_signed(config.timestep()).ok_or(
            ConfigError::StartTimeOutOfRange {
                start: config.start_time(),
                steps: self.steps + 1,
            },
        )?;
        let (bin, profile) = store.profile_at(self.time)?;

        let bounds = config.amplitude_bounds();
        let draw = self.rng.draw(profile.draw_kind());
        let proposed = bounds.clamp(profile.propose(self.level, draw));

        let limit = config.max_ramp_rate().unwrap_or_else(|| profile.max_ramp());
        let increment = proposed - self.level;
        let next = if increment.abs() > limit {
            trace!(%bin, increment, limit, "ramp truncated");
            bounds.clamp(self.level + limit.copysign(increment))
        } else {
            proposed
        };

        self.level = next;
        self.time = next_time;
        self.steps += 1;
        Ok(self.current())
    }
}
