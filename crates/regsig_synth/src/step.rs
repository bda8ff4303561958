//! Step-at-a-time synthesis for co-simulation.
//!
//! A [`StepGenerator`] returns one sample per [`do_step`](StepGenerator::do_step)
//! call, driven by the same kernel as batch synthesis. It moves through three
//! states:
//!
//! ```text
//! Uninitialised --init--> Ready --(horizon reached)--> Exhausted
//! ```
//!
//! Stepping outside `Ready` is a [`UsageError`]; no sample is produced. A
//! failed step also ends the run.

use crate::config::SynthesisConfig;
use crate::error::{SynthesisError, UsageError};
use crate::kernel::SignalState;
use regsig_core::types::Sample;
use regsig_models::ProfileStore;
use std::sync::Arc;
use tracing::debug;

/// Lifecycle state of a [`StepGenerator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorState {
    /// Created, `init` not yet called.
    Uninitialised,
    /// Initialised; `do_step` produces samples.
    Ready,
    /// Configured horizon reached.
    Exhausted,
}

#[derive(Debug)]
struct Session {
    store: Arc<ProfileStore>,
    config: SynthesisConfig,
    state: SignalState,
}

impl Session {
    fn reached_horizon(&self) -> bool {
        self.config
            .horizon()
            .is_some_and(|horizon| self.state.steps() >= horizon)
    }
}

#[derive(Debug)]
enum Phase {
    Uninitialised,
    Ready(Session),
    Exhausted(Session),
}

/// Stateful synthetic-signal generator.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use chrono::{Duration, NaiveDate};
/// use regsig_core::types::ReferenceSeries;
/// use regsig_models::ProfileCalibrator;
/// use regsig_synth::{GeneratorState, StepGenerator, SynthesisConfig};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let values = (0..21_600).map(|i| 0.2 * ((i as f64) / 20.0).sin());
/// let reference = ReferenceSeries::from_values(start, Duration::seconds(4), values).unwrap();
/// let store = Arc::new(ProfileCalibrator::with_defaults().calibrate(&reference).unwrap());
///
/// let config = SynthesisConfig::builder().horizon(2).start_time(start).build().unwrap();
/// let mut generator = StepGenerator::new();
/// assert!(generator.do_step().is_err());
///
/// let initial = generator.init(store, config).unwrap();
/// assert_eq!(initial.timestamp, start);
/// generator.do_step().unwrap();
/// let last = generator.do_step().unwrap();
/// assert_eq!(last.timestamp, start + Duration::seconds(8));
/// assert_eq!(generator.state(), GeneratorState::Exhausted);
/// ```
#[derive(Debug)]
pub struct StepGenerator {
    phase: Phase,
}

impl StepGenerator {
    /// Creates an uninitialised generator.
    pub fn new() -> Self {
        Self {
            phase: Phase::Uninitialised,
        }
    }

    /// Initialises the generator and returns the initial sample.
    ///
    /// With a horizon of zero the generator is immediately exhausted.
    ///
    /// # Errors
    ///
    /// - `UsageError::AlreadyInitialised` unless the generator is uninitialised
    /// - `ConfigError` for an invalid configuration or a timestep that does
    ///   not match the store
    /// - `SynthesisError::Profile` if the start bin has no profile
    pub fn init(&mut self, store: Arc<ProfileStore>, config: SynthesisConfig) -> Result<Sample, SynthesisError> {
        if !matches!(self.phase, Phase::Uninitialised) {
            return Err(UsageError::AlreadyInitialised.into());
        }
        config.validate()?;
        config.check_store(&store)?;

        let state = SignalState::initialise(&store, &config)?;
        let initial = state.current();
        let session = Session {
            store,
            config,
            state,
        };
        debug!(
            seed = session.config.seed(),
            horizon = ?session.config.horizon(),
            "step generator initialised"
        );
        self.phase = if session.reached_horizon() {
            Phase::Exhausted(session)
        } else {
            Phase::Ready(session)
        };
        Ok(initial)
    }

    /// Advances one timestep and returns the new sample.
    ///
    /// The generator becomes exhausted after returning the sample that
    /// completes the horizon, or after returning an error.
    ///
    /// # Errors
    ///
    /// - `UsageError::NotInitialised` before `init`
    /// - `UsageError::Exhausted` once the horizon has been reached
    /// - `SynthesisError::Profile` if the current bin has no profile
    /// - `ConfigError::StartTimeOutOfRange` if the next timestamp is not
    ///   representable
    pub fn do_step(&mut self) -> Result<Sample, SynthesisError> {
        let session = match &mut self.phase {
            Phase::Uninitialised => return Err(UsageError::NotInitialised.into()),
            Phase::Exhausted(session) => {
                return Err(UsageError::Exhausted {
                    steps: session.state.steps(),
                }
                .into())
            }
            Phase::Ready(session) => session,
        };

        let result = session.state.advance(&session.store, &session.config);
        if result.is_err() || session.reached_horizon() {
            self.exhaust();
        }
        result
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GeneratorState {
        match self.phase {
            Phase::Uninitialised => GeneratorState::Uninitialised,
            Phase::Ready(_) => GeneratorState::Ready,
            Phase::Exhausted(_) => GeneratorState::Exhausted,
        }
    }

    /// Most recent sample, `None` before `init`.
    pub fn current(&self) -> Option<Sample> {
        self.session().map(|s| s.state.current())
    }

    /// Steps taken since `init`.
    pub fn steps_taken(&self) -> usize {
        self.session().map_or(0, |s| s.state.steps())
    }

    /// Steps left before exhaustion; `None` when unbounded or uninitialised.
    pub fn remaining(&self) -> Option<usize> {
        let session = self.session()?;
        let horizon = session.config.horizon()?;
        Some(horizon.saturating_sub(session.state.steps()))
    }

    fn session(&self) -> Option<&Session> {
        match &self.phase {
            Phase::Uninitialised => None,
            Phase::Ready(session) | Phase::Exhausted(session) => Some(session),
        }
    }

    fn exhaust(&mut self) {
        self.phase = match std::mem::replace(&mut self.phase, Phase::Uninitialised) {
            Phase::Ready(session) => Phase::Exhausted(session),
            other => other,
        };
    }
}

impl Default for StepGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Yields `do_step` results while the generator is ready.
///
/// An error is yielded once, after which the iterator is finished.
impl Iterator for StepGenerator {
    type Item = Result<Sample, SynthesisError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state() {
            GeneratorState::Ready => Some(self.do_step()),
            _ => None,
        }
    }
}
