//! # regsig_synth: Regulation Signal Synthesis (Layer 3)
//!
//! ## Layer 3 Role
//!
//! regsig_synth samples synthetic fast-frequency-regulation dispatch signals
//! from a calibrated [`ProfileStore`](regsig_models::ProfileStore):
//! - [`rng`]: Seeded random stream owned by each synthesis run
//! - [`kernel`]: The single-step sampling routine shared by both modes
//! - [`batch`]: Full-horizon synthesis in one call
//! - [`step`]: Stateful one-value-per-tick generator for co-simulation
//! - [`ensemble`]: Independent runs over many seeds in parallel
//! - [`similarity`]: Per-bin comparison of synthetic output against profiles
//! - [`settings`]: TOML settings for calibration and synthesis
//!
//! ## Batch/Step Equivalence
//!
//! Both modes drive the same [`SignalState`](kernel::SignalState). For an
//! identical store, seed, start time and timestep, `init` followed by N
//! `do_step` calls yields exactly the first N + 1 batch samples.
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::{Duration, NaiveDate};
//! use regsig_core::types::ReferenceSeries;
//! use regsig_models::ProfileCalibrator;
//! use regsig_synth::{BatchSynthesizer, StepGenerator, SynthesisConfig};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let values = (0..21_600).map(|i| 0.4 * ((i as f64) / 30.0).sin());
//! let reference = ReferenceSeries::from_values(start, Duration::seconds(4), values).unwrap();
//! let store = Arc::new(ProfileCalibrator::with_defaults().calibrate(&reference).unwrap());
//!
//! let config = SynthesisConfig::builder()
//!     .horizon(50)
//!     .start_time(start)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let batch = BatchSynthesizer::new(&store).generate(&config).unwrap();
//! assert_eq!(batch.len(), 51);
//!
//! let mut generator = StepGenerator::new();
//! let first = generator.init(Arc::clone(&store), config).unwrap();
//! assert_eq!(first, batch.samples()[0]);
//! for expected in &batch.samples()[1..] {
//!     assert_eq!(generator.do_step().unwrap(), *expected);
//! }
//! assert!(generator.do_step().is_err());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod batch;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod kernel;
pub mod rng;
pub mod series;
pub mod settings;
pub mod similarity;
pub mod step;

pub use batch::{generate, BatchSynthesizer};
pub use config::{SynthesisConfig, SynthesisConfigBuilder};
pub use error::{ConfigError, SettingsError, SynthesisError, UsageError};
pub use rng::SignalRng;
pub use series::{GeneratedSeries, TimeUnit};
pub use settings::SignalSettings;
pub use similarity::{compare, SimilarityReport, SimilarityTolerance};
pub use step::{GeneratorState, StepGenerator};
