//! Independent synthesis runs across many seeds.
//!
//! Every run owns its random stream, so runs over different seeds share
//! nothing but the read-only [`ProfileStore`] and can execute on the rayon
//! thread pool. The result for each seed equals a sequential
//! [`BatchSynthesizer::generate`] call with that seed.
//!
//! ```rust
//! use chrono::{Duration, NaiveDate};
//! use regsig_core::types::ReferenceSeries;
//! use regsig_models::ProfileCalibrator;
//! use regsig_synth::ensemble::generate_ensemble;
//! use regsig_synth::SynthesisConfig;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let values = (0..21_600).map(|i| 0.3 * ((i as f64) / 25.0).sin());
//! let reference = ReferenceSeries::from_values(start, Duration::seconds(4), values).unwrap();
//! let store = ProfileCalibrator::with_defaults().calibrate(&reference).unwrap();
//!
//! let config = SynthesisConfig::builder().horizon(100).start_time(start).build().unwrap();
//! let runs = generate_ensemble(&store, &config, &[1, 2, 3]).unwrap();
//! assert_eq!(runs.len(), 3);
//! assert!(runs.iter().all(|s| s.len() == 101));
//! ```

use crate::batch::BatchSynthesizer;
use crate::config::SynthesisConfig;
use crate::error::SynthesisError;
use crate::series::GeneratedSeries;
use rayon::prelude::*;
use regsig_models::ProfileStore;
use tracing::info;

/// Generates one series per seed in parallel, returned in seed order.
///
/// All fields of `config` except the seed are shared by every run.
///
/// # Errors
///
/// Returns an error if any run fails; see [`BatchSynthesizer::generate`].
pub fn generate_ensemble(
    store: &ProfileStore,
    config: &SynthesisConfig,
    seeds: &[u64],
) -> Result<Vec<GeneratedSeries>, SynthesisError> {
    let synthesizer = BatchSynthesizer::new(store);
    let runs = seeds
        .par_iter()
        .map(|&seed| synthesizer.generate(&config.with_seed(seed)))
        .collect::<Result<Vec<_>, _>>()?;
    info!(runs = runs.len(), "ensemble synthesis finished");
    Ok(runs)
}
