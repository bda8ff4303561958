//! Reproducibility, bound and horizon properties of generated signals.

mod common;

use chrono::Duration;
use common::{ar1_reference, midnight};
use proptest::prelude::*;
use regsig_core::types::RegulationDirection;
use regsig_models::calibration::{CalibrationConfig, DynamicsModel, ProfileCalibrator};
use regsig_models::ProfileStore;
use regsig_synth::{generate, BatchSynthesizer, SynthesisConfig};
use std::sync::OnceLock;

const EPS: f64 = 1e-12;

fn store(markov: bool) -> &'static ProfileStore {
    static RAMP: OnceLock<ProfileStore> = OnceLock::new();
    static MARKOV: OnceLock<ProfileStore> = OnceLock::new();
    let (cell, dynamics) = if markov {
        (&MARKOV, DynamicsModel::Markov { levels: 41 })
    } else {
        (&RAMP, DynamicsModel::RampIncrement)
    };
    cell.get_or_init(|| {
        let reference = ar1_reference(midnight(2023, 11, 5), 1, 0.05, 0.3, 0.85, 23);
        let config = CalibrationConfig::builder()
            .dynamics(dynamics)
            .build()
            .unwrap();
        ProfileCalibrator::new(config).calibrate(&reference).unwrap()
    })
}

#[test]
fn same_seed_same_signal() {
    for markov in [false, true] {
        let a = generate(store(markov), 3_000, Duration::seconds(4), midnight(2024, 1, 1), 42).unwrap();
        let b = generate(store(markov), 3_000, Duration::seconds(4), midnight(2024, 1, 1), 42).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn different_seeds_different_signals() {
    let a = generate(store(false), 100, Duration::seconds(4), midnight(2024, 1, 1), 1).unwrap();
    let b = generate(store(false), 100, Duration::seconds(4), midnight(2024, 1, 1), 2).unwrap();
    assert_ne!(a.samples(), b.samples());
}

#[test]
fn horizon_zero_returns_initial_sample_only() {
    let series = generate(store(true), 0, Duration::seconds(4), midnight(2024, 1, 1), 5).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series.start(), midnight(2024, 1, 1));
}

#[test]
fn direction_bounds_are_respected() {
    for (direction, lower, upper) in [
        (RegulationDirection::UpOnly, 0.0, 1.0),
        (RegulationDirection::DownOnly, -1.0, 0.0),
    ] {
        for markov in [false, true] {
            let config = SynthesisConfig::builder()
                .horizon(5_000)
                .direction(direction)
                .seed(8)
                .build()
                .unwrap();
            let series = BatchSynthesizer::new(store(markov)).generate(&config).unwrap();
            assert!(series.values().all(|v| (lower..=upper).contains(&v)));
        }
    }
}

#[test]
fn calibrated_ramp_bound_holds_without_override() {
    for markov in [false, true] {
        let store = store(markov);
        let config = SynthesisConfig::builder()
            .horizon(10_000)
            .seed(77)
            .build()
            .unwrap();
        let series = BatchSynthesizer::new(store).generate(&config).unwrap();
        for pair in series.samples().windows(2) {
            let limit = store.profile_at(pair[0].timestamp).unwrap().1.max_ramp();
            assert!((pair[1].value - pair[0].value).abs() <= limit + EPS);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_length_timestamps_and_bounds(
        seed in any::<u64>(),
        horizon in 0usize..2_000,
        offset_secs in 0i64..86_400,
        ramp in 0.001f64..0.2,
        markov in any::<bool>(),
    ) {
        let start = midnight(2024, 3, 30) + Duration::seconds(offset_secs);
        let config = SynthesisConfig::builder()
            .horizon(horizon)
            .start_time(start)
            .seed(seed)
            .max_ramp_rate(ramp)
            .build()
            .unwrap();
        let series = BatchSynthesizer::new(store(markov)).generate(&config).unwrap();

        prop_assert_eq!(series.len(), horizon + 1);
        for (i, sample) in series.samples().iter().enumerate() {
            prop_assert_eq!(sample.timestamp, start + Duration::seconds(4 * i as i64));
            prop_assert!((-1.0..=1.0).contains(&sample.value));
        }
        prop_assert!(series.max_abs_step() <= ramp + EPS);
    }
}
