//! Step-by-step synthesis reproduces batch synthesis sample for sample.

mod common;

use chrono::Duration;
use common::{ar1_reference, midnight};
use proptest::prelude::*;
use regsig_models::calibration::{CalibrationConfig, DynamicsModel, ProfileCalibrator};
use regsig_models::ProfileStore;
use regsig_synth::{BatchSynthesizer, GeneratorState, StepGenerator, SynthesisConfig};
use std::sync::{Arc, OnceLock};

fn calibrate(dynamics: DynamicsModel, bin_width_secs: u32) -> Arc<ProfileStore> {
    let reference = ar1_reference(midnight(2024, 1, 30), 2, 0.0, 0.25, 0.9, 17);
    let config = CalibrationConfig::builder()
        .dynamics(dynamics)
        .bin_width_secs(bin_width_secs)
        .build()
        .unwrap();
    Arc::new(ProfileCalibrator::new(config).calibrate(&reference).unwrap())
}

fn ramp_store() -> Arc<ProfileStore> {
    static STORE: OnceLock<Arc<ProfileStore>> = OnceLock::new();
    Arc::clone(STORE.get_or_init(|| calibrate(DynamicsModel::RampIncrement, 3600)))
}

fn markov_store() -> Arc<ProfileStore> {
    static STORE: OnceLock<Arc<ProfileStore>> = OnceLock::new();
    Arc::clone(STORE.get_or_init(|| {
        calibrate(DynamicsModel::Markov { levels: 41 }, 3600)
    }))
}

fn assert_equivalent(store: Arc<ProfileStore>, config: SynthesisConfig) {
    let batch = BatchSynthesizer::new(&store).generate(&config).unwrap();
    let horizon = config.horizon().unwrap();

    let mut generator = StepGenerator::new();
    let initial = generator.init(Arc::clone(&store), config).unwrap();
    assert_eq!(initial, batch.samples()[0]);
    for (i, expected) in batch.samples()[1..].iter().enumerate() {
        assert_eq!(generator.do_step().unwrap(), *expected, "step {}", i + 1);
    }
    assert_eq!(generator.steps_taken(), horizon);
    assert_eq!(generator.state(), GeneratorState::Exhausted);
    assert!(generator.do_step().is_err());
}

#[test]
fn ramp_model_equivalence() {
    let config = SynthesisConfig::builder()
        .horizon(2_000)
        .start_time(midnight(2024, 6, 3))
        .seed(42)
        .build()
        .unwrap();
    assert_equivalent(ramp_store(), config);
}

#[test]
fn markov_model_equivalence() {
    let config = SynthesisConfig::builder()
        .horizon(2_000)
        .start_time(midnight(2024, 6, 3) + Duration::minutes(59))
        .seed(7)
        .build()
        .unwrap();
    assert_equivalent(markov_store(), config);
}

#[test]
fn equivalence_with_explicit_initial_level_and_global_ramp() {
    let config = SynthesisConfig::builder()
        .horizon(1_500)
        .start_time(midnight(2024, 6, 3))
        .seed(3)
        .initial_level(0.4)
        .max_ramp_rate(0.01)
        .build()
        .unwrap();
    assert_equivalent(ramp_store(), config);
}

#[test]
fn equivalence_across_short_bins_and_midnight() {
    let store = calibrate(DynamicsModel::RampIncrement, 900);
    assert_eq!(store.len(), 96);
    let config = SynthesisConfig::builder()
        .horizon(1_800)
        .start_time(midnight(2024, 2, 1) - Duration::minutes(37))
        .seed(11)
        .build()
        .unwrap();
    assert_equivalent(store, config);
}

#[test]
fn unbounded_generator_matches_batch_prefix() {
    let store = ramp_store();
    let bounded = SynthesisConfig::builder()
        .horizon(500)
        .seed(99)
        .build()
        .unwrap();
    let batch = BatchSynthesizer::new(&store).generate(&bounded).unwrap();

    let unbounded = SynthesisConfig::builder().seed(99).build().unwrap();
    let mut generator = StepGenerator::new();
    generator.init(store, unbounded).unwrap();
    let stepped: Vec<_> = generator
        .by_ref()
        .take(500)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(stepped.as_slice(), &batch.samples()[1..]);
    assert_eq!(generator.state(), GeneratorState::Ready);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_equivalence_for_any_seed(seed in any::<u64>(), horizon in 0usize..300, markov in any::<bool>()) {
        let store = if markov { markov_store() } else { ramp_store() };
        let config = SynthesisConfig::builder()
            .horizon(horizon)
            .start_time(midnight(2024, 6, 3) + Duration::minutes(50))
            .seed(seed)
            .build()
            .unwrap();
        let batch = BatchSynthesizer::new(&store).generate(&config).unwrap();

        let mut generator = StepGenerator::new();
        let mut stepped = vec![generator.init(Arc::clone(&store), config).unwrap()];
        for sample in generator.by_ref() {
            stepped.push(sample.unwrap());
        }
        prop_assert_eq!(stepped.as_slice(), batch.samples());
        prop_assert_eq!(generator.state(), GeneratorState::Exhausted);
    }
}
