//! Calibration recovers the statistics of a known generating process.
//!
//! The reference series is a first-order autoregressive signal with fixed
//! mean, spread and lag-one correlation, sampled every 4 s for three days.

use approx::assert_abs_diff_eq;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use regsig_core::types::ReferenceSeries;
use regsig_models::calibration::{CalibrationConfig, DynamicsModel, ProfileCalibrator};
use regsig_models::{CalibrationError, Dynamics};

const MEAN: f64 = 0.1;
const STD: f64 = 0.2;
const RHO: f64 = 0.95;

fn ar1_reference(days: usize, seed: u64) -> ReferenceSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let innovation = Normal::new(0.0, STD * (1.0 - RHO * RHO).sqrt()).unwrap();
    let n = days * 21_600;
    let mut x = MEAN;
    let values: Vec<f64> = (0..n)
        .map(|_| {
            let current = x;
            x = (MEAN + RHO * (x - MEAN) + innovation.sample(&mut rng)).clamp(-1.0, 1.0);
            current
        })
        .collect();
    let start = NaiveDate::from_ymd_opt(2023, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    ReferenceSeries::from_values(start, Duration::seconds(4), values).unwrap()
}

#[test]
fn ramp_calibration_recovers_ar1_parameters() {
    let series = ar1_reference(3, 7);
    let config = CalibrationConfig::builder()
        .min_observations_per_bin(2_000)
        .build()
        .unwrap();
    let store = ProfileCalibrator::new(config).calibrate(&series).unwrap();

    assert_eq!(store.len(), 24);
    assert_eq!(store.sampling_interval(), Duration::seconds(4));

    for (bin, profile) in store.iter() {
        let level = profile.level();
        assert_eq!(level.count, 2_700, "{}", bin);
        assert_abs_diff_eq!(level.mean, MEAN, epsilon = 0.1);
        assert_abs_diff_eq!(level.std_dev, STD, epsilon = 0.06);

        match profile.dynamics() {
            Dynamics::Ramp(ramp) => {
                assert_abs_diff_eq!(ramp.autocorrelation, RHO, epsilon = 0.05);
                assert!(ramp.innovation_std > 0.0);
                assert!(ramp.max_abs >= ramp.std_dev);
                assert_eq!(profile.max_ramp(), ramp.max_abs);
            }
            other => panic!("expected ramp dynamics, got {:?}", other),
        }
    }
}

#[test]
fn markov_rows_are_probability_distributions() {
    let series = ar1_reference(1, 11);
    let config = CalibrationConfig::builder()
        .dynamics(DynamicsModel::Markov { levels: 20 })
        .build()
        .unwrap();
    let store = ProfileCalibrator::new(config).calibrate(&series).unwrap();

    for (_, profile) in store.iter() {
        let Dynamics::Markov(table) = profile.dynamics() else {
            panic!("expected markov dynamics");
        };
        for from in 0..table.levels() {
            let total: f64 = (0..table.levels()).map(|to| table.probability(from, to).unwrap()).sum();
            assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn insufficient_data_produces_no_store() {
    let series = ar1_reference(1, 3);
    let config = CalibrationConfig::builder()
        .min_observations_per_bin(901)
        .build()
        .unwrap();
    match ProfileCalibrator::new(config).calibrate(&series) {
        Err(CalibrationError::InsufficientObservations { got, need, .. }) => {
            assert_eq!(got, 900);
            assert_eq!(need, 901);
        }
        other => panic!("expected insufficiency error, got {:?}", other),
    }
}
