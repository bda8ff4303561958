//! Reference-series fixtures shared by the integration tests.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use regsig_core::types::ReferenceSeries;

/// Samples per day at a 4 s interval.
pub const SAMPLES_PER_DAY: usize = 21_600;

pub fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// First-order autoregressive reference at 4 s, clamped to `[-1, 1]`.
pub fn ar1_reference(
    start: NaiveDateTime,
    days: usize,
    mean: f64,
    std_dev: f64,
    rho: f64,
    seed: u64,
) -> ReferenceSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let innovation = Normal::new(0.0, std_dev * (1.0 - rho * rho).sqrt()).unwrap();
    let mut x = mean;
    let values: Vec<f64> = (0..days * SAMPLES_PER_DAY)
        .map(|_| {
            let current = x;
            x = (mean + rho * (x - mean) + innovation.sample(&mut rng)).clamp(-1.0, 1.0);
            current
        })
        .collect();
    ReferenceSeries::from_values(start, Duration::seconds(4), values).unwrap()
}
