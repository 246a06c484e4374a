// convnet-core/src/utils/testing.rs

use crate::vol::{Shape, Vol};
use approx::abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Checks that a volume has the expected shape and values within `tolerance`.
/// Panics with the first mismatching index otherwise.
pub fn check_vol_near(actual: &Vol, expected_shape: Shape, expected_data: &[f64], tolerance: f64) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");
    assert_eq!(actual.len(), expected_data.len(), "Data length mismatch");

    for (i, (a, e)) in actual.w().iter().zip(expected_data).enumerate() {
        if !abs_diff_eq!(*a, *e, epsilon = tolerance) {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i,
                a,
                e,
                (a - e).abs(),
                tolerance
            );
        }
    }
}

/// Deterministic generator for reproducible tests and examples.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
