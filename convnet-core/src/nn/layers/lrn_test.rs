use super::LrnLayer;
use crate::error::ConvNetError;
use crate::nn::layer::{InnerLayer, Layer};
use crate::nn::spec::LrnSpec;
use crate::utils::testing::seeded_rng;
use crate::vol::{Shape, Vol};
use approx::assert_relative_eq;

#[test]
fn test_lrn_forward_single_slice_window() -> Result<(), ConvNetError> {
    // n = 1: each value is normalised by itself only
    let mut layer = LrnLayer::new(&LrnSpec::new(1.0, 1, 1.0, 1.0), Shape::new(1, 1, 2))?;
    let out = layer.forward(&Vol::from_vec(vec![1.0, 2.0]), false);
    assert_relative_eq!(out.w()[0], 1.0 / 2.0);
    assert_relative_eq!(out.w()[1], 2.0 / 5.0);
    Ok(())
}

#[test]
fn test_lrn_window_is_clipped_at_depth_edges() -> Result<(), ConvNetError> {
    let mut layer = LrnLayer::new(&LrnSpec::new(2.0, 3, 3.0, 0.5), Shape::new(1, 1, 3))?;
    let input = Vol::from_vec(vec![1.0, 1.0, 1.0]);
    let out = layer.forward(&input, false);
    // edges see two slices, the middle sees three
    assert_relative_eq!(out.w()[0], 1.0 / (2.0 + 2.0f64).sqrt());
    assert_relative_eq!(out.w()[1], 1.0 / (2.0 + 3.0f64).sqrt());
    assert_relative_eq!(out.w()[2], out.w()[0]);
    Ok(())
}

#[test]
fn test_lrn_backward_matches_finite_difference() -> Result<(), ConvNetError> {
    let shape = Shape::new(2, 2, 5);
    let mut layer = LrnLayer::new(&LrnSpec::new(2.0, 3, 1e-1, 0.75), shape)?;
    let mut rng = seeded_rng(17);
    let mut input = Vol::random(2, 2, 5, &mut rng);
    input.w_mut().iter_mut().for_each(|v| *v *= 3.0);
    let weights = Vol::random(2, 2, 5, &mut rng);

    // loss = sum(weights * out)
    let mut out = layer.forward(&input, false);
    out.dw_mut().copy_from_slice(weights.w());
    layer.backward(&mut input, &out);

    let loss = |layer: &mut LrnLayer, x: &Vol| -> f64 {
        let o = layer.forward(x, false);
        o.w().iter().zip(weights.w()).map(|(a, b)| a * b).sum()
    };
    let h = 1e-5;
    for i in 0..input.len() {
        let mut plus = input.clone_values();
        plus.w_mut()[i] += h;
        let mut minus = input.clone_values();
        minus.w_mut()[i] -= h;
        let numeric = (loss(&mut layer, &plus) - loss(&mut layer, &minus)) / (2.0 * h);
        assert_relative_eq!(input.dw()[i], numeric, epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn test_lrn_even_window_still_builds() {
    assert!(LrnLayer::new(&LrnSpec::new(1.0, 4, 1e-4, 0.75), Shape::new(1, 1, 8)).is_ok());
    assert!(LrnLayer::new(&LrnSpec::new(1.0, 0, 1e-4, 0.75), Shape::new(1, 1, 8)).is_err());
}
