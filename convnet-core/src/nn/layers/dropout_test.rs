use super::DropoutLayer;
use crate::error::ConvNetError;
use crate::nn::layer::{InnerLayer, Layer};
use crate::nn::spec::DropoutSpec;
use crate::utils::testing::seeded_rng;
use crate::vol::{Shape, Vol};
use approx::assert_relative_eq;

fn dropout(p: f64, n: usize) -> Result<DropoutLayer, ConvNetError> {
    DropoutLayer::new(&DropoutSpec::new(p), Shape::new(1, 1, n), seeded_rng(21))
}

#[test]
fn test_dropout_rejects_bad_probability() {
    for p in [-0.1, 1.0, 1.5] {
        assert!(dropout(p, 4).is_err(), "drop_prob {} accepted", p);
    }
}

#[test]
fn test_dropout_inference_scales_by_keep_probability() -> Result<(), ConvNetError> {
    let mut layer = dropout(0.25, 3)?;
    assert_eq!(layer.drop_prob(), 0.25);
    let input = Vol::from_vec(vec![4.0, -8.0, 0.0]);
    let out = layer.forward(&input, false);
    assert_eq!(out.w(), &[3.0, -6.0, 0.0]);
    Ok(())
}

#[test]
fn test_dropout_training_masks_values_and_gradients() -> Result<(), ConvNetError> {
    let n = 1000;
    let mut layer = dropout(0.5, n)?;
    let mut input = Vol::full(1, 1, n, 1.0);
    let mut out = layer.forward(&input, true);

    // survivors pass through unscaled
    assert!(out.w().iter().all(|&v| v == 0.0 || v == 1.0));
    let dropped = out.w().iter().filter(|&&v| v == 0.0).count();
    assert!(dropped > 400 && dropped < 600, "dropped {} of {}", dropped, n);

    out.dw_mut().fill(2.0);
    layer.backward(&mut input, &out);
    for (&v, &g) in out.w().iter().zip(input.dw()) {
        let expected = if v == 0.0 { 0.0 } else { 2.0 };
        assert_relative_eq!(g, expected);
    }
    Ok(())
}

#[test]
fn test_dropout_same_seed_same_mask() -> Result<(), ConvNetError> {
    let input = Vol::full(1, 1, 64, 1.0);
    let a = dropout(0.3, 64)?.forward(&input, true);
    let b = dropout(0.3, 64)?.forward(&input, true);
    assert_eq!(a.w(), b.w());
    Ok(())
}
