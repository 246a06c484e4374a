use super::{sweep_len, ConvLayer};
use crate::error::ConvNetError;
use crate::nn::layer::{InnerLayer, Layer};
use crate::nn::spec::ConvSpec;
use crate::utils::testing::seeded_rng;
use crate::vol::{Shape, Vol};

fn conv(spec: ConvSpec, in_shape: Shape) -> Result<ConvLayer, ConvNetError> {
    ConvLayer::new(&spec, in_shape, &mut seeded_rng(11))
}

#[test]
fn test_conv_output_size_uses_stride_not_stride_plus_one() -> Result<(), ConvNetError> {
    // 5x5 input, 3x3 filter, stride 1, no pad: 3 valid positions per axis
    let layer = conv(ConvSpec::new(3, 4), Shape::new(5, 5, 2))?;
    assert_eq!(layer.out_shape(), Shape::new(3, 3, 4));

    // "same" padding keeps the spatial size
    let layer = conv(ConvSpec::new(5, 16).pad(2), Shape::new(32, 32, 3))?;
    assert_eq!(layer.out_shape(), Shape::new(32, 32, 16));

    // stride 2 halves it, flooring partial windows
    let layer = conv(ConvSpec::new(3, 1).stride(2).pad(1), Shape::new(7, 6, 1))?;
    assert_eq!(layer.out_shape(), Shape::new(4, 3, 1));

    assert_eq!(sweep_len(24, 0, 5, 1), 20);
    Ok(())
}

#[test]
fn test_conv_rejects_oversized_filter() {
    let result = conv(ConvSpec::new(5, 1), Shape::new(3, 3, 1));
    assert!(matches!(result, Err(ConvNetError::InvalidSpec { .. })));
    let result = conv(ConvSpec::new(3, 1).stride(0), Shape::new(3, 3, 1));
    assert!(matches!(result, Err(ConvNetError::InvalidSpec { .. })));
}

#[test]
fn test_conv_forward_with_padding() -> Result<(), ConvNetError> {
    // 3x3x1 input of ones, single 3x3 filter of ones, pad 1: each output counts the
    // in-bounds taps of its window
    let mut layer = conv(ConvSpec::new(3, 1).pad(1).bias_pref(0.5), Shape::new(3, 3, 1))?;
    layer.filters[0].set_const(1.0);
    let input = Vol::full(3, 3, 1, 1.0);
    let out = layer.forward(&input, false);
    assert_eq!(out.shape(), Shape::new(3, 3, 1));
    let expected = [4.5, 6.5, 4.5, 6.5, 9.5, 6.5, 4.5, 6.5, 4.5];
    assert_eq!(out.w(), &expected);
    Ok(())
}

#[test]
fn test_conv_backward_shared_weights() -> Result<(), ConvNetError> {
    // 1-D style check on a 3x1x1 input with a 2x1 filter: two applications share weights
    let mut layer = conv(ConvSpec::new(2, 1).sy(1), Shape::new(3, 1, 1))?;
    layer.filters[0].w_mut().copy_from_slice(&[2.0, 3.0]);
    layer.biases.w_mut()[0] = 0.0;

    let mut input = Vol::from_shape_vec(3, 1, 1, vec![1.0, 10.0, 100.0])?;
    let mut out = layer.forward(&input, false);
    assert_eq!(out.w(), &[32.0, 320.0]);

    out.dw_mut().copy_from_slice(&[1.0, 1.0]);
    layer.backward(&mut input, &out);
    // the middle cell is touched by both applications
    assert_eq!(input.dw(), &[2.0, 5.0, 3.0]);
    assert_eq!(layer.filters[0].dw(), &[11.0, 110.0]);
    assert_eq!(layer.biases.dw(), &[2.0]);
    Ok(())
}

#[test]
fn test_conv_backward_matches_finite_difference_on_filters() -> Result<(), ConvNetError> {
    let mut rng = seeded_rng(5);
    let mut layer = conv(ConvSpec::new(3, 2).stride(2).pad(1), Shape::new(5, 5, 2))?;
    let mut input = Vol::random(5, 5, 2, &mut rng);

    // loss = sum(out), so every chain gradient is 1
    let mut out = layer.forward(&input, false);
    out.dw_mut().fill(1.0);
    layer.backward(&mut input, &out);

    let delta = 1e-6;
    for i in 0..layer.filters[1].len() {
        let analytic = layer.filters[1].dw()[i];
        let old = layer.filters[1].w()[i];
        layer.filters[1].w_mut()[i] = old + delta;
        let plus: f64 = layer.forward(&input, false).w().iter().sum();
        layer.filters[1].w_mut()[i] = old - delta;
        let minus: f64 = layer.forward(&input, false).w().iter().sum();
        layer.filters[1].w_mut()[i] = old;
        let numeric = (plus - minus) / (2.0 * delta);
        assert!((analytic - numeric).abs() < 1e-5, "filter grad {}: {} vs {}", i, analytic, numeric);
    }
    Ok(())
}
