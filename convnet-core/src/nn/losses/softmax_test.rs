use super::SoftmaxLayer;
use crate::error::ConvNetError;
use crate::nn::layer::{Layer, LossLayer, Target};
use crate::nn::spec::SoftmaxSpec;
use crate::utils::testing::seeded_rng;
use crate::vol::{Shape, Vol};
use approx::{assert_abs_diff_eq, assert_relative_eq};

fn softmax(n: usize) -> Result<SoftmaxLayer, ConvNetError> {
    SoftmaxLayer::new(&SoftmaxSpec { num_classes: n }, Shape::new(1, 1, n))
}

#[test]
fn test_softmax_outputs_a_distribution() -> Result<(), ConvNetError> {
    let mut layer = softmax(10)?;
    assert_eq!(layer.num_classes(), 10);
    let mut rng = seeded_rng(2);
    for _ in 0..20 {
        let mut input = Vol::random(1, 1, 10, &mut rng);
        input.w_mut().iter_mut().for_each(|v| *v *= 5.0);
        let out = layer.forward(&input, false);
        let sum: f64 = out.w().iter().sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-9);
        assert!(out.w().iter().all(|&p| p > 0.0 && p < 1.0));
    }
    Ok(())
}

#[test]
fn test_softmax_is_shift_invariant_and_stable() -> Result<(), ConvNetError> {
    let mut layer = softmax(3)?;
    let a = layer.forward(&Vol::from_vec(vec![1.0, 2.0, 3.0]), false);
    let b = layer.forward(&Vol::from_vec(vec![1001.0, 1002.0, 1003.0]), false);
    for (x, y) in a.w().iter().zip(b.w()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-12);
    }
    assert!(b.w().iter().all(|p| p.is_finite()));
    Ok(())
}

#[test]
fn test_softmax_backward_gradient_and_loss() -> Result<(), ConvNetError> {
    let mut layer = softmax(3)?;
    let mut input = Vol::from_vec(vec![0.0, 0.0, 0.0]);
    let _ = layer.forward(&input, false);
    let loss = layer.backward_loss(&mut input, &Target::Class(1))?;
    assert_relative_eq!(loss, 3.0f64.ln(), epsilon = 1e-12);
    let third = 1.0 / 3.0;
    assert_relative_eq!(input.dw()[0], third, epsilon = 1e-12);
    assert_relative_eq!(input.dw()[1], third - 1.0, epsilon = 1e-12);
    assert_relative_eq!(input.dw()[2], third, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_softmax_rejects_bad_targets() -> Result<(), ConvNetError> {
    let mut layer = softmax(2)?;
    let mut input = Vol::from_vec(vec![0.5, 0.1]);
    let _ = layer.forward(&input, false);
    assert_eq!(
        layer.backward_loss(&mut input, &Target::Class(2)),
        Err(ConvNetError::LabelOutOfRange { label: 2, classes: 2 })
    );
    assert!(matches!(
        layer.backward_loss(&mut input, &Target::Value(1.0)),
        Err(ConvNetError::TargetMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_softmax_requires_matching_input() {
    let result = SoftmaxLayer::new(&SoftmaxSpec { num_classes: 3 }, Shape::new(1, 1, 4));
    assert!(matches!(result, Err(ConvNetError::InvalidSpec { .. })));
}
