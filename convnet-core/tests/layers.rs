mod common;

use common::mlp;
use convnet_core::nn::layers::PoolLayer;
use convnet_core::nn::{Activation, InnerLayer, Layer, LayerSpec, PoolSpec};
use convnet_core::utils::testing::seeded_rng;
use convnet_core::{ConvNetError, Shape, Vol};

#[test]
fn test_softmax_output_is_a_distribution() -> Result<(), ConvNetError> {
    let mut rng = seeded_rng(1);
    let mut net = mlp(
        6,
        &[(12, Activation::Relu)],
        LayerSpec::softmax(5),
        &mut rng,
    )?;
    for _ in 0..50 {
        let mut x = Vol::random(1, 1, 6, &mut rng);
        x.w_mut().iter_mut().for_each(|v| *v *= 10.0);
        let out = net.forward(&x, false)?;
        let sum: f64 = out.w().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum = {}", sum);
        assert!(out.w().iter().all(|&p| p > 0.0 && p < 1.0));
    }
    Ok(())
}

#[test]
fn test_pool_routes_gradient_to_known_maximum() -> Result<(), ConvNetError> {
    let mut pool = PoolLayer::new(&PoolSpec::new(2).stride(2), Shape::new(4, 4, 1))?;
    let mut rng = seeded_rng(3);
    let mut input = Vol::random(4, 4, 1, &mut rng);
    input.set(1, 3, 0, 50.0);

    let mut out = pool.forward(&input, false);
    assert_eq!(out.shape(), Shape::new(2, 2, 1));
    assert_eq!(out.get(0, 1, 0), 50.0);
    out.dw_mut().fill(0.0);
    out.set_grad(0, 1, 0, 1.0);
    pool.backward(&mut input, &out);

    let total: f64 = input.dw().iter().sum();
    assert_eq!(total, 1.0);
    assert_eq!(input.get_grad(1, 3, 0), 1.0);
    Ok(())
}

#[test]
fn test_every_activation_matches_declared_shape() -> Result<(), ConvNetError> {
    let mut rng = seeded_rng(4);
    let mut net = convnet_core::Net::new(
        &[
            LayerSpec::input(9, 7, 2),
            LayerSpec::conv(3, 6).stride(2).activation(Activation::Relu).into(),
            LayerSpec::pool(2).stride(1).pad(1).into(),
            LayerSpec::maxout(3),
            LayerSpec::fc(7).drop_prob(0.25).into(),
            LayerSpec::svm(4),
        ],
        &mut rng,
    )?;
    let x = Vol::random(9, 7, 2, &mut rng);
    net.forward(&x, true)?;
    // the final output matches the loss layer's declared shape
    let shapes = net.out_shapes();
    let out = net.output().map(Vol::shape);
    assert_eq!(out, shapes.last().copied());
    assert_eq!(shapes.len(), net.num_layers());
    // 9x7 through a 3x3 stride 2 filter: 4x3
    assert_eq!(shapes[1], Shape::new(4, 3, 6));
    // 2x2 window, stride 1, pad 1: 5x4
    assert_eq!(shapes[3], Shape::new(5, 4, 6));
    assert_eq!(shapes[4], Shape::new(5, 4, 2));
    Ok(())
}
