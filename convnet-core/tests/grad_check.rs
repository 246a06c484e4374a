mod common;

use common::mlp;
use convnet_core::autograd::{check_input_grad, GradCheckError};
use convnet_core::nn::{Activation, LayerSpec, Target};
use convnet_core::utils::testing::seeded_rng;
use convnet_core::Vol;
use rand::Rng;

const DELTA: f64 = 1e-5;
const TOLERANCE: f64 = 1e-2;

fn check_all_inputs(loss: LayerSpec, targets: &[Target], seed: u64) -> Result<(), GradCheckError> {
    let mut rng = seeded_rng(seed);
    let mut net = mlp(
        5,
        &[(8, Activation::Tanh), (6, Activation::Sigmoid)],
        loss,
        &mut rng,
    )?;
    for target in targets {
        for _ in 0..5 {
            let x = Vol::random(1, 1, 5, &mut rng);
            check_input_grad(&mut net, &x, target, DELTA, TOLERANCE)?;
        }
    }
    Ok(())
}

#[test]
fn test_softmax_input_gradient() -> Result<(), GradCheckError> {
    let targets: Vec<Target> = (0..4).map(Target::Class).collect();
    check_all_inputs(LayerSpec::softmax(4), &targets, 100)
}

#[test]
fn test_svm_input_gradient() -> Result<(), GradCheckError> {
    let targets: Vec<Target> = (0..3).map(Target::Class).collect();
    check_all_inputs(LayerSpec::svm(3), &targets, 200)
}

#[test]
fn test_regression_vector_target_gradient() -> Result<(), GradCheckError> {
    check_all_inputs(
        LayerSpec::regression(3),
        &[Target::Values(vec![0.5, -1.0, 2.0])],
        300,
    )
}

#[test]
fn test_regression_scalar_target_gradient() -> Result<(), GradCheckError> {
    check_all_inputs(LayerSpec::regression(3), &[Target::Value(1.5)], 400)
}

#[test]
fn test_regression_dimension_target_gradient() -> Result<(), GradCheckError> {
    check_all_inputs(
        LayerSpec::regression(3),
        &[Target::Dim { dim: 2, value: -0.7 }, Target::Dim { dim: 0, value: 0.3 }],
        500,
    )
}

#[test]
fn test_conv_pool_net_input_gradient() -> Result<(), GradCheckError> {
    let mut rng = seeded_rng(600);
    let mut net = convnet_core::Net::new(
        &[
            LayerSpec::input(6, 6, 2),
            LayerSpec::conv(3, 4)
                .pad(1)
                .activation(Activation::Tanh)
                .into(),
            LayerSpec::lrn(1.0, 3, 0.1, 0.75),
            LayerSpec::pool(2).into(),
            LayerSpec::fc(6)
                .activation(Activation::Maxout { group_size: 2 })
                .into(),
            LayerSpec::softmax(3),
        ],
        &mut rng,
    )?;
    let x = Vol::random(6, 6, 2, &mut rng);
    let label = rng.gen_range(0..3);
    check_input_grad(&mut net, &x, &Target::Class(label), DELTA, TOLERANCE)?;
    Ok(())
}
