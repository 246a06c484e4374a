use super::{check_input_grad, GradCheckError};
use crate::error::ConvNetError;
use crate::model::Net;
use crate::nn::layer::Target;
use crate::nn::spec::{Activation, LayerSpec};
use crate::utils::testing::seeded_rng;
use crate::vol::Vol;

#[test]
fn test_grad_check_passes_on_small_net() -> Result<(), GradCheckError> {
    let mut rng = seeded_rng(13);
    let mut net = Net::new(
        &[
            LayerSpec::input(1, 1, 4),
            LayerSpec::fc(6).activation(Activation::Sigmoid).into(),
            LayerSpec::softmax(3),
        ],
        &mut rng,
    )?;
    let input = Vol::random(1, 1, 4, &mut rng);
    let worst = check_input_grad(&mut net, &input, &Target::Class(1), 1e-5, 1e-2)?;
    assert!(worst < 1e-2);
    Ok(())
}

#[test]
fn test_grad_check_reports_net_errors() -> Result<(), ConvNetError> {
    let mut net = Net::new(
        &[LayerSpec::input(1, 1, 2), LayerSpec::softmax(2)],
        &mut seeded_rng(1),
    )?;
    let wrong_shape = Vol::from_vec(vec![0.0; 3]);
    let result = check_input_grad(&mut net, &wrong_shape, &Target::Class(0), 1e-5, 1e-2);
    assert!(matches!(
        result,
        Err(GradCheckError::NetError(ConvNetError::ShapeMismatch { .. }))
    ));
    Ok(())
}
