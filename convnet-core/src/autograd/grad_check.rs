// convnet-core/src/autograd/grad_check.rs

use crate::error::ConvNetError;
use crate::model::Net;
use crate::nn::layer::Target;
use crate::vol::Vol;
use thiserror::Error;

/// Absolute differences below this are accepted whatever their relative size.
const ABS_TOLERANCE: f64 = 1e-9;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed at input element {element_index}: analytical {analytical_grad} vs numerical {numerical_grad} (relative error {relative_error})")]
    GradientMismatch {
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        relative_error: f64,
    },

    #[error("Numerical gradient is NaN or infinite at input element {element_index}. Loss+: {loss_plus}, Loss-: {loss_minus}")]
    NumericalGradNaNOrInfinite {
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },

    #[error("Analytical gradient is NaN or infinite at input element {element_index}: {value}")]
    AnalyticalGradNaNOrInfinite { element_index: usize, value: f64 },

    #[error("Network error during gradient check: {0}")]
    NetError(ConvNetError),
}

impl From<ConvNetError> for GradCheckError {
    fn from(err: ConvNetError) -> Self {
        GradCheckError::NetError(err)
    }
}

/// Compares the analytical gradient of the loss with respect to `input` against the centred
/// finite difference `(loss(x + delta) - loss(x - delta)) / (2 * delta)`, element by element.
///
/// The network runs in inference mode throughout, so dropout is deterministic. Parameter
/// gradients of `net` are accumulated by the analytical pass and are left as they are.
///
/// # Arguments
/// * `net` - Network under test.
/// * `input` - Point at which the gradient is evaluated.
/// * `target` - Supervision handed to the loss layer.
/// * `delta` - Finite difference step.
/// * `tolerance` - Largest accepted relative error `|a - n| / |a + n|`.
///
/// # Returns
/// The worst relative error seen, or the first element that exceeds `tolerance`.
pub fn check_input_grad(
    net: &mut Net,
    input: &Vol,
    target: &Target,
    delta: f64,
    tolerance: f64,
) -> Result<f64, GradCheckError> {
    net.forward(input, false)?;
    net.backward(target)?;
    let analytical = net
        .input_grad()
        .map(<[f64]>::to_vec)
        .ok_or(ConvNetError::NoForwardPass)?;

    let mut probe = input.clone_values();
    let mut worst: f64 = 0.0;
    for (i, &a) in analytical.iter().enumerate() {
        if !a.is_finite() {
            return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                element_index: i,
                value: a,
            });
        }
        let original = probe.w()[i];
        probe.w_mut()[i] = original + delta;
        let loss_plus = net.cost_loss(&probe, target)?;
        probe.w_mut()[i] = original - delta;
        let loss_minus = net.cost_loss(&probe, target)?;
        probe.w_mut()[i] = original;

        let n = (loss_plus - loss_minus) / (2.0 * delta);
        if !n.is_finite() {
            return Err(GradCheckError::NumericalGradNaNOrInfinite {
                element_index: i,
                loss_plus,
                loss_minus,
            });
        }
        let diff = (a - n).abs();
        if diff < ABS_TOLERANCE {
            continue;
        }
        let relative_error = diff / (a + n).abs();
        if relative_error > tolerance {
            return Err(GradCheckError::GradientMismatch {
                element_index: i,
                analytical_grad: a,
                numerical_grad: n,
                relative_error,
            });
        }
        worst = worst.max(relative_error);
    }
    Ok(worst)
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
