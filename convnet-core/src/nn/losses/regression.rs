// convnet-core/src/nn/losses/regression.rs

use crate::error::ConvNetError;
use crate::nn::attributes::{attributes, Attributes};
use crate::nn::layer::{Layer, LayerType, LossLayer, Target};
use crate::nn::spec::RegressionSpec;
use crate::vol::{Shape, Vol};

/// Squared-error loss against real-valued targets. Forward is the identity.
///
/// Accepts three kinds of supervision:
/// * `Target::Values` - one target per output, `0.5 * sum (x - y)^2`.
/// * `Target::Value` (or a `Target::Class` label read as a number) - supervises output 0.
/// * `Target::Dim` - supervises a single output and leaves the others without gradient.
#[derive(Debug, Clone)]
pub struct RegressionLayer {
    num_neurons: usize,
}

impl RegressionLayer {
    pub fn new(spec: &RegressionSpec, in_shape: Shape) -> Result<Self, ConvNetError> {
        if spec.num_neurons == 0 || in_shape.len() != spec.num_neurons {
            return Err(ConvNetError::InvalidSpec {
                layer: LayerType::Regression,
                reason: format!("{} outputs fed by a {} input", spec.num_neurons, in_shape),
            });
        }
        Ok(RegressionLayer {
            num_neurons: spec.num_neurons,
        })
    }

    /// Gradient and loss for one supervised output.
    fn single(input: &mut Vol, dim: usize, value: f64) -> f64 {
        let (x, dx) = input.split_mut();
        dx.fill(0.0);
        let dy = x[dim] - value;
        dx[dim] = dy;
        0.5 * dy * dy
    }
}

impl Layer for RegressionLayer {
    fn layer_type(&self) -> LayerType {
        LayerType::Regression
    }

    fn out_shape(&self) -> Shape {
        Shape::new(1, 1, self.num_neurons)
    }

    fn forward(&mut self, input: &Vol, _is_training: bool) -> Vol {
        Vol::from_vec(input.w().to_vec())
    }

    fn attributes(&self) -> Attributes {
        attributes! {
            "layer_type" => LayerType::Regression.as_str(),
            "out_sx" => 1usize,
            "out_sy" => 1usize,
            "out_depth" => self.num_neurons,
            "num_inputs" => self.num_neurons,
        }
    }
}

impl LossLayer for RegressionLayer {
    fn backward_loss(&mut self, input: &mut Vol, target: &Target) -> Result<f64, ConvNetError> {
        match target {
            Target::Values(ys) => {
                if ys.len() != self.num_neurons {
                    return Err(ConvNetError::RegressionTargetLength {
                        expected: self.num_neurons,
                        actual: ys.len(),
                    });
                }
                let (x, dx) = input.split_mut();
                let mut loss = 0.0;
                for ((dxi, &xi), &yi) in dx.iter_mut().zip(x.iter()).zip(ys) {
                    let dy = xi - yi;
                    *dxi = dy;
                    loss += 0.5 * dy * dy;
                }
                Ok(loss)
            }
            Target::Value(value) => Ok(Self::single(input, 0, *value)),
            Target::Class(label) => Ok(Self::single(input, 0, *label as f64)),
            Target::Dim { dim, value } => {
                if *dim >= self.num_neurons {
                    return Err(ConvNetError::LabelOutOfRange {
                        label: *dim,
                        classes: self.num_neurons,
                    });
                }
                Ok(Self::single(input, *dim, *value))
            }
        }
    }
}

#[cfg(test)]
#[path = "regression_test.rs"]
mod tests;
