// convnet-core/src/nn/losses/softmax.rs

use crate::error::ConvNetError;
use crate::nn::attributes::{attributes, Attributes};
use crate::nn::layer::{Layer, LayerType, LossLayer, Target};
use crate::nn::spec::SoftmaxSpec;
use crate::vol::{Shape, Vol};

/// Normalises its input into a class distribution; trained with the cross-entropy loss.
///
/// Its input is flattened: the output is always `1 x 1 x num_classes`.
#[derive(Debug, Clone)]
pub struct SoftmaxLayer {
    num_classes: usize,
    /// Probabilities from the last forward pass.
    es: Vec<f64>,
}

impl SoftmaxLayer {
    /// # Errors
    /// `InvalidSpec` when the input does not flatten to exactly `num_classes` values.
    pub fn new(spec: &SoftmaxSpec, in_shape: Shape) -> Result<Self, ConvNetError> {
        if spec.num_classes == 0 || in_shape.len() != spec.num_classes {
            return Err(ConvNetError::InvalidSpec {
                layer: LayerType::Softmax,
                reason: format!(
                    "{} classes fed by a {} input",
                    spec.num_classes, in_shape
                ),
            });
        }
        Ok(SoftmaxLayer {
            num_classes: spec.num_classes,
            es: vec![0.0; spec.num_classes],
        })
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

impl Layer for SoftmaxLayer {
    fn layer_type(&self) -> LayerType {
        LayerType::Softmax
    }

    fn out_shape(&self) -> Shape {
        Shape::new(1, 1, self.num_classes)
    }

    fn forward(&mut self, input: &Vol, _is_training: bool) -> Vol {
        let scores = input.w();
        let amax = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut esum = 0.0;
        for (e, &s) in self.es.iter_mut().zip(scores) {
            *e = (s - amax).exp();
            esum += *e;
        }
        self.es.iter_mut().for_each(|e| *e /= esum);

        let mut out = Vol::zeros(1, 1, self.num_classes);
        out.w_mut().copy_from_slice(&self.es);
        out
    }

    fn attributes(&self) -> Attributes {
        attributes! {
            "layer_type" => LayerType::Softmax.as_str(),
            "out_sx" => 1usize,
            "out_sy" => 1usize,
            "out_depth" => self.num_classes,
            "num_inputs" => self.num_classes,
        }
    }
}

impl LossLayer for SoftmaxLayer {
    fn backward_loss(&mut self, input: &mut Vol, target: &Target) -> Result<f64, ConvNetError> {
        let Target::Class(y) = *target else {
            return Err(ConvNetError::TargetMismatch {
                layer: LayerType::Softmax,
                target: target.kind(),
            });
        };
        if y >= self.num_classes {
            return Err(ConvNetError::LabelOutOfRange {
                label: y,
                classes: self.num_classes,
            });
        }
        for (i, (dx, &p)) in input.dw_mut().iter_mut().zip(&self.es).enumerate() {
            let indicator = if i == y { 1.0 } else { 0.0 };
            *dx = -(indicator - p);
        }
        Ok(-self.es[y].ln())
    }
}

#[cfg(test)]
#[path = "softmax_test.rs"]
mod tests;
