// convnet-core/src/nn/losses/svm.rs

use crate::error::ConvNetError;
use crate::nn::attributes::{attributes, Attributes};
use crate::nn::layer::{Layer, LayerType, LossLayer, Target};
use crate::nn::spec::SvmSpec;
use crate::vol::{Shape, Vol};

const MARGIN: f64 = 1.0;

/// Multiclass structured hinge loss. Forward is the identity on the class scores.
#[derive(Debug, Clone)]
pub struct SvmLayer {
    num_classes: usize,
}

impl SvmLayer {
    pub fn new(spec: &SvmSpec, in_shape: Shape) -> Result<Self, ConvNetError> {
        if spec.num_classes == 0 || in_shape.len() != spec.num_classes {
            return Err(ConvNetError::InvalidSpec {
                layer: LayerType::Svm,
                reason: format!("{} classes fed by a {} input", spec.num_classes, in_shape),
            });
        }
        Ok(SvmLayer {
            num_classes: spec.num_classes,
        })
    }
}

impl Layer for SvmLayer {
    fn layer_type(&self) -> LayerType {
        LayerType::Svm
    }

    fn out_shape(&self) -> Shape {
        Shape::new(1, 1, self.num_classes)
    }

    fn forward(&mut self, input: &Vol, _is_training: bool) -> Vol {
        Vol::from_vec(input.w().to_vec())
    }

    fn attributes(&self) -> Attributes {
        attributes! {
            "layer_type" => LayerType::Svm.as_str(),
            "out_sx" => 1usize,
            "out_sy" => 1usize,
            "out_depth" => self.num_classes,
            "num_inputs" => self.num_classes,
        }
    }
}

impl LossLayer for SvmLayer {
    fn backward_loss(&mut self, input: &mut Vol, target: &Target) -> Result<f64, ConvNetError> {
        let Target::Class(y) = *target else {
            return Err(ConvNetError::TargetMismatch {
                layer: LayerType::Svm,
                target: target.kind(),
            });
        };
        if y >= self.num_classes {
            return Err(ConvNetError::LabelOutOfRange {
                label: y,
                classes: self.num_classes,
            });
        }
        let (scores, dx) = input.split_mut();
        dx.fill(0.0);
        let yscore = scores[y];
        let mut loss = 0.0;
        for i in (0..self.num_classes).filter(|&i| i != y) {
            let ydiff = -yscore + scores[i] + MARGIN;
            if ydiff > 0.0 {
                dx[i] += 1.0;
                dx[y] -= 1.0;
                loss += ydiff;
            }
        }
        Ok(loss)
    }
}

#[cfg(test)]
#[path = "svm_test.rs"]
mod tests;
