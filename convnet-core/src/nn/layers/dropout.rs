// convnet-core/src/nn/layers/dropout.rs

use crate::error::ConvNetError;
use crate::nn::attributes::{attributes, Attributes};
use crate::nn::layer::{InnerLayer, Layer, LayerType};
use crate::nn::spec::DropoutSpec;
use crate::vol::{Shape, Vol};
use rand::rngs::StdRng;
use rand::Rng;

/// Randomly silences activations while training.
///
/// Training zeroes each element with probability `drop_prob` and remembers which ones it
/// dropped. Inference keeps every element but scales it by `1 - drop_prob`, so the expected
/// activation matches what the next layer saw during training.
#[derive(Debug, Clone)]
pub struct DropoutLayer {
    shape: Shape,
    drop_prob: f64,
    dropped: Vec<bool>,
    rng: StdRng,
}

impl DropoutLayer {
    /// # Arguments
    /// * `spec` - Drop probability, in `[0, 1)`.
    /// * `in_shape` - Shape of the previous layer's output; dropout preserves it.
    /// * `rng` - Private generator for the drop mask.
    pub fn new(spec: &DropoutSpec, in_shape: Shape, rng: StdRng) -> Result<Self, ConvNetError> {
        if !(0.0..1.0).contains(&spec.drop_prob) {
            return Err(ConvNetError::InvalidSpec {
                layer: LayerType::Dropout,
                reason: format!("drop_prob must lie in [0, 1), got {}", spec.drop_prob),
            });
        }
        Ok(DropoutLayer {
            shape: in_shape,
            drop_prob: spec.drop_prob,
            dropped: vec![false; in_shape.len()],
            rng,
        })
    }

    pub fn drop_prob(&self) -> f64 {
        self.drop_prob
    }
}

impl Layer for DropoutLayer {
    fn layer_type(&self) -> LayerType {
        LayerType::Dropout
    }

    fn out_shape(&self) -> Shape {
        self.shape
    }

    fn forward(&mut self, input: &Vol, is_training: bool) -> Vol {
        let mut out = input.clone_values();
        if is_training {
            for (v, dropped) in out.w_mut().iter_mut().zip(self.dropped.iter_mut()) {
                *dropped = self.rng.gen::<f64>() < self.drop_prob;
                if *dropped {
                    *v = 0.0;
                }
            }
        } else {
            let keep = 1.0 - self.drop_prob;
            out.w_mut().iter_mut().for_each(|v| *v *= keep);
            self.dropped.fill(false);
        }
        out
    }

    fn attributes(&self) -> Attributes {
        attributes! {
            "layer_type" => LayerType::Dropout.as_str(),
            "out_sx" => self.shape.sx,
            "out_sy" => self.shape.sy,
            "out_depth" => self.shape.depth,
            "drop_prob" => self.drop_prob,
        }
    }
}

impl InnerLayer for DropoutLayer {
    fn backward(&mut self, input: &mut Vol, output: &Vol) {
        let chain = output.dw();
        for ((dx, &dropped), &g) in input.dw_mut().iter_mut().zip(&self.dropped).zip(chain) {
            *dx = if dropped { 0.0 } else { g };
        }
    }
}

#[cfg(test)]
#[path = "dropout_test.rs"]
mod tests;
