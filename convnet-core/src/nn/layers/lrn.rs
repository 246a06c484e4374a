// convnet-core/src/nn/layers/lrn.rs

use crate::error::ConvNetError;
use crate::nn::attributes::{attributes, Attributes};
use crate::nn::layer::{InnerLayer, Layer, LayerType};
use crate::nn::spec::LrnSpec;
use crate::vol::{Shape, Vol};
use log::warn;

/// Local response normalization across neighbouring depth slices.
///
/// `out(x, y, i) = in(x, y, i) / S^beta` where
/// `S = k + alpha / n * sum_j in(x, y, j)^2` over the `n` slices centred on `i`, clipped
/// to the valid depth range.
#[derive(Debug, Clone)]
pub struct LrnLayer {
    k: f64,
    n: usize,
    alpha: f64,
    beta: f64,
    shape: Shape,
    /// `S` per cell, from the last forward pass.
    s_cache: Vec<f64>,
}

impl LrnLayer {
    pub fn new(spec: &LrnSpec, in_shape: Shape) -> Result<Self, ConvNetError> {
        if spec.n == 0 {
            return Err(ConvNetError::InvalidSpec {
                layer: LayerType::Lrn,
                reason: "window size n must be at least 1".to_string(),
            });
        }
        if spec.n % 2 == 0 {
            warn!(
                "LRN window size n = {} is even; the window will not be centred",
                spec.n
            );
        }
        Ok(LrnLayer {
            k: spec.k,
            n: spec.n,
            alpha: spec.alpha,
            beta: spec.beta,
            shape: in_shape,
            s_cache: vec![0.0; in_shape.len()],
        })
    }

    /// Depth range `[lo, hi]` normalizing slice `i`.
    fn window(&self, i: usize) -> std::ops::RangeInclusive<usize> {
        let half = self.n / 2;
        i.saturating_sub(half)..=(i + half).min(self.shape.depth - 1)
    }
}

impl Layer for LrnLayer {
    fn layer_type(&self) -> LayerType {
        LayerType::Lrn
    }

    fn out_shape(&self) -> Shape {
        self.shape
    }

    fn forward(&mut self, input: &Vol, _is_training: bool) -> Vol {
        let mut out = input.clone_and_zero();
        let scale = self.alpha / self.n as f64;
        for x in 0..self.shape.sx {
            for y in 0..self.shape.sy {
                for i in 0..self.shape.depth {
                    let den: f64 = self
                        .window(i)
                        .map(|j| input.get(x, y, j).powi(2))
                        .sum();
                    let s = self.k + scale * den;
                    self.s_cache[self.shape.index(x, y, i)] = s;
                    out.set(x, y, i, input.get(x, y, i) / s.powf(self.beta));
                }
            }
        }
        out
    }

    fn attributes(&self) -> Attributes {
        attributes! {
            "layer_type" => LayerType::Lrn.as_str(),
            "out_sx" => self.shape.sx,
            "out_sy" => self.shape.sy,
            "out_depth" => self.shape.depth,
            "k" => self.k,
            "n" => self.n,
            "alpha" => self.alpha,
            "beta" => self.beta,
        }
    }
}

impl InnerLayer for LrnLayer {
    fn backward(&mut self, input: &mut Vol, output: &Vol) {
        input.zero_grad();
        let scale = self.alpha / self.n as f64;
        for x in 0..self.shape.sx {
            for y in 0..self.shape.sy {
                for i in 0..self.shape.depth {
                    let chain_grad = output.get_grad(x, y, i);
                    let s = self.s_cache[self.shape.index(x, y, i)];
                    let sb = s.powf(self.beta);
                    let sb2 = sb * sb;
                    let ai = input.get(x, y, i);
                    let common = ai * self.beta * s.powf(self.beta - 1.0) * scale * 2.0;
                    for j in self.window(i) {
                        let aj = input.get(x, y, j);
                        let mut g = -common * aj;
                        if j == i {
                            g += sb;
                        }
                        input.add_grad(x, y, j, g / sb2 * chain_grad);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "lrn_test.rs"]
mod tests;
