use crate::error::ConvNetError;
use crate::nn::attributes::{attributes, Attributes};
use crate::nn::layer::{InnerLayer, Layer, LayerType};
use crate::nn::spec::MaxoutSpec;
use crate::vol::{Shape, Vol};

/// Takes the max over consecutive groups of `group_size` depth slices at every location.
#[derive(Debug, Clone)]
pub struct MaxoutLayer {
    group_size: usize,
    out: Shape,
    /// Winning input depth index per output cell.
    switches: Vec<usize>,
}

impl MaxoutLayer {
    pub fn new(spec: &MaxoutSpec, in_shape: Shape) -> Result<Self, ConvNetError> {
        let group_size = spec.group_size;
        if group_size == 0 || in_shape.depth % group_size != 0 {
            return Err(ConvNetError::InvalidSpec {
                layer: LayerType::Maxout,
                reason: format!(
                    "group size {} must be positive and divide input depth {}",
                    group_size, in_shape.depth
                ),
            });
        }
        let out = Shape::new(in_shape.sx, in_shape.sy, in_shape.depth / group_size);
        Ok(MaxoutLayer {
            group_size,
            out,
            switches: vec![0; out.len()],
        })
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }
}

impl Layer for MaxoutLayer {
    fn layer_type(&self) -> LayerType {
        LayerType::Maxout
    }

    fn out_shape(&self) -> Shape {
        self.out
    }

    fn forward(&mut self, input: &Vol, _is_training: bool) -> Vol {
        let n = self.group_size;
        let mut out = Vol::zeros(self.out.sx, self.out.sy, self.out.depth);
        for x in 0..self.out.sx {
            for y in 0..self.out.sy {
                for i in 0..self.out.depth {
                    let first = i * n;
                    let mut best = first;
                    let mut a = input.get(x, y, first);
                    for d in first + 1..first + n {
                        let v = input.get(x, y, d);
                        if v > a {
                            a = v;
                            best = d;
                        }
                    }
                    out.set(x, y, i, a);
                    self.switches[self.out.index(x, y, i)] = best;
                }
            }
        }
        out
    }

    fn attributes(&self) -> Attributes {
        attributes! {
            "layer_type" => LayerType::Maxout.as_str(),
            "out_sx" => self.out.sx,
            "out_sy" => self.out.sy,
            "out_depth" => self.out.depth,
            "group_size" => self.group_size,
        }
    }
}

impl InnerLayer for MaxoutLayer {
    fn backward(&mut self, input: &mut Vol, output: &Vol) {
        input.zero_grad();
        for x in 0..self.out.sx {
            for y in 0..self.out.sy {
                for i in 0..self.out.depth {
                    let d = self.switches[self.out.index(x, y, i)];
                    input.set_grad(x, y, d, output.get_grad(x, y, i));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "maxout_test.rs"]
mod tests;
