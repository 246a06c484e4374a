use crate::error::ConvNetError;
use crate::nn::attributes::{attributes, Attributes};
use crate::nn::layer::{InnerLayer, Layer, LayerType};
use crate::nn::layers::conv::sweep_len;
use crate::nn::spec::PoolSpec;
use crate::vol::{Shape, Vol};

/// Value reported for a window that contains no in-bounds cell.
const EMPTY_WINDOW: f64 = -99999.0;

/// Spatial max pooling, applied to every depth slice independently.
#[derive(Debug, Clone)]
pub struct PoolLayer {
    sx: usize,
    sy: usize,
    stride: usize,
    pad: usize,
    in_shape: Shape,
    out: Shape,
    /// Winning input `(x, y)` per output cell, recorded on forward.
    switches: Vec<Option<(usize, usize)>>,
}

impl PoolLayer {
    pub fn new(spec: &PoolSpec, in_shape: Shape) -> Result<Self, ConvNetError> {
        let sy = spec.sy.unwrap_or(spec.sx);
        let invalid = |reason: String| ConvNetError::InvalidSpec {
            layer: LayerType::Pool,
            reason,
        };
        if spec.sx == 0 || sy == 0 || spec.stride == 0 {
            return Err(invalid("window size and stride must be at least 1".to_string()));
        }
        if in_shape.sx + 2 * spec.pad < spec.sx || in_shape.sy + 2 * spec.pad < sy {
            return Err(invalid(format!(
                "{}x{} window does not fit a {} input padded by {}",
                spec.sx, sy, in_shape, spec.pad
            )));
        }
        let out = Shape::new(
            sweep_len(in_shape.sx, spec.pad, spec.sx, spec.stride),
            sweep_len(in_shape.sy, spec.pad, sy, spec.stride),
            in_shape.depth,
        );
        Ok(PoolLayer {
            sx: spec.sx,
            sy,
            stride: spec.stride,
            pad: spec.pad,
            in_shape,
            out,
            switches: vec![None; out.len()],
        })
    }

    #[inline]
    fn origin(&self, a: usize) -> isize {
        (a * self.stride) as isize - self.pad as isize
    }
}

impl Layer for PoolLayer {
    fn layer_type(&self) -> LayerType {
        LayerType::Pool
    }

    fn out_shape(&self) -> Shape {
        self.out
    }

    fn forward(&mut self, input: &Vol, _is_training: bool) -> Vol {
        let mut out = Vol::zeros(self.out.sx, self.out.sy, self.out.depth);
        for d in 0..self.out.depth {
            for ax in 0..self.out.sx {
                let x = self.origin(ax);
                for ay in 0..self.out.sy {
                    let y = self.origin(ay);
                    let mut a = EMPTY_WINDOW;
                    let mut winner = None;
                    for fx in 0..self.sx {
                        for fy in 0..self.sy {
                            let (ox, oy) = (x + fx as isize, y + fy as isize);
                            if ox < 0 || oy < 0 {
                                continue;
                            }
                            let (ox, oy) = (ox as usize, oy as usize);
                            if ox >= input.sx() || oy >= input.sy() {
                                continue;
                            }
                            let v = input.get(ox, oy, d);
                            if v > a {
                                a = v;
                                winner = Some((ox, oy));
                            }
                        }
                    }
                    self.switches[self.out.index(ax, ay, d)] = winner;
                    out.set(ax, ay, d, a);
                }
            }
        }
        out
    }

    fn attributes(&self) -> Attributes {
        attributes! {
            "layer_type" => LayerType::Pool.as_str(),
            "sx" => self.sx,
            "sy" => self.sy,
            "stride" => self.stride,
            "pad" => self.pad,
            "in_depth" => self.in_shape.depth,
            "out_sx" => self.out.sx,
            "out_sy" => self.out.sy,
            "out_depth" => self.out.depth,
        }
    }
}

impl InnerLayer for PoolLayer {
    fn backward(&mut self, input: &mut Vol, output: &Vol) {
        input.zero_grad();
        for d in 0..self.out.depth {
            for ax in 0..self.out.sx {
                for ay in 0..self.out.sy {
                    if let Some((wx, wy)) = self.switches[self.out.index(ax, ay, d)] {
                        input.add_grad(wx, wy, d, output.get_grad(ax, ay, d));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod tests;
