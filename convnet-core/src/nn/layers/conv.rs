use crate::error::ConvNetError;
use crate::nn::attributes::{attributes, AttrValue, Attributes};
use crate::nn::layer::{InnerLayer, Layer, LayerType, ParamGrad};
use crate::nn::spec::ConvSpec;
use crate::vol::{Shape, Vol};
use rand::Rng;

/// Output length of a strided window sweep over `input + 2 * pad` cells.
pub(crate) fn sweep_len(input: usize, pad: usize, window: usize, stride: usize) -> usize {
    (input + 2 * pad - window) / stride + 1
}

/// 2-D convolution with spatially shared filters and zero padding.
#[derive(Debug, Clone)]
pub struct ConvLayer {
    sx: usize,
    sy: usize,
    stride: usize,
    pad: usize,
    in_shape: Shape,
    out: Shape,
    l1_decay_mul: f64,
    l2_decay_mul: f64,
    /// One `sx x sy x in_depth` filter per output depth slice.
    pub(crate) filters: Vec<Vol>,
    pub(crate) biases: Vol,
}

impl ConvLayer {
    pub fn new<R: Rng + ?Sized>(
        spec: &ConvSpec,
        in_shape: Shape,
        rng: &mut R,
    ) -> Result<Self, ConvNetError> {
        let sy = spec.sy.unwrap_or(spec.sx);
        let invalid = |reason: String| ConvNetError::InvalidSpec {
            layer: LayerType::Conv,
            reason,
        };
        if spec.filters == 0 || spec.sx == 0 || sy == 0 {
            return Err(invalid("filters and filter size must be at least 1".to_string()));
        }
        if spec.stride == 0 {
            return Err(invalid("stride must be at least 1".to_string()));
        }
        if in_shape.sx + 2 * spec.pad < spec.sx || in_shape.sy + 2 * spec.pad < sy {
            return Err(invalid(format!(
                "{}x{} filter does not fit a {} input padded by {}",
                spec.sx, sy, in_shape, spec.pad
            )));
        }

        let out = Shape::new(
            sweep_len(in_shape.sx, spec.pad, spec.sx, spec.stride),
            sweep_len(in_shape.sy, spec.pad, sy, spec.stride),
            spec.filters,
        );
        let filters = (0..spec.filters)
            .map(|_| Vol::random(spec.sx, sy, in_shape.depth, rng))
            .collect();
        let bias = spec.bias_pref.unwrap_or(0.0);
        Ok(ConvLayer {
            sx: spec.sx,
            sy,
            stride: spec.stride,
            pad: spec.pad,
            in_shape,
            out,
            l1_decay_mul: spec.l1_decay_mul,
            l2_decay_mul: spec.l2_decay_mul,
            filters,
            biases: Vol::full(1, 1, spec.filters, bias),
        })
    }

    pub fn filters(&self) -> &[Vol] {
        &self.filters
    }

    pub fn biases(&self) -> &Vol {
        &self.biases
    }

    /// Top-left input coordinate of the window producing output cell `a`.
    #[inline]
    fn origin(&self, a: usize) -> isize {
        (a * self.stride) as isize - self.pad as isize
    }
}

/// Maps a window coordinate to an input coordinate, `None` when it lands in the padding.
#[inline]
fn in_bounds(origin: isize, offset: usize, limit: usize) -> Option<usize> {
    let o = origin + offset as isize;
    if o >= 0 && (o as usize) < limit {
        Some(o as usize)
    } else {
        None
    }
}

impl Layer for ConvLayer {
    fn layer_type(&self) -> LayerType {
        LayerType::Conv
    }

    fn out_shape(&self) -> Shape {
        self.out
    }

    fn forward(&mut self, input: &Vol, _is_training: bool) -> Vol {
        let mut out = Vol::zeros(self.out.sx, self.out.sy, self.out.depth);
        let in_shape = input.shape();
        let x_in = input.w();

        for (d, f) in self.filters.iter().enumerate() {
            let f_shape = f.shape();
            let fw = f.w();
            for ay in 0..self.out.sy {
                let y = self.origin(ay);
                for ax in 0..self.out.sx {
                    let x = self.origin(ax);
                    let mut a = 0.0;
                    for fy in 0..f_shape.sy {
                        let Some(oy) = in_bounds(y, fy, in_shape.sy) else {
                            continue;
                        };
                        for fx in 0..f_shape.sx {
                            let Some(ox) = in_bounds(x, fx, in_shape.sx) else {
                                continue;
                            };
                            let f_base = f_shape.index(fx, fy, 0);
                            let in_base = in_shape.index(ox, oy, 0);
                            for fd in 0..f_shape.depth {
                                a += fw[f_base + fd] * x_in[in_base + fd];
                            }
                        }
                    }
                    a += self.biases.w()[d];
                    out.set(ax, ay, d, a);
                }
            }
        }
        out
    }

    fn params_and_grads(&mut self) -> Vec<ParamGrad<'_>> {
        let (l1, l2) = (self.l1_decay_mul, self.l2_decay_mul);
        let mut response: Vec<ParamGrad<'_>> = self
            .filters
            .iter_mut()
            .map(|f| ParamGrad::new(f, l1, l2))
            .collect();
        response.push(ParamGrad::new(&mut self.biases, 0.0, 0.0));
        response
    }

    fn params(&self) -> Vec<&Vol> {
        self.filters.iter().chain(std::iter::once(&self.biases)).collect()
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = attributes! {
            "layer_type" => LayerType::Conv.as_str(),
            "sx" => self.sx,
            "sy" => self.sy,
            "stride" => self.stride,
            "pad" => self.pad,
            "in_depth" => self.in_shape.depth,
            "out_sx" => self.out.sx,
            "out_sy" => self.out.sy,
            "out_depth" => self.out.depth,
            "l1_decay_mul" => self.l1_decay_mul,
            "l2_decay_mul" => self.l2_decay_mul,
            "biases" => self.biases.attributes(),
        };
        attrs.insert(
            "filters".to_string(),
            AttrValue::List(self.filters.iter().map(Vol::attributes).collect()),
        );
        attrs
    }
}

impl InnerLayer for ConvLayer {
    fn backward(&mut self, input: &mut Vol, output: &Vol) {
        let in_shape = input.shape();
        let (x_in, dx_in) = input.split_mut();
        dx_in.fill(0.0);

        let out = self.out;
        let (stride, pad) = (self.stride, self.pad);
        let origin = |a: usize| (a * stride) as isize - pad as isize;

        for (d, f) in self.filters.iter_mut().enumerate() {
            let f_shape = f.shape();
            let (fw, fdw) = f.split_mut();
            for ay in 0..out.sy {
                let y = origin(ay);
                for ax in 0..out.sx {
                    let x = origin(ax);
                    let chain_grad = output.get_grad(ax, ay, d);
                    for fy in 0..f_shape.sy {
                        let Some(oy) = in_bounds(y, fy, in_shape.sy) else {
                            continue;
                        };
                        for fx in 0..f_shape.sx {
                            let Some(ox) = in_bounds(x, fx, in_shape.sx) else {
                                continue;
                            };
                            let f_base = f_shape.index(fx, fy, 0);
                            let in_base = in_shape.index(ox, oy, 0);
                            for fd in 0..f_shape.depth {
                                fdw[f_base + fd] += x_in[in_base + fd] * chain_grad;
                                dx_in[in_base + fd] += fw[f_base + fd] * chain_grad;
                            }
                        }
                    }
                    self.biases.dw_mut()[d] += chain_grad;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "conv_test.rs"]
mod tests;
