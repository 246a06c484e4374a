// convnet-core/src/nn/layers/activation.rs

//! Element-wise nonlinearities. All three keep the input shape, own no parameters, and
//! differentiate through their own output value.

use crate::nn::attributes::{attributes, Attributes};
use crate::nn::layer::{InnerLayer, Layer, LayerType};
use crate::vol::{Shape, Vol};

/// Applies `f` to every value of `input`.
fn map_values(input: &Vol, f: impl Fn(f64) -> f64) -> Vol {
    let mut out = input.clone_values();
    out.w_mut().iter_mut().for_each(|v| *v = f(*v));
    out
}

/// Sets `input.dw[i] = local(output.w[i]) * output.dw[i]`.
fn chain_from_output(input: &mut Vol, output: &Vol, local: impl Fn(f64) -> f64) {
    let grads = output.w().iter().zip(output.dw());
    for (dx, (&y, &g)) in input.dw_mut().iter_mut().zip(grads) {
        *dx = local(y) * g;
    }
}

fn shape_attributes(layer_type: LayerType, shape: Shape) -> Attributes {
    attributes! {
        "layer_type" => layer_type.as_str(),
        "out_sx" => shape.sx,
        "out_sy" => shape.sy,
        "out_depth" => shape.depth,
    }
}

/// `max(0, x)`.
#[derive(Debug, Clone)]
pub struct ReluLayer {
    shape: Shape,
}

impl ReluLayer {
    pub fn new(in_shape: Shape) -> Self {
        ReluLayer { shape: in_shape }
    }
}

impl Layer for ReluLayer {
    fn layer_type(&self) -> LayerType {
        LayerType::Relu
    }

    fn out_shape(&self) -> Shape {
        self.shape
    }

    fn forward(&mut self, input: &Vol, _is_training: bool) -> Vol {
        map_values(input, |x| if x < 0.0 { 0.0 } else { x })
    }

    fn attributes(&self) -> Attributes {
        shape_attributes(LayerType::Relu, self.shape)
    }
}

impl InnerLayer for ReluLayer {
    fn backward(&mut self, input: &mut Vol, output: &Vol) {
        // threshold at zero
        chain_from_output(input, output, |y| if y <= 0.0 { 0.0 } else { 1.0 });
    }
}

/// Logistic sigmoid `1 / (1 + e^-x)`.
#[derive(Debug, Clone)]
pub struct SigmoidLayer {
    shape: Shape,
}

impl SigmoidLayer {
    pub fn new(in_shape: Shape) -> Self {
        SigmoidLayer { shape: in_shape }
    }
}

impl Layer for SigmoidLayer {
    fn layer_type(&self) -> LayerType {
        LayerType::Sigmoid
    }

    fn out_shape(&self) -> Shape {
        self.shape
    }

    fn forward(&mut self, input: &Vol, _is_training: bool) -> Vol {
        map_values(input, |x| 1.0 / (1.0 + (-x).exp()))
    }

    fn attributes(&self) -> Attributes {
        shape_attributes(LayerType::Sigmoid, self.shape)
    }
}

impl InnerLayer for SigmoidLayer {
    fn backward(&mut self, input: &mut Vol, output: &Vol) {
        chain_from_output(input, output, |y| y * (1.0 - y));
    }
}

#[derive(Debug, Clone)]
pub struct TanhLayer {
    shape: Shape,
}

impl TanhLayer {
    pub fn new(in_shape: Shape) -> Self {
        TanhLayer { shape: in_shape }
    }
}

impl Layer for TanhLayer {
    fn layer_type(&self) -> LayerType {
        LayerType::Tanh
    }

    fn out_shape(&self) -> Shape {
        self.shape
    }

    fn forward(&mut self, input: &Vol, _is_training: bool) -> Vol {
        map_values(input, f64::tanh)
    }

    fn attributes(&self) -> Attributes {
        shape_attributes(LayerType::Tanh, self.shape)
    }
}

impl InnerLayer for TanhLayer {
    fn backward(&mut self, input: &mut Vol, output: &Vol) {
        chain_from_output(input, output, |y| 1.0 - y * y);
    }
}

#[cfg(test)]
#[path = "activation_test.rs"]
mod tests;
