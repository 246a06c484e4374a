// convnet-core/src/nn/layer.rs

use crate::error::ConvNetError;
use crate::nn::attributes::Attributes;
use crate::vol::{Shape, Vol};
use std::fmt;

/// Tag of every concrete layer kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Input,
    FullyConnected,
    Conv,
    Pool,
    Dropout,
    Relu,
    Sigmoid,
    Tanh,
    Maxout,
    Lrn,
    Softmax,
    Svm,
    Regression,
}

impl LayerType {
    /// Lowercase name used in attribute dumps.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerType::Input => "input",
            LayerType::FullyConnected => "fc",
            LayerType::Conv => "conv",
            LayerType::Pool => "pool",
            LayerType::Dropout => "dropout",
            LayerType::Relu => "relu",
            LayerType::Sigmoid => "sigmoid",
            LayerType::Tanh => "tanh",
            LayerType::Maxout => "maxout",
            LayerType::Lrn => "lrn",
            LayerType::Softmax => "softmax",
            LayerType::Svm => "svm",
            LayerType::Regression => "regression",
        }
    }

    pub fn is_loss(&self) -> bool {
        matches!(
            self,
            LayerType::Softmax | LayerType::Svm | LayerType::Regression
        )
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A learnable tensor of a layer, borrowed mutably together with its decay multipliers.
#[derive(Debug)]
pub struct ParamGrad<'a> {
    pub vol: &'a mut Vol,
    pub l1_decay_mul: f64,
    pub l2_decay_mul: f64,
}

impl<'a> ParamGrad<'a> {
    pub fn new(vol: &'a mut Vol, l1_decay_mul: f64, l2_decay_mul: f64) -> Self {
        ParamGrad {
            vol,
            l1_decay_mul,
            l2_decay_mul,
        }
    }
}

/// What a loss layer is asked to match on the backward pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Ground-truth class index (softmax, svm).
    Class(usize),
    /// Single regressed value, supervises output 0 only.
    Value(f64),
    /// Full regression target, one value per output.
    Values(Vec<f64>),
    /// Supervises only output `dim`, asking it to equal `value`.
    Dim { dim: usize, value: f64 },
}

impl Target {
    pub fn kind(&self) -> &'static str {
        match self {
            Target::Class(_) => "class",
            Target::Value(_) => "value",
            Target::Values(_) => "values",
            Target::Dim { .. } => "dim",
        }
    }
}

impl From<usize> for Target {
    fn from(label: usize) -> Self {
        Target::Class(label)
    }
}

impl From<f64> for Target {
    fn from(value: f64) -> Self {
        Target::Value(value)
    }
}

impl From<Vec<f64>> for Target {
    fn from(values: Vec<f64>) -> Self {
        Target::Values(values)
    }
}

impl From<&[f64]> for Target {
    fn from(values: &[f64]) -> Self {
        Target::Values(values.to_vec())
    }
}

impl From<(usize, f64)> for Target {
    fn from((dim, value): (usize, f64)) -> Self {
        Target::Dim { dim, value }
    }
}

/// Capabilities shared by every layer.
///
/// Layers are stateful and not reentrant: `forward` may cache whatever the matching
/// backward pass needs (switches, masks), and a later `forward` overwrites it. The
/// activations themselves are owned by the network, which hands the input and output of
/// the current step back to the layer on the backward pass.
pub trait Layer: fmt::Debug + Send {
    fn layer_type(&self) -> LayerType;

    fn out_shape(&self) -> Shape;

    /// Computes a freshly allocated output volume from `input`.
    fn forward(&mut self, input: &Vol, is_training: bool) -> Vol;

    /// Learnable tensors of this layer, in a fixed order.
    fn params_and_grads(&mut self) -> Vec<ParamGrad<'_>> {
        Vec::new()
    }

    /// Read-only view of the same tensors, in the same order.
    fn params(&self) -> Vec<&Vol> {
        Vec::new()
    }

    fn attributes(&self) -> Attributes;
}

/// A layer in the body of the network.
pub trait InnerLayer: Layer {
    /// Reads `output.dw`, zeroes and fills `input.dw`, and accumulates into parameter
    /// gradients.
    fn backward(&mut self, input: &mut Vol, output: &Vol);
}

/// The terminal layer of a network.
pub trait LossLayer: Layer {
    /// Seeds `input.dw` from `target` and returns the loss.
    fn backward_loss(&mut self, input: &mut Vol, target: &Target) -> Result<f64, ConvNetError>;
}
