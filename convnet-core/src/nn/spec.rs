// convnet-core/src/nn/spec.rs

//! Layer specifications: plain configuration values describing a layer before the chain
//! is built. Input geometry is not part of a spec; the network fills it in from the
//! previous layer when it instantiates the concrete layer.

use crate::nn::layer::LayerType;

/// Nonlinearity attached to a fully connected or convolution spec.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Activation {
    #[default]
    Undefined,
    Relu,
    Sigmoid,
    Tanh,
    Maxout { group_size: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputSpec {
    pub out_sx: usize,
    pub out_sy: usize,
    pub out_depth: usize,
}

impl InputSpec {
    pub fn new(out_sx: usize, out_sy: usize, out_depth: usize) -> Self {
        InputSpec {
            out_sx,
            out_sy,
            out_depth,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FullyConnectedSpec {
    pub num_neurons: usize,
    pub activation: Activation,
    pub drop_prob: Option<f64>,
    /// Initial bias value. `None` means 0, or 0.1 when the activation is ReLU.
    pub bias_pref: Option<f64>,
    pub l1_decay_mul: f64,
    pub l2_decay_mul: f64,
}

impl FullyConnectedSpec {
    pub fn new(num_neurons: usize) -> Self {
        FullyConnectedSpec {
            num_neurons,
            activation: Activation::Undefined,
            drop_prob: None,
            bias_pref: None,
            l1_decay_mul: 0.0,
            l2_decay_mul: 1.0,
        }
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn drop_prob(mut self, drop_prob: f64) -> Self {
        self.drop_prob = Some(drop_prob);
        self
    }

    pub fn bias_pref(mut self, bias_pref: f64) -> Self {
        self.bias_pref = Some(bias_pref);
        self
    }

    pub fn decay_muls(mut self, l1_decay_mul: f64, l2_decay_mul: f64) -> Self {
        self.l1_decay_mul = l1_decay_mul;
        self.l2_decay_mul = l2_decay_mul;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvSpec {
    pub filters: usize,
    pub sx: usize,
    /// Filter height, `sx` when unset.
    pub sy: Option<usize>,
    pub stride: usize,
    pub pad: usize,
    pub activation: Activation,
    pub drop_prob: Option<f64>,
    pub bias_pref: Option<f64>,
    pub l1_decay_mul: f64,
    pub l2_decay_mul: f64,
}

impl ConvSpec {
    pub fn new(sx: usize, filters: usize) -> Self {
        ConvSpec {
            filters,
            sx,
            sy: None,
            stride: 1,
            pad: 0,
            activation: Activation::Undefined,
            drop_prob: None,
            bias_pref: None,
            l1_decay_mul: 0.0,
            l2_decay_mul: 1.0,
        }
    }

    pub fn sy(mut self, sy: usize) -> Self {
        self.sy = Some(sy);
        self
    }

    pub fn stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn pad(mut self, pad: usize) -> Self {
        self.pad = pad;
        self
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn drop_prob(mut self, drop_prob: f64) -> Self {
        self.drop_prob = Some(drop_prob);
        self
    }

    pub fn bias_pref(mut self, bias_pref: f64) -> Self {
        self.bias_pref = Some(bias_pref);
        self
    }

    pub fn decay_muls(mut self, l1_decay_mul: f64, l2_decay_mul: f64) -> Self {
        self.l1_decay_mul = l1_decay_mul;
        self.l2_decay_mul = l2_decay_mul;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolSpec {
    pub sx: usize,
    pub sy: Option<usize>,
    pub stride: usize,
    pub pad: usize,
}

impl PoolSpec {
    pub fn new(sx: usize) -> Self {
        PoolSpec {
            sx,
            sy: None,
            stride: 2,
            pad: 0,
        }
    }

    pub fn sy(mut self, sy: usize) -> Self {
        self.sy = Some(sy);
        self
    }

    pub fn stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn pad(mut self, pad: usize) -> Self {
        self.pad = pad;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropoutSpec {
    pub drop_prob: f64,
}

impl DropoutSpec {
    pub fn new(drop_prob: f64) -> Self {
        DropoutSpec { drop_prob }
    }
}

impl Default for DropoutSpec {
    fn default() -> Self {
        DropoutSpec { drop_prob: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaxoutSpec {
    pub group_size: usize,
}

impl MaxoutSpec {
    pub fn new(group_size: usize) -> Self {
        MaxoutSpec { group_size }
    }
}

impl Default for MaxoutSpec {
    fn default() -> Self {
        MaxoutSpec { group_size: 2 }
    }
}

/// Local response normalization across depth. `n` should be odd.
#[derive(Debug, Clone, PartialEq)]
pub struct LrnSpec {
    pub k: f64,
    pub n: usize,
    pub alpha: f64,
    pub beta: f64,
}

impl LrnSpec {
    pub fn new(k: f64, n: usize, alpha: f64, beta: f64) -> Self {
        LrnSpec { k, n, alpha, beta }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoftmaxSpec {
    pub num_classes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SvmSpec {
    pub num_classes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegressionSpec {
    pub num_neurons: usize,
}

/// One entry of a network description.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSpec {
    Input(InputSpec),
    FullyConnected(FullyConnectedSpec),
    Conv(ConvSpec),
    Pool(PoolSpec),
    Dropout(DropoutSpec),
    Relu,
    Sigmoid,
    Tanh,
    Maxout(MaxoutSpec),
    Lrn(LrnSpec),
    Softmax(SoftmaxSpec),
    Svm(SvmSpec),
    Regression(RegressionSpec),
}

impl LayerSpec {
    pub fn input(out_sx: usize, out_sy: usize, out_depth: usize) -> Self {
        LayerSpec::Input(InputSpec::new(out_sx, out_sy, out_depth))
    }

    pub fn fc(num_neurons: usize) -> FullyConnectedSpec {
        FullyConnectedSpec::new(num_neurons)
    }

    pub fn conv(sx: usize, filters: usize) -> ConvSpec {
        ConvSpec::new(sx, filters)
    }

    pub fn pool(sx: usize) -> PoolSpec {
        PoolSpec::new(sx)
    }

    pub fn dropout(drop_prob: f64) -> Self {
        LayerSpec::Dropout(DropoutSpec::new(drop_prob))
    }

    pub fn maxout(group_size: usize) -> Self {
        LayerSpec::Maxout(MaxoutSpec::new(group_size))
    }

    pub fn lrn(k: f64, n: usize, alpha: f64, beta: f64) -> Self {
        LayerSpec::Lrn(LrnSpec::new(k, n, alpha, beta))
    }

    pub fn softmax(num_classes: usize) -> Self {
        LayerSpec::Softmax(SoftmaxSpec { num_classes })
    }

    pub fn svm(num_classes: usize) -> Self {
        LayerSpec::Svm(SvmSpec { num_classes })
    }

    pub fn regression(num_neurons: usize) -> Self {
        LayerSpec::Regression(RegressionSpec { num_neurons })
    }

    pub fn layer_type(&self) -> LayerType {
        match self {
            LayerSpec::Input(_) => LayerType::Input,
            LayerSpec::FullyConnected(_) => LayerType::FullyConnected,
            LayerSpec::Conv(_) => LayerType::Conv,
            LayerSpec::Pool(_) => LayerType::Pool,
            LayerSpec::Dropout(_) => LayerType::Dropout,
            LayerSpec::Relu => LayerType::Relu,
            LayerSpec::Sigmoid => LayerType::Sigmoid,
            LayerSpec::Tanh => LayerType::Tanh,
            LayerSpec::Maxout(_) => LayerType::Maxout,
            LayerSpec::Lrn(_) => LayerType::Lrn,
            LayerSpec::Softmax(_) => LayerType::Softmax,
            LayerSpec::Svm(_) => LayerType::Svm,
            LayerSpec::Regression(_) => LayerType::Regression,
        }
    }
}

impl From<InputSpec> for LayerSpec {
    fn from(spec: InputSpec) -> Self {
        LayerSpec::Input(spec)
    }
}

impl From<FullyConnectedSpec> for LayerSpec {
    fn from(spec: FullyConnectedSpec) -> Self {
        LayerSpec::FullyConnected(spec)
    }
}

impl From<ConvSpec> for LayerSpec {
    fn from(spec: ConvSpec) -> Self {
        LayerSpec::Conv(spec)
    }
}

impl From<PoolSpec> for LayerSpec {
    fn from(spec: PoolSpec) -> Self {
        LayerSpec::Pool(spec)
    }
}
