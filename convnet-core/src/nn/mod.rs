// convnet-core/src/nn/mod.rs
// Layer abstractions, layer specifications and the concrete layers.

pub mod attributes;
pub mod layer;
pub mod layers;
pub mod losses;
pub mod spec;

// Re-export common items
pub use attributes::{AttrValue, Attributes};
pub use layer::{InnerLayer, Layer, LayerType, LossLayer, ParamGrad, Target};
pub use spec::{
    Activation, ConvSpec, DropoutSpec, FullyConnectedSpec, InputSpec, LayerSpec, LrnSpec,
    MaxoutSpec, PoolSpec, RegressionSpec, SoftmaxSpec, SvmSpec,
};
