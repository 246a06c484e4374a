// convnet-core/src/nn/layers/mod.rs
// Inner (non-terminal) layers of a network.

pub mod activation;
pub mod conv;
pub mod dropout;
pub mod fully_connected;
pub mod input;
pub mod lrn;
pub mod maxout;
pub mod pool;

// Re-export key layer structs
pub use activation::{ReluLayer, SigmoidLayer, TanhLayer};
pub use conv::ConvLayer;
pub use dropout::DropoutLayer;
pub use fully_connected::FullyConnectedLayer;
pub use input::InputLayer;
pub use lrn::LrnLayer;
pub use maxout::MaxoutLayer;
pub use pool::PoolLayer;
