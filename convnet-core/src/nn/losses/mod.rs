// convnet-core/src/nn/losses/mod.rs
// Terminal layers: each one seeds the backward pass and reports a scalar loss.

pub mod regression;
pub mod softmax;
pub mod svm;

pub use regression::RegressionLayer;
pub use softmax::SoftmaxLayer;
pub use svm::SvmLayer;
