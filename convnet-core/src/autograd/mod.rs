// convnet-core/src/autograd/mod.rs
// Numerical verification of the hand-written backward passes.

pub mod grad_check;

pub use grad_check::{check_input_grad, GradCheckError};
