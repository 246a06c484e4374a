// convnet-core/src/optim/mod.rs

//! Training: the [`Trainer`] loop, its options, and the parameter update rules.
//!
//! Each rule lives in its own module as a per-scalar step function; the trainer applies
//! weight decay, picks the rule from [`Method`], and keeps the velocity buffers.

pub mod options;
pub mod state;
pub mod trainer;

mod adadelta;
mod adagrad;
mod adam;
mod nesterov;
mod sgd;
mod windowgrad;

// Re-export key items for easier access
pub use options::{Method, TrainerOptions};
pub use state::{OptimizerState, Velocity};
pub use trainer::{TrainStats, Trainer};
