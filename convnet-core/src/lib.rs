// convnet-core/src/lib.rs

//! A small feed-forward neural network engine over 3-D volumes.
//!
//! A network is described as a list of [`LayerSpec`]s, desugared into a chain of primitive
//! layers by [`Net::new`], and trained one example at a time by a [`Trainer`].

pub mod autograd;
pub mod error;
pub mod model;
pub mod nn;
pub mod optim;
pub mod utils;
pub mod vol;

pub use error::ConvNetError;
pub use model::{Net, ParamGroup, ParamSnapshot};
pub use nn::{Activation, LayerSpec, LayerType, Target};
pub use optim::{Method, TrainStats, Trainer, TrainerOptions};
pub use vol::{Shape, Vol};
