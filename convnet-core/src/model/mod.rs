// convnet-core/src/model/mod.rs
// Network composition: spec desugaring and the layer chain.

pub mod desugar;
pub mod net;

pub use desugar::desugar;
pub use net::{Net, ParamGroup, ParamSnapshot};
