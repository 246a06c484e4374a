use crate::nn::LayerType;
use thiserror::Error;

/// Custom error type for the convnet engine.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum ConvNetError {
    #[error("Volume creation error: data length {data_len} does not match shape {shape:?}")]
    VolCreationError { data_len: usize, shape: [usize; 3] },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: [usize; 3],
        actual: [usize; 3],
        operation: String,
    },

    #[error("A network needs at least an input layer and a loss layer, got {count} layer spec(s)")]
    TooFewLayers { count: usize },

    #[error("The first layer must be the input layer, got {actual:?}")]
    FirstLayerNotInput { actual: LayerType },

    #[error("Input layer may only appear first, found one at position {position}")]
    MisplacedInput { position: usize },

    #[error("The last layer must be a loss layer (softmax, svm or regression), got {actual:?}")]
    LastLayerNotLoss { actual: LayerType },

    #[error("Loss layer {actual:?} at position {position} is not the last layer")]
    MisplacedLoss { actual: LayerType, position: usize },

    #[error("Invalid layer spec for {layer:?}: {reason}")]
    InvalidSpec { layer: LayerType, reason: String },

    #[error("Loss layer {layer:?} does not accept a {target} target")]
    TargetMismatch { layer: LayerType, target: &'static str },

    #[error("Label {label} out of range for a loss layer with {classes} outputs")]
    LabelOutOfRange { label: usize, classes: usize },

    #[error("Regression target has {actual} values, expected {expected}")]
    RegressionTargetLength { expected: usize, actual: usize },

    #[error("Backward called before any forward pass")]
    NoForwardPass,

    #[error("Prediction requires a softmax loss layer, got {actual:?}")]
    NotSoftmax { actual: LayerType },

    #[error("No parameter slot {slot} on layer {layer}")]
    UnknownParamSlot { layer: usize, slot: usize },

    #[error("Parameter slot ({layer}, {slot}) holds {expected} values, snapshot carries {actual}")]
    ParamLengthMismatch {
        layer: usize,
        slot: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown optimizer method: {0}")]
    UnknownMethod(String),

    #[error("Invalid trainer option: {0}")]
    InvalidOption(String),
}
