// convnet-core/src/model/net.rs

//! The layer chain and its forward/backward passes.
//!
//! Errors returned while building or driving a [`Net`] (malformed chains, layers that do not
//! fit their input, targets the loss layer cannot take, backward before forward) report
//! caller bugs, not conditions of the data. Callers are not expected to recover from them.

use crate::error::ConvNetError;
use crate::model::desugar::desugar;
use crate::nn::attributes::{AttrValue, Attributes};
use crate::nn::layer::{InnerLayer, LayerType, LossLayer, ParamGrad, Target};
use crate::nn::layers::{
    ConvLayer, DropoutLayer, FullyConnectedLayer, InputLayer, LrnLayer, MaxoutLayer, PoolLayer,
    ReluLayer, SigmoidLayer, TanhLayer,
};
use crate::nn::losses::{RegressionLayer, SoftmaxLayer, SvmLayer};
use crate::nn::spec::LayerSpec;
use crate::vol::{Shape, Vol};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The learnable tensors of one layer, borrowed for an in-place update.
#[derive(Debug)]
pub struct ParamGroup<'a> {
    /// Position of the layer in the desugared chain.
    pub layer: usize,
    pub layer_type: LayerType,
    pub params: Vec<ParamGrad<'a>>,
}

/// Owned copy of one parameter tensor, addressed by `(layer, slot)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSnapshot {
    pub layer: usize,
    pub slot: usize,
    pub w: Vec<f64>,
    pub dw: Vec<f64>,
}

/// A linear chain of layers that starts with an input layer and ends with a loss layer.
///
/// The network owns every activation of the current step: `activations[0]` is a copy of
/// the input, `activations[i + 1]` is the output of layer `i`. Layers only see the two
/// volumes adjacent to them, and only for the duration of a call.
#[derive(Debug)]
pub struct Net {
    layers: Vec<Box<dyn InnerLayer>>,
    loss: Box<dyn LossLayer>,
    activations: Vec<Vol>,
}

impl Net {
    /// Validates and desugars `specs`, then instantiates every layer.
    ///
    /// # Arguments
    /// * `specs` - Network description. The first spec must be an input spec and the last a
    ///   loss spec (softmax, svm or regression); neither may appear anywhere else.
    /// * `rng` - Source for weight initialisation and for the dropout layers' private
    ///   generators.
    ///
    /// # Errors
    /// A chain-shape error (`TooFewLayers`, `FirstLayerNotInput`, ...) for a malformed
    /// description, or `InvalidSpec` when a layer does not fit its input.
    pub fn new<R: Rng + ?Sized>(specs: &[LayerSpec], rng: &mut R) -> Result<Self, ConvNetError> {
        validate_chain(specs)?;
        let specs = desugar(specs);

        let mut layers: Vec<Box<dyn InnerLayer>> = Vec::with_capacity(specs.len() - 1);
        let (last, body) = specs
            .split_last()
            .ok_or(ConvNetError::TooFewLayers { count: 0 })?;
        let mut prev = Shape::new(0, 0, 0);
        for (position, spec) in body.iter().enumerate() {
            let layer = build_inner(spec, position, prev, rng)?;
            prev = layer.out_shape();
            layers.push(layer);
        }
        let loss = build_loss(last, prev)?;

        let net = Net {
            layers,
            loss,
            activations: Vec::new(),
        };
        debug!(
            "Built network with {} layers: {:?}",
            net.num_layers(),
            net.layer_types()
        );
        Ok(net)
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len() + 1
    }

    /// Layer kinds of the desugared chain, input first.
    pub fn layer_types(&self) -> Vec<LayerType> {
        self.layers
            .iter()
            .map(|l| l.layer_type())
            .chain(std::iter::once(self.loss.layer_type()))
            .collect()
    }

    /// Output shape of every layer, input first.
    pub fn out_shapes(&self) -> Vec<Shape> {
        self.layers
            .iter()
            .map(|l| l.out_shape())
            .chain(std::iter::once(self.loss.out_shape()))
            .collect()
    }

    pub fn input_shape(&self) -> Shape {
        // the chain always starts with the input layer
        self.layers[0].out_shape()
    }

    /// Runs every layer in order and returns the loss layer's output.
    ///
    /// # Errors
    /// `ShapeMismatch` when `input` does not have the input layer's shape.
    pub fn forward(&mut self, input: &Vol, is_training: bool) -> Result<&Vol, ConvNetError> {
        let expected = self.input_shape();
        if input.shape() != expected {
            return Err(ConvNetError::ShapeMismatch {
                expected: expected.as_array(),
                actual: input.shape().as_array(),
                operation: "Net::forward".to_string(),
            });
        }

        self.activations.clear();
        self.activations.push(input.clone_values());
        for (i, layer) in self.layers.iter_mut().enumerate() {
            let out = layer.forward(&self.activations[i], is_training);
            trace!("layer {} ({}) -> {}", i, layer.layer_type(), out.shape());
            self.activations.push(out);
        }
        let n = self.layers.len();
        let out = self.loss.forward(&self.activations[n], is_training);
        self.activations.push(out);
        Ok(&self.activations[n + 1])
    }

    /// Output of the loss layer from the last forward pass.
    pub fn output(&self) -> Option<&Vol> {
        self.activations.last()
    }

    /// Seeds the gradient at the loss layer, then replays the chain in reverse.
    ///
    /// Parameter gradients accumulate; the input gradient of every layer is overwritten.
    /// Returns the loss.
    pub fn backward(&mut self, target: &Target) -> Result<f64, ConvNetError> {
        let n = self.layers.len();
        if self.activations.len() != n + 2 {
            return Err(ConvNetError::NoForwardPass);
        }
        let loss = self.loss.backward_loss(&mut self.activations[n], target)?;
        for i in (0..n).rev() {
            let (head, tail) = self.activations.split_at_mut(i + 1);
            self.layers[i].backward(&mut head[i], &tail[0]);
        }
        Ok(loss)
    }

    /// Loss of `input` against `target` in inference mode. Only the loss layer's gradient
    /// is touched.
    pub fn cost_loss(&mut self, input: &Vol, target: &Target) -> Result<f64, ConvNetError> {
        self.forward(input, false)?;
        let n = self.layers.len();
        self.loss.backward_loss(&mut self.activations[n], target)
    }

    /// Gradient of the loss with respect to the network input, as left by the last
    /// backward pass.
    pub fn input_grad(&self) -> Option<&[f64]> {
        self.activations.first().map(Vol::dw)
    }

    /// Index of the most probable class from the last forward pass.
    pub fn prediction(&self) -> Result<usize, ConvNetError> {
        let actual = self.loss.layer_type();
        if actual != LayerType::Softmax {
            return Err(ConvNetError::NotSoftmax { actual });
        }
        self.output()
            .map(Vol::argmax)
            .ok_or(ConvNetError::NoForwardPass)
    }

    /// Mutable handles on every layer's learnable tensors, grouped by layer.
    pub fn params_and_grads(&mut self) -> Vec<ParamGroup<'_>> {
        let mut groups = Vec::new();
        for (layer, l) in self.layers.iter_mut().enumerate() {
            let layer_type = l.layer_type();
            let params = l.params_and_grads();
            if !params.is_empty() {
                groups.push(ParamGroup {
                    layer,
                    layer_type,
                    params,
                });
            }
        }
        groups
    }

    /// Copies every learnable tensor out of the network.
    pub fn snapshot_params(&self) -> Vec<ParamSnapshot> {
        self.layers
            .iter()
            .enumerate()
            .flat_map(|(layer, l)| {
                l.params()
                    .into_iter()
                    .enumerate()
                    .map(move |(slot, v)| ParamSnapshot {
                        layer,
                        slot,
                        w: v.w().to_vec(),
                        dw: v.dw().to_vec(),
                    })
            })
            .collect()
    }

    /// Writes snapshots back into the slots they name.
    ///
    /// Every snapshot is checked before anything is written, so a rejected call leaves the
    /// network untouched.
    pub fn assign_params_and_grads(&mut self, snapshots: &[ParamSnapshot]) -> Result<(), ConvNetError> {
        for s in snapshots {
            let unknown = ConvNetError::UnknownParamSlot {
                layer: s.layer,
                slot: s.slot,
            };
            let layer = self.layers.get(s.layer).ok_or_else(|| unknown.clone())?;
            let params = layer.params();
            let vol = params.get(s.slot).ok_or(unknown)?;
            for len in [s.w.len(), s.dw.len()] {
                if len != vol.len() {
                    return Err(ConvNetError::ParamLengthMismatch {
                        layer: s.layer,
                        slot: s.slot,
                        expected: vol.len(),
                        actual: len,
                    });
                }
            }
        }

        let mut groups = self.params_and_grads();
        for s in snapshots {
            if let Some(group) = groups.iter_mut().find(|g| g.layer == s.layer) {
                let vol = &mut group.params[s.slot].vol;
                vol.w_mut().copy_from_slice(&s.w);
                vol.dw_mut().copy_from_slice(&s.dw);
            }
        }
        Ok(())
    }

    /// Attribute dump of every layer, in order, under `"layers"`.
    pub fn attributes(&self) -> Attributes {
        let layers = self
            .layers
            .iter()
            .map(|l| l.attributes())
            .chain(std::iter::once(self.loss.attributes()))
            .collect();
        let mut attrs = Attributes::new();
        attrs.insert("layers".to_string(), AttrValue::List(layers));
        attrs
    }
}

/// Checks the overall shape of the chain before any expansion.
fn validate_chain(specs: &[LayerSpec]) -> Result<(), ConvNetError> {
    if specs.len() < 2 {
        return Err(ConvNetError::TooFewLayers { count: specs.len() });
    }
    let first = specs[0].layer_type();
    if first != LayerType::Input {
        return Err(ConvNetError::FirstLayerNotInput { actual: first });
    }
    let last = specs[specs.len() - 1].layer_type();
    if !last.is_loss() {
        return Err(ConvNetError::LastLayerNotLoss { actual: last });
    }
    for (position, spec) in specs.iter().enumerate().take(specs.len() - 1).skip(1) {
        let actual = spec.layer_type();
        if actual == LayerType::Input {
            return Err(ConvNetError::MisplacedInput { position });
        }
        if actual.is_loss() {
            return Err(ConvNetError::MisplacedLoss { actual, position });
        }
    }
    Ok(())
}

fn build_inner<R: Rng + ?Sized>(
    spec: &LayerSpec,
    position: usize,
    in_shape: Shape,
    rng: &mut R,
) -> Result<Box<dyn InnerLayer>, ConvNetError> {
    let layer: Box<dyn InnerLayer> = match spec {
        LayerSpec::Input(s) => {
            if s.out_sx == 0 || s.out_sy == 0 || s.out_depth == 0 {
                return Err(ConvNetError::InvalidSpec {
                    layer: LayerType::Input,
                    reason: "input dimensions must be at least 1".to_string(),
                });
            }
            Box::new(InputLayer::new(s))
        }
        LayerSpec::FullyConnected(s) => Box::new(FullyConnectedLayer::new(s, in_shape, rng)?),
        LayerSpec::Conv(s) => Box::new(ConvLayer::new(s, in_shape, rng)?),
        LayerSpec::Pool(s) => Box::new(PoolLayer::new(s, in_shape)?),
        LayerSpec::Dropout(s) => {
            let layer_rng = StdRng::seed_from_u64(rng.gen());
            Box::new(DropoutLayer::new(s, in_shape, layer_rng)?)
        }
        LayerSpec::Relu => Box::new(ReluLayer::new(in_shape)),
        LayerSpec::Sigmoid => Box::new(SigmoidLayer::new(in_shape)),
        LayerSpec::Tanh => Box::new(TanhLayer::new(in_shape)),
        LayerSpec::Maxout(s) => Box::new(MaxoutLayer::new(s, in_shape)?),
        LayerSpec::Lrn(s) => Box::new(LrnLayer::new(s, in_shape)?),
        LayerSpec::Softmax(_) | LayerSpec::Svm(_) | LayerSpec::Regression(_) => {
            return Err(ConvNetError::MisplacedLoss {
                actual: spec.layer_type(),
                position,
            })
        }
    };
    Ok(layer)
}

fn build_loss(spec: &LayerSpec, in_shape: Shape) -> Result<Box<dyn LossLayer>, ConvNetError> {
    match spec {
        LayerSpec::Softmax(s) => Ok(Box::new(SoftmaxLayer::new(s, in_shape)?)),
        LayerSpec::Svm(s) => Ok(Box::new(SvmLayer::new(s, in_shape)?)),
        LayerSpec::Regression(s) => Ok(Box::new(RegressionLayer::new(s, in_shape)?)),
        other => Err(ConvNetError::LastLayerNotLoss {
            actual: other.layer_type(),
        }),
    }
}

#[cfg(test)]
#[path = "net_test.rs"]
mod tests;
