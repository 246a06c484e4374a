// convnet-core/src/model/desugar.rs

use crate::nn::spec::{Activation, DropoutSpec, FullyConnectedSpec, LayerSpec, MaxoutSpec};

/// Bias preference given to ReLU units that did not ask for one.
const RELU_BIAS_PREF: f64 = 0.1;

/// Expands high-level specs into the primitive chain the network instantiates.
///
/// * Softmax, SVM and Regression get the fully connected layer that produces their scores.
/// * A fully connected or convolution spec with an activation is followed by the matching
///   activation layer, and by a Dropout layer when it carries a drop probability. The emitted
///   spec itself no longer carries either.
/// * ReLU-activated specs without a bias preference get 0.1.
///
/// Specs with nothing to expand are passed through unchanged.
pub fn desugar(specs: &[LayerSpec]) -> Vec<LayerSpec> {
    let mut out = Vec::with_capacity(specs.len() * 2);
    for spec in specs {
        match spec {
            LayerSpec::Softmax(s) => {
                out.push(FullyConnectedSpec::new(s.num_classes).into());
                out.push(spec.clone());
            }
            LayerSpec::Svm(s) => {
                out.push(FullyConnectedSpec::new(s.num_classes).into());
                out.push(spec.clone());
            }
            LayerSpec::Regression(s) => {
                out.push(FullyConnectedSpec::new(s.num_neurons).into());
                out.push(spec.clone());
            }
            LayerSpec::FullyConnected(s) => {
                let mut fc = s.clone();
                let (activation, drop_prob) = (fc.activation, fc.drop_prob);
                if activation == Activation::Relu && fc.bias_pref.is_none() {
                    fc.bias_pref = Some(RELU_BIAS_PREF);
                }
                fc.activation = Activation::Undefined;
                fc.drop_prob = None;
                out.push(fc.into());
                push_companions(&mut out, activation, drop_prob);
            }
            LayerSpec::Conv(s) => {
                let mut conv = s.clone();
                let (activation, drop_prob) = (conv.activation, conv.drop_prob);
                if activation == Activation::Relu && conv.bias_pref.is_none() {
                    conv.bias_pref = Some(RELU_BIAS_PREF);
                }
                conv.activation = Activation::Undefined;
                conv.drop_prob = None;
                out.push(conv.into());
                push_companions(&mut out, activation, drop_prob);
            }
            _ => out.push(spec.clone()),
        }
    }
    out
}

fn push_companions(out: &mut Vec<LayerSpec>, activation: Activation, drop_prob: Option<f64>) {
    match activation {
        Activation::Undefined => {}
        Activation::Relu => out.push(LayerSpec::Relu),
        Activation::Sigmoid => out.push(LayerSpec::Sigmoid),
        Activation::Tanh => out.push(LayerSpec::Tanh),
        Activation::Maxout { group_size } => {
            out.push(LayerSpec::Maxout(MaxoutSpec::new(group_size)))
        }
    }
    if let Some(drop_prob) = drop_prob {
        out.push(LayerSpec::Dropout(DropoutSpec::new(drop_prob)));
    }
}

#[cfg(test)]
#[path = "desugar_test.rs"]
mod tests;
