use crate::error::ConvNetError;
use crate::nn::attributes::{attributes, AttrValue, Attributes};
use crate::nn::layer::{InnerLayer, Layer, LayerType, ParamGrad};
use crate::nn::spec::FullyConnectedSpec;
use crate::vol::{Shape, Vol};
use rand::Rng;

/// Every output neuron is a dot product with the whole (flattened) input plus a bias.
///
/// `out[i] = sum_d filters[i].w[d] * in.w[d] + biases.w[i]`
#[derive(Debug, Clone)]
pub struct FullyConnectedLayer {
    num_inputs: usize,
    out_depth: usize,
    l1_decay_mul: f64,
    l2_decay_mul: f64,
    /// One `1 x 1 x num_inputs` filter per output neuron.
    pub(crate) filters: Vec<Vol>,
    pub(crate) biases: Vol,
}

impl FullyConnectedLayer {
    /// Creates a new fully connected layer reading an input of shape `in_shape`.
    ///
    /// # Arguments
    /// * `spec` - Neuron count, decay multipliers and initial bias.
    /// * `in_shape` - Output shape of the previous layer.
    /// * `rng` - Source for the Gaussian weight initialisation.
    pub fn new<R: Rng + ?Sized>(
        spec: &FullyConnectedSpec,
        in_shape: Shape,
        rng: &mut R,
    ) -> Result<Self, ConvNetError> {
        if spec.num_neurons == 0 {
            return Err(ConvNetError::InvalidSpec {
                layer: LayerType::FullyConnected,
                reason: "num_neurons must be at least 1".to_string(),
            });
        }
        let num_inputs = in_shape.len();
        let filters = (0..spec.num_neurons)
            .map(|_| Vol::random(1, 1, num_inputs, rng))
            .collect();
        let bias = spec.bias_pref.unwrap_or(0.0);
        Ok(FullyConnectedLayer {
            num_inputs,
            out_depth: spec.num_neurons,
            l1_decay_mul: spec.l1_decay_mul,
            l2_decay_mul: spec.l2_decay_mul,
            filters,
            biases: Vol::full(1, 1, spec.num_neurons, bias),
        })
    }

    pub fn filters(&self) -> &[Vol] {
        &self.filters
    }

    pub fn biases(&self) -> &Vol {
        &self.biases
    }
}

impl Layer for FullyConnectedLayer {
    fn layer_type(&self) -> LayerType {
        LayerType::FullyConnected
    }

    fn out_shape(&self) -> Shape {
        Shape::new(1, 1, self.out_depth)
    }

    fn forward(&mut self, input: &Vol, _is_training: bool) -> Vol {
        let mut out = Vol::zeros(1, 1, self.out_depth);
        let x = input.w();
        for (i, filter) in self.filters.iter().enumerate() {
            let a: f64 = filter
                .w()
                .iter()
                .zip(x.iter())
                .map(|(wi, xi)| wi * xi)
                .sum();
            out.w_mut()[i] = a + self.biases.w()[i];
        }
        out
    }

    fn params_and_grads(&mut self) -> Vec<ParamGrad<'_>> {
        let (l1, l2) = (self.l1_decay_mul, self.l2_decay_mul);
        let mut response: Vec<ParamGrad<'_>> = self
            .filters
            .iter_mut()
            .map(|f| ParamGrad::new(f, l1, l2))
            .collect();
        response.push(ParamGrad::new(&mut self.biases, 0.0, 0.0));
        response
    }

    fn params(&self) -> Vec<&Vol> {
        self.filters.iter().chain(std::iter::once(&self.biases)).collect()
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = attributes! {
            "layer_type" => LayerType::FullyConnected.as_str(),
            "out_sx" => 1usize,
            "out_sy" => 1usize,
            "out_depth" => self.out_depth,
            "num_inputs" => self.num_inputs,
            "l1_decay_mul" => self.l1_decay_mul,
            "l2_decay_mul" => self.l2_decay_mul,
            "biases" => self.biases.attributes(),
        };
        attrs.insert(
            "filters".to_string(),
            AttrValue::List(self.filters.iter().map(Vol::attributes).collect()),
        );
        attrs
    }
}

impl InnerLayer for FullyConnectedLayer {
    fn backward(&mut self, input: &mut Vol, output: &Vol) {
        let (x, dx) = input.split_mut();
        dx.fill(0.0);
        for (i, filter) in self.filters.iter_mut().enumerate() {
            let chain_grad = output.dw()[i];
            let (fw, fdw) = filter.split_mut();
            for d in 0..self.num_inputs {
                dx[d] += fw[d] * chain_grad;
                fdw[d] += x[d] * chain_grad;
            }
            self.biases.dw_mut()[i] += chain_grad;
        }
    }
}

#[cfg(test)]
#[path = "fully_connected_test.rs"]
mod tests;
