use crate::nn::attributes::{attributes, Attributes};
use crate::nn::layer::{InnerLayer, Layer, LayerType};
use crate::nn::spec::InputSpec;
use crate::vol::{Shape, Vol};

/// Declares the input geometry; forward is the identity.
#[derive(Debug, Clone)]
pub struct InputLayer {
    out: Shape,
}

impl InputLayer {
    pub fn new(spec: &InputSpec) -> Self {
        InputLayer {
            out: Shape::new(spec.out_sx, spec.out_sy, spec.out_depth),
        }
    }
}

impl Layer for InputLayer {
    fn layer_type(&self) -> LayerType {
        LayerType::Input
    }

    fn out_shape(&self) -> Shape {
        self.out
    }

    fn forward(&mut self, input: &Vol, _is_training: bool) -> Vol {
        input.clone_values()
    }

    fn attributes(&self) -> Attributes {
        attributes! {
            "layer_type" => LayerType::Input.as_str(),
            "out_sx" => self.out.sx,
            "out_sy" => self.out.sy,
            "out_depth" => self.out.depth,
        }
    }
}

impl InnerLayer for InputLayer {
    fn backward(&mut self, input: &mut Vol, output: &Vol) {
        input.dw_mut().copy_from_slice(output.dw());
    }
}
