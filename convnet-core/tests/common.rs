use convnet_core::nn::{Activation, LayerSpec};
use convnet_core::{ConvNetError, Net, Vol};
use rand::Rng;

// Shared by several test binaries; not every binary uses every helper.
#[allow(dead_code)]
pub fn mlp<R: Rng>(
    inputs: usize,
    hidden: &[(usize, Activation)],
    loss: LayerSpec,
    rng: &mut R,
) -> Result<Net, ConvNetError> {
    let mut specs = vec![LayerSpec::input(1, 1, inputs)];
    for &(n, activation) in hidden {
        specs.push(LayerSpec::fc(n).activation(activation).into());
    }
    specs.push(loss);
    Net::new(&specs, rng)
}

/// Probability the network assigns to `label` for `x`, in inference mode.
#[allow(dead_code)]
pub fn class_probability(net: &mut Net, x: &Vol, label: usize) -> Result<f64, ConvNetError> {
    Ok(net.forward(x, false)?.w()[label])
}
