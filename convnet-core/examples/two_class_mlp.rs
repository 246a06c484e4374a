//! # Training a small classifier on two point clouds
//!
//! Builds `input(1x1x2) -> fc(16, tanh) -> softmax(2)`, trains it with the chosen update
//! rule on points drawn around two centres, and reports accuracy before and after.
//!
//! ## Running
//! `cargo run --example two_class_mlp [method]`, where `method` is one of
//! `sgd`, `adam`, `adagrad`, `windowgrad`, `adadelta`, `nesterov` (default `adadelta`).

use convnet_core::nn::{Activation, LayerSpec};
use convnet_core::utils::testing::seeded_rng;
use convnet_core::{ConvNetError, Method, Net, Trainer, TrainerOptions, Vol};
use rand::Rng;

const CENTRES: [(f64, f64); 2] = [(-1.0, 0.5), (1.0, -0.5)];

fn sample<R: Rng>(rng: &mut R) -> (Vol, usize) {
    let label = rng.gen_range(0..CENTRES.len());
    let (cx, cy) = CENTRES[label];
    let x = cx + rng.gen_range(-0.8..0.8);
    let y = cy + rng.gen_range(-0.8..0.8);
    (Vol::from_vec(vec![x, y]), label)
}

fn accuracy(net: &mut Net, data: &[(Vol, usize)]) -> Result<f64, ConvNetError> {
    let mut correct = 0;
    for (x, label) in data {
        net.forward(x, false)?;
        if net.prediction()? == *label {
            correct += 1;
        }
    }
    Ok(correct as f64 / data.len() as f64)
}

fn main() -> Result<(), ConvNetError> {
    let method = match std::env::args().nth(1) {
        Some(name) => name.parse::<Method>()?,
        None => Method::Adadelta,
    };

    let mut rng = seeded_rng(42);
    let net = Net::new(
        &[
            LayerSpec::input(1, 1, 2),
            LayerSpec::fc(16).activation(Activation::Tanh).into(),
            LayerSpec::softmax(2),
        ],
        &mut rng,
    )?;
    println!("Layers: {:?}", net.layer_types());

    let options = TrainerOptions::default()
        .with_method(method)
        .with_batch_size(10)
        .with_learning_rate(0.05)
        .with_l2_decay(0.001);
    let mut trainer = Trainer::new(net, options)?;

    let test_set: Vec<(Vol, usize)> = (0..200).map(|_| sample(&mut rng)).collect();
    println!(
        "Accuracy before training: {:.3}",
        accuracy(trainer.net_mut(), &test_set)?
    );

    for epoch in 0..5 {
        let mut total_loss = 0.0;
        let steps = 500;
        for _ in 0..steps {
            let (mut x, label) = sample(&mut rng);
            total_loss += trainer.train(&mut x, label)?.loss;
        }
        println!(
            "Epoch {} ({}): mean loss {:.4}",
            epoch + 1,
            method,
            total_loss / steps as f64
        );
    }

    println!(
        "Accuracy after training: {:.3}",
        accuracy(trainer.net_mut(), &test_set)?
    );
    Ok(())
}
