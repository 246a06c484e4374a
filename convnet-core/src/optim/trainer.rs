// convnet-core/src/optim/trainer.rs

use crate::error::ConvNetError;
use crate::model::Net;
use crate::nn::layer::Target;
use crate::optim::adadelta::adadelta_step;
use crate::optim::adagrad::adagrad_step;
use crate::optim::adam::{adam_step, AdamParams};
use crate::optim::nesterov::nesterov_step;
use crate::optim::options::{Method, TrainerOptions};
use crate::optim::sgd::sgd_step;
use crate::optim::state::OptimizerState;
use crate::optim::windowgrad::windowgrad_step;
use crate::vol::Vol;
use log::debug;
use std::time::{Duration, Instant};

/// Outcome of one [`Trainer::train`] call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrainStats {
    pub forward_time: Duration,
    pub backward_time: Duration,
    /// Weight decay losses; zero on steps that did not reach a batch boundary.
    pub l1_decay_loss: f64,
    pub l2_decay_loss: f64,
    /// Loss reported by the loss layer.
    pub cost_loss: f64,
    /// Same value as `cost_loss`.
    pub softmax_loss: f64,
    /// `cost_loss + l1_decay_loss + l2_decay_loss`.
    pub loss: f64,
}

/// Drives training of one [`Net`]: forward, backward, and every `batch_size` examples a
/// parameter update with weight decay and the configured rule.
#[derive(Debug)]
pub struct Trainer {
    net: Net,
    options: TrainerOptions,
    /// Examples seen so far.
    k: u64,
    state: OptimizerState,
}

impl Trainer {
    /// # Errors
    /// `InvalidOption` when `options` fails [`TrainerOptions::validate`].
    pub fn new(net: Net, options: TrainerOptions) -> Result<Self, ConvNetError> {
        options.validate()?;
        debug!(
            "Trainer created: method {}, batch size {}, learning rate {}",
            options.method, options.batch_size, options.learning_rate
        );
        Ok(Trainer {
            net,
            options,
            k: 0,
            state: OptimizerState::new(),
        })
    }

    /// Runs one training example through the network.
    ///
    /// The gradient with respect to the input is left in `x.dw`. Parameters only change when
    /// this call completes a batch; before that, gradients keep accumulating.
    ///
    /// # Arguments
    /// * `x` - Input volume, shaped like the network's input layer.
    /// * `target` - A class index for softmax and svm networks; a value, a vector, or a
    ///   `(dim, value)` pair for regression networks.
    pub fn train(&mut self, x: &mut Vol, target: impl Into<Target>) -> Result<TrainStats, ConvNetError> {
        let target = target.into();

        let start = Instant::now();
        self.net.forward(x, true)?;
        let forward_time = start.elapsed();

        let start = Instant::now();
        let cost_loss = self.net.backward(&target)?;
        if let Some(grad) = self.net.input_grad() {
            x.dw_mut().copy_from_slice(grad);
        }
        let backward_time = start.elapsed();

        self.k += 1;
        let (l1_decay_loss, l2_decay_loss) = if self.k % self.options.batch_size as u64 == 0 {
            self.update()
        } else {
            debug!(
                "Example {} accumulated, update deferred to the batch boundary",
                self.k
            );
            (0.0, 0.0)
        };

        Ok(TrainStats {
            forward_time,
            backward_time,
            l1_decay_loss,
            l2_decay_loss,
            cost_loss,
            softmax_loss: cost_loss,
            loss: cost_loss + l1_decay_loss + l2_decay_loss,
        })
    }

    /// Applies decay and the update rule to every learnable scalar, then zeroes its gradient.
    /// Returns the L1 and L2 decay losses.
    fn update(&mut self) -> (f64, f64) {
        let opts = &self.options;
        let batch_size = opts.batch_size as f64;
        let adam = AdamParams {
            learning_rate: opts.learning_rate,
            beta1: opts.beta1,
            beta2: opts.beta2,
            eps: opts.eps,
        };
        let k = self.k;
        let mut l1_decay_loss = 0.0;
        let mut l2_decay_loss = 0.0;

        for group in self.net.params_and_grads() {
            for (slot, param) in group.params.into_iter().enumerate() {
                let l1_decay = opts.l1_decay * param.l1_decay_mul;
                let l2_decay = opts.l2_decay * param.l2_decay_mul;
                let velocity = self.state.velocity(group.layer, slot, param.vol.len());
                let (w, dw) = param.vol.split_mut();

                for j in 0..w.len() {
                    l2_decay_loss += l2_decay * w[j] * w[j] / 2.0;
                    l1_decay_loss += l1_decay * w[j].abs();
                    let l1grad = l1_decay * if w[j] > 0.0 { 1.0 } else { -1.0 };
                    let l2grad = l2_decay * w[j];
                    let gij = (l2grad + l1grad + dw[j]) / batch_size;

                    let gsum = &mut velocity.gsum[j];
                    let xsum = &mut velocity.xsum[j];
                    let dx = match opts.method {
                        Method::Sgd => sgd_step(opts.learning_rate, opts.momentum, gij, gsum),
                        Method::Adam => adam_step(adam, k, gij, gsum, xsum),
                        Method::Adagrad => adagrad_step(opts.learning_rate, opts.eps, gij, gsum),
                        Method::Windowgrad => {
                            windowgrad_step(opts.learning_rate, opts.ro, opts.eps, gij, gsum)
                        }
                        Method::Adadelta => adadelta_step(opts.ro, opts.eps, gij, gsum, xsum),
                        Method::Nesterov => {
                            nesterov_step(opts.learning_rate, opts.momentum, gij, gsum)
                        }
                    };
                    w[j] += dx;
                    dw[j] = 0.0;
                }
            }
        }

        debug!(
            "Update at example {} ({}): l1 decay loss {}, l2 decay loss {}",
            k, opts.method, l1_decay_loss, l2_decay_loss
        );
        (l1_decay_loss, l2_decay_loss)
    }

    /// Number of examples trained on so far.
    pub fn iteration(&self) -> u64 {
        self.k
    }

    pub fn options(&self) -> &TrainerOptions {
        &self.options
    }

    pub fn net(&self) -> &Net {
        &self.net
    }

    pub fn net_mut(&mut self) -> &mut Net {
        &mut self.net
    }

    pub fn into_net(self) -> Net {
        self.net
    }

    pub(crate) fn state(&self) -> &OptimizerState {
        &self.state
    }
}

#[cfg(test)]
#[path = "trainer_test.rs"]
mod tests;
