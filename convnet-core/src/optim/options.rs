// convnet-core/src/optim/options.rs

use crate::error::ConvNetError;
use std::fmt;
use std::str::FromStr;

/// Parameter update rule applied at every batch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// Plain SGD, with classical momentum when `momentum > 0`.
    #[default]
    Sgd,
    Adam,
    Adagrad,
    /// Adagrad over an exponentially decaying window of squared gradients.
    Windowgrad,
    Adadelta,
    Nesterov,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Sgd => "sgd",
            Method::Adam => "adam",
            Method::Adagrad => "adagrad",
            Method::Windowgrad => "windowgrad",
            Method::Adadelta => "adadelta",
            Method::Nesterov => "nesterov",
        }
    }

    pub fn all() -> [Method; 6] {
        [
            Method::Sgd,
            Method::Adam,
            Method::Adagrad,
            Method::Windowgrad,
            Method::Adadelta,
            Method::Nesterov,
        ]
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ConvNetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_lowercase();
        Method::all()
            .into_iter()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| ConvNetError::UnknownMethod(s.to_string()))
    }
}

/// Hyperparameters of a [`Trainer`](crate::optim::Trainer).
///
/// Every field has a usable default; the `with_*` methods chain.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerOptions {
    pub method: Method,
    /// Number of examples whose gradients are accumulated before one update.
    pub batch_size: usize,
    pub l1_decay: f64,
    pub l2_decay: f64,
    pub learning_rate: f64,
    /// Used by `sgd` and `nesterov`.
    pub momentum: f64,
    /// Decay of the squared gradient window (`windowgrad`, `adadelta`).
    pub ro: f64,
    pub eps: f64,
    pub beta1: f64,
    pub beta2: f64,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        TrainerOptions {
            method: Method::Sgd,
            batch_size: 1,
            l1_decay: 0.0,
            l2_decay: 0.0,
            learning_rate: 0.01,
            momentum: 0.9,
            ro: 0.95,
            eps: 1e-8,
            beta1: 0.9,
            beta2: 0.999,
        }
    }
}

impl TrainerOptions {
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_l1_decay(mut self, l1_decay: f64) -> Self {
        self.l1_decay = l1_decay;
        self
    }

    pub fn with_l2_decay(mut self, l2_decay: f64) -> Self {
        self.l2_decay = l2_decay;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    pub fn with_ro(mut self, ro: f64) -> Self {
        self.ro = ro;
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_betas(mut self, beta1: f64, beta2: f64) -> Self {
        self.beta1 = beta1;
        self.beta2 = beta2;
        self
    }

    /// Rejects values no update rule can work with.
    pub fn validate(&self) -> Result<(), ConvNetError> {
        if self.batch_size == 0 {
            return Err(ConvNetError::InvalidOption(
                "batch_size must be at least 1".to_string(),
            ));
        }
        let non_negative = [
            ("l1_decay", self.l1_decay),
            ("l2_decay", self.l2_decay),
            ("learning_rate", self.learning_rate),
            ("momentum", self.momentum),
            ("eps", self.eps),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConvNetError::InvalidOption(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [("ro", self.ro), ("beta1", self.beta1), ("beta2", self.beta2)] {
            if !(0.0..1.0).contains(&value) {
                return Err(ConvNetError::InvalidOption(format!(
                    "{} must lie in [0, 1), got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "options_test.rs"]
mod tests;
