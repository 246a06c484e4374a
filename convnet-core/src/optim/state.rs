// convnet-core/src/optim/state.rs

use log::warn;
use std::collections::HashMap;

/// Per-scalar accumulators of one parameter tensor.
///
/// What they hold depends on the update rule: momentum or first moment in `gsum`, squared
/// gradients or second moment in `xsum` (or `gsum` for adagrad and windowgrad).
#[derive(Debug, Clone, PartialEq)]
pub struct Velocity {
    pub gsum: Vec<f64>,
    pub xsum: Vec<f64>,
}

impl Velocity {
    pub fn zeros(len: usize) -> Self {
        Velocity {
            gsum: vec![0.0; len],
            xsum: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.gsum.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gsum.is_empty()
    }
}

/// Velocity buffers of every parameter tensor, keyed by `(layer, slot)`.
#[derive(Debug, Clone, Default)]
pub struct OptimizerState {
    buffers: HashMap<(usize, usize), Velocity>,
}

impl OptimizerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers for one tensor, allocated zeroed on first use.
    ///
    /// A tensor whose length changed since the buffers were allocated gets fresh ones.
    pub fn velocity(&mut self, layer: usize, slot: usize, len: usize) -> &mut Velocity {
        let v = self
            .buffers
            .entry((layer, slot))
            .or_insert_with(|| Velocity::zeros(len));
        if v.len() != len {
            warn!(
                "Parameter ({}, {}) changed length from {} to {}; resetting its optimizer state",
                layer,
                slot,
                v.len(),
                len
            );
            *v = Velocity::zeros(len);
        }
        v
    }

    pub fn get(&self, layer: usize, slot: usize) -> Option<&Velocity> {
        self.buffers.get(&(layer, slot))
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}
