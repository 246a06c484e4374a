// convnet-core/src/optim/adam.rs

/// Hyperparameters of the Adam rule.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AdamParams {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub eps: f64,
}

/// Adam with bias-corrected moments. `gsum` holds the first moment, `xsum` the second, and
/// `k >= 1` counts the examples seen so far.
#[inline]
pub(crate) fn adam_step(p: AdamParams, k: u64, gij: f64, gsum: &mut f64, xsum: &mut f64) -> f64 {
    *gsum = *gsum * p.beta1 + (1.0 - p.beta1) * gij;
    *xsum = *xsum * p.beta2 + (1.0 - p.beta2) * gij * gij;
    let t = k.min(i32::MAX as u64) as i32;
    let m_hat = *gsum / (1.0 - p.beta1.powi(t));
    let v_hat = *xsum / (1.0 - p.beta2.powi(t));
    -p.learning_rate * m_hat / (v_hat.sqrt() + p.eps)
}

#[cfg(test)]
#[path = "adam_test.rs"]
mod tests;
