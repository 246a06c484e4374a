// convnet-core/src/optim/adagrad.rs

/// Adagrad: the step shrinks with the running sum of squared gradients kept in `gsum`.
#[inline]
pub(crate) fn adagrad_step(learning_rate: f64, eps: f64, gij: f64, gsum: &mut f64) -> f64 {
    *gsum += gij * gij;
    -learning_rate / (*gsum + eps).sqrt() * gij
}

#[cfg(test)]
#[path = "adagrad_test.rs"]
mod tests;
