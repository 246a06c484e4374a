// convnet-core/src/optim/windowgrad.rs

/// Adagrad with an exponentially decaying window of squared gradients (`gsum`).
#[inline]
pub(crate) fn windowgrad_step(learning_rate: f64, ro: f64, eps: f64, gij: f64, gsum: &mut f64) -> f64 {
    *gsum = ro * *gsum + (1.0 - ro) * gij * gij;
    -learning_rate / (*gsum + eps).sqrt() * gij
}

#[cfg(test)]
#[path = "windowgrad_test.rs"]
mod tests;
