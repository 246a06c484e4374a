// convnet-core/src/optim/nesterov.rs

/// Nesterov accelerated gradient, in the form that keeps only the velocity `gsum`.
#[inline]
pub(crate) fn nesterov_step(learning_rate: f64, momentum: f64, gij: f64, gsum: &mut f64) -> f64 {
    let prev = *gsum;
    *gsum = *gsum * momentum + learning_rate * gij;
    momentum * prev - (1.0 + momentum) * *gsum
}

#[cfg(test)]
#[path = "nesterov_test.rs"]
mod tests;
