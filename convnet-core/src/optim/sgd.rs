// convnet-core/src/optim/sgd.rs

/// Stochastic gradient descent for one scalar. Returns the change to apply to the weight.
///
/// With `momentum > 0` the step follows the classical momentum rule and `gsum` carries the
/// previous step; otherwise it is a plain `-learning_rate * gij` and `gsum` is untouched.
#[inline]
pub(crate) fn sgd_step(learning_rate: f64, momentum: f64, gij: f64, gsum: &mut f64) -> f64 {
    if momentum > 0.0 {
        let dx = momentum * *gsum - learning_rate * gij;
        *gsum = dx;
        dx
    } else {
        -learning_rate * gij
    }
}

#[cfg(test)]
#[path = "sgd_test.rs"]
mod tests;
