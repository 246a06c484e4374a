// convnet-core/src/optim/adadelta.rs

/// Adadelta. `gsum` is the decaying mean of squared gradients, `xsum` the decaying mean of
/// squared steps; no learning rate is involved.
#[inline]
pub(crate) fn adadelta_step(ro: f64, eps: f64, gij: f64, gsum: &mut f64, xsum: &mut f64) -> f64 {
    *gsum = ro * *gsum + (1.0 - ro) * gij * gij;
    let dx = -((*xsum + eps) / (*gsum + eps)).sqrt() * gij;
    *xsum = ro * *xsum + (1.0 - ro) * dx * dx;
    dx
}

#[cfg(test)]
#[path = "adadelta_test.rs"]
mod tests;
