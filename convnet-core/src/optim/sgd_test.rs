use super::sgd_step;
use approx::assert_relative_eq;

#[test]
fn test_sgd_vanilla_step() {
    let mut gsum = 0.0;
    assert_relative_eq!(sgd_step(0.1, 0.0, 2.0, &mut gsum), -0.2);
    assert_eq!(gsum, 0.0);
}

#[test]
fn test_sgd_momentum_accumulates() {
    let mut gsum = 0.0;
    let first = sgd_step(0.1, 0.9, 1.0, &mut gsum);
    assert_relative_eq!(first, -0.1);
    assert_relative_eq!(gsum, -0.1);
    // 0.9 * -0.1 - 0.1 * 1.0
    let second = sgd_step(0.1, 0.9, 1.0, &mut gsum);
    assert_relative_eq!(second, -0.19);
    assert_relative_eq!(gsum, -0.19);
}
