use super::nesterov_step;
use approx::assert_relative_eq;

#[test]
fn test_nesterov_two_steps() {
    let mut gsum = 0.0;
    // v = 0.1; dx = 0 - 1.9 * 0.1
    assert_relative_eq!(nesterov_step(0.1, 0.9, 1.0, &mut gsum), -0.19);
    assert_relative_eq!(gsum, 0.1);
    // v = 0.09 + 0.1 = 0.19; dx = 0.9 * 0.1 - 1.9 * 0.19
    assert_relative_eq!(nesterov_step(0.1, 0.9, 1.0, &mut gsum), 0.09 - 0.361, epsilon = 1e-12);
    assert_relative_eq!(gsum, 0.19, epsilon = 1e-12);
}
