use super::MaxoutLayer;
use crate::error::ConvNetError;
use crate::nn::layer::{InnerLayer, Layer};
use crate::nn::spec::MaxoutSpec;
use crate::vol::{Shape, Vol};

#[test]
fn test_maxout_requires_group_to_divide_depth() {
    assert!(MaxoutLayer::new(&MaxoutSpec::new(3), Shape::new(1, 1, 4)).is_err());
    assert!(MaxoutLayer::new(&MaxoutSpec::new(0), Shape::new(1, 1, 4)).is_err());
}

#[test]
fn test_maxout_depth_only() -> Result<(), ConvNetError> {
    let mut layer = MaxoutLayer::new(&MaxoutSpec::default(), Shape::new(1, 1, 6))?;
    assert_eq!(layer.out_shape(), Shape::new(1, 1, 3));

    let mut input = Vol::from_vec(vec![1.0, 2.0, 5.0, -1.0, -3.0, -4.0]);
    let mut out = layer.forward(&input, false);
    assert_eq!(out.w(), &[2.0, 5.0, -3.0]);

    out.dw_mut().copy_from_slice(&[10.0, 20.0, 30.0]);
    layer.backward(&mut input, &out);
    assert_eq!(input.dw(), &[0.0, 10.0, 20.0, 0.0, 30.0, 0.0]);
    Ok(())
}

#[test]
fn test_maxout_spatial() -> Result<(), ConvNetError> {
    let mut layer = MaxoutLayer::new(&MaxoutSpec::new(2), Shape::new(2, 1, 2))?;
    // (x=0: [3, 1]) (x=1: [0, 4])
    let mut input = Vol::from_shape_vec(2, 1, 2, vec![3.0, 1.0, 0.0, 4.0])?;
    let mut out = layer.forward(&input, false);
    assert_eq!(out.shape(), Shape::new(2, 1, 1));
    assert_eq!(out.w(), &[3.0, 4.0]);

    out.dw_mut().copy_from_slice(&[1.0, -1.0]);
    layer.backward(&mut input, &out);
    assert_eq!(input.dw(), &[1.0, 0.0, 0.0, -1.0]);
    Ok(())
}
