use super::{Method, TrainerOptions};
use crate::error::ConvNetError;

#[test]
fn test_default_options() {
    let opts = TrainerOptions::default();
    assert_eq!(opts.method, Method::Sgd);
    assert_eq!(opts.batch_size, 1);
    assert_eq!((opts.l1_decay, opts.l2_decay), (0.0, 0.0));
    assert_eq!(opts.learning_rate, 0.01);
    assert_eq!(opts.momentum, 0.9);
    assert_eq!(opts.ro, 0.95);
    assert_eq!(opts.eps, 1e-8);
    assert_eq!((opts.beta1, opts.beta2), (0.9, 0.999));
    assert!(opts.validate().is_ok());
}

#[test]
fn test_builders_chain() {
    let opts = TrainerOptions::default()
        .with_method(Method::Adadelta)
        .with_batch_size(8)
        .with_l2_decay(1e-3)
        .with_ro(0.9)
        .with_eps(1e-6);
    assert_eq!(opts.method, Method::Adadelta);
    assert_eq!(opts.batch_size, 8);
    assert_eq!(opts.l2_decay, 1e-3);
    assert_eq!(opts.ro, 0.9);
    assert_eq!(opts.eps, 1e-6);
}

#[test]
fn test_method_names_round_trip() -> Result<(), ConvNetError> {
    for method in Method::all() {
        assert_eq!(method.to_string().parse::<Method>()?, method);
    }
    assert_eq!("ADAM".parse::<Method>()?, Method::Adam);
    assert_eq!(
        "rmsprop".parse::<Method>(),
        Err(ConvNetError::UnknownMethod("rmsprop".to_string()))
    );
    Ok(())
}

#[test]
fn test_validate_rejects_bad_values() {
    assert!(TrainerOptions::default().with_batch_size(0).validate().is_err());
    assert!(TrainerOptions::default().with_learning_rate(-1.0).validate().is_err());
    assert!(TrainerOptions::default().with_learning_rate(f64::NAN).validate().is_err());
    assert!(TrainerOptions::default().with_ro(1.0).validate().is_err());
    assert!(TrainerOptions::default().with_betas(0.9, 1.2).validate().is_err());
}
