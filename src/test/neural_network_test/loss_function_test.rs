use super::*;

#[test]
fn mean_squared_error_test() {
    let pred = matrix(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let target = matrix(2, 2, &[1.0, 1.0, 1.0, 1.0]);
    let mse = MeanSquaredError::new(&pred, &target).unwrap();

    // (0 + 1 + 4 + 9) / 4
    assert_relative_eq!(mse.loss(), 3.5);

    // 2 / 4 * (pred - target)
    let grad = mse.loss_gradient();
    assert_eq!(grad.shape(), &[2, 2]);
    assert_eq!(grad.as_slice(), &[0.0, 0.5, 1.0, 1.5]);
}

#[test]
fn mean_squared_error_perfect_prediction_test() {
    let pred = matrix(1, 3, &[0.2, 0.4, 0.6]);
    let mse = MeanSquaredError::new(&pred, &pred.clone()).unwrap();
    assert_eq!(mse.loss(), 0.0);
    assert!(mse.loss_gradient().iter().all(|&g| g == 0.0));
}

#[test]
fn loss_shape_mismatch_test() {
    let pred = Tensor::zeros([2, 3]);
    let target = Tensor::zeros([3, 2]);
    assert!(matches!(
        MeanSquaredError::new(&pred, &target),
        Err(ModelError::ShapeError(_))
    ));
    assert!(matches!(
        BinaryCrossEntropy::new(&pred, &target),
        Err(ModelError::ShapeError(_))
    ));
}

#[test]
fn binary_cross_entropy_test() {
    let pred = matrix(1, 2, &[0.8, 0.4]);
    let target = matrix(1, 2, &[1.0, 0.0]);
    let bce = BinaryCrossEntropy::new(&pred, &target).unwrap();

    let expected = -((0.8f64).ln() + (0.6f64).ln()) / 2.0;
    assert_relative_eq!(bce.loss() as f64, expected, epsilon = 1e-6);

    // (p - t) / (p (1 - p)) / n
    let grad = bce.loss_gradient();
    assert_relative_eq!(grad[0], (0.8 - 1.0) / (0.8 * 0.2) / 2.0, epsilon = 1e-5);
    assert_relative_eq!(grad[1], 0.4 / (0.4 * 0.6) / 2.0, epsilon = 1e-5);
}

#[test]
fn binary_cross_entropy_saturated_predictions_are_finite_test() {
    let pred = matrix(1, 4, &[0.0, 1.0, 0.0, 1.0]);
    let target = matrix(1, 4, &[1.0, 0.0, 0.0, 1.0]);
    let bce = BinaryCrossEntropy::new(&pred, &target).unwrap();

    assert!(bce.loss().is_finite());
    assert!(bce.loss() > 0.0);
    assert!(bce.loss_gradient().iter().all(|g| g.is_finite()));

    // -ln(1e-8) for the two wrong entries, averaged over four
    assert_abs_diff_eq!(bce.loss(), (2.0 * 18.420_68) / 4.0, epsilon = 1e-3);
}

#[test]
fn loss_kind_parse_test() {
    assert_eq!("mse".parse::<LossKind>().unwrap(), LossKind::MeanSquaredError);
    assert_eq!("MSELoss".parse::<LossKind>().unwrap(), LossKind::MeanSquaredError);
    assert_eq!("bce".parse::<LossKind>().unwrap(), LossKind::BinaryCrossEntropy);
    assert_eq!("BCELoss".parse::<LossKind>().unwrap(), LossKind::BinaryCrossEntropy);
    assert!(matches!(
        "cross_entropy".parse::<LossKind>(),
        Err(ModelError::ArgumentError(_))
    ));
}

#[test]
fn loss_kind_build_test() {
    let pred = matrix(1, 2, &[0.5, 0.5]);
    let target = matrix(1, 2, &[1.0, 0.0]);

    let mse = LossKind::MeanSquaredError.build(&pred, &target).unwrap();
    assert_relative_eq!(mse.loss(), 0.25);

    let bce = LossKind::BinaryCrossEntropy.build(&pred, &target).unwrap();
    assert_relative_eq!(bce.loss(), std::f32::consts::LN_2, epsilon = 1e-6);
}
