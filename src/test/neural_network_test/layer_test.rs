use super::*;

#[test]
fn relu_forward_test() {
    let mut relu = ReLU::new();
    let output = relu.forward(&matrix(1, 3, &[-1.0, 0.0, 2.0])).unwrap();
    assert_eq!(output.as_slice(), &[0.0, 0.0, 2.0]);
}

#[test]
fn relu_backward_test() {
    let mut relu = ReLU::new();
    relu.forward(&matrix(1, 3, &[-1.0, 0.0, 2.0])).unwrap();

    let grad_input = relu.backward(&Tensor::filled([1, 3], 1.0)).unwrap();
    assert_eq!(grad_input.as_slice(), &[0.0, 0.0, 1.0]);

    // gradients pass through unchanged where the input was positive
    let grad_input = relu.backward(&matrix(1, 3, &[5.0, 5.0, -3.5])).unwrap();
    assert_eq!(grad_input.as_slice(), &[0.0, 0.0, -3.5]);
}

#[test]
fn relu_backward_before_forward_test() {
    let mut relu = ReLU::new();
    let result = relu.backward(&Tensor::filled([1, 3], 1.0));
    assert!(matches!(result, Err(ModelError::ProcessingError(_))));
}

#[test]
fn relu_backward_shape_mismatch_test() {
    let mut relu = ReLU::new();
    relu.forward(&Tensor::zeros([2, 3])).unwrap();
    let result = relu.backward(&Tensor::zeros([3, 2]));
    assert!(matches!(result, Err(ModelError::ShapeError(_))));
}

#[test]
fn sigmoid_forward_zero_test() {
    let mut sigmoid = Sigmoid::new();
    let output = sigmoid.forward(&matrix(1, 1, &[0.0])).unwrap();
    assert_relative_eq!(output[0], 0.5, epsilon = 1e-6);
}

#[test]
fn sigmoid_output_strictly_inside_unit_interval_test() {
    let mut sigmoid = Sigmoid::new();
    let input = matrix(1, 7, &[-1000.0, -500.0, -40.0, 0.0, 40.0, 500.0, 1000.0]);
    let output = sigmoid.forward(&input).unwrap();
    for &y in output.iter() {
        assert!(y > 0.0 && y < 1.0, "sigmoid output {} outside (0, 1)", y);
        assert!(y.is_finite());
    }
    // monotone
    for pair in output.as_slice().windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[test]
fn sigmoid_backward_test() {
    let mut sigmoid = Sigmoid::new();
    let input = matrix(1, 3, &[-1.0, 0.0, 2.0]);
    let y = sigmoid.forward(&input).unwrap();

    let grad = sigmoid.backward(&Tensor::filled([1, 3], 2.0)).unwrap();
    for i in 0..3 {
        assert_relative_eq!(grad[i], 2.0 * y[i] * (1.0 - y[i]), epsilon = 1e-6);
    }
    assert_relative_eq!(grad[1], 0.5, epsilon = 1e-6);
}

#[test]
fn dense_forward_known_weights_test() {
    // weights [[1, 2], [3, 4], [5, 6]], bias [0.5, -0.5]
    let mut dense = Dense::with_initializers(
        3,
        2,
        |row, col| (row * 2 + col + 1) as f32,
        |col| if col == 0 { 0.5 } else { -0.5 },
    )
    .unwrap();

    let x = matrix(2, 3, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    let y = dense.forward(&x).unwrap();
    assert_eq!(y.shape(), &[2, 2]);
    assert_eq!(y.as_slice(), &[1.5, 1.5, 9.5, 11.5]);
}

#[test]
fn dense_backward_gradients_test() {
    let mut dense =
        Dense::with_initializers(2, 2, |row, col| if row == col { 1.0 } else { 2.0 }, |_| 0.0)
            .unwrap();

    let x = matrix(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    dense.forward(&x).unwrap();

    let grad_output = matrix(2, 2, &[1.0, 0.0, 0.0, 1.0]);
    let grad_input = dense.backward(&grad_output).unwrap();

    // grad_output · W^T with W = [[1, 2], [2, 1]]
    assert_eq!(grad_input.as_slice(), &[1.0, 2.0, 2.0, 1.0]);

    let (grad_w, grad_b) = dense.pending_gradients().unwrap();
    // x^T · grad_output
    assert_eq!(grad_w.as_slice(), &[1.0, 3.0, 2.0, 4.0]);
    // column sums of grad_output
    assert_eq!(grad_b.as_slice(), &[1.0, 1.0]);
}

#[test]
fn dense_update_params_consumes_gradients_test() {
    let mut dense = Dense::with_initializers(2, 1, |_, _| 0.0, |_| 0.0).unwrap();
    let mut sgd = SGD::new(0.5).unwrap();

    dense.forward(&matrix(1, 2, &[1.0, 2.0])).unwrap();
    dense.backward(&matrix(1, 1, &[1.0])).unwrap();
    dense.update_params(&mut sgd).unwrap();

    assert_eq!(dense.weights().as_slice(), &[-0.5, -1.0]);
    assert_eq!(dense.bias().as_slice(), &[-0.5]);
    assert!(dense.pending_gradients().is_none());

    // without a fresh backward pass there is nothing to apply
    dense.update_params(&mut sgd).unwrap();
    assert_eq!(dense.weights().as_slice(), &[-0.5, -1.0]);
}

#[test]
fn dense_input_feature_mismatch_test() {
    let mut dense = Dense::new(3, 2).unwrap();
    let result = dense.forward(&Tensor::zeros([4, 2]));
    assert!(matches!(result, Err(ModelError::ShapeError(_))));
}

#[test]
fn dense_backward_before_forward_test() {
    let mut dense = Dense::new(3, 2).unwrap();
    let result = dense.backward(&Tensor::zeros([1, 2]));
    assert!(matches!(result, Err(ModelError::ProcessingError(_))));
}

#[test]
fn dense_zero_dimension_test() {
    assert!(matches!(Dense::new(0, 2), Err(ModelError::ArgumentError(_))));
    assert!(matches!(Dense::new(2, 0), Err(ModelError::ArgumentError(_))));
}

#[test]
fn dense_xavier_initialization_test() {
    let dense = Dense::new_with_seed(6, 4, 3).unwrap();
    let limit = (6.0f32 / 10.0).sqrt();
    assert_eq!(dense.weights().shape(), &[6, 4]);
    assert!(dense.weights().iter().all(|&w| w >= -limit && w < limit));
    assert!(dense.bias().iter().all(|&b| b == 0.0));

    // same seed, same weights
    let again = Dense::new_with_seed(6, 4, 3).unwrap();
    assert_eq!(dense.weights(), again.weights());
}

#[test]
fn dense_set_weights_test() {
    let mut dense = Dense::new(2, 2).unwrap();
    dense
        .set_weights(Tensor::filled([2, 2], 1.0), Tensor::filled([1, 2], 0.5))
        .unwrap();
    let y = dense.forward(&matrix(1, 2, &[1.0, 1.0])).unwrap();
    assert_eq!(y.as_slice(), &[2.5, 2.5]);

    let result = dense.set_weights(Tensor::zeros([3, 2]), Tensor::zeros([1, 2]));
    assert!(matches!(result, Err(ModelError::ShapeError(_))));
}

#[test]
fn layer_introspection_test() {
    let dense = Dense::new(4, 3).unwrap();
    assert_eq!(dense.layer_type(), "Dense");
    assert_eq!(dense.output_shape(), "(None, 3)");
    assert_eq!(dense.param_count(), TrainingParameters::Trainable(15));
    assert_eq!(dense.input_dim(), 4);
    assert_eq!(dense.output_dim(), 3);

    let mut relu = ReLU::new();
    assert_eq!(relu.layer_type(), "ReLU");
    assert_eq!(relu.output_shape(), "Unknown");
    relu.forward(&Tensor::zeros([5, 3])).unwrap();
    assert_eq!(relu.output_shape(), "(5, 3)");
    assert_eq!(relu.param_count(), TrainingParameters::NoTrainable);
    assert_eq!(relu.param_count().count(), 0);

    let sigmoid = Sigmoid::new();
    assert_eq!(sigmoid.layer_type(), "Sigmoid");
}

#[test]
fn cloned_dense_has_new_parameter_identity_test() {
    let mut dense = Dense::with_initializers(1, 1, |_, _| 1.0, |_| 0.0).unwrap();
    let clone = dense.clone();

    dense.forward(&matrix(1, 1, &[1.0])).unwrap();
    dense.backward(&matrix(1, 1, &[1.0])).unwrap();
    dense.update_params(&mut SGD::new(1.0).unwrap()).unwrap();

    // deep copy: the clone keeps its own values
    assert_eq!(dense.weights().as_slice(), &[0.0]);
    assert_eq!(clone.weights().as_slice(), &[1.0]);
}
