use super::*;
use std::cell::Cell;
use std::rc::Rc;

/// Identity layer that counts its forward calls.
struct CountingLayer {
    forward_calls: Rc<Cell<usize>>,
}

impl Layer for CountingLayer {
    fn forward(&mut self, input: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        self.forward_calls.set(self.forward_calls.get() + 1);
        Ok(input.clone())
    }

    fn backward(&mut self, grad_output: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        Ok(grad_output.clone())
    }
}

/// Identity layer whose backward pass always fails.
struct FailingBackward;

impl Layer for FailingBackward {
    fn forward(&mut self, input: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        Ok(input.clone())
    }

    fn backward(&mut self, _grad_output: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        Err(ModelError::NumericError("backward exploded".to_string()))
    }
}

/// Drops every feature column, while still sending a full-width gradient back.
struct ZeroWidth {
    input_cols: usize,
}

impl Layer for ZeroWidth {
    fn forward(&mut self, input: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        self.input_cols = input.cols();
        Ok(Tensor::zeros([input.rows(), 0]))
    }

    fn backward(&mut self, grad_output: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        Ok(Tensor::filled([grad_output.rows(), self.input_cols], 1.0))
    }
}

/// Identity layer whose backward pass returns an empty gradient.
struct EmptyGradient;

impl Layer for EmptyGradient {
    fn forward(&mut self, input: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        Ok(input.clone())
    }

    fn backward(&mut self, _grad_output: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        Ok(Tensor::zeros([0, 0]))
    }
}

fn counting_network() -> (NeuralNetwork, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let mut network = NeuralNetwork::new();
    network.add_layer(CountingLayer {
        forward_calls: Rc::clone(&calls),
    });
    (network, calls)
}

fn xor_network(seed: u64) -> NeuralNetwork {
    let mut network = NeuralNetwork::new();
    network
        .add_layer(Dense::new_with_seed(2, 8, seed).unwrap())
        .add_layer(ReLU::new())
        .add_layer(Dense::new_with_seed(8, 4, seed + 1).unwrap())
        .add_layer(ReLU::new())
        .add_layer(Dense::new_with_seed(4, 1, seed + 2).unwrap())
        .add_layer(Sigmoid::new())
        .compile(LossKind::MeanSquaredError, OptimizerKind::adam());
    network
}

#[test]
fn invalid_batch_size_aborts_before_forward_test() {
    let (mut network, calls) = counting_network();
    let x = Tensor::zeros([4, 2]);
    let y = Tensor::zeros([4, 2]);

    let result = network.train(&x, &y, 3, 0, 0.1);
    assert!(matches!(result, Err(ModelError::ArgumentError(_))));

    let result = network.train(&x, &y, 3, 5, 0.1);
    assert!(matches!(result, Err(ModelError::ArgumentError(_))));

    assert_eq!(calls.get(), 0);
}

#[test]
fn training_input_validation_test() {
    let mut empty = NeuralNetwork::new();
    let x = Tensor::zeros([4, 2]);
    let y = Tensor::zeros([4, 2]);
    assert!(matches!(
        empty.train(&x, &y, 1, 2, 0.1),
        Err(ModelError::ArgumentError(_))
    ));

    let (mut network, calls) = counting_network();
    let result = network.train(&x, &Tensor::zeros([3, 2]), 1, 2, 0.1);
    assert!(matches!(result, Err(ModelError::ShapeError(_))));

    let result = network.train(&x, &y, 1, 2, -0.1);
    assert!(matches!(result, Err(ModelError::ArgumentError(_))));
    assert_eq!(calls.get(), 0);
}

#[test]
fn batches_cover_every_row_test() {
    let (mut network, calls) = counting_network();
    let x = Tensor::zeros([10, 2]);
    let y = Tensor::zeros([10, 2]);

    // 4 + 4 + 2 rows per epoch
    let history = network.train(&x, &y, 2, 4, 0.1).unwrap();
    assert_eq!(calls.get(), 6);
    assert_eq!(history.len(), 2);
    for (i, metrics) in history.iter().enumerate() {
        assert_eq!(metrics.epoch, i + 1);
        assert_eq!(metrics.epochs, 2);
        assert_eq!(metrics.batches, 3);
        assert_eq!(metrics.samples, 10);
        // identical zero rows: every argmax is column 0
        assert_eq!(metrics.correct, 10);
        assert_relative_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.average_loss, 0.0);
    }
}

#[test]
fn output_target_shape_mismatch_aborts_run_test() {
    let mut network = NeuralNetwork::new();
    network.add_layer(Dense::new(2, 3).unwrap());
    let x = Tensor::zeros([4, 2]);
    let y = Tensor::zeros([4, 1]);

    let error = network.train(&x, &y, 5, 2, 0.1).unwrap_err();
    match &error {
        ModelError::TrainingAborted { epoch, batch, cause } => {
            assert_eq!(*epoch, 1);
            assert_eq!(*batch, 1);
            assert!(matches!(**cause, ModelError::ShapeError(_)));
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(matches!(error.root_cause(), ModelError::ShapeError(_)));
}

#[test]
fn backward_failure_is_reported_test() {
    let mut network = NeuralNetwork::new();
    network
        .add_layer(Dense::new(2, 2).unwrap())
        .add_layer(FailingBackward);
    let x = Tensor::filled([4, 2], 1.0);
    let y = Tensor::zeros([4, 2]);

    let error = network.train(&x, &y, 3, 4, 0.1).unwrap_err();
    assert!(matches!(
        error,
        ModelError::TrainingAborted { epoch: 1, batch: 1, .. }
    ));
    assert!(matches!(error.root_cause(), ModelError::NumericError(_)));
    assert!(error.to_string().contains("backward exploded"));
}

#[test]
fn empty_loss_gradient_aborts_before_backward_test() {
    let mut network = NeuralNetwork::new();
    network
        .add_layer(Dense::new_with_seed(2, 2, 3).unwrap())
        .add_layer(ZeroWidth { input_cols: 0 });
    let x = Tensor::filled([4, 2], 1.0);
    let y = Tensor::zeros([4, 0]);
    let mut adam = Adam::default();

    let error = network
        .train_with_optimizer(&x, &y, 2, 4, &mut adam)
        .unwrap_err();
    assert!(matches!(
        error,
        ModelError::TrainingAborted { epoch: 1, batch: 1, .. }
    ));
    assert!(matches!(error.root_cause(), ModelError::ProcessingError(_)));
    // no parameter reached the optimizer
    assert_eq!(adam.tracked_parameters(), 0);

    assert!(matches!(
        network.train(&x, &y, 2, 4, 0.1).map_err(|e| e.root_cause().clone()),
        Err(ModelError::ProcessingError(_))
    ));
}

#[test]
fn empty_layer_gradient_aborts_run_test() {
    let mut network = NeuralNetwork::new();
    network
        .add_layer(Dense::with_initializers(2, 2, |_, _| 1.0, |_| 0.0).unwrap())
        .add_layer(EmptyGradient);
    let x = Tensor::filled([4, 2], 1.0);
    let y = Tensor::zeros([4, 2]);

    let error = network.train(&x, &y, 3, 2, 0.1).unwrap_err();
    assert!(matches!(
        error,
        ModelError::TrainingAborted { epoch: 1, batch: 1, .. }
    ));
    assert!(matches!(error.root_cause(), ModelError::ProcessingError(_)));
    assert!(error.to_string().contains("empty gradient"));

    // nothing reached the optimizer
    let output = network.predict(&matrix(1, 2, &[1.0, 1.0])).unwrap();
    assert_eq!(output.as_slice(), &[2.0, 2.0]);
}

#[test]
fn numeric_corruption_stops_training_test() {
    let mut network = NeuralNetwork::new();
    network
        .add_layer(Dense::with_initializers(1, 1, |_, _| 1.0, |_| 0.0).unwrap())
        .compile(LossKind::MeanSquaredError, OptimizerKind::adam());
    let x = matrix(2, 1, &[f32::MAX, 1.0]);
    let y = matrix(2, 1, &[0.0, 0.0]);

    let error = network.train(&x, &y, 2, 2, 0.01).unwrap_err();
    assert!(matches!(error, ModelError::TrainingAborted { .. }));
    assert!(matches!(error.root_cause(), ModelError::NumericError(_)));
}

#[test]
fn xor_loss_decreases_test() {
    let (x, y) = xor_data();
    let mut network = xor_network(42);

    let history = network.train(&x, &y, 1000, 4, 0.01).unwrap();
    let first = history.first().unwrap().average_loss;
    let last = history.final_loss().unwrap();
    assert!(
        last < first / 2.0,
        "loss did not halve: first {} last {}",
        first,
        last
    );
    assert!(history.final_accuracy().unwrap() > 0.6);
}

#[test]
fn dense_sgd_regression_converges_test() {
    // y = 2x - 1
    let x = matrix(4, 1, &[0.0, 1.0, 2.0, 3.0]);
    let y = matrix(4, 1, &[-1.0, 1.0, 3.0, 5.0]);

    let mut network = NeuralNetwork::new();
    network.add_layer(Dense::with_initializers(1, 1, |_, _| 0.0, |_| 0.0).unwrap());
    let history = network.train(&x, &y, 500, 4, 0.05).unwrap();

    assert!(history.final_loss().unwrap() < 1e-3);
    let prediction = network.predict(&matrix(1, 1, &[10.0])).unwrap();
    assert_abs_diff_eq!(prediction[0], 19.0, epsilon = 0.2);
}

#[test]
fn epoch_callback_receives_metrics_test() {
    let (x, y) = xor_data();
    let seen = Rc::new(Cell::new(0));
    let seen_in_callback = Rc::clone(&seen);

    let mut network = xor_network(1);
    network.set_epoch_callback(move |metrics| {
        seen_in_callback.set(seen_in_callback.get() + 1);
        assert_eq!(metrics.epoch, seen_in_callback.get());
        assert!(metrics.average_loss.is_finite());
    });

    network.train(&x, &y, 5, 2, 0.01).unwrap();
    assert_eq!(seen.get(), 5);

    network.clear_epoch_callback();
    network.train(&x, &y, 2, 2, 0.01).unwrap();
    assert_eq!(seen.get(), 5);
}

#[test]
fn zero_epochs_returns_empty_history_test() {
    let (x, y) = xor_data();
    let mut network = xor_network(3);
    let history = network.train(&x, &y, 0, 4, 0.01).unwrap();
    assert!(history.is_empty());
    assert_eq!(history.final_loss(), None);
}

#[test]
fn caller_owned_optimizer_keeps_state_test() {
    let (x, y) = xor_data();
    let mut network = xor_network(5);
    let mut adam = Adam::with_learning_rate(0.01).unwrap();

    network.train_with_optimizer(&x, &y, 3, 2, &mut adam).unwrap();
    // three dense layers, weights and bias each
    assert_eq!(adam.tracked_parameters(), 6);

    network.train_with_optimizer(&x, &y, 1, 2, &mut adam).unwrap();
    assert_eq!(adam.tracked_parameters(), 6);
}

#[test]
fn shared_adam_releases_state_of_other_networks_test() {
    let (x, y) = xor_data();
    let mut adam = Adam::with_learning_rate(0.01).unwrap();

    let mut first = xor_network(11);
    first.train_with_optimizer(&x, &y, 1, 4, &mut adam).unwrap();
    let mut second = xor_network(21);
    second.train_with_optimizer(&x, &y, 1, 4, &mut adam).unwrap();
    assert_eq!(adam.tracked_parameters(), 12);

    let ids = second.parameter_ids();
    assert_eq!(ids.len(), 6);
    adam.retain_parameters(&ids);
    assert_eq!(adam.tracked_parameters(), 6);
    assert!(ids.iter().all(|&id| adam.state(id).is_some()));
    assert!(first.parameter_ids().iter().all(|&id| adam.state(id).is_none()));
}

#[test]
fn predict_empty_network_test() {
    let mut network = NeuralNetwork::new();
    let output = network.predict(&Tensor::filled([3, 2], 1.0)).unwrap();
    assert_eq!(output.shape(), &[0, 0]);
}

#[test]
fn predict_matches_single_forward_test() {
    let mut network = NeuralNetwork::new();
    network
        .add_layer(Dense::new_with_seed(3, 2, 11).unwrap())
        .add_layer(Sigmoid::new());
    let mut reference = Dense::new_with_seed(3, 2, 11).unwrap();
    let mut sigmoid = Sigmoid::new();

    // more rows than one prediction chunk
    let values: Vec<f32> = (0..250 * 3).map(|v| (v % 17) as f32 * 0.1 - 0.8).collect();
    let x = Tensor::from_vec([250, 3], values).unwrap();

    let output = network.predict(&x).unwrap();
    let expected = sigmoid.forward(&reference.forward(&x).unwrap()).unwrap();
    assert_eq!(output.shape(), &[250, 2]);
    for (a, b) in output.iter().zip(expected.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-6);
    }

    let empty = network.predict(&Tensor::zeros([0, 3])).unwrap();
    assert_eq!(empty.shape(), &[0, 2]);
}

#[test]
fn evaluate_test() {
    let mut network = NeuralNetwork::new();
    network.add_layer(ReLU::new());
    let x = matrix(3, 2, &[1.0, 0.0, 0.0, 1.0, 2.0, 1.0]);
    let y = matrix(3, 2, &[1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
    assert_relative_eq!(network.evaluate(&x, &y).unwrap(), 2.0 / 3.0);
}

#[test]
fn train_with_config_rejects_unknown_selectors_test() {
    let (mut network, calls) = counting_network();
    let x = Tensor::zeros([4, 2]);
    let y = Tensor::zeros([4, 2]);

    let config = crate::config::TrainingConfig::new("bad", "hinge", "sgd", 1, 2, 0.1);
    assert!(matches!(
        network.train_with_config(&config, &x, &y),
        Err(ModelError::ArgumentError(_))
    ));

    let config = crate::config::TrainingConfig::new("bad", "mse", "lbfgs", 1, 2, 0.1);
    assert!(matches!(
        network.train_with_config(&config, &x, &y),
        Err(ModelError::ArgumentError(_))
    ));
    assert_eq!(calls.get(), 0);

    let config = crate::config::TrainingConfig::new("ok", "bce", "adam", 2, 2, 0.1);
    let history = network.train_with_config(&config, &x, &y);
    assert!(history.is_ok());
    assert_eq!(network.loss(), LossKind::BinaryCrossEntropy);
    assert_eq!(network.optimizer(), OptimizerKind::adam());
}

#[test]
fn summary_table_test() {
    let mut network = NeuralNetwork::new();
    network
        .add_layer(Dense::new(4, 3).unwrap())
        .add_layer(ReLU::new())
        .add_layer(Dense::new(3, 1).unwrap());
    assert_eq!(network.len(), 3);
    assert!(!network.is_empty());

    let table = network.summary_table();
    assert!(table.contains("Layer (Dense)"));
    assert!(table.contains("Layer_1 (ReLU)"));
    assert!(table.contains("Layer_2 (Dense)"));
    assert!(table.contains("Total params: 19 (76 B)"));
    assert!(table.contains("Trainable params: 19"));
    network.summary();
}
