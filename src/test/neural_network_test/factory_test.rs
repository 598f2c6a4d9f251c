use super::*;
use crate::neural_network::factory::*;

#[test]
fn create_layer_test() {
    let dense = create_layer("Dense", Some((3, 2))).unwrap();
    assert_eq!(dense.layer_type(), "Dense");
    assert_eq!(dense.param_count(), TrainingParameters::Trainable(8));

    assert_eq!(create_layer("relu", None).unwrap().layer_type(), "ReLU");
    assert_eq!(create_layer("SIGMOID", Some((9, 9))).unwrap().layer_type(), "Sigmoid");
}

#[test]
fn create_layer_rejects_bad_selectors_test() {
    assert!(matches!(
        create_layer("dense", None),
        Err(ModelError::ArgumentError(_))
    ));
    assert!(matches!(
        create_layer("dense", Some((0, 4))),
        Err(ModelError::ArgumentError(_))
    ));
    assert!(matches!(
        create_layer("lstm", Some((2, 2))),
        Err(ModelError::ArgumentError(_))
    ));
}

#[test]
fn factory_layers_build_a_network_test() {
    let mut network = NeuralNetwork::new();
    network
        .add_boxed_layer(create_dense(2, 4).unwrap())
        .add_boxed_layer(create_relu())
        .add_boxed_layer(create_dense(4, 1).unwrap())
        .add_boxed_layer(create_sigmoid());

    let output = network.predict(&Tensor::filled([3, 2], 0.5)).unwrap();
    assert_eq!(output.shape(), &[3, 1]);
    assert!(output.iter().all(|&v| v > 0.0 && v < 1.0));
}

#[test]
fn create_optimizer_test() {
    let mut sgd = create_optimizer("sgd", 0.5).unwrap();
    assert_eq!(sgd.name(), "SGD");
    let mut param = Parameter::new(matrix(1, 1, &[1.0]));
    sgd.update(&mut param, &matrix(1, 1, &[1.0])).unwrap();
    assert_relative_eq!(param.value()[0], 0.5);

    assert_eq!(create_optimizer("Adam", 0.01).unwrap().name(), "Adam");
    assert!(matches!(
        create_optimizer("adagrad", 0.01),
        Err(ModelError::ArgumentError(_))
    ));
    assert!(matches!(
        create_optimizer("adam", 0.0),
        Err(ModelError::ArgumentError(_))
    ));
}

#[test]
fn create_loss_test() {
    let pred = matrix(1, 2, &[0.0, 1.0]);
    let target = matrix(1, 2, &[0.0, 0.0]);

    let mse = create_loss("mse", &pred, &target).unwrap();
    assert_relative_eq!(mse.loss(), 0.5);
    assert_eq!(mse.loss_gradient().as_slice(), &[0.0, 1.0]);

    assert!(create_loss("bceloss", &pred, &target).unwrap().loss().is_finite());
    assert!(matches!(
        create_loss("hinge", &pred, &target),
        Err(ModelError::ArgumentError(_))
    ));
    assert!(matches!(
        create_loss("mse", &pred, &Tensor::zeros([2, 1])),
        Err(ModelError::ShapeError(_))
    ));
}
