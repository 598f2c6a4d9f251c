pub use crate::config::TrainingConfig;
pub use crate::dataset::{CsvOptions, load_csv, parse_csv};
pub use crate::error::{IoError, ModelError};
pub use crate::metric::{argmax_accuracy, argmax_correct};
pub use crate::neural_network::factory::*;
pub use crate::neural_network::layer::{Dense, ReLU, Sigmoid, TrainingParameters};
pub use crate::neural_network::loss_function::{BinaryCrossEntropy, LossKind, MeanSquaredError};
pub use crate::neural_network::network::{EpochMetrics, NeuralNetwork, TrainingHistory};
pub use crate::neural_network::optimizer::{Adam, OptimizerKind, SGD};
pub use crate::neural_network::parameter::{ParamId, Parameter};
pub use crate::tensor::{Tensor, matrix_product, transpose_2d};
pub use crate::traits::{Layer, LossFunction, Optimizer};
