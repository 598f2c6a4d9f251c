use crate::error::ModelError;
use crate::tensor::Tensor;
use crate::traits::{Layer, Optimizer};

/// Activation layers (ReLU, Sigmoid)
pub mod activation_layer;
/// Dense (fully connected) layer
pub mod dense;

pub use activation_layer::*;
pub use dense::*;

/// Number of parameters held by a layer, as reported in model summaries.
///
/// # Variants
///
/// - `Trainable(usize)` - Parameters updated by the optimizer
/// - `NonTrainable(usize)` - Parameters that are part of the layer state but never updated
/// - `NoTrainable` - The layer holds no parameters at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingParameters {
    Trainable(usize),
    NonTrainable(usize),
    NoTrainable,
}

impl TrainingParameters {
    /// Total parameter count regardless of trainability.
    pub fn count(&self) -> usize {
        match self {
            TrainingParameters::Trainable(n) | TrainingParameters::NonTrainable(n) => *n,
            TrainingParameters::NoTrainable => 0,
        }
    }
}

/// Shape of a cached rank-2 tensor rendered as `(rows, cols)`, or "Unknown" before the
/// first forward pass.
fn format_output_shape(cached: &Option<Tensor<2>>) -> String {
    match cached {
        Some(tensor) => format!("({}, {})", tensor.rows(), tensor.cols()),
        None => "Unknown".to_string(),
    }
}

/// Error returned when `backward` is called on a layer whose forward cache is empty.
fn forward_not_run(layer: &str) -> ModelError {
    ModelError::ProcessingError(format!(
        "{}: forward pass has not been run yet",
        layer
    ))
}

/// Checks that an upstream gradient has the shape of the tensor cached by the forward pass.
fn check_grad_shape(layer: &str, grad: &Tensor<2>, cached: &Tensor<2>) -> Result<(), ModelError> {
    if grad.shape() != cached.shape() {
        return Err(ModelError::ShapeError(format!(
            "{}: gradient shape {:?} doesn't match forward shape {:?}",
            layer,
            grad.shape(),
            cached.shape()
        )));
    }
    Ok(())
}
