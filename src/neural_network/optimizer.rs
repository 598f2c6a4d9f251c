use crate::error::ModelError;
use crate::neural_network::parameter::{ParamId, Parameter};
use crate::tensor::Tensor;
use crate::traits::Optimizer;
use std::fmt;
use std::str::FromStr;

/// Adam optimizer
pub mod adam;
/// Hyper-parameter validation shared by the optimizers
pub mod input_validation_function;
/// Stochastic Gradient Descent optimizer
pub mod sgd;

pub use adam::*;
pub use input_validation_function::*;
pub use sgd::*;

/// Checks that a gradient has the shape of the parameter it updates.
fn check_grad_shape(param: &Parameter, grads: &Tensor<2>) -> Result<(), ModelError> {
    if param.shape() != grads.shape() {
        return Err(ModelError::ShapeError(format!(
            "Gradient shape {:?} doesn't match parameter shape {:?}",
            grads.shape(),
            param.shape()
        )));
    }
    Ok(())
}

/// Selects which optimizer a network creates for a training run.
///
/// Parses from `"sgd"` and `"adam"` case-insensitively; the parsed Adam variant carries the
/// default decay rates and epsilon.
///
/// # Variants
///
/// - `SGD` - Plain gradient descent
/// - `Adam` - Adam with the given `beta1`, `beta2` and `epsilon`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptimizerKind {
    SGD,
    Adam { beta1: f32, beta2: f32, epsilon: f32 },
}

impl OptimizerKind {
    /// Adam with default decay rates and epsilon.
    pub fn adam() -> Self {
        OptimizerKind::Adam {
            beta1: ADAM_DEFAULT_BETA1,
            beta2: ADAM_DEFAULT_BETA2,
            epsilon: ADAM_DEFAULT_EPSILON,
        }
    }

    /// Creates a fresh optimizer of this kind.
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn Optimizer>)` - Optimizer with no recorded state
    /// - `Err(ModelError::ArgumentError)` - If the learning rate or a stored hyper-parameter is invalid
    pub fn build(&self, learning_rate: f32) -> Result<Box<dyn Optimizer>, ModelError> {
        Ok(match *self {
            OptimizerKind::SGD => Box::new(SGD::new(learning_rate)?),
            OptimizerKind::Adam {
                beta1,
                beta2,
                epsilon,
            } => Box::new(Adam::new(learning_rate, beta1, beta2, epsilon)?),
        })
    }
}

impl Default for OptimizerKind {
    fn default() -> Self {
        OptimizerKind::SGD
    }
}

impl FromStr for OptimizerKind {
    type Err = ModelError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        match selector.to_ascii_lowercase().as_str() {
            "sgd" => Ok(OptimizerKind::SGD),
            "adam" => Ok(OptimizerKind::adam()),
            _ => Err(ModelError::ArgumentError(format!(
                "Unknown optimizer '{}', expected one of: sgd, adam",
                selector
            ))),
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerKind::SGD => write!(f, "SGD"),
            OptimizerKind::Adam { .. } => write!(f, "Adam"),
        }
    }
}
