/// Module that contains string-selector construction of layers, optimizers and losses
pub mod factory;
/// Module that contains neural network layer implementations
pub mod layer;
/// Module that contains loss function implementations
pub mod loss_function;
/// Module that contains the layer-stack network and its training loop
pub mod network;
/// Module that contains optimization algorithms for neural network training
pub mod optimizer;
/// Module that contains trainable parameters and their identities
pub mod parameter;

pub use layer::*;
pub use loss_function::*;
pub use network::*;
pub use optimizer::*;
pub use parameter::*;

pub use crate::error::ModelError;
pub use crate::tensor::Tensor;
pub use crate::traits::{Layer, LossFunction, Optimizer};
