use crate::error::ModelError;
use crate::neural_network::layer::TrainingParameters;
use crate::neural_network::parameter::{ParamId, Parameter};
use crate::tensor::Tensor;

/// Defines the interface for neural network layers.
///
/// Layers operate on rank-2 tensors laid out as `[batch_size, features]`. A layer caches
/// whatever forward-pass state its backward derivative needs, and owns its trainable
/// parameters, handing them to an [`Optimizer`] in [`Layer::update_params`].
pub trait Layer {
    /// Performs forward propagation through the layer.
    ///
    /// # Parameters
    ///
    /// - `input` - The input tensor to the layer
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor<2>)` - The output tensor after forward computation
    /// - `Err(ModelError)` - If the input cannot be processed (e.g. wrong feature count)
    fn forward(&mut self, input: &Tensor<2>) -> Result<Tensor<2>, ModelError>;

    /// Performs backward propagation through the layer.
    ///
    /// # Parameters
    ///
    /// - `grad_output` - The gradient tensor from the next layer
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor<2>)` - The gradient tensor to be passed to the previous layer
    /// - `Err(ModelError)` - If the layer encountered an error during processing
    fn backward(&mut self, grad_output: &Tensor<2>) -> Result<Tensor<2>, ModelError>;

    /// Hands every trainable parameter, together with the gradient computed by the last
    /// [`Layer::backward`] call, to `optimizer`. Layers without parameters do nothing.
    ///
    /// # Parameters
    ///
    /// - `optimizer` - The optimizer applying the update
    ///
    /// # Returns
    ///
    /// - `Ok(())` - All parameters were updated (or there was nothing to update)
    /// - `Err(ModelError)` - The optimizer rejected an update
    fn update_params(&mut self, _optimizer: &mut dyn Optimizer) -> Result<(), ModelError> {
        Ok(())
    }

    /// Returns the type name of the layer (e.g. "Dense").
    fn layer_type(&self) -> &str {
        "Unknown"
    }

    /// Returns a description of the output shape of the layer.
    fn output_shape(&self) -> String {
        "Unknown".to_string()
    }

    /// Returns the total number of trainable parameters in the layer.
    fn param_count(&self) -> TrainingParameters {
        TrainingParameters::NoTrainable
    }

    /// Identities of the parameters this layer hands to the optimizer, in update order.
    fn parameter_ids(&self) -> Vec<ParamId> {
        Vec::new()
    }
}

/// Defines the interface for loss functions used in neural network training.
///
/// A loss value is built from one pair of predicted and target tensors (see the
/// constructors of the implementing types), after which both the scalar loss and its
/// gradient with respect to the predictions can be read.
pub trait LossFunction {
    /// Returns the scalar loss value.
    fn loss(&self) -> f32;

    /// Returns the gradient of the loss with respect to the predictions.
    ///
    /// # Returns
    ///
    /// - `Tensor<2>` - Gradient with the same shape as the predictions
    fn loss_gradient(&self) -> Tensor<2>;
}

/// Defines the interface for optimization algorithms.
///
/// An optimizer is called once per parameter tensor per training step.
pub trait Optimizer {
    /// Updates `param` in place from `grads`.
    ///
    /// # Parameters
    ///
    /// - `param` - The parameter to update; its identity keys any per-parameter state
    /// - `grads` - Gradient of the loss with respect to `param`
    ///
    /// # Returns
    ///
    /// - `Ok(())` - The parameter was updated
    /// - `Err(ModelError)` - The gradient does not fit the parameter, or the update is not finite
    fn update(&mut self, param: &mut Parameter, grads: &Tensor<2>) -> Result<(), ModelError>;

    /// Returns the name of the optimizer (e.g. "Adam").
    fn name(&self) -> &str;
}
