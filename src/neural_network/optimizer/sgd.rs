use super::*;

/// Stochastic Gradient Descent (SGD) optimizer.
///
/// A stateless optimization algorithm that updates parameters in the direction
/// of the negative gradient, scaled by the learning rate: `param -= lr * grad`.
///
/// # Fields
///
/// * `learning_rate` - Learning rate controlling the size of parameter updates
#[derive(Debug, Clone, PartialEq)]
pub struct SGD {
    learning_rate: f32,
}

impl SGD {
    /// Creates a new SGD optimizer with the specified learning rate.
    ///
    /// # Parameters
    ///
    /// * `learning_rate` - Step size for parameter updates
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new SGD optimizer instance
    /// - `Err(ModelError::ArgumentError)` - If the learning rate is not positive and finite
    pub fn new(learning_rate: f32) -> Result<Self, ModelError> {
        validate_learning_rate(learning_rate)?;
        Ok(Self { learning_rate })
    }

    get_field!(learning_rate, learning_rate, f32);
}

impl Optimizer for SGD {
    fn update(&mut self, param: &mut Parameter, grads: &Tensor<2>) -> Result<(), ModelError> {
        check_grad_shape(param, grads)?;
        let lr = self.learning_rate;
        for (p, &g) in param.value_mut().iter_mut().zip(grads.iter()) {
            *p -= lr * g;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "SGD"
    }
}
