use super::*;

/// Mean Squared Error loss over one batch.
///
/// `loss = mean((pred - target)^2)` and `gradient = (2 / n) * (pred - target)`, where `n`
/// is the total number of elements. An empty batch has zero loss.
#[derive(Debug, Clone)]
pub struct MeanSquaredError {
    loss: f32,
    gradient: Tensor<2>,
}

impl MeanSquaredError {
    /// Evaluates the loss for `pred` against `target`.
    ///
    /// # Parameters
    ///
    /// - `pred` - Network output
    /// - `target` - Expected values, same shape as `pred`
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - The evaluated loss
    /// - `Err(ModelError::ShapeError)` - If the shapes differ
    pub fn new(pred: &Tensor<2>, target: &Tensor<2>) -> Result<Self, ModelError> {
        check_same_shape("MeanSquaredError", pred, target)?;
        let diff = pred.broadcast_sub(target)?;

        let n = diff.num_elements();
        if n == 0 {
            return Ok(MeanSquaredError {
                loss: 0.0,
                gradient: diff,
            });
        }

        let sum: f32 = diff.iter().map(|d| d * d).sum();
        let scale = 2.0 / n as f32;
        Ok(MeanSquaredError {
            loss: sum / n as f32,
            gradient: diff * scale,
        })
    }
}

impl LossFunction for MeanSquaredError {
    fn loss(&self) -> f32 {
        self.loss
    }

    fn loss_gradient(&self) -> Tensor<2> {
        self.gradient.clone()
    }
}
