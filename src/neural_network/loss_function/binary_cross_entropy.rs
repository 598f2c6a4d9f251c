use super::*;

/// Predictions are clipped to `[PROB_CLIP, 1 - PROB_CLIP]` before the logarithm
const PROB_CLIP: f64 = 1e-8;

/// Binary Cross Entropy loss over one batch.
///
/// `loss = mean(-(t * ln(p) + (1 - t) * ln(1 - p)))` and
/// `gradient = (1 / n) * (p - t) / (p * (1 - p))`, where `n` is the total number of elements.
///
/// The gradient is taken with respect to the probabilities themselves. It is meant to flow
/// back through a terminal [`Sigmoid`](crate::neural_network::layer::Sigmoid) layer, whose own
/// derivative is applied there.
///
/// The arithmetic is carried out in `f64`: the clip bound `1 - 1e-8` is not representable in
/// `f32` and would round to 1.0. The same clipped `p` is used for the loss and the gradient, so
/// both stay finite for saturated predictions.
#[derive(Debug, Clone)]
pub struct BinaryCrossEntropy {
    loss: f32,
    gradient: Tensor<2>,
}

impl BinaryCrossEntropy {
    /// Evaluates the loss for `pred` against `target`.
    ///
    /// # Parameters
    ///
    /// - `pred` - Predicted probabilities
    /// - `target` - Expected labels in `[0, 1]`, same shape as `pred`
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - The evaluated loss
    /// - `Err(ModelError::ShapeError)` - If the shapes differ
    pub fn new(pred: &Tensor<2>, target: &Tensor<2>) -> Result<Self, ModelError> {
        check_same_shape("BinaryCrossEntropy", pred, target)?;

        let n = pred.num_elements();
        if n == 0 {
            return Ok(BinaryCrossEntropy {
                loss: 0.0,
                gradient: Tensor::zeros(*pred.shape()),
            });
        }
        let n = n as f64;

        let mut total = 0.0f64;
        let gradient = pred.zip_with(target, |p, t| {
            let p = (p as f64).clamp(PROB_CLIP, 1.0 - PROB_CLIP);
            let t = t as f64;
            ((p - t) / (p * (1.0 - p)) / n) as f32
        })?;
        for (&p, &t) in pred.iter().zip(target.iter()) {
            let p = (p as f64).clamp(PROB_CLIP, 1.0 - PROB_CLIP);
            let t = t as f64;
            total -= t * p.ln() + (1.0 - t) * (1.0 - p).ln();
        }

        Ok(BinaryCrossEntropy {
            loss: (total / n) as f32,
            gradient,
        })
    }
}

impl LossFunction for BinaryCrossEntropy {
    fn loss(&self) -> f32 {
        self.loss
    }

    fn loss_gradient(&self) -> Tensor<2> {
        self.gradient.clone()
    }
}
