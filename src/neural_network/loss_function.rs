use crate::error::ModelError;
use crate::tensor::Tensor;
use crate::traits::LossFunction;
use std::fmt;
use std::str::FromStr;

/// Binary Cross Entropy loss function for binary classification
pub mod binary_cross_entropy;
/// Mean Squared Error loss function
pub mod mean_squared_error;

pub use binary_cross_entropy::*;
pub use mean_squared_error::*;

/// Checks that predictions and targets have identical shapes.
fn check_same_shape(name: &str, pred: &Tensor<2>, target: &Tensor<2>) -> Result<(), ModelError> {
    if pred.shape() != target.shape() {
        return Err(ModelError::ShapeError(format!(
            "{}: prediction shape {:?} doesn't match target shape {:?}",
            name,
            pred.shape(),
            target.shape()
        )));
    }
    Ok(())
}

/// Selects which loss function a network builds for every batch.
///
/// Parses from the selectors `"mse"` / `"mseloss"` and `"bce"` / `"bceloss"`,
/// case-insensitively.
///
/// # Example
/// ```rust
/// use ferronet::neural_network::loss_function::LossKind;
///
/// let kind: LossKind = "MSELoss".parse().unwrap();
/// assert_eq!(kind, LossKind::MeanSquaredError);
/// assert!("hinge".parse::<LossKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossKind {
    MeanSquaredError,
    BinaryCrossEntropy,
}

impl LossKind {
    /// Builds the loss for one pair of predictions and targets.
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn LossFunction>)` - The evaluated loss
    /// - `Err(ModelError::ShapeError)` - If the shapes of `pred` and `target` differ
    pub fn build(
        &self,
        pred: &Tensor<2>,
        target: &Tensor<2>,
    ) -> Result<Box<dyn LossFunction>, ModelError> {
        Ok(match self {
            LossKind::MeanSquaredError => Box::new(MeanSquaredError::new(pred, target)?),
            LossKind::BinaryCrossEntropy => Box::new(BinaryCrossEntropy::new(pred, target)?),
        })
    }
}

impl FromStr for LossKind {
    type Err = ModelError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        match selector.to_ascii_lowercase().as_str() {
            "mse" | "mseloss" => Ok(LossKind::MeanSquaredError),
            "bce" | "bceloss" => Ok(LossKind::BinaryCrossEntropy),
            _ => Err(ModelError::ArgumentError(format!(
                "Unknown loss function '{}', expected one of: mse, bce",
                selector
            ))),
        }
    }
}

impl fmt::Display for LossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LossKind::MeanSquaredError => write!(f, "MeanSquaredError"),
            LossKind::BinaryCrossEntropy => write!(f, "BinaryCrossEntropy"),
        }
    }
}
