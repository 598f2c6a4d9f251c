//! Construction of layers, optimizers and losses from string selectors.
//!
//! Selectors are matched case-insensitively. Unknown selectors and missing dense sizes are
//! reported as [`ModelError::ArgumentError`].

use super::*;

/// Creates a layer from its selector: `"dense"`, `"relu"` or `"sigmoid"`.
///
/// # Parameters
///
/// - `selector` - Layer name
/// - `sizes` - `(input_dim, output_dim)`, required for `"dense"` and ignored otherwise
///
/// # Returns
///
/// - `Ok(Box<dyn Layer>)` - The new layer
/// - `Err(ModelError::ArgumentError)` - Unknown selector, or a dense layer without sizes or with a zero size
///
/// # Example
/// ```rust
/// use ferronet::neural_network::factory::create_layer;
///
/// let dense = create_layer("dense", Some((4, 2))).unwrap();
/// assert_eq!(dense.layer_type(), "Dense");
/// assert!(create_layer("dense", None).is_err());
/// assert!(create_layer("conv2d", None).is_err());
/// ```
pub fn create_layer(selector: &str, sizes: Option<(usize, usize)>) -> Result<Box<dyn Layer>, ModelError> {
    match selector.to_ascii_lowercase().as_str() {
        "dense" => {
            let (input_dim, output_dim) = sizes.ok_or_else(|| {
                ModelError::ArgumentError(
                    "Dense layer requires input and output sizes".to_string(),
                )
            })?;
            create_dense(input_dim, output_dim)
        }
        "relu" => Ok(create_relu()),
        "sigmoid" => Ok(create_sigmoid()),
        _ => Err(ModelError::ArgumentError(format!(
            "Unknown layer '{}', expected one of: dense, relu, sigmoid",
            selector
        ))),
    }
}

/// Creates a Xavier-initialized [`Dense`] layer.
pub fn create_dense(input_dim: usize, output_dim: usize) -> Result<Box<dyn Layer>, ModelError> {
    Ok(Box::new(Dense::new(input_dim, output_dim)?))
}

pub fn create_relu() -> Box<dyn Layer> {
    Box::new(ReLU::new())
}

pub fn create_sigmoid() -> Box<dyn Layer> {
    Box::new(Sigmoid::new())
}

/// Creates an optimizer from `"sgd"` or `"adam"`; Adam uses its default decay rates and epsilon.
///
/// # Returns
///
/// - `Ok(Box<dyn Optimizer>)` - The new optimizer
/// - `Err(ModelError::ArgumentError)` - Unknown selector or invalid learning rate
pub fn create_optimizer(selector: &str, learning_rate: f32) -> Result<Box<dyn Optimizer>, ModelError> {
    selector.parse::<OptimizerKind>()?.build(learning_rate)
}

/// Evaluates the loss named by `"mse"` or `"bce"` (also `"mseloss"`, `"bceloss"`) for one
/// pair of predictions and targets.
///
/// # Returns
///
/// - `Ok(Box<dyn LossFunction>)` - The evaluated loss
/// - `Err(ModelError::ArgumentError)` - Unknown selector
/// - `Err(ModelError::ShapeError)` - If the shapes of `pred` and `target` differ
pub fn create_loss(
    selector: &str,
    pred: &Tensor<2>,
    target: &Tensor<2>,
) -> Result<Box<dyn LossFunction>, ModelError> {
    selector.parse::<LossKind>()?.build(pred, target)
}
