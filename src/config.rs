use crate::error::ModelError;
use crate::neural_network::loss_function::LossKind;
use crate::neural_network::optimizer::{OptimizerKind, validate_learning_rate};

/// Hyper-parameters of one training run.
///
/// The loss and optimizer are stored as selectors and resolved with
/// [`TrainingConfig::loss_kind`] and [`TrainingConfig::optimizer_kind`].
///
/// # Fields
///
/// - `name` - Label of the configuration
/// - `loss_function` - Loss selector: `"mse"`/`"mseloss"` or `"bce"`/`"bceloss"`
/// - `optimizer` - Optimizer selector: `"sgd"` or `"adam"`
/// - `epochs` - Number of passes over the training data
/// - `batch_size` - Rows per batch
/// - `learning_rate` - Step size handed to the optimizer
///
/// # Example
/// ```rust
/// use ferronet::config::TrainingConfig;
///
/// let config = TrainingConfig::preset("BCELoss_Adam_High").unwrap();
/// assert_eq!(config.epochs, 10);
/// assert_eq!(config.batch_size, 5);
/// assert!(config.optimizer_kind().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub name: String,
    pub loss_function: String,
    pub optimizer: String,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f32,
}

/// `(name, loss, optimizer, epochs, batch_size, learning_rate)`
const PRESETS: [(&str, &str, &str, usize, usize, f32); 8] = [
    ("BCELoss_Adam_Low", "BCELoss", "Adam", 30, 5, 0.1),
    ("BCELoss_Adam_High", "BCELoss", "Adam", 10, 5, 0.001),
    ("BCELoss_SGD_Low", "BCELoss", "SGD", 10, 5, 0.001),
    ("BCELoss_SGD_High", "BCELoss", "SGD", 30, 5, 0.1),
    ("MSELoss_Adam_Low", "MSELoss", "Adam", 30, 5, 0.1),
    ("MSELoss_Adam_High", "MSELoss", "Adam", 10, 5, 0.001),
    ("MSELoss_SGD_Low", "MSELoss", "SGD", 10, 5, 0.001),
    ("MSELoss_SGD_High", "MSELoss", "SGD", 30, 5, 0.1),
];

impl TrainingConfig {
    /// Creates a configuration from explicit values. Nothing is resolved or validated until
    /// [`TrainingConfig::validate`] or a training call.
    pub fn new(
        name: &str,
        loss_function: &str,
        optimizer: &str,
        epochs: usize,
        batch_size: usize,
        learning_rate: f32,
    ) -> Self {
        TrainingConfig {
            name: name.to_string(),
            loss_function: loss_function.to_string(),
            optimizer: optimizer.to_string(),
            epochs,
            batch_size,
            learning_rate,
        }
    }

    /// Resolves the loss selector.
    ///
    /// # Returns
    ///
    /// - `Ok(LossKind)` - The selected loss
    /// - `Err(ModelError::ArgumentError)` - If the selector is unknown
    pub fn loss_kind(&self) -> Result<LossKind, ModelError> {
        self.loss_function.parse()
    }

    /// Resolves the optimizer selector.
    ///
    /// # Returns
    ///
    /// - `Ok(OptimizerKind)` - The selected optimizer
    /// - `Err(ModelError::ArgumentError)` - If the selector is unknown
    pub fn optimizer_kind(&self) -> Result<OptimizerKind, ModelError> {
        self.optimizer.parse()
    }

    /// Checks both selectors, the batch size and the learning rate.
    ///
    /// The batch size can only be compared with the sample count once data is supplied;
    /// here it is only required to be non-zero.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.loss_kind()?;
        self.optimizer_kind()?;
        if self.batch_size == 0 {
            return Err(ModelError::ArgumentError(format!(
                "Configuration '{}': batch_size must be greater than 0",
                self.name
            )));
        }
        validate_learning_rate(self.learning_rate)
    }

    /// The eight built-in presets, covering every loss/optimizer pairing at a low and a high
    /// learning-rate setting.
    pub fn presets() -> Vec<TrainingConfig> {
        PRESETS
            .iter()
            .map(|&(name, loss, optimizer, epochs, batch_size, lr)| {
                TrainingConfig::new(name, loss, optimizer, epochs, batch_size, lr)
            })
            .collect()
    }

    /// Looks up a built-in preset by exact name.
    ///
    /// # Returns
    ///
    /// - `Ok(TrainingConfig)` - The preset
    /// - `Err(ModelError::ArgumentError)` - If no preset has that name
    pub fn preset(name: &str) -> Result<TrainingConfig, ModelError> {
        Self::presets()
            .into_iter()
            .find(|config| config.name == name)
            .ok_or_else(|| {
                ModelError::ArgumentError(format!(
                    "Unknown preset '{}', expected one of: {}",
                    name,
                    Self::preset_names().join(", ")
                ))
            })
    }

    pub fn preset_names() -> Vec<&'static str> {
        PRESETS.iter().map(|preset| preset.0).collect()
    }
}
