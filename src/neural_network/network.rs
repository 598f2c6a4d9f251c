use super::*;
use crate::config::TrainingConfig;
use crate::metric::{argmax_accuracy, argmax_correct};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// Per-epoch metrics and the history of a training run
pub mod history;

pub use history::*;

/// Rows forwarded at a time by [`NeuralNetwork::predict`]
pub const PREDICT_BATCH_SIZE: usize = 100;

/// Callback invoked with the metrics of every completed epoch
pub type EpochCallback = Box<dyn FnMut(&EpochMetrics)>;

/// A feed-forward neural network built from an ordered stack of layers.
///
/// Data flows through the layers in insertion order during `forward` and in reverse
/// order during `backward`. Every layer hands its parameters to the optimizer right after
/// its own backward step, so updates are interleaved with gradient propagation.
///
/// Mini-batches are taken in index order as `[start, end)` row ranges; the last batch of
/// an epoch may be shorter. Accuracy uses the row-wise argmax convention of
/// [`argmax_correct`](crate::metric::argmax_correct).
///
/// # Fields
///
/// - `layers` - The layer stack, applied in order
/// - `loss` - Loss built for every batch, mean squared error unless compiled otherwise
/// - `optimizer` - Optimizer created for every [`NeuralNetwork::train`] call, SGD unless compiled otherwise
/// - `verbose` - Whether training renders a progress bar and per-epoch lines
/// - `epoch_callback` - Optional observer of per-epoch metrics
///
/// # Example
/// ```rust
/// use ferronet::prelude::*;
///
/// let x = Tensor::from_vec([4, 2], vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0]).unwrap();
/// let y = Tensor::from_vec([4, 1], vec![0.0, 1.0, 1.0, 0.0]).unwrap();
///
/// let mut network = NeuralNetwork::new();
/// network
///     .add_layer(Dense::new_with_seed(2, 8, 1).unwrap())
///     .add_layer(ReLU::new())
///     .add_layer(Dense::new_with_seed(8, 1, 2).unwrap())
///     .add_layer(Sigmoid::new())
///     .compile(LossKind::MeanSquaredError, OptimizerKind::adam());
///
/// let history = network.train(&x, &y, 10, 4, 0.01).unwrap();
/// assert_eq!(history.len(), 10);
///
/// let prediction = network.predict(&x).unwrap();
/// assert_eq!(prediction.shape(), &[4, 1]);
/// ```
pub struct NeuralNetwork {
    layers: Vec<Box<dyn Layer>>,
    loss: LossKind,
    optimizer: OptimizerKind,
    verbose: bool,
    epoch_callback: Option<EpochCallback>,
}

impl Default for NeuralNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl NeuralNetwork {
    /// Creates an empty network using mean squared error and SGD.
    pub fn new() -> Self {
        NeuralNetwork {
            layers: Vec::new(),
            loss: LossKind::MeanSquaredError,
            optimizer: OptimizerKind::SGD,
            verbose: false,
            epoch_callback: None,
        }
    }

    /// Appends a layer to the stack
    ///
    /// Supports method chaining pattern
    ///
    /// # Parameters
    ///
    /// * `layer` - The layer to add to the network
    ///
    /// # Returns
    ///
    /// * `&mut NeuralNetwork` - Mutable reference to self for method chaining
    pub fn add_layer<L: 'static + Layer>(&mut self, layer: L) -> &mut Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Appends an already boxed layer, e.g. one returned by the factory.
    pub fn add_boxed_layer(&mut self, layer: Box<dyn Layer>) -> &mut Self {
        self.layers.push(layer);
        self
    }

    /// Selects the loss function and the optimizer used by subsequent training calls
    ///
    /// # Parameters
    ///
    /// - `loss` - The loss built for every batch
    /// - `optimizer` - The optimizer created at the start of every [`NeuralNetwork::train`] call
    ///
    /// # Returns
    ///
    /// * `&mut NeuralNetwork` - Mutable reference to self for method chaining
    pub fn compile(&mut self, loss: LossKind, optimizer: OptimizerKind) -> &mut Self {
        self.loss = loss;
        self.optimizer = optimizer;
        self
    }

    /// Enables or disables the progress bar and the per-epoch console lines.
    pub fn set_verbose(&mut self, verbose: bool) -> &mut Self {
        self.verbose = verbose;
        self
    }

    /// Registers a function called with the metrics of every completed epoch.
    pub fn set_epoch_callback<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnMut(&EpochMetrics) + 'static,
    {
        self.epoch_callback = Some(Box::new(callback));
        self
    }

    pub fn clear_epoch_callback(&mut self) -> &mut Self {
        self.epoch_callback = None;
        self
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Identities of every trainable parameter, in layer order.
    pub fn parameter_ids(&self) -> Vec<ParamId> {
        self.layers
            .iter()
            .flat_map(|layer| layer.parameter_ids())
            .collect()
    }

    get_field!(loss, loss, LossKind);
    get_field!(optimizer, optimizer, OptimizerKind);

    /// Validates the model state and input data before any layer is touched
    ///
    /// # Parameters
    ///
    /// - `x` - Input tensor containing training data
    /// - `y` - Target tensor containing expected outputs
    /// - `batch_size` - Requested rows per batch
    ///
    /// # Returns
    ///
    /// - `Ok(())` - If validation passes
    /// - `Err(ModelError)` - If validation fails
    fn validate_training_inputs(
        &self,
        x: &Tensor<2>,
        y: &Tensor<2>,
        batch_size: usize,
    ) -> Result<(), ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::ArgumentError(
                "Cannot train a network without layers".to_string(),
            ));
        }

        if x.rows() != y.rows() {
            return Err(ModelError::ShapeError(format!(
                "Input and target sample counts differ: {} vs {}",
                x.rows(),
                y.rows()
            )));
        }

        if batch_size == 0 {
            return Err(ModelError::ArgumentError(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        if batch_size > x.rows() {
            return Err(ModelError::ArgumentError(format!(
                "Batch size ({}) cannot be larger than dataset size ({})",
                batch_size,
                x.rows()
            )));
        }

        Ok(())
    }

    /// Runs one forward/backward pass over a batch and applies the parameter updates.
    ///
    /// # Returns
    ///
    /// - `Ok((f32, usize))` - Batch loss and number of argmax-correct rows
    /// - `Err(ModelError)` - If any step of the pass failed
    fn train_batch(
        &mut self,
        x: &Tensor<2>,
        y: &Tensor<2>,
        optimizer: &mut dyn Optimizer,
    ) -> Result<(f32, usize), ModelError> {
        let output = self.forward_all(x.clone())?;
        if output.shape() != y.shape() {
            return Err(ModelError::ShapeError(format!(
                "Network output shape {:?} doesn't match target shape {:?}",
                output.shape(),
                y.shape()
            )));
        }

        let loss = self.loss.build(&output, y)?;
        let batch_loss = loss.loss();
        if !batch_loss.is_finite() {
            return Err(ModelError::NumericError(format!(
                "{} produced a non-finite loss: {}",
                self.loss, batch_loss
            )));
        }
        let correct = argmax_correct(&output, y)?;

        let mut grad = loss.loss_gradient();
        if grad.is_empty() {
            return Err(ModelError::ProcessingError(format!(
                "{} produced an empty gradient",
                self.loss
            )));
        }
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(&grad)?;
            if grad.is_empty() {
                return Err(ModelError::ProcessingError(format!(
                    "{} layer produced an empty gradient",
                    layer.layer_type()
                )));
            }
            layer.update_params(optimizer)?;
        }

        Ok((batch_loss, correct))
    }

    fn train_rows(
        &mut self,
        x: &Tensor<2>,
        y: &Tensor<2>,
        start: usize,
        end: usize,
        optimizer: &mut dyn Optimizer,
    ) -> Result<(f32, usize), ModelError> {
        let batch_x = x.slice_rows(start, end)?;
        let batch_y = y.slice_rows(start, end)?;
        self.train_batch(&batch_x, &batch_y, optimizer)
    }

    /// Trains the network with a fresh optimizer of the compiled kind.
    ///
    /// # Parameters
    ///
    /// - `x` - Input samples with shape `[samples, features]`
    /// - `y` - Targets with shape `[samples, outputs]`, row-aligned with `x`
    /// - `epochs` - Number of passes over the data
    /// - `batch_size` - Rows per batch, between 1 and the sample count
    /// - `learning_rate` - Step size of the optimizer
    ///
    /// # Returns
    ///
    /// - `Ok(TrainingHistory)` - Metrics of every epoch
    /// - `Err(ModelError)` - Invalid arguments are reported as they are, before any layer runs.
    ///   A failure part-way through a run is reported as [`ModelError::TrainingAborted`]
    ///   carrying the 1-based epoch and batch and the underlying error
    pub fn train(
        &mut self,
        x: &Tensor<2>,
        y: &Tensor<2>,
        epochs: usize,
        batch_size: usize,
        learning_rate: f32,
    ) -> Result<TrainingHistory, ModelError> {
        self.validate_training_inputs(x, y, batch_size)?;
        let mut optimizer = self.optimizer.build(learning_rate)?;
        self.train_with_optimizer(x, y, epochs, batch_size, optimizer.as_mut())
    }

    /// Same as [`NeuralNetwork::train`] with a caller-owned optimizer, which keeps its state
    /// after the call and can be reused across runs.
    ///
    /// Stateful optimizers hold on to the state of every parameter they have updated,
    /// including parameters of networks that no longer exist. Call
    /// [`Adam::retain_parameters`] with [`NeuralNetwork::parameter_ids`] before reusing one
    /// optimizer on a different network.
    pub fn train_with_optimizer(
        &mut self,
        x: &Tensor<2>,
        y: &Tensor<2>,
        epochs: usize,
        batch_size: usize,
        optimizer: &mut dyn Optimizer,
    ) -> Result<TrainingHistory, ModelError> {
        self.validate_training_inputs(x, y, batch_size)?;

        let n_samples = x.rows();
        let total_batches = n_samples.div_ceil(batch_size);
        let progress_bar = self.progress_bar((epochs * total_batches) as u64)?;

        let mut history = TrainingHistory::new();
        for epoch in 1..=epochs {
            let started = Instant::now();
            let mut epoch_loss = 0.0;
            let mut correct = 0;

            for (batch_index, start) in (0..n_samples).step_by(batch_size).enumerate() {
                let end = (start + batch_size).min(n_samples);
                let batch = self.train_rows(x, y, start, end, optimizer);
                let (batch_loss, batch_correct) = batch.map_err(|cause| {
                    progress_bar.abandon_with_message(format!("{}/{} | aborted", epoch, epochs));
                    ModelError::TrainingAborted {
                        epoch,
                        batch: batch_index + 1,
                        cause: Box::new(cause),
                    }
                })?;
                epoch_loss += batch_loss;
                correct += batch_correct;

                progress_bar.set_message(format!(
                    "{}/{} | Avg Loss: {:.6}",
                    epoch,
                    epochs,
                    epoch_loss / (batch_index + 1) as f32
                ));
                progress_bar.inc(1);
            }

            let metrics = EpochMetrics {
                epoch,
                epochs,
                average_loss: epoch_loss / total_batches as f32,
                accuracy: correct as f32 / n_samples as f32,
                correct,
                samples: n_samples,
                batches: total_batches,
                elapsed: started.elapsed(),
            };
            progress_bar.println(format!(
                "Epoch {}/{} - {}/{} - accuracy: {:.4} - loss: {:.6}",
                epoch, epochs, total_batches, total_batches, metrics.accuracy, metrics.average_loss
            ));
            if let Some(callback) = self.epoch_callback.as_mut() {
                callback(&metrics);
            }
            history.push(metrics);
        }

        progress_bar.finish_with_message("Training completed");
        Ok(history)
    }

    /// Resolves the selectors of `config`, compiles the network with them and trains.
    ///
    /// Unknown selectors and an invalid learning rate are reported before any data is
    /// looked at.
    pub fn train_with_config(
        &mut self,
        config: &TrainingConfig,
        x: &Tensor<2>,
        y: &Tensor<2>,
    ) -> Result<TrainingHistory, ModelError> {
        let loss = config.loss_kind()?;
        let optimizer = config.optimizer_kind()?;
        validate_learning_rate(config.learning_rate)?;

        self.compile(loss, optimizer);
        self.train(x, y, config.epochs, config.batch_size, config.learning_rate)
    }

    fn progress_bar(&self, total: u64) -> Result<ProgressBar, ModelError> {
        if !self.verbose {
            return Ok(ProgressBar::hidden());
        }
        let progress_bar = ProgressBar::new(total);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} | Epoch {msg}")
                .map_err(|e| {
                    ModelError::ProcessingError(format!("Failed to set progress bar template: {}", e))
                })?
                .progress_chars("█▓░"),
        );
        Ok(progress_bar)
    }

    /// Generates predictions for the input data
    ///
    /// Only performs forward passes, in chunks of [`PREDICT_BATCH_SIZE`] rows, and
    /// reassembles the outputs in the original row order. No gradients are computed and no
    /// parameters change.
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor<2>)` - One output row per input row; shape `[0, 0]` for a network without layers
    /// - `Err(ModelError)` - If a layer rejects the input
    pub fn predict(&mut self, x: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        if self.layers.is_empty() {
            return Ok(Tensor::zeros([0, 0]));
        }
        if x.rows() == 0 {
            return self.forward_all(x.clone());
        }

        let mut cols = 0;
        let mut data = Vec::new();
        for start in (0..x.rows()).step_by(PREDICT_BATCH_SIZE) {
            let end = (start + PREDICT_BATCH_SIZE).min(x.rows());
            let output = self.forward_all(x.slice_rows(start, end)?)?;
            cols = output.cols();
            data.extend(output.into_vec());
        }
        Tensor::from_vec([x.rows(), cols], data)
    }

    fn forward_all(&mut self, input: Tensor<2>) -> Result<Tensor<2>, ModelError> {
        let mut output = input;
        for layer in self.layers.iter_mut() {
            output = layer.forward(&output)?;
        }
        Ok(output)
    }

    /// Predicts `x` and returns the fraction of rows whose argmax matches `y`.
    pub fn evaluate(&mut self, x: &Tensor<2>, y: &Tensor<2>) -> Result<f32, ModelError> {
        let prediction = self.predict(x)?;
        argmax_accuracy(&prediction, y)
    }

    /// Prints a summary of the network's structure
    ///
    /// Displays each layer's information and parameter statistics in a tabular format
    pub fn summary(&self) {
        println!("{}", self.summary_table());
    }

    /// The table printed by [`NeuralNetwork::summary`].
    pub fn summary_table(&self) -> String {
        let col1_width = 33;
        let col2_width = 24;
        let col3_width = 15;
        let mut lines = vec![
            "Model: \"neural_network\"".to_string(),
            format!(
                "┏{}┳{}┳{}┓",
                "━".repeat(col1_width),
                "━".repeat(col2_width),
                "━".repeat(col3_width)
            ),
            format!(
                "┃ {:<31} ┃ {:<22} ┃ {:>13} ┃",
                "Layer (type)", "Output Shape", "Param #"
            ),
            format!(
                "┡{}╇{}╇{}┩",
                "━".repeat(col1_width),
                "━".repeat(col2_width),
                "━".repeat(col3_width)
            ),
        ];

        let mut trainable = 0;
        let mut non_trainable = 0;
        for (i, layer) in self.layers.iter().enumerate() {
            let name = if i == 0 {
                "Layer".to_string()
            } else {
                format!("Layer_{}", i)
            };
            let params = layer.param_count();
            match params {
                TrainingParameters::Trainable(count) => trainable += count,
                TrainingParameters::NonTrainable(count) => non_trainable += count,
                TrainingParameters::NoTrainable => {}
            }
            lines.push(format!(
                "│ {:<31} │ {:<22} │ {:>13} │",
                format!("{} ({})", name, layer.layer_type()),
                layer.output_shape(),
                params.count()
            ));
        }

        let total = trainable + non_trainable;
        lines.push(format!(
            "└{}┴{}┴{}┘",
            "─".repeat(col1_width),
            "─".repeat(col2_width),
            "─".repeat(col3_width)
        ));
        // f32 parameters, 4 bytes each
        lines.push(format!(" Total params: {} ({} B)", total, total * 4));
        lines.push(format!(" Trainable params: {} ({} B)", trainable, trainable * 4));
        lines.push(format!(
            " Non-trainable params: {} ({} B)",
            non_trainable,
            non_trainable * 4
        ));
        lines.join("\n")
    }
}
