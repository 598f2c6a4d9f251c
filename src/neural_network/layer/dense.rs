use super::*;
use crate::neural_network::parameter::{ParamId, Parameter};
use crate::tensor::{matrix_product, transpose_2d};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Dense (Fully Connected) layer implementation for neural networks.
///
/// This layer performs the linear transformation `output = input · weights + bias`, with the
/// bias row broadcast across the batch axis. Activations are separate layers.
///
/// Weights are initialized with Xavier/Glorot uniform initialization, drawn from
/// `[-limit, limit)` with `limit = sqrt(6 / (input_dim + output_dim))`. Bias values start at zero.
///
/// # Dimensions
///
/// - Input shape: (batch_size, input_dim)
/// - Output shape: (batch_size, output_dim)
///
/// # Fields
/// ## Core fields
/// - `input_dim` - Input dimension size
/// - `output_dim` - Output dimension size
/// - `weights` - Weight matrix with shape (input_dim, output_dim)
/// - `bias` - Bias vector with shape (1, output_dim)
///
/// ## Cache
/// - `input_cache` - Cache of the input from forward pass for use in backward pass
/// - `grad_weights` - Weight gradients from the last backward pass, consumed by `update_params`
/// - `grad_bias` - Bias gradients from the last backward pass, consumed by `update_params`
///
/// # Example
/// ```rust
/// use ferronet::prelude::*;
///
/// let x = Tensor::filled([2, 4], 1.0);
///
/// let mut dense = Dense::new_with_seed(4, 3, 42).unwrap();
/// let y = dense.forward(&x).unwrap();
/// assert_eq!(y.shape(), &[2, 3]);
///
/// let grad_input = dense.backward(&Tensor::filled([2, 3], 1.0)).unwrap();
/// assert_eq!(grad_input.shape(), &[2, 4]);
///
/// let mut sgd = SGD::new(0.01).unwrap();
/// dense.update_params(&mut sgd).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Dense {
    input_dim: usize,
    output_dim: usize,
    weights: Parameter,
    bias: Parameter,
    input_cache: Option<Tensor<2>>,
    grad_weights: Option<Tensor<2>>,
    grad_bias: Option<Tensor<2>>,
}

fn check_dims(input_dim: usize, output_dim: usize) -> Result<(), ModelError> {
    if input_dim == 0 || output_dim == 0 {
        return Err(ModelError::ArgumentError(format!(
            "Dense layer dimensions must be positive, got input_dim={}, output_dim={}",
            input_dim, output_dim
        )));
    }
    Ok(())
}

impl Dense {
    /// Creates a new dense layer with Xavier-initialized weights drawn from the thread-local RNG.
    ///
    /// # Parameters
    ///
    /// - `input_dim` - Number of input features
    /// - `output_dim` - Number of neurons in the layer
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new Dense layer instance with specified dimensions
    /// - `Err(ModelError::ArgumentError)` - If either dimension is zero
    pub fn new(input_dim: usize, output_dim: usize) -> Result<Self, ModelError> {
        Self::new_with_rng(input_dim, output_dim, &mut rand::rng())
    }

    /// Same as [`Dense::new`] with a reproducible weight draw.
    pub fn new_with_seed(input_dim: usize, output_dim: usize, seed: u64) -> Result<Self, ModelError> {
        Self::new_with_rng(input_dim, output_dim, &mut StdRng::seed_from_u64(seed))
    }

    /// Creates a new dense layer drawing its Xavier-initialized weights from `rng`.
    pub fn new_with_rng<R: Rng + ?Sized>(
        input_dim: usize,
        output_dim: usize,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        check_dims(input_dim, output_dim)?;
        let limit = (6.0 / (input_dim + output_dim) as f32).sqrt();
        let weights = Tensor::random_uniform([input_dim, output_dim], -limit, limit, rng)?;
        let bias = Tensor::zeros([1, output_dim]);
        Ok(Self::from_parts(input_dim, output_dim, weights, bias))
    }

    /// Creates a new dense layer whose initial values come from caller-supplied functions.
    ///
    /// # Parameters
    ///
    /// - `input_dim` - Number of input features
    /// - `output_dim` - Number of neurons in the layer
    /// - `init_weights` - Called with `(row, col)` for every weight
    /// - `init_bias` - Called with the column index for every bias entry
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - The initialized layer
    /// - `Err(ModelError::ArgumentError)` - If either dimension is zero
    pub fn with_initializers<W, B>(
        input_dim: usize,
        output_dim: usize,
        init_weights: W,
        init_bias: B,
    ) -> Result<Self, ModelError>
    where
        W: Fn(usize, usize) -> f32,
        B: Fn(usize) -> f32,
    {
        check_dims(input_dim, output_dim)?;
        let weights: Vec<f32> = (0..input_dim * output_dim)
            .map(|flat| init_weights(flat / output_dim, flat % output_dim))
            .collect();
        let bias: Vec<f32> = (0..output_dim).map(init_bias).collect();
        Ok(Self::from_parts(
            input_dim,
            output_dim,
            Tensor::from_vec([input_dim, output_dim], weights)?,
            Tensor::from_vec([1, output_dim], bias)?,
        ))
    }

    fn from_parts(input_dim: usize, output_dim: usize, weights: Tensor<2>, bias: Tensor<2>) -> Self {
        Dense {
            input_dim,
            output_dim,
            weights: Parameter::new(weights),
            bias: Parameter::new(bias),
            input_cache: None,
            grad_weights: None,
            grad_bias: None,
        }
    }

    get_field!(input_dim, input_dim, usize);
    get_field!(output_dim, output_dim, usize);

    /// Weight matrix with shape (input_dim, output_dim).
    pub fn weights(&self) -> &Tensor<2> {
        self.weights.value()
    }

    /// Bias row with shape (1, output_dim).
    pub fn bias(&self) -> &Tensor<2> {
        self.bias.value()
    }

    /// Gradients from the last backward pass that have not yet been applied, as
    /// `(weights, bias)`.
    pub fn pending_gradients(&self) -> Option<(&Tensor<2>, &Tensor<2>)> {
        match (&self.grad_weights, &self.grad_bias) {
            (Some(w), Some(b)) => Some((w, b)),
            _ => None,
        }
    }

    /// Replaces both weight and bias values. Optimizer state recorded for the previous
    /// values is discarded on the next update.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - The new values are in place
    /// - `Err(ModelError::ShapeError)` - If a shape differs from the layer's dimensions
    pub fn set_weights(&mut self, weights: Tensor<2>, bias: Tensor<2>) -> Result<(), ModelError> {
        if weights.shape() != &[self.input_dim, self.output_dim]
            || bias.shape() != &[1, self.output_dim]
        {
            return Err(ModelError::ShapeError(format!(
                "Expected weights {:?} and bias {:?}, got {:?} and {:?}",
                [self.input_dim, self.output_dim],
                [1, self.output_dim],
                weights.shape(),
                bias.shape()
            )));
        }
        self.weights.replace(weights);
        self.bias.replace(bias);
        Ok(())
    }
}

impl Layer for Dense {
    fn forward(&mut self, input: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        if input.cols() != self.input_dim {
            return Err(ModelError::ShapeError(format!(
                "Dense layer expects {} input features, got input shape {:?}",
                self.input_dim,
                input.shape()
            )));
        }
        self.input_cache = Some(input.clone());
        matrix_product(input, self.weights.value())?.broadcast_add(self.bias.value())
    }

    fn backward(&mut self, grad_output: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        let input = self
            .input_cache
            .as_ref()
            .ok_or_else(|| forward_not_run("Dense"))?;
        if grad_output.shape() != &[input.rows(), self.output_dim] {
            return Err(ModelError::ShapeError(format!(
                "Dense: gradient shape {:?} doesn't match output shape {:?}",
                grad_output.shape(),
                [input.rows(), self.output_dim]
            )));
        }

        self.grad_weights = Some(matrix_product(&transpose_2d(input), grad_output)?);
        self.grad_bias = Some(grad_output.sum_rows());

        matrix_product(grad_output, &transpose_2d(self.weights.value()))
    }

    fn update_params(&mut self, optimizer: &mut dyn Optimizer) -> Result<(), ModelError> {
        // gradients are applied once and then discarded
        if let (Some(grad_w), Some(grad_b)) = (self.grad_weights.take(), self.grad_bias.take()) {
            optimizer.update(&mut self.weights, &grad_w)?;
            optimizer.update(&mut self.bias, &grad_b)?;
        }
        Ok(())
    }

    fn layer_type(&self) -> &str {
        "Dense"
    }

    fn output_shape(&self) -> String {
        format!("(None, {})", self.output_dim)
    }

    fn param_count(&self) -> TrainingParameters {
        TrainingParameters::Trainable(self.input_dim * self.output_dim + self.output_dim)
    }

    fn parameter_ids(&self) -> Vec<ParamId> {
        vec![self.weights.id(), self.bias.id()]
    }
}
