/// A macro that generates a getter method for any field.
///
/// This macro creates a public getter method that returns the value of the specified
/// field. The field type must be `Copy`.
///
/// # Parameters
///
/// - `$method_name` - The name of the getter method (e.g., learning_rate)
/// - `$field_name` - The name of the field to access (e.g., learning_rate)
/// - `$return_type` - The return type of the getter method
macro_rules! get_field {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name
        }
    };
}

/// Error types shared by every module of the crate.
///
/// - `ModelError` - Returned by tensor operations, layers, losses, optimizers and training
/// - `IoError` - Returned by the sample loader in [`dataset`]
pub mod error;

/// A strided, row-major N-dimensional `f32` array with broadcasting arithmetic.
///
/// The rank is a const generic. Elementwise operations work for any rank; the matrix
/// product and all network math use rank 2, laid out as `[rows, cols]`.
///
/// # Core Operations
/// - Construction: `zeros`, `filled`, `from_vec`, `from_dims`, `from_dims_and_values`, `random_uniform`
/// - Checked element access through `get` / `set`, unchecked flat access through `Index<usize>`
/// - `reshape`, which zero-fills or truncates when the element count changes
/// - Broadcasting `broadcast_add` / `broadcast_sub` / `broadcast_mul` and scalar `+ - *` operators, `div_scalar`
/// - `matrix_product` and `transpose_2d`
/// - Conversion to and from `ndarray` arrays
///
/// # Examples
/// ```rust
/// use ferronet::tensor::Tensor;
///
/// let m = Tensor::from_vec([2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let row = Tensor::from_vec([1, 2], vec![10.0, 20.0]).unwrap();
///
/// let sum = m.broadcast_add(&row).unwrap();
/// assert_eq!(sum.as_slice(), &[11.0, 22.0, 13.0, 24.0]);
///
/// let shifted = 1.0 - &m;
/// assert_eq!(shifted.as_slice(), &[0.0, -1.0, -2.0, -3.0]);
/// ```
pub mod tensor;

/// Core traits of the neural network framework: `Layer`, `LossFunction` and `Optimizer`.
pub mod traits;

/// This module provides a framework for constructing and training small feed-forward
/// neural networks.
///
/// # Core Components
///
/// ## Layer Types
/// - **Dense**: Fully connected layers with Xavier initialization
/// - **Activation**: Standalone activation layers (ReLU, Sigmoid)
///
/// ## Optimization Algorithms
/// - **SGD**: Stochastic Gradient Descent
/// - **Adam**: Adaptive moment estimation with per-parameter state
///
/// ## Loss Functions
/// - **MeanSquaredError**: For regression tasks
/// - **BinaryCrossEntropy**: For binary classification
///
/// ## Model Architecture
/// - **NeuralNetwork**: Ordered layer stack with batched training and inference
/// - **factory**: Construction of components from string selectors
///
/// # Examples
/// ```rust
/// use ferronet::prelude::*;
///
/// let x = Tensor::filled([2, 4], 1.0);
/// let y = Tensor::filled([2, 1], 1.0);
///
/// let mut network = NeuralNetwork::new();
/// network
///     .add_layer(Dense::new(4, 8).unwrap())
///     .add_layer(ReLU::new())
///     .add_layer(Dense::new(8, 1).unwrap())
///     .compile(LossKind::MeanSquaredError, OptimizerKind::SGD);
///
/// network.summary();
///
/// let history = network.train(&x, &y, 5, 2, 0.01).unwrap();
/// assert_eq!(history.len(), 5);
///
/// let predictions = network.predict(&x).unwrap();
/// assert_eq!(predictions.shape(), &[2, 1]);
/// ```
pub mod neural_network;

/// Evaluation helpers based on the row-wise argmax convention.
pub mod metric;

/// Training hyper-parameter records and the built-in presets.
pub mod config;

/// Loading of labelled samples from delimited text files.
pub mod dataset;

/// A convenience module that re-exports the most commonly used types and traits from this crate.
///
/// # Examples
/// ```rust
/// use ferronet::prelude::*;
///
/// let mut relu = ReLU::new();
/// let out = relu.forward(&Tensor::from_vec([1, 2], vec![-1.0, 1.0]).unwrap()).unwrap();
/// assert_eq!(out.as_slice(), &[0.0, 1.0]);
/// ```
pub mod prelude;
