use super::*;

/// ReLU (Rectified Linear Unit) activation layer.
///
/// Applies `max(0, x)` element-wise to the input tensor, keeping the original shape.
///
/// # Fields
///
/// - `input_cache` - Cached input tensor from the forward pass, used during backpropagation
///
/// # Examples
///
/// ```rust
/// use ferronet::prelude::*;
///
/// let x = Tensor::from_vec([1, 3], vec![-1.0, 0.0, 2.0]).unwrap();
///
/// let mut relu = ReLU::new();
/// let output = relu.forward(&x).unwrap();
/// assert_eq!(output.as_slice(), &[0.0, 0.0, 2.0]);
///
/// let grad = relu.backward(&Tensor::filled([1, 3], 1.0)).unwrap();
/// assert_eq!(grad.as_slice(), &[0.0, 0.0, 1.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReLU {
    input_cache: Option<Tensor<2>>,
}

impl ReLU {
    /// Creates a new ReLU activation layer.
    ///
    /// # Returns
    ///
    /// - `Self` - A new `ReLU` layer instance
    pub fn new() -> Self {
        ReLU { input_cache: None }
    }
}

impl Layer for ReLU {
    fn forward(&mut self, input: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        self.input_cache = Some(input.clone());
        Ok(input.map(|x| if x > 0.0 { x } else { 0.0 }))
    }

    fn backward(&mut self, grad_output: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        let input = self
            .input_cache
            .as_ref()
            .ok_or_else(|| forward_not_run("ReLU"))?;
        check_grad_shape("ReLU", grad_output, input)?;

        // derivative is 1 for x > 0 and 0 for x <= 0
        grad_output.zip_with(input, |grad, x| if x > 0.0 { grad } else { 0.0 })
    }

    fn layer_type(&self) -> &str {
        "ReLU"
    }

    fn output_shape(&self) -> String {
        format_output_shape(&self.input_cache)
    }
}
