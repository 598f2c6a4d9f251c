use super::*;

/// Min input clipping value to prevent overflow in the exp function
const INPUT_CLIP_MIN: f32 = -500.0;

/// Max input clipping value to prevent overflow in the exp function
const INPUT_CLIP_MAX: f32 = 500.0;

/// Largest `f32` strictly below 1.0
const OUTPUT_MAX: f32 = 1.0 - f32::EPSILON / 2.0;

/// Sigmoid activation layer.
///
/// Applies `1 / (1 + e^(-x))` element-wise to the input tensor, squashing values to (0, 1)
/// while preserving the input shape. Inputs are clamped to `[-500, 500]` before the
/// exponential. In single precision the logistic curve already rounds to exactly 0 or 1
/// well inside that range, so the output is additionally kept within
/// `[f32::MIN_POSITIVE, 1 - f32::EPSILON / 2]`, the open interval (0, 1) as seen by `f32`.
///
/// # Fields
///
/// - `output_cache` - Cached output tensor from the forward pass, used during backpropagation
///
/// # Examples
///
/// ```rust
/// use ferronet::prelude::*;
///
/// let mut sigmoid = Sigmoid::new();
/// let y = sigmoid.forward(&Tensor::from_vec([1, 1], vec![0.0]).unwrap()).unwrap();
/// assert!((y.as_slice()[0] - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sigmoid {
    output_cache: Option<Tensor<2>>,
}

impl Sigmoid {
    /// Creates a new Sigmoid activation layer.
    ///
    /// # Returns
    ///
    /// - `Self` - A new `Sigmoid` layer instance
    pub fn new() -> Self {
        Sigmoid { output_cache: None }
    }
}

fn sigmoid(x: f32) -> f32 {
    let x = x.clamp(INPUT_CLIP_MIN, INPUT_CLIP_MAX);
    (1.0 / (1.0 + (-x).exp())).clamp(f32::MIN_POSITIVE, OUTPUT_MAX)
}

impl Layer for Sigmoid {
    fn forward(&mut self, input: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        let output = input.map(sigmoid);
        self.output_cache = Some(output.clone());
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
        let output = self
            .output_cache
            .as_ref()
            .ok_or_else(|| forward_not_run("Sigmoid"))?;
        check_grad_shape("Sigmoid", grad_output, output)?;

        grad_output.zip_with(output, |grad, y| grad * y * (1.0 - y))
    }

    fn layer_type(&self) -> &str {
        "Sigmoid"
    }

    fn output_shape(&self) -> String {
        format_output_shape(&self.output_cache)
    }
}
