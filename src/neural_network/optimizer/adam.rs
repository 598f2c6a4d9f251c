use super::*;
use ahash::AHashMap;

/// Default learning rate
pub const ADAM_DEFAULT_LEARNING_RATE: f32 = 0.001;
/// Default decay rate of the first moment estimates
pub const ADAM_DEFAULT_BETA1: f32 = 0.9;
/// Default decay rate of the second moment estimates
pub const ADAM_DEFAULT_BETA2: f32 = 0.999;
/// Default numerical stability constant
pub const ADAM_DEFAULT_EPSILON: f32 = 1e-8;

/// Stores the optimization state Adam keeps for one parameter tensor.
///
/// # Fields
///
/// - `m` - First moment vector (moving average of gradients)
/// - `v` - Second moment vector (moving average of squared gradients)
/// - `t` - Number of updates applied to this parameter
/// - `generation` - Parameter generation the moments were accumulated for
#[derive(Debug, Clone)]
pub struct AdamState {
    pub m: Tensor<2>,
    pub v: Tensor<2>,
    pub t: u64,
    generation: u64,
}

impl AdamState {
    fn new(param: &Parameter) -> Self {
        AdamState {
            m: Tensor::zeros(*param.shape()),
            v: Tensor::zeros(*param.shape()),
            t: 0,
            generation: param.generation(),
        }
    }

    /// Whether the moments were recorded for the current value of `param`.
    fn matches(&self, param: &Parameter) -> bool {
        self.generation == param.generation() && self.m.shape() == param.shape()
    }
}

/// Adam optimizer implementation.
///
/// An optimization algorithm that computes individual adaptive learning
/// rates for different parameters from estimates of first and second moments
/// of the gradients. On every update of a parameter:
///
/// ```text
/// t     = t + 1
/// m     = beta1 * m + (1 - beta1) * g
/// v     = beta2 * v + (1 - beta2) * g^2
/// m_hat = m / (1 - beta1^t)
/// v_hat = v / (1 - beta2^t)
/// param = param - lr * m_hat / (sqrt(v_hat) + epsilon)
/// ```
///
/// State is kept per parameter, keyed by its [`ParamId`], created lazily on the first
/// update and re-initialized whenever the parameter's shape or generation changes.
///
/// Non-finite gradients, a non-positive denominator and non-finite updates are rejected
/// with [`ModelError::NumericError`]. A rejected update leaves both the parameter and the
/// optimizer state untouched.
///
/// # Fields
///
/// - `learning_rate` - Step size for parameter updates
/// - `beta1` - Exponential decay rate for the first moment estimates
/// - `beta2` - Exponential decay rate for the second moment estimates
/// - `epsilon` - Small constant added for numerical stability
/// - `states` - Per-parameter moment estimates and step counters
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    states: AHashMap<ParamId, AdamState>,
}

impl Adam {
    /// Creates a new Adam optimizer with the specified parameters.
    ///
    /// # Parameters
    ///
    /// - `learning_rate` - Step size for parameter updates
    /// - `beta1` - Decay rate for the first moment estimates (typically 0.9)
    /// - `beta2` - Decay rate for the second moment estimates (typically 0.999)
    /// - `epsilon` - Small constant for numerical stability (typically 1e-8)
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new Adam optimizer instance
    /// - `Err(ModelError::ArgumentError)` - If any hyper-parameter is out of range
    pub fn new(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Result<Self, ModelError> {
        validate_learning_rate(learning_rate)?;
        validate_decay_rate(beta1, "beta1")?;
        validate_decay_rate(beta2, "beta2")?;
        validate_epsilon(epsilon)?;

        Ok(Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            states: AHashMap::new(),
        })
    }

    /// Creates an Adam optimizer with the given learning rate and default decay rates and epsilon.
    pub fn with_learning_rate(learning_rate: f32) -> Result<Self, ModelError> {
        Self::new(
            learning_rate,
            ADAM_DEFAULT_BETA1,
            ADAM_DEFAULT_BETA2,
            ADAM_DEFAULT_EPSILON,
        )
    }

    get_field!(learning_rate, learning_rate, f32);
    get_field!(beta1, beta1, f32);
    get_field!(beta2, beta2, f32);
    get_field!(epsilon, epsilon, f32);

    /// Number of parameters the optimizer currently tracks.
    pub fn tracked_parameters(&self) -> usize {
        self.states.len()
    }

    /// State recorded for `id`, if that parameter has been updated at least once.
    pub fn state(&self, id: ParamId) -> Option<&AdamState> {
        self.states.get(&id)
    }

    /// Drops all per-parameter state.
    pub fn reset(&mut self) {
        self.states.clear();
    }

    /// Drops the state of every parameter not listed in `ids`.
    ///
    /// Adam cannot tell when a parameter it has seen is dropped. When one optimizer is
    /// reused across networks, pass the ids of the network about to be trained (see
    /// [`NeuralNetwork::parameter_ids`](crate::neural_network::NeuralNetwork::parameter_ids))
    /// to release the rest.
    pub fn retain_parameters(&mut self, ids: &[ParamId]) {
        self.states.retain(|id, _| ids.contains(id));
    }
}

impl Default for Adam {
    fn default() -> Self {
        Adam {
            learning_rate: ADAM_DEFAULT_LEARNING_RATE,
            beta1: ADAM_DEFAULT_BETA1,
            beta2: ADAM_DEFAULT_BETA2,
            epsilon: ADAM_DEFAULT_EPSILON,
            states: AHashMap::new(),
        }
    }
}

impl Optimizer for Adam {
    fn update(&mut self, param: &mut Parameter, grads: &Tensor<2>) -> Result<(), ModelError> {
        check_grad_shape(param, grads)?;
        if grads.iter().any(|g| !g.is_finite()) {
            return Err(ModelError::NumericError(
                "Adam: gradient contains NaN or infinite values".to_string(),
            ));
        }

        let state = self
            .states
            .entry(param.id())
            .or_insert_with(|| AdamState::new(param));
        if !state.matches(param) {
            *state = AdamState::new(param);
        }

        let t = state.t + 1;
        let (beta1, beta2) = (self.beta1, self.beta2);
        let bias_correction1 = 1.0 - beta1.powf(t as f32);
        let bias_correction2 = 1.0 - beta2.powf(t as f32);

        let m = state.m.zip_with(grads, |m, g| beta1 * m + (1.0 - beta1) * g)?;
        let v = state.v.zip_with(grads, |v, g| beta2 * v + (1.0 - beta2) * g * g)?;

        let mut updates = Vec::with_capacity(m.num_elements());
        for (&m_i, &v_i) in m.iter().zip(v.iter()) {
            let m_hat = m_i / bias_correction1;
            let v_hat = v_i / bias_correction2;
            let denominator = v_hat.sqrt() + self.epsilon;
            if !(denominator > 0.0) {
                return Err(ModelError::NumericError(format!(
                    "Adam: invalid denominator {} at step {}",
                    denominator, t
                )));
            }
            let update = self.learning_rate * m_hat / denominator;
            if !update.is_finite() {
                return Err(ModelError::NumericError(format!(
                    "Adam: non-finite update {} at step {}",
                    update, t
                )));
            }
            updates.push(update);
        }

        for (p, u) in param.value_mut().iter_mut().zip(updates) {
            *p -= u;
        }
        state.m = m;
        state.v = v;
        state.t = t;
        Ok(())
    }

    fn name(&self) -> &str {
        "Adam"
    }
}
