use crate::error::ModelError;

/// Validates that the learning rate is positive and finite.
///
/// # Parameters
///
/// * `learning_rate` - The learning rate value to validate
///
/// # Returns
///
/// - `Ok(())` if the learning rate is positive and finite
/// - `Err(ModelError::ArgumentError)` if the learning rate is not positive or not finite
pub fn validate_learning_rate(learning_rate: f32) -> Result<(), ModelError> {
    if !(learning_rate > 0.0 && learning_rate.is_finite()) {
        return Err(ModelError::ArgumentError(format!(
            "learning_rate must be positive and finite, got {}",
            learning_rate
        )));
    }
    Ok(())
}

/// Validates that a decay rate (beta1 or beta2) is in the range [0, 1).
///
/// # Parameters
///
/// - `value` - The decay rate value to validate
/// - `param_name` - The name of the parameter (for error messages)
pub fn validate_decay_rate(value: f32, param_name: &str) -> Result<(), ModelError> {
    if !(0.0..1.0).contains(&value) {
        return Err(ModelError::ArgumentError(format!(
            "{} must be in range [0, 1), got {}",
            param_name, value
        )));
    }
    Ok(())
}

/// Validates that epsilon is positive and finite.
pub fn validate_epsilon(epsilon: f32) -> Result<(), ModelError> {
    if !(epsilon > 0.0 && epsilon.is_finite()) {
        return Err(ModelError::ArgumentError(format!(
            "epsilon must be positive and finite, got {}",
            epsilon
        )));
    }
    Ok(())
}
