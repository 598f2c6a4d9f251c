use crate::error::ModelError;
use crate::tensor::Tensor;
use ahash::AHashMap;

fn check_same_shape(predicted: &Tensor<2>, actual: &Tensor<2>) -> Result<(), ModelError> {
    if predicted.shape() != actual.shape() {
        return Err(ModelError::ShapeError(format!(
            "Predicted shape {:?} doesn't match actual shape {:?}",
            predicted.shape(),
            actual.shape()
        )));
    }
    Ok(())
}

/// Counts the rows whose largest predicted value sits in the same column as the largest
/// target value.
///
/// This is the accuracy convention used throughout training, for one-hot classification
/// targets and single-output networks alike. With a single column every row matches.
/// Ties resolve to the lowest column index on both sides.
///
/// # Parameters
///
/// - `predicted` - Network output with shape `[rows, cols]`
/// - `actual` - Targets with the same shape
///
/// # Returns
///
/// - `Ok(usize)` - Number of matching rows
/// - `Err(ModelError::ShapeError)` - If the shapes differ
///
/// # Examples
/// ```rust
/// use ferronet::metric::argmax_correct;
/// use ferronet::tensor::Tensor;
///
/// let predicted = Tensor::from_vec([2, 2], vec![0.9, 0.1, 0.8, 0.2]).unwrap();
/// let actual = Tensor::from_vec([2, 2], vec![1.0, 0.0, 0.0, 1.0]).unwrap();
/// assert_eq!(argmax_correct(&predicted, &actual).unwrap(), 1);
/// ```
pub fn argmax_correct(predicted: &Tensor<2>, actual: &Tensor<2>) -> Result<usize, ModelError> {
    check_same_shape(predicted, actual)?;
    Ok(predicted
        .argmax_rows()
        .into_iter()
        .zip(actual.argmax_rows())
        .filter(|(p, a)| p == a)
        .count())
}

/// Fraction of rows counted by [`argmax_correct`]; 0.0 when there are no rows.
pub fn argmax_accuracy(predicted: &Tensor<2>, actual: &Tensor<2>) -> Result<f32, ModelError> {
    let correct = argmax_correct(predicted, actual)?;
    let rows = predicted.rows();
    if rows == 0 {
        return Ok(0.0);
    }
    Ok(correct as f32 / rows as f32)
}

/// Accuracy for every target class, keyed by the class index (the argmax of the target row).
///
/// # Returns
///
/// - `Ok(Vec<(usize, f32)>)` - `(class, accuracy)` pairs sorted by class, only for classes present in `actual`
/// - `Err(ModelError::ShapeError)` - If the shapes differ
pub fn per_class_accuracy(
    predicted: &Tensor<2>,
    actual: &Tensor<2>,
) -> Result<Vec<(usize, f32)>, ModelError> {
    check_same_shape(predicted, actual)?;

    let mut counts: AHashMap<usize, (usize, usize)> = AHashMap::new();
    for (p, a) in predicted.argmax_rows().into_iter().zip(actual.argmax_rows()) {
        let entry = counts.entry(a).or_insert((0, 0));
        entry.1 += 1;
        if p == a {
            entry.0 += 1;
        }
    }

    let mut result: Vec<(usize, f32)> = counts
        .into_iter()
        .map(|(class, (correct, total))| (class, correct as f32 / total as f32))
        .collect();
    result.sort_by_key(|(class, _)| *class);
    Ok(result)
}
