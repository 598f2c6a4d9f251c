use super::*;
use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn};

impl<const RANK: usize> Tensor<RANK> {
    /// Copies the tensor into a dynamically shaped `ndarray` array.
    ///
    /// # Returns
    ///
    /// - `Ok(ArrayD<f32>)` - Array with the same shape and row-major contents
    /// - `Err(ModelError::ShapeError)` - If ndarray rejects the shape
    pub fn to_ndarray(&self) -> Result<ArrayD<f32>, ModelError> {
        ArrayD::from_shape_vec(IxDyn(&self.shape), self.data.clone()).map_err(|e| {
            ModelError::ShapeError(format!(
                "Failed to build ndarray of shape {:?}: {}",
                self.shape, e
            ))
        })
    }

    /// Copies any `ndarray` array (owned or view, any layout) into a tensor.
    ///
    /// Elements are read in logical row-major order regardless of the source memory layout.
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - Tensor with the array's shape and values
    /// - `Err(ModelError::ShapeError)` - If the array's dimensionality is not `RANK`
    pub fn from_ndarray<S, D>(array: &ArrayBase<S, D>) -> Result<Self, ModelError>
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        let values: Vec<f32> = array.iter().copied().collect();
        Self::from_dims_and_values(array.shape(), &values)
    }
}

impl<const RANK: usize> TryFrom<ArrayD<f32>> for Tensor<RANK> {
    type Error = ModelError;

    fn try_from(array: ArrayD<f32>) -> Result<Self, Self::Error> {
        Self::from_ndarray(&array)
    }
}
