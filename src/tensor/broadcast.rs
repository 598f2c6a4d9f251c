use super::*;
use std::ops::{Add, Mul, Sub};

impl<const RANK: usize> Tensor<RANK> {
    /// Computes the result shape of a broadcasting binary operation.
    ///
    /// Axes are compatible when they are equal or when either of them is exactly 1, in
    /// which case the result takes the other extent.
    ///
    /// # Returns
    ///
    /// - `Ok([usize; RANK])` - The broadcast shape
    /// - `Err(ModelError::ShapeError)` - If some axis differs and neither extent is 1
    pub fn broadcast_shape(&self, other: &Self) -> Result<[usize; RANK], ModelError> {
        let mut result = [0usize; RANK];
        for axis in 0..RANK {
            let (a, b) = (self.shape[axis], other.shape[axis]);
            result[axis] = if a == b || b == 1 {
                a
            } else if a == 1 {
                b
            } else {
                return Err(ModelError::ShapeError(format!(
                    "Shapes {:?} and {:?} are not compatible for broadcasting (axis {})",
                    self.shape, other.shape, axis
                )));
            };
        }
        Ok(result)
    }

    /// Applies `op` elementwise to the broadcast of `self` and `other`.
    ///
    /// # Parameters
    ///
    /// - `other` - Right-hand operand
    /// - `op` - Function receiving `(self_value, other_value)`
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - Tensor of the broadcast shape
    /// - `Err(ModelError::ShapeError)` - If the shapes cannot be broadcast together
    pub fn zip_with<F: Fn(f32, f32) -> f32>(&self, other: &Self, op: F) -> Result<Self, ModelError> {
        let shape = self.broadcast_shape(other)?;

        if self.shape == other.shape {
            let data = self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| op(a, b))
                .collect();
            return Tensor::from_vec(shape, data);
        }

        let mut result = Tensor::zeros(shape);
        for flat in 0..result.data.len() {
            let index = result.multi_index(flat);
            let mut offset_a = 0;
            let mut offset_b = 0;
            for axis in 0..RANK {
                // extent-1 axes stay pinned at position 0
                if self.shape[axis] != 1 {
                    offset_a += index[axis] * self.strides[axis];
                }
                if other.shape[axis] != 1 {
                    offset_b += index[axis] * other.strides[axis];
                }
            }
            result.data[flat] = op(self.data[offset_a], other.data[offset_b]);
        }
        Ok(result)
    }

    /// Elementwise sum with broadcasting.
    pub fn broadcast_add(&self, other: &Self) -> Result<Self, ModelError> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Elementwise difference with broadcasting.
    pub fn broadcast_sub(&self, other: &Self) -> Result<Self, ModelError> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Elementwise (Hadamard) product with broadcasting.
    pub fn broadcast_mul(&self, other: &Self) -> Result<Self, ModelError> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Divides every element by `scalar`.
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - The scaled tensor
    /// - `Err(ModelError::NumericError)` - If `scalar` is zero
    pub fn div_scalar(&self, scalar: f32) -> Result<Self, ModelError> {
        if scalar == 0.0 {
            return Err(ModelError::NumericError(
                "Division of a tensor by the scalar zero".to_string(),
            ));
        }
        Ok(self.map(|v| v / scalar))
    }
}

macro_rules! scalar_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<const RANK: usize> $trait<f32> for &Tensor<RANK> {
            type Output = Tensor<RANK>;

            fn $method(self, scalar: f32) -> Tensor<RANK> {
                self.map(|v| v $op scalar)
            }
        }

        impl<const RANK: usize> $trait<f32> for Tensor<RANK> {
            type Output = Tensor<RANK>;

            fn $method(mut self, scalar: f32) -> Tensor<RANK> {
                self.map_inplace(|v| v $op scalar);
                self
            }
        }
    };
}

scalar_op!(Add, add, +);
scalar_op!(Sub, sub, -);
scalar_op!(Mul, mul, *);

impl<const RANK: usize> Add<&Tensor<RANK>> for f32 {
    type Output = Tensor<RANK>;

    fn add(self, tensor: &Tensor<RANK>) -> Tensor<RANK> {
        tensor + self
    }
}

/// `scalar - tensor`, evaluated elementwise.
impl<const RANK: usize> Sub<&Tensor<RANK>> for f32 {
    type Output = Tensor<RANK>;

    fn sub(self, tensor: &Tensor<RANK>) -> Tensor<RANK> {
        tensor.map(|v| self - v)
    }
}

impl<const RANK: usize> Mul<&Tensor<RANK>> for f32 {
    type Output = Tensor<RANK>;

    fn mul(self, tensor: &Tensor<RANK>) -> Tensor<RANK> {
        tensor * self
    }
}
