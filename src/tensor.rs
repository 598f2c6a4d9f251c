use crate::error::ModelError;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Elementwise binary and scalar arithmetic with per-axis broadcasting
pub mod broadcast;
/// Conversion between `Tensor` and `ndarray` arrays
pub mod interop;
/// Matrix product, transposition and rank-2 row helpers
pub mod linalg;

pub use linalg::{matrix_product, transpose_2d};

/// Dense, strided, row-major N-dimensional array of `f32` values.
///
/// The rank is fixed at compile time through `RANK`. The buffer always holds exactly
/// `product(shape)` elements and every multi-index is mapped to a single buffer offset
/// through the row-major strides (last axis contiguous). Cloning a tensor performs a
/// deep copy of the buffer; two tensors never share storage.
///
/// # Fields
///
/// - `shape` - Extent of every axis
/// - `strides` - Buffer distance between consecutive entries of every axis, derived from `shape`
/// - `data` - Linear storage of length `product(shape)`
///
/// # Example
/// ```rust
/// use ferronet::tensor::Tensor;
///
/// let t = Tensor::<2>::from_vec([2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(t.shape(), &[2, 3]);
/// assert_eq!(t.strides(), &[3, 1]);
/// assert_eq!(t.get([1, 2]).unwrap(), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<const RANK: usize> {
    shape: [usize; RANK],
    strides: [usize; RANK],
    data: Vec<f32>,
}

/// Row-major strides for `shape`: the last axis is contiguous.
fn compute_strides<const RANK: usize>(shape: &[usize; RANK]) -> [usize; RANK] {
    let mut strides = [0usize; RANK];
    let mut stride = 1usize;
    for axis in (0..RANK).rev() {
        strides[axis] = stride;
        stride *= shape[axis];
    }
    strides
}

fn shape_to_array<const RANK: usize>(dims: &[usize]) -> Result<[usize; RANK], ModelError> {
    if dims.len() != RANK {
        return Err(ModelError::ShapeError(format!(
            "Number of dimensions ({}) does not match tensor rank {}",
            dims.len(),
            RANK
        )));
    }
    let mut shape = [0usize; RANK];
    shape.copy_from_slice(dims);
    Ok(shape)
}

impl<const RANK: usize> Tensor<RANK> {
    /// Creates a zero-filled tensor with the given shape.
    ///
    /// # Parameters
    ///
    /// * `shape` - Extent of every axis
    ///
    /// # Returns
    ///
    /// * `Self` - A tensor whose buffer holds `product(shape)` zeros
    pub fn zeros(shape: [usize; RANK]) -> Self {
        Self::filled(shape, 0.0)
    }

    /// Creates a tensor with every element set to `value`.
    pub fn filled(shape: [usize; RANK], value: f32) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            strides: compute_strides(&shape),
            data: vec![value; len],
        }
    }

    /// Creates a tensor from a shape and a row-major buffer.
    ///
    /// # Parameters
    ///
    /// - `shape` - Extent of every axis
    /// - `data` - Values in row-major order
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - The tensor owning `data`
    /// - `Err(ModelError::ShapeError)` - If `data.len()` differs from `product(shape)`
    pub fn from_vec(shape: [usize; RANK], data: Vec<f32>) -> Result<Self, ModelError> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(ModelError::ShapeError(format!(
                "Number of values ({}) does not match tensor size {} for shape {:?}",
                data.len(),
                expected,
                shape
            )));
        }
        Ok(Self {
            shape,
            strides: compute_strides(&shape),
            data,
        })
    }

    /// Creates a zero-filled tensor from a dynamically sized list of dimensions.
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A zero-filled tensor
    /// - `Err(ModelError::ShapeError)` - If the number of dimensions is not `RANK`
    pub fn from_dims(dims: &[usize]) -> Result<Self, ModelError> {
        Ok(Self::zeros(shape_to_array(dims)?))
    }

    /// Creates a tensor from a dynamically sized list of dimensions and literal values.
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - The populated tensor
    /// - `Err(ModelError::ShapeError)` - If the number of dimensions is not `RANK`, or the
    ///   value count does not match the product of the dimensions
    pub fn from_dims_and_values(dims: &[usize], values: &[f32]) -> Result<Self, ModelError> {
        Self::from_vec(shape_to_array(dims)?, values.to_vec())
    }

    /// Creates a tensor whose elements are drawn uniformly from `[low, high)`.
    ///
    /// # Parameters
    ///
    /// - `shape` - Extent of every axis
    /// - `low` - Inclusive lower bound
    /// - `high` - Exclusive upper bound
    /// - `rng` - Source of randomness
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - The randomly initialized tensor
    /// - `Err(ModelError::ArgumentError)` - If the bounds do not describe a valid range
    pub fn random_uniform<R: Rng + ?Sized>(
        shape: [usize; RANK],
        low: f32,
        high: f32,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        let dist = Uniform::new(low, high).map_err(|e| {
            ModelError::ArgumentError(format!(
                "Invalid uniform range [{}, {}): {}",
                low, high, e
            ))
        })?;
        let len: usize = shape.iter().product();
        let data = (0..len).map(|_| dist.sample(rng)).collect();
        Ok(Self {
            shape,
            strides: compute_strides(&shape),
            data,
        })
    }

    pub fn shape(&self) -> &[usize; RANK] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize; RANK] {
        &self.strides
    }

    /// Total number of stored elements, always equal to `product(shape)`.
    pub fn num_elements(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f32> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, f32> {
        self.data.iter_mut()
    }

    /// Consumes the tensor and returns its row-major buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Maps a multi-index to its buffer offset.
    ///
    /// # Returns
    ///
    /// - `Ok(usize)` - The flat offset
    /// - `Err(ModelError::IndexError)` - If any axis index is not below that axis's extent
    pub fn linear_index(&self, index: &[usize; RANK]) -> Result<usize, ModelError> {
        let mut flat = 0;
        for axis in 0..RANK {
            if index[axis] >= self.shape[axis] {
                return Err(ModelError::IndexError(format!(
                    "Index {:?} out of range for shape {:?} (axis {})",
                    index, self.shape, axis
                )));
            }
            flat += index[axis] * self.strides[axis];
        }
        Ok(flat)
    }

    /// Inverse of [`Tensor::linear_index`] for offsets inside the buffer.
    pub fn multi_index(&self, mut flat: usize) -> [usize; RANK] {
        let mut index = [0usize; RANK];
        for axis in (0..RANK).rev() {
            let extent = self.shape[axis];
            if extent == 0 {
                continue;
            }
            index[axis] = flat % extent;
            flat /= extent;
        }
        index
    }

    /// Reads the element at `index`.
    ///
    /// # Returns
    ///
    /// - `Ok(f32)` - The stored value
    /// - `Err(ModelError::IndexError)` - If the index is out of range on any axis
    pub fn get(&self, index: [usize; RANK]) -> Result<f32, ModelError> {
        let flat = self.linear_index(&index)?;
        Ok(self.data[flat])
    }

    /// Mutable access to the element at `index`; fails with `IndexError` when out of range.
    pub fn get_mut(&mut self, index: [usize; RANK]) -> Result<&mut f32, ModelError> {
        let flat = self.linear_index(&index)?;
        Ok(&mut self.data[flat])
    }

    pub fn set(&mut self, index: [usize; RANK], value: f32) -> Result<(), ModelError> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Returns a new tensor with `op` applied to every element.
    pub fn map<F: Fn(f32) -> f32>(&self, op: F) -> Self {
        Self {
            shape: self.shape,
            strides: self.strides,
            data: self.data.iter().map(|&v| op(v)).collect(),
        }
    }

    pub fn map_inplace<F: Fn(f32) -> f32>(&mut self, op: F) {
        self.data.iter_mut().for_each(|v| *v = op(*v));
    }

    /// Reinterprets the tensor under `new_shape`.
    ///
    /// When the total element count is unchanged the buffer is kept as is, so the row-major
    /// order of the values is preserved. When it changes, the buffer is resized: surplus
    /// values are discarded and new positions are zero-filled. Existing values are never
    /// reordered.
    ///
    /// # Parameters
    ///
    /// * `new_shape` - Extent of every axis after the call
    pub fn reshape(&mut self, new_shape: [usize; RANK]) {
        let new_len: usize = new_shape.iter().product();
        if new_len != self.data.len() {
            self.data.resize(new_len, 0.0);
        }
        self.shape = new_shape;
        self.strides = compute_strides(&new_shape);
    }

    /// Same as [`Tensor::reshape`], taking a dynamically sized list of dimensions.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - The tensor now has the requested shape
    /// - `Err(ModelError::ShapeError)` - If the number of dimensions is not `RANK`
    pub fn reshape_dims(&mut self, dims: &[usize]) -> Result<(), ModelError> {
        self.reshape(shape_to_array(dims)?);
        Ok(())
    }

    /// Consuming variant of [`Tensor::reshape`].
    pub fn into_shape(mut self, new_shape: [usize; RANK]) -> Self {
        self.reshape(new_shape);
        self
    }

    fn fmt_axis(
        &self,
        f: &mut fmt::Formatter<'_>,
        axis: usize,
        offset: usize,
        indent: usize,
    ) -> fmt::Result {
        write!(f, "[")?;
        if axis + 1 == RANK {
            for i in 0..self.shape[axis] {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.data[offset + i * self.strides[axis]])?;
            }
        } else {
            for i in 0..self.shape[axis] {
                if i > 0 {
                    write!(f, ",\n{}", " ".repeat(indent + 1))?;
                }
                self.fmt_axis(f, axis + 1, offset + i * self.strides[axis], indent + 1)?;
            }
        }
        write!(f, "]")
    }
}

impl<const RANK: usize> Default for Tensor<RANK> {
    /// A tensor with every extent equal to 1 holding a single zero.
    fn default() -> Self {
        Self::zeros([1; RANK])
    }
}

/// Unchecked flat access; the caller guarantees the offset is inside the buffer.
impl<const RANK: usize> Index<usize> for Tensor<RANK> {
    type Output = f32;

    fn index(&self, flat: usize) -> &f32 {
        &self.data[flat]
    }
}

impl<const RANK: usize> IndexMut<usize> for Tensor<RANK> {
    fn index_mut(&mut self, flat: usize) -> &mut f32 {
        &mut self.data[flat]
    }
}

/// Multi-index access. Panics with the `IndexError` message when out of range; use
/// [`Tensor::get`] for a checked read.
impl<const RANK: usize> Index<[usize; RANK]> for Tensor<RANK> {
    type Output = f32;

    fn index(&self, index: [usize; RANK]) -> &f32 {
        match self.linear_index(&index) {
            Ok(flat) => &self.data[flat],
            Err(e) => panic!("{}", e),
        }
    }
}

impl<const RANK: usize> IndexMut<[usize; RANK]> for Tensor<RANK> {
    fn index_mut(&mut self, index: [usize; RANK]) -> &mut f32 {
        match self.linear_index(&index) {
            Ok(flat) => &mut self.data[flat],
            Err(e) => panic!("{}", e),
        }
    }
}

impl<const RANK: usize> fmt::Display for Tensor<RANK> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if RANK == 0 {
            return write!(f, "{}", self.data[0]);
        }
        self.fmt_axis(f, 0, 0, 0)
    }
}
