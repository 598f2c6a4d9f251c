use super::*;

/// Row-major matrix product of two rank-2 tensors.
///
/// Computed as a plain triple loop: for every output cell `(i, j)` the products
/// `a[i, k] * b[k, j]` are accumulated in increasing `k`, starting from zero. No blocking
/// or reordering is applied so the floating-point result is reproducible.
///
/// # Parameters
///
/// - `a` - Left operand with shape `[m, k]`
/// - `b` - Right operand with shape `[k, n]`
///
/// # Returns
///
/// - `Ok(Tensor<2>)` - Product with shape `[m, n]`
/// - `Err(ModelError::ShapeError)` - If the column count of `a` differs from the row count of `b`
///
/// # Example
/// ```rust
/// use ferronet::tensor::{Tensor, matrix_product};
///
/// let a = Tensor::from_vec([2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// let b = Tensor::from_vec([3, 2], vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
/// let c = matrix_product(&a, &b).unwrap();
/// assert_eq!(c.as_slice(), &[4.0, 5.0, 10.0, 11.0]);
/// ```
pub fn matrix_product(a: &Tensor<2>, b: &Tensor<2>) -> Result<Tensor<2>, ModelError> {
    let [m, k] = a.shape;
    let [k_b, n] = b.shape;
    if k != k_b {
        return Err(ModelError::ShapeError(format!(
            "Matrix dimensions {:?} and {:?} are incompatible for multiplication",
            a.shape, b.shape
        )));
    }

    let mut result = Tensor::zeros([m, n]);
    for i in 0..m {
        for j in 0..n {
            let mut acc = 0.0;
            for p in 0..k {
                acc += a.data[i * a.strides[0] + p * a.strides[1]]
                    * b.data[p * b.strides[0] + j * b.strides[1]];
            }
            result.data[i * n + j] = acc;
        }
    }
    Ok(result)
}

/// Swaps the last two axes.
///
/// Tensors of rank below 2 have nothing to swap; they are returned as an unchanged copy.
pub fn transpose_2d<const RANK: usize>(matrix: &Tensor<RANK>) -> Tensor<RANK> {
    if RANK < 2 {
        return matrix.clone();
    }
    let last = RANK - 1;
    let prev = RANK - 2;

    let mut new_shape = matrix.shape;
    new_shape.swap(last, prev);
    let mut result = Tensor::zeros(new_shape);

    for flat in 0..result.data.len() {
        let mut index = result.multi_index(flat);
        index.swap(last, prev);
        let source: usize = index
            .iter()
            .zip(matrix.strides.iter())
            .map(|(i, s)| i * s)
            .sum();
        result.data[flat] = matrix.data[source];
    }
    result
}

impl Tensor<2> {
    pub fn rows(&self) -> usize {
        self.shape[0]
    }

    pub fn cols(&self) -> usize {
        self.shape[1]
    }

    /// Borrow row `i` as a contiguous slice. Panics if `i` is out of range.
    pub fn row(&self, i: usize) -> &[f32] {
        let cols = self.shape[1];
        &self.data[i * cols..(i + 1) * cols]
    }

    /// Copies rows `[start, end)` into a new tensor.
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor<2>)` - Tensor with shape `[end - start, cols]`
    /// - `Err(ModelError::IndexError)` - If `start > end` or `end` exceeds the row count
    pub fn slice_rows(&self, start: usize, end: usize) -> Result<Tensor<2>, ModelError> {
        if start > end || end > self.shape[0] {
            return Err(ModelError::IndexError(format!(
                "Row range [{}, {}) out of range for shape {:?}",
                start, end, self.shape
            )));
        }
        let cols = self.shape[1];
        Tensor::from_vec(
            [end - start, cols],
            self.data[start * cols..end * cols].to_vec(),
        )
    }

    /// Sums over the batch (row) axis, yielding a `[1, cols]` row vector.
    pub fn sum_rows(&self) -> Tensor<2> {
        let cols = self.shape[1];
        let mut result = Tensor::zeros([1, cols]);
        for i in 0..self.shape[0] {
            for (acc, &v) in result.data.iter_mut().zip(self.row(i)) {
                *acc += v;
            }
        }
        result
    }

    /// Column index of the largest value of every row.
    ///
    /// Ties resolve to the lowest column. A row with no columns maps to 0.
    pub fn argmax_rows(&self) -> Vec<usize> {
        (0..self.shape[0])
            .map(|i| {
                let row = self.row(i);
                let mut best = 0;
                for j in 1..row.len() {
                    if row[j] > row[best] {
                        best = j;
                    }
                }
                best
            })
            .collect()
    }
}
