//! Row-major dense matrix.

use std::ops::{Index, IndexMut};

use num_traits::Float;

use crate::types::SolverError;

/// Dense row-major matrix.
///
/// Storage is a single contiguous `Vec<T>`; element `(i, j)` lives at
/// `i * cols + j`. Sized for the small, dense problems solved in this
/// workspace (tens to a few hundred rows).
///
/// # Examples
///
/// ```
/// use optim_core::math::DenseMatrix;
///
/// let m = DenseMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(m[(1, 0)], 3.0);
/// assert_eq!(m.mul_vec(&[1.0, 1.0]), vec![3.0, 7.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DenseMatrix<T: Float = f64> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Float> DenseMatrix<T> {
    /// Create a `rows × cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::zero())
    }

    /// Create a `rows × cols` matrix with every entry equal to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Create an `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        m
    }

    /// Build a matrix from nested rows.
    ///
    /// # Errors
    ///
    /// `SolverError::DimensionMismatch` if the rows have different lengths.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, SolverError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(SolverError::dimension_mismatch(
                    "matrix row",
                    n_cols,
                    row.len(),
                ));
            }
            data.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    /// Build a matrix from a row-major buffer.
    ///
    /// # Errors
    ///
    /// `SolverError::DimensionMismatch` if `data.len() != rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, SolverError> {
        if data.len() != rows * cols {
            return Err(SolverError::dimension_mismatch(
                "row-major buffer",
                rows * cols,
                data.len(),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a diagonal matrix.
    pub fn from_diagonal(diagonal: &[T]) -> Self {
        let mut m = Self::zeros(diagonal.len(), diagonal.len());
        for (i, &d) in diagonal.iter().enumerate() {
            m[(i, i)] = d;
        }
        m
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Element at `(i, j)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i < self.rows && j < self.cols {
            Some(self.data[i * self.cols + j])
        } else {
            None
        }
    }

    /// Overwrite the element at `(i, j)`.
    ///
    /// # Errors
    ///
    /// `SolverError::InvalidInput` when `(i, j)` is out of bounds.
    pub fn set(&mut self, i: usize, j: usize, value: T) -> Result<(), SolverError> {
        if i >= self.rows || j >= self.cols {
            return Err(SolverError::InvalidInput(format!(
                "index ({}, {}) out of bounds for {}x{} matrix",
                i, j, self.rows, self.cols
            )));
        }
        self.data[i * self.cols + j] = value;
        Ok(())
    }

    /// Row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows`.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Column `j` copied into a vector.
    pub fn column(&self, j: usize) -> Vec<T> {
        (0..self.rows).map(|i| self[(i, j)]).collect()
    }

    /// Iterator over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        // chunks(0) panics, and a matrix with zero columns has no data anyway
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Row-major view of all entries.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Nested-row copy of the matrix.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.iter_rows().map(<[T]>::to_vec).collect()
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        let mut t = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                t[(j, i)] = self[(i, j)];
            }
        }
        t
    }

    /// Matrix-vector product `A x`.
    ///
    /// # Panics
    ///
    /// Panics if `x.len() != cols`.
    pub fn mul_vec(&self, x: &[T]) -> Vec<T> {
        assert_eq!(x.len(), self.cols, "vector length must equal column count");
        self.iter_rows().map(|row| super::linalg::dot(row, x)).collect()
    }

    /// Quadratic form `xᵀ A x`.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not square or `x.len() != cols`.
    pub fn quadratic_form(&self, x: &[T]) -> T {
        assert!(self.is_square(), "quadratic form needs a square matrix");
        super::linalg::dot(x, &self.mul_vec(x))
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> T {
        (0..self.rows.min(self.cols)).fold(T::zero(), |acc, i| acc + self[(i, i)])
    }

    /// Largest absolute entry (zero for an empty matrix).
    pub fn max_abs(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &v| acc.max(v.abs()))
    }

    /// Whether every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Whether `|A[i][j] - A[j][i]| <= tolerance` for all entries.
    pub fn is_symmetric(&self, tolerance: T) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.rows {
            for j in (i + 1)..self.cols {
                if (self[(i, j)] - self[(j, i)]).abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    /// Copy with every entry multiplied by `factor`.
    pub fn scaled(&self, factor: T) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| v * factor).collect(),
        }
    }
}

impl<T: Float> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        debug_assert!(i < self.rows && j < self.cols);
        &self.data[i * self.cols + j]
    }
}

impl<T: Float> IndexMut<(usize, usize)> for DenseMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        debug_assert!(i < self.rows && j < self.cols);
        &mut self.data[i * self.cols + j]
    }
}
