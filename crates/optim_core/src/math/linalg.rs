//! Dense linear-algebra kernels.
//!
//! Small, allocation-light routines used by the LP and QP solvers:
//! - [`dot`], [`norm_inf`], [`axpy`]: vector primitives
//! - [`solve_linear_system`]: Gaussian elimination with partial pivoting
//! - [`cholesky`]: lower-triangular factor of a symmetric positive definite matrix

use num_traits::Float;

use super::matrix::DenseMatrix;
use crate::types::SolverError;

/// Relative pivot threshold below which a system is treated as singular.
const SINGULAR_PIVOT: f64 = 1e-13;

/// Inner product of two equal-length slices.
#[inline]
pub fn dot<T: Float>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .fold(T::zero(), |acc, (&x, &y)| acc + x * y)
}

/// Largest absolute component (zero for an empty slice).
#[inline]
pub fn norm_inf<T: Float>(v: &[T]) -> T {
    v.iter().fold(T::zero(), |acc, &x| acc.max(x.abs()))
}

/// `y += alpha * x`.
#[inline]
pub fn axpy<T: Float>(alpha: T, x: &[T], y: &mut [T]) {
    debug_assert_eq!(x.len(), y.len());
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi = *yi + alpha * xi;
    }
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
///
/// The pivot threshold is relative to the largest entry of `A`, so the
/// same system scaled by a constant succeeds or fails identically.
///
/// # Errors
///
/// - `SolverError::DimensionMismatch` if `A` is not square or `b` has the wrong length
/// - `SolverError::SingularSystem` if a pivot falls below the threshold
///
/// # Examples
///
/// ```
/// use optim_core::math::{linalg::solve_linear_system, DenseMatrix};
///
/// let a = DenseMatrix::from_rows(vec![vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
/// let x: Vec<f64> = solve_linear_system(&a, &[3.0, 5.0]).unwrap();
/// assert!((x[0] - 0.8).abs() < 1e-12);
/// assert!((x[1] - 1.4).abs() < 1e-12);
/// ```
pub fn solve_linear_system<T: Float>(a: &DenseMatrix<T>, b: &[T]) -> Result<Vec<T>, SolverError> {
    let n = a.rows();
    if !a.is_square() {
        return Err(SolverError::dimension_mismatch(
            "linear system columns",
            n,
            a.cols(),
        ));
    }
    if b.len() != n {
        return Err(SolverError::dimension_mismatch(
            "linear system right-hand side",
            n,
            b.len(),
        ));
    }

    let mut m = a.clone();
    let mut rhs = b.to_vec();
    let threshold = T::from(SINGULAR_PIVOT).unwrap_or_else(T::epsilon) * m.max_abs();

    for k in 0..n {
        // Partial pivoting: largest magnitude in column k at or below row k
        let mut pivot_row = k;
        let mut pivot_val = m[(k, k)].abs();
        for i in (k + 1)..n {
            let v = m[(i, k)].abs();
            if v > pivot_val {
                pivot_row = i;
                pivot_val = v;
            }
        }
        if pivot_val <= threshold {
            return Err(SolverError::SingularSystem {
                pivot: pivot_val.to_f64().unwrap_or(f64::NAN),
            });
        }
        if pivot_row != k {
            for j in 0..n {
                let tmp = m[(k, j)];
                m[(k, j)] = m[(pivot_row, j)];
                m[(pivot_row, j)] = tmp;
            }
            rhs.swap(k, pivot_row);
        }

        for i in (k + 1)..n {
            let factor = m[(i, k)] / m[(k, k)];
            if factor == T::zero() {
                continue;
            }
            for j in k..n {
                m[(i, j)] = m[(i, j)] - factor * m[(k, j)];
            }
            rhs[i] = rhs[i] - factor * rhs[k];
        }
    }

    // Back substitution
    let mut x = vec![T::zero(); n];
    for i in (0..n).rev() {
        let mut sum = rhs[i];
        for j in (i + 1)..n {
            sum = sum - m[(i, j)] * x[j];
        }
        x[i] = sum / m[(i, i)];
    }

    Ok(x)
}

/// Cholesky factor `L` with `A = L Lᵀ`.
///
/// Returns `None` if `A` is not square or not numerically positive definite.
pub fn cholesky<T: Float>(a: &DenseMatrix<T>) -> Option<DenseMatrix<T>> {
    if !a.is_square() {
        return None;
    }
    let n = a.rows();
    let mut l = DenseMatrix::zeros(n, n);

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[(i, j)];
            for k in 0..j {
                sum = sum - l[(i, k)] * l[(j, k)];
            }
            if i == j {
                if sum <= T::zero() {
                    return None;
                }
                l[(i, j)] = sum.sqrt();
            } else {
                l[(i, j)] = sum / l[(j, j)];
            }
        }
    }

    Some(l)
}

/// Whether a symmetric matrix is positive semi-definite.
///
/// Factorises `A + εI` with `ε = jitter · max(1e-300, trace(A) / n)`; a
/// positive semi-definite matrix always factorises once the diagonal is
/// nudged, while a matrix with a genuinely negative eigenvalue does not.
pub fn is_positive_semidefinite<T: Float>(a: &DenseMatrix<T>, jitter: T) -> bool {
    if !a.is_square() {
        return false;
    }
    let n = a.rows();
    if n == 0 {
        return true;
    }
    let scale = (a.trace() / T::from(n).unwrap_or_else(T::one))
        .max(T::from(1e-300).unwrap_or_else(T::min_positive_value));
    let eps = jitter * scale;
    let mut shifted = a.clone();
    for i in 0..n {
        shifted[(i, i)] = shifted[(i, i)] + eps;
    }
    cholesky(&shifted).is_some()
}
