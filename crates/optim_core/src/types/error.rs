//! Error types for structured error handling.
//!
//! This module provides:
//! - `SolverError`: Errors from the linear and quadratic programming solvers

use thiserror::Error;

/// Solver error types.
///
/// Reported by [`SimplexSolver`](crate::math::solvers::SimplexSolver),
/// [`ActiveSetSolver`](crate::math::solvers::ActiveSetSolver) and the
/// dense linear-algebra kernels they are built on.
///
/// # Variants
/// - `Infeasible`: No point satisfies the constraints
/// - `Unbounded`: The objective decreases without limit
/// - `MaxIterationsExceeded`: Iteration budget exhausted
/// - `SingularSystem`: A linear system had no usable pivot
/// - `DimensionMismatch`: Vector or matrix sizes disagree
/// - `InvalidInput`: Non-finite or otherwise unusable data
///
/// # Examples
/// ```
/// use optim_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SolverError {
    /// Phase one could not drive the artificial variables to zero.
    #[error("Infeasible constraints: phase one residual = {residual}")]
    Infeasible {
        /// Sum of artificial variables left at the end of phase one
        residual: f64,
    },

    /// An entering column had no limiting row in the ratio test.
    #[error("Unbounded objective along column {column}")]
    Unbounded {
        /// Tableau column that can increase without limit
        column: usize,
    },

    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Gaussian elimination met a pivot below the singularity threshold.
    #[error("Singular linear system: pivot magnitude {pivot}")]
    SingularSystem {
        /// Magnitude of the rejected pivot
        pivot: f64,
    },

    /// Sizes of the supplied data disagree.
    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// What was being checked
        context: &'static str,
        /// Expected length
        expected: usize,
        /// Supplied length
        found: usize,
    },

    /// Input data that cannot be solved as given.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SolverError {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(context: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            found,
        }
    }

    /// Whether this error means the constraints admit no solution.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolverError::Infeasible { .. })
    }
}
