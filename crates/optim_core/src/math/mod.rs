//! Numerical building blocks.
//!
//! - [`matrix`]: Row-major [`DenseMatrix`]
//! - [`linalg`]: Vector kernels, Gaussian elimination and Cholesky
//! - [`solvers`]: Simplex LP and active-set QP solvers

pub mod linalg;
pub mod matrix;
pub mod solvers;

pub use matrix::DenseMatrix;
