//! # optim_models
//!
//! Waste-disposal transport and mean-variance portfolio models.
//!
//! ## Architecture Position
//!
//! Layer 2 of the workspace. Depends on `optim_core` (L1) for matrices and
//! the simplex / active-set solvers; consumed by `service_cli`.
//!
//! ## Modules
//!
//! - `transport`: Direct transportation and transshipment LPs with a balancing dummy node
//! - `frontier`: Minimum-variance QPs under a return floor and efficient-frontier sweeps
//!
//! ## Example
//!
//! ```rust
//! use optim_core::math::DenseMatrix;
//! use optim_models::transport::solve_direct;
//!
//! let costs = DenseMatrix::from_rows(vec![vec![8.0, 5.0], vec![4.0, 9.0]]).unwrap();
//! let solution = solve_direct(&costs, &[10.0, 10.0], &[12.0, 12.0]).unwrap();
//! assert!((solution.total_cost - 90.0).abs() < 1e-9);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): Solve frontier targets on the rayon thread pool
//! - `serde`: Enable serialisation for model inputs and results

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod frontier;
pub mod transport;

mod error;

pub use error::ModelError;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::frontier::*;
    pub use crate::transport::*;
    pub use crate::ModelError;
}
