//! Mean-variance portfolio models.
//!
//! For a universe of `k` assets with expected returns `μ` and covariance
//! `Σ`, the minimum-variance portfolio at return floor `r` solves
//!
//! ```text
//! minimise    wᵀΣw
//! subject to  Σ wᵢ = 1,   μᵀw ≥ r,   w ≥ 0
//! ```
//!
//! Sweeping `r` traces the efficient frontier. Each target is solved
//! independently, so a [`Frontier`] is the same whether it is built lazily
//! with [`FrontierSolver::frontier_iter`] or eagerly (and, with the
//! `parallel` feature, concurrently) with [`trace_frontier`].
//!
//! ## Example
//!
//! ```
//! use optim_core::math::DenseMatrix;
//! use optim_models::frontier::{return_targets, trace_frontier, AssetUniverse};
//!
//! let universe = AssetUniverse::from_returns(
//!     vec![0.05, 0.10],
//!     DenseMatrix::from_diagonal(&[0.04, 0.09]),
//! )
//! .unwrap();
//!
//! let frontier = trace_frontier(&universe, &return_targets(0.05, 0.12, 8));
//! assert_eq!(frontier.len(), 8);
//! assert!(frontier.is_monotone(1e-9));
//! // Floors above 0.10 cannot be met by a long-only portfolio
//! assert_eq!(frontier.failures().count(), 2);
//! ```

mod config;
mod portfolio;
mod solver;
mod sweep;
mod universe;

pub use config::FrontierConfig;
pub use portfolio::{FrontierPoint, PortfolioSolution};
pub use solver::FrontierSolver;
pub use sweep::{return_targets, Frontier, FrontierSample};
pub use universe::{Asset, AssetUniverse};

use crate::error::ModelError;

/// Minimum-variance portfolio at `return_floor` with default configuration.
///
/// See [`FrontierSolver::min_variance_at_return`].
pub fn min_variance_at_return(
    universe: &AssetUniverse,
    return_floor: f64,
) -> Result<PortfolioSolution, ModelError> {
    FrontierSolver::with_defaults().min_variance_at_return(universe, return_floor)
}

/// Global minimum-variance portfolio with default configuration.
///
/// See [`FrontierSolver::global_minimum_variance`].
pub fn global_minimum_variance(universe: &AssetUniverse) -> Result<PortfolioSolution, ModelError> {
    FrontierSolver::with_defaults().global_minimum_variance(universe)
}

/// Trace the frontier over `targets` with default configuration.
///
/// See [`FrontierSolver::trace_frontier`].
pub fn trace_frontier(universe: &AssetUniverse, targets: &[f64]) -> Frontier {
    FrontierSolver::with_defaults().trace_frontier(universe, targets)
}
