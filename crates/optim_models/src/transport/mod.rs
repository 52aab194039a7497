//! Transportation and transshipment models.
//!
//! ## Direct Transport
//!
//! [`solve_direct`] ships each plant's full supply to disposal sites whose
//! capacities act as ceilings. Total supply must not exceed total capacity.
//!
//! ## Transshipment
//!
//! [`solve_transshipment`] lets flow pass through other plants and sites on
//! its way to a disposal site. The network is augmented with a dummy node
//! that supplies the spare capacity, so every site absorbs exactly its
//! capacity and the balance equations are always consistent.
//!
//! Arcs without a finite cost are disallowed. By default they are removed
//! from the LP; [`ArcPolicy::Sentinel`] prices them at a large finite cost
//! instead.
//!
//! ## Example
//!
//! ```
//! use optim_core::math::DenseMatrix;
//! use optim_models::transport::{solve_transshipment, TransshipmentNetwork};
//!
//! let network = TransshipmentNetwork::new(
//!     vec!["North".into(), "South".into()],
//!     vec!["Landfill".into()],
//!     vec![30.0, 20.0],
//!     vec![60.0],
//! )
//! .with_direct_costs(DenseMatrix::from_rows(vec![vec![5.0], vec![7.0]]).unwrap());
//!
//! let solution = solve_transshipment(&network).unwrap();
//! assert!((solution.real_cost() - 290.0).abs() < 1e-9);
//! assert!((solution.dummy_flow() - 10.0).abs() < 1e-9);
//! ```

mod config;
mod flow;
mod network;
mod solver;

pub use config::{ArcPolicy, TransportConfig};
pub use flow::FlowSolution;
pub use network::{Node, NodeKind, TransshipmentNetwork, DUMMY_NODE};
pub use solver::{DirectSolution, TransportSolver, TransshipmentSolution};

use optim_core::math::DenseMatrix;

use crate::error::ModelError;

/// Solve a direct transportation problem with default configuration.
///
/// See [`TransportSolver::solve_direct`].
pub fn solve_direct(
    costs: &DenseMatrix<f64>,
    supply: &[f64],
    demand: &[f64],
) -> Result<DirectSolution, ModelError> {
    TransportSolver::with_defaults().solve_direct(costs, supply, demand)
}

/// Solve a transshipment problem with default configuration.
///
/// See [`TransportSolver::solve_transshipment`].
pub fn solve_transshipment(
    network: &TransshipmentNetwork,
) -> Result<TransshipmentSolution, ModelError> {
    TransportSolver::with_defaults().solve_transshipment(network)
}
