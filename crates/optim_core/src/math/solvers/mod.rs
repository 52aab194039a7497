//! Linear and quadratic programming solvers.
//!
//! ## Available Solvers
//!
//! ### Linear Programming
//!
//! - [`SimplexSolver`]: Dense two-phase simplex with anti-cycling pricing
//!
//! ### Quadratic Programming
//!
//! - [`ActiveSetSolver`]: Primal active-set method for convex QPs
//!
//! ## Configuration
//!
//! Both solvers share [`SolverConfig`] for:
//! - `tolerance`: Feasibility and optimality tolerance (default: 1e-9)
//! - `max_iterations`: Pivot or working-set iteration budget (default: 10_000)
//!
//! [`SimplexConfig`] adds the Bland's-rule switch-over; [`ActiveSetConfig`]
//! adds the Hessian ridge and the phase-one settings.
//!
//! ## Examples
//!
//! ### Linear Program
//!
//! ```
//! use optim_core::math::solvers::{LinearConstraint, LinearProgram, SimplexSolver};
//!
//! // maximise 3x + 5y  s.t.  x <= 4,  2y <= 12,  3x + 2y <= 18
//! let lp = LinearProgram::new(2)
//!     .minimise(vec![-3.0, -5.0])
//!     .subject_to(LinearConstraint::le(vec![1.0, 0.0], 4.0))
//!     .subject_to(LinearConstraint::le(vec![0.0, 2.0], 12.0))
//!     .subject_to(LinearConstraint::le(vec![3.0, 2.0], 18.0));
//!
//! let solution = SimplexSolver::with_defaults().solve(&lp).unwrap();
//! assert!((solution.objective + 36.0).abs() < 1e-9);
//! ```
//!
//! ### Quadratic Program
//!
//! ```
//! use optim_core::math::DenseMatrix;
//! use optim_core::math::solvers::{ActiveSetSolver, LinearConstraint, QuadraticProgram};
//!
//! // minimise (x - 1)² + (y - 2)²  s.t.  x + y <= 2
//! let qp = QuadraticProgram::new(DenseMatrix::identity(2).scaled(2.0), vec![-2.0, -4.0])
//!     .subject_to(LinearConstraint::le(vec![1.0, 1.0], 2.0));
//!
//! let solution = ActiveSetSolver::with_defaults().solve(&qp).unwrap();
//! assert!((solution.x[0] - 0.5).abs() < 1e-8);
//! assert!((solution.x[1] - 1.5).abs() < 1e-8);
//! ```

mod active_set;
mod config;
mod simplex;

pub use active_set::{ActiveSetSolver, QpSolution, QuadraticProgram};
pub use config::{ActiveSetConfig, SimplexConfig, SolverConfig};
pub use simplex::{LinearConstraint, LinearProgram, LpSolution, Relation, SimplexSolver};
