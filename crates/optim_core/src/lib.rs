//! # optim_core: Numerical Foundation for Allocation Optimisation
//!
//! ## Layer 1 (Foundation) Role
//!
//! optim_core is the bottom layer of the workspace, providing:
//! - Dense matrices and linear-algebra kernels (`math::matrix`, `math::linalg`)
//! - A two-phase simplex solver for linear programs (`math::solvers`)
//! - A primal active-set solver for convex quadratic programs (`math::solvers`)
//! - Error types: `SolverError` (`types::error`)
//!
//! ## Dependencies
//!
//! Layer 1 has no dependencies on other workspace crates:
//! - num-traits: Generic floating-point arithmetic
//! - thiserror: Error derivation
//! - tracing: Solver diagnostics
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use optim_core::math::solvers::{LinearConstraint, LinearProgram, SimplexSolver};
//!
//! // Ship 10 units from one plant to two sites at unit costs 2 and 3
//! let lp = LinearProgram::new(2)
//!     .minimise(vec![2.0, 3.0])
//!     .subject_to(LinearConstraint::eq(vec![1.0, 1.0], 10.0))
//!     .subject_to(LinearConstraint::le(vec![1.0, 0.0], 6.0));
//!
//! let solution = SimplexSolver::with_defaults().solve(&lp).unwrap();
//! assert!((solution.objective - 24.0).abs() < 1e-9);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for matrices, programs, solutions and errors

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
