//! Primal active-set solver for convex quadratic programs.
//!
//! # Problem Form
//!
//! ```text
//! minimise    ½ xᵀQx + cᵀx
//! subject to  aᵢᵀx {≤, =, ≥} bᵢ   for every row i
//! ```
//!
//! `Q` must be symmetric positive semi-definite; variables are free unless
//! sign rows are supplied.
//!
//! # Algorithm
//!
//! Starting from a feasible point found by simplex phase one, the solver
//! keeps a working set `W` of rows treated as equalities (initially the
//! equality rows). Each iteration solves the KKT system of the
//! equality-constrained subproblem
//!
//! ```text
//! [ Q   -A_Wᵀ ] [ p ]   [ -(Qx + c) ]
//! [ A_W   0   ] [ λ ] = [     0     ]
//! ```
//!
//! - if `p ≈ 0` and every inequality multiplier is nonnegative, `x` is optimal;
//!   otherwise the row with the most negative multiplier leaves `W`;
//! - if `p ≠ 0` the solver moves along `p` as far as the rows outside `W`
//!   allow (at most a full step) and the blocking row joins `W`.
//!
//! # Example
//!
//! ```
//! use optim_core::math::DenseMatrix;
//! use optim_core::math::solvers::{ActiveSetSolver, LinearConstraint, QuadraticProgram};
//!
//! // minimise x² + y²  s.t.  x + y >= 2  →  (1, 1)
//! let qp = QuadraticProgram::new(DenseMatrix::identity(2).scaled(2.0), vec![0.0, 0.0])
//!     .subject_to(LinearConstraint::ge(vec![1.0, 1.0], 2.0));
//!
//! let solution = ActiveSetSolver::with_defaults().solve(&qp).unwrap();
//! assert!((solution.x[0] - 1.0).abs() < 1e-8);
//! assert!((solution.x[1] - 1.0).abs() < 1e-8);
//! ```

use tracing::{debug, trace};

use super::config::ActiveSetConfig;
use super::simplex::{LinearConstraint, LinearProgram, Relation, SimplexSolver};
use crate::math::linalg::{axpy, dot, norm_inf, solve_linear_system};
use crate::math::matrix::DenseMatrix;
use crate::types::SolverError;

/// Convex quadratic program with linear constraints.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadraticProgram {
    hessian: DenseMatrix<f64>,
    linear: Vec<f64>,
    constraints: Vec<LinearConstraint>,
}

impl QuadraticProgram {
    /// Create an unconstrained program `½ xᵀQx + cᵀx`.
    pub fn new(hessian: DenseMatrix<f64>, linear: Vec<f64>) -> Self {
        Self {
            hessian,
            linear,
            constraints: Vec::new(),
        }
    }

    /// Append a constraint row (builder form).
    pub fn subject_to(mut self, constraint: LinearConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Append a constraint row.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.linear.len()
    }

    /// Hessian `Q`.
    pub fn hessian(&self) -> &DenseMatrix<f64> {
        &self.hessian
    }

    /// Linear term `c`.
    pub fn linear(&self) -> &[f64] {
        &self.linear
    }

    /// Constraint rows.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Objective value `½ xᵀQx + cᵀx`.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        0.5 * self.hessian.quadratic_form(x) + dot(&self.linear, x)
    }

    /// Largest row violation at `x`.
    pub fn max_violation(&self, x: &[f64]) -> f64 {
        self.constraints
            .iter()
            .map(|c| c.violation(x))
            .fold(0.0_f64, f64::max)
    }

    /// Check dimensions, finiteness and Hessian symmetry.
    ///
    /// # Errors
    ///
    /// - `SolverError::DimensionMismatch` for a non-square or wrongly sized Hessian or row
    /// - `SolverError::InvalidInput` for non-finite data or an asymmetric Hessian
    pub fn validate(&self) -> Result<(), SolverError> {
        let n = self.num_vars();
        if self.hessian.rows() != n {
            return Err(SolverError::dimension_mismatch(
                "hessian rows",
                n,
                self.hessian.rows(),
            ));
        }
        if self.hessian.cols() != n {
            return Err(SolverError::dimension_mismatch(
                "hessian columns",
                n,
                self.hessian.cols(),
            ));
        }
        if !self.hessian.is_finite() || self.linear.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::InvalidInput(
                "objective contains a non-finite value".to_string(),
            ));
        }
        let symmetry_tol = 1e-10 * self.hessian.max_abs().max(1.0);
        if !self.hessian.is_symmetric(symmetry_tol) {
            return Err(SolverError::InvalidInput(
                "hessian is not symmetric".to_string(),
            ));
        }
        for (i, c) in self.constraints.iter().enumerate() {
            if c.coefficients.len() != n {
                return Err(SolverError::dimension_mismatch(
                    "constraint row",
                    n,
                    c.coefficients.len(),
                ));
            }
            if !c.rhs.is_finite() || c.coefficients.iter().any(|v| !v.is_finite()) {
                return Err(SolverError::InvalidInput(format!(
                    "constraint {} contains a non-finite value",
                    i
                )));
            }
        }
        Ok(())
    }
}

/// Optimal solution of a quadratic program.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QpSolution {
    /// Optimal variable values.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub objective: f64,
    /// Working-set iterations performed.
    pub iterations: usize,
    /// Lagrange multiplier per constraint row; zero for rows outside the
    /// final working set and nonnegative for binding inequality rows.
    pub multipliers: Vec<f64>,
    /// Indices of the inequality rows binding at the optimum.
    pub active_set: Vec<usize>,
}

/// Constraint row normalised to `aᵀx ≥ b` (or `=`).
#[derive(Debug, Clone)]
struct NormalRow {
    a: Vec<f64>,
    b: f64,
    equality: bool,
}

/// Primal active-set QP solver.
///
/// Stateless apart from its configuration; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct ActiveSetSolver {
    config: ActiveSetConfig,
}

impl ActiveSetSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: ActiveSetConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &ActiveSetConfig {
        &self.config
    }

    /// Solve `qp` to optimality.
    ///
    /// # Errors
    ///
    /// - `SolverError::Infeasible` if the constraints admit no point
    /// - `SolverError::SingularSystem` if a KKT system cannot be factorised
    ///   (e.g. `Q` is zero on the feasible directions)
    /// - `SolverError::MaxIterationsExceeded` if the iteration budget runs out
    /// - validation errors from [`QuadraticProgram::validate`]
    pub fn solve(&self, qp: &QuadraticProgram) -> Result<QpSolution, SolverError> {
        qp.validate()?;
        let n = qp.num_vars();
        let tolerance = self.config.solver.tolerance;

        let rows: Vec<NormalRow> = qp
            .constraints()
            .iter()
            .map(|c| match c.relation {
                Relation::LessEqual => NormalRow {
                    a: c.coefficients.iter().map(|v| -v).collect(),
                    b: -c.rhs,
                    equality: false,
                },
                Relation::GreaterEqual => NormalRow {
                    a: c.coefficients.clone(),
                    b: c.rhs,
                    equality: false,
                },
                Relation::Equal => NormalRow {
                    a: c.coefficients.clone(),
                    b: c.rhs,
                    equality: true,
                },
            })
            .collect();

        let hessian = self.regularised_hessian(qp.hessian());
        let mut x = self.initial_point(qp)?;
        let mut working: Vec<usize> = (0..rows.len()).filter(|&i| rows[i].equality).collect();

        for iteration in 0..self.config.solver.max_iterations {
            let mut gradient = qp.hessian().mul_vec(&x);
            axpy(1.0, qp.linear(), &mut gradient);

            let (step, lambda) = solve_equality_subproblem(&hessian, &gradient, &rows, &working)?;

            if norm_inf(&step) <= tolerance * norm_inf(&x).max(1.0) {
                // Most negative multiplier among working inequality rows
                let release = working
                    .iter()
                    .zip(&lambda)
                    .filter(|&(&i, _)| !rows[i].equality)
                    .min_by(|a, b| a.1.total_cmp(b.1))
                    .filter(|&(_, &l)| l < -tolerance)
                    .map(|(&i, _)| i);

                match release {
                    Some(i) => {
                        trace!(iteration, row = i, "releasing constraint from working set");
                        working.retain(|&w| w != i);
                    }
                    None => {
                        let mut multipliers = vec![0.0; rows.len()];
                        for (&i, &l) in working.iter().zip(&lambda) {
                            multipliers[i] = l;
                        }
                        let mut active_set: Vec<usize> =
                            working.into_iter().filter(|&i| !rows[i].equality).collect();
                        active_set.sort_unstable();
                        let objective = qp.objective_value(&x);
                        debug!(
                            vars = n,
                            rows = rows.len(),
                            iterations = iteration,
                            objective,
                            "active-set solved"
                        );
                        return Ok(QpSolution {
                            x,
                            objective,
                            iterations: iteration,
                            multipliers,
                            active_set,
                        });
                    }
                }
                continue;
            }

            // Longest step along `step` keeping rows outside the working set feasible
            let mut alpha = 1.0;
            let mut blocking = None;
            for (i, row) in rows.iter().enumerate() {
                if working.contains(&i) {
                    continue;
                }
                let ap = dot(&row.a, &step);
                if ap < -tolerance {
                    let slack = dot(&row.a, &x) - row.b;
                    let limit = (-slack / ap).max(0.0);
                    if limit < alpha {
                        alpha = limit;
                        blocking = Some(i);
                    }
                }
            }

            axpy(alpha, &step, &mut x);
            if let Some(i) = blocking {
                trace!(iteration, row = i, alpha, "adding blocking constraint");
                working.push(i);
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.solver.max_iterations,
        })
    }

    fn regularised_hessian(&self, hessian: &DenseMatrix<f64>) -> DenseMatrix<f64> {
        let n = hessian.rows();
        let mut q = hessian.clone();
        if n == 0 || self.config.regularisation == 0.0 {
            return q;
        }
        // A zero Hessian leaves an LP; ridge it at unit scale.
        let mean_diagonal = hessian.trace() / n as f64;
        let scale = if mean_diagonal > 0.0 { mean_diagonal } else { 1.0 };
        let ridge = self.config.regularisation * scale;
        for i in 0..n {
            q[(i, i)] += ridge;
        }
        q
    }

    /// Feasible starting point from simplex phase one over `x = x⁺ − x⁻`.
    fn initial_point(&self, qp: &QuadraticProgram) -> Result<Vec<f64>, SolverError> {
        let n = qp.num_vars();
        let mut lp = LinearProgram::new(2 * n);
        for c in qp.constraints() {
            let mut coefficients = Vec::with_capacity(2 * n);
            coefficients.extend_from_slice(&c.coefficients);
            coefficients.extend(c.coefficients.iter().map(|v| -v));
            lp.add_constraint(LinearConstraint::new(coefficients, c.relation, c.rhs));
        }
        let split = SimplexSolver::new(self.config.phase_one).find_feasible_point(&lp)?;
        Ok((0..n).map(|i| split.x[i] - split.x[n + i]).collect())
    }
}

/// Solve the KKT system for the step `p` and working-set multipliers `λ`.
fn solve_equality_subproblem(
    hessian: &DenseMatrix<f64>,
    gradient: &[f64],
    rows: &[NormalRow],
    working: &[usize],
) -> Result<(Vec<f64>, Vec<f64>), SolverError> {
    let n = gradient.len();
    let w = working.len();
    let mut kkt = DenseMatrix::zeros(n + w, n + w);
    for i in 0..n {
        for j in 0..n {
            kkt[(i, j)] = hessian[(i, j)];
        }
    }
    for (k, &r) in working.iter().enumerate() {
        for (j, &a) in rows[r].a.iter().enumerate() {
            kkt[(j, n + k)] = -a;
            kkt[(n + k, j)] = a;
        }
    }

    let mut rhs = Vec::with_capacity(n + w);
    rhs.extend(gradient.iter().map(|g| -g));
    rhs.extend(std::iter::repeat(0.0).take(w));

    let solution = solve_linear_system(&kkt, &rhs)?;
    let (step, lambda) = solution.split_at(n);
    Ok((step.to_vec(), lambda.to_vec()))
}
