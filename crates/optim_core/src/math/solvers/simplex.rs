//! Two-phase dense simplex solver for linear programs.
//!
//! # Problem Form
//!
//! ```text
//! minimise    cᵀx
//! subject to  aᵢᵀx {≤, =, ≥} bᵢ   for every row i
//!             x ≥ 0
//! ```
//!
//! # Algorithm
//!
//! 1. Rows with a negative right-hand side are negated so that `b ≥ 0`.
//! 2. Each `≤` row gains a slack column, each `≥` row a surplus and an
//!    artificial column, each `=` row an artificial column. The slack and
//!    artificial columns form the initial basis.
//! 3. Phase one minimises the sum of artificials. A non-zero optimum means
//!    the constraints are infeasible.
//! 4. Artificials still basic at zero level are pivoted out; rows where that
//!    is impossible are linearly dependent and are dropped.
//! 5. Phase two minimises `cᵀx` with the artificial columns barred.
//!
//! Pricing uses Dantzig's rule and falls back to Bland's rule after a run of
//! degenerate pivots, which rules out cycling. Ties in the ratio test go to
//! the smallest basic column, so every solve is deterministic.
//!
//! # Example
//!
//! ```
//! use optim_core::math::solvers::{LinearConstraint, LinearProgram, SimplexSolver};
//!
//! // minimise -x - y  s.t.  x + 2y <= 4,  3x + y <= 6
//! let lp = LinearProgram::new(2)
//!     .minimise(vec![-1.0, -1.0])
//!     .subject_to(LinearConstraint::le(vec![1.0, 2.0], 4.0))
//!     .subject_to(LinearConstraint::le(vec![3.0, 1.0], 6.0));
//!
//! let solution = SimplexSolver::with_defaults().solve(&lp).unwrap();
//! assert!((solution.objective + 2.8).abs() < 1e-9);
//! ```

use std::fmt;

use tracing::{debug, trace};

use super::config::SimplexConfig;
use crate::math::linalg::dot;
use crate::types::SolverError;

/// Relation between a constraint row and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    /// `aᵀx ≤ b`
    LessEqual,
    /// `aᵀx = b`
    Equal,
    /// `aᵀx ≥ b`
    GreaterEqual,
}

impl Relation {
    /// Relation obtained when both sides are multiplied by −1.
    pub fn flipped(self) -> Self {
        match self {
            Relation::LessEqual => Relation::GreaterEqual,
            Relation::Equal => Relation::Equal,
            Relation::GreaterEqual => Relation::LessEqual,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::LessEqual => write!(f, "<="),
            Relation::Equal => write!(f, "="),
            Relation::GreaterEqual => write!(f, ">="),
        }
    }
}

/// A single linear constraint row `aᵀx {≤, =, ≥} b`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearConstraint {
    /// Row coefficients, one per variable.
    pub coefficients: Vec<f64>,
    /// Row relation.
    pub relation: Relation,
    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Create a constraint row.
    pub fn new(coefficients: Vec<f64>, relation: Relation, rhs: f64) -> Self {
        Self {
            coefficients,
            relation,
            rhs,
        }
    }

    /// `aᵀx ≤ b`
    pub fn le(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefficients, Relation::LessEqual, rhs)
    }

    /// `aᵀx = b`
    pub fn eq(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefficients, Relation::Equal, rhs)
    }

    /// `aᵀx ≥ b`
    pub fn ge(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefficients, Relation::GreaterEqual, rhs)
    }

    /// Row with the given `(index, value)` entries and zeros elsewhere.
    pub fn sparse(
        num_vars: usize,
        entries: impl IntoIterator<Item = (usize, f64)>,
        relation: Relation,
        rhs: f64,
    ) -> Self {
        let mut coefficients = vec![0.0; num_vars];
        for (j, v) in entries {
            coefficients[j] += v;
        }
        Self::new(coefficients, relation, rhs)
    }

    /// Signed violation at `x`: positive when the row is not satisfied.
    pub fn violation(&self, x: &[f64]) -> f64 {
        let lhs = dot(&self.coefficients, x);
        match self.relation {
            Relation::LessEqual => lhs - self.rhs,
            Relation::GreaterEqual => self.rhs - lhs,
            Relation::Equal => (lhs - self.rhs).abs(),
        }
    }
}

/// Linear program over nonnegative variables.
///
/// Built fluently with [`LinearProgram::minimise`] and
/// [`LinearProgram::subject_to`]; the objective defaults to zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearProgram {
    num_vars: usize,
    objective: Vec<f64>,
    constraints: Vec<LinearConstraint>,
}

impl LinearProgram {
    /// Create a program over `num_vars` nonnegative variables.
    pub fn new(num_vars: usize) -> Self {
        Self {
            num_vars,
            objective: vec![0.0; num_vars],
            constraints: Vec::new(),
        }
    }

    /// Set the objective coefficients (builder form).
    pub fn minimise(mut self, objective: Vec<f64>) -> Self {
        self.objective = objective;
        self
    }

    /// Append a constraint row (builder form).
    pub fn subject_to(mut self, constraint: LinearConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Set the objective coefficients.
    pub fn set_objective(&mut self, objective: Vec<f64>) {
        self.objective = objective;
    }

    /// Append a constraint row.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Objective coefficients.
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    /// Constraint rows.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Objective value `cᵀx`.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        dot(&self.objective, x)
    }

    /// Largest violation over all rows and the sign constraints at `x`.
    pub fn max_violation(&self, x: &[f64]) -> f64 {
        let rows = self
            .constraints
            .iter()
            .map(|c| c.violation(x))
            .fold(0.0_f64, f64::max);
        let signs = x.iter().map(|&v| -v).fold(0.0_f64, f64::max);
        rows.max(signs)
    }

    /// Check dimensions and finiteness.
    ///
    /// # Errors
    ///
    /// - `SolverError::DimensionMismatch` for a wrong-length objective or row
    /// - `SolverError::InvalidInput` for NaN or infinite data
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.objective.len() != self.num_vars {
            return Err(SolverError::dimension_mismatch(
                "objective",
                self.num_vars,
                self.objective.len(),
            ));
        }
        if self.objective.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::InvalidInput(
                "objective contains a non-finite coefficient".to_string(),
            ));
        }
        for (i, c) in self.constraints.iter().enumerate() {
            if c.coefficients.len() != self.num_vars {
                return Err(SolverError::dimension_mismatch(
                    "constraint row",
                    self.num_vars,
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

/// Optimal solution of a linear program.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LpSolution {
    /// Optimal variable values.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub objective: f64,
    /// Pivots performed across both phases.
    pub iterations: usize,
}

/// Dense two-phase simplex solver.
///
/// Stateless apart from its configuration; one solver can be shared across
/// threads and reused for any number of programs.
#[derive(Debug, Clone, Default)]
pub struct SimplexSolver {
    config: SimplexConfig,
}

impl SimplexSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: SimplexConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &SimplexConfig {
        &self.config
    }

    /// Solve `lp` to optimality.
    ///
    /// # Errors
    ///
    /// - `SolverError::Infeasible` if no `x ≥ 0` satisfies the rows
    /// - `SolverError::Unbounded` if the objective has no lower bound
    /// - `SolverError::MaxIterationsExceeded` if the pivot budget runs out
    /// - validation errors from [`LinearProgram::validate`]
    pub fn solve(&self, lp: &LinearProgram) -> Result<LpSolution, SolverError> {
        lp.validate()?;
        self.solve_with_objective(lp, lp.objective())
    }

    /// Find any point satisfying the constraints of `lp`.
    ///
    /// Runs phase one only; the objective of `lp` is ignored and the returned
    /// `objective` is evaluated at the point found.
    pub fn find_feasible_point(&self, lp: &LinearProgram) -> Result<LpSolution, SolverError> {
        lp.validate()?;
        let zeros = vec![0.0; lp.num_vars()];
        let mut solution = self.solve_with_objective(lp, &zeros)?;
        solution.objective = lp.objective_value(&solution.x);
        Ok(solution)
    }

    fn solve_with_objective(
        &self,
        lp: &LinearProgram,
        objective: &[f64],
    ) -> Result<LpSolution, SolverError> {
        let tolerance = self.config.solver.tolerance;
        let mut tableau = Tableau::build(lp);
        let mut iterations = 0;

        if tableau.artificial_start < tableau.n_cols {
            let mut phase_one_cost = vec![0.0; tableau.n_cols];
            for c in phase_one_cost.iter_mut().skip(tableau.artificial_start) {
                *c = 1.0;
            }
            let all_cols = tableau.n_cols;
            self.run_phase(&mut tableau, &phase_one_cost, all_cols, &mut iterations)?;

            let residual = tableau.artificial_sum();
            let rhs_scale = lp
                .constraints()
                .iter()
                .map(|c| c.rhs.abs())
                .sum::<f64>()
                .max(1.0);
            if residual > tolerance * rhs_scale {
                debug!(residual, iterations, "simplex phase one found no feasible basis");
                return Err(SolverError::Infeasible { residual });
            }
            tableau.expel_artificials(tolerance);
        }

        let mut phase_two_cost = vec![0.0; tableau.n_cols];
        phase_two_cost[..lp.num_vars()].copy_from_slice(objective);
        let allowed = tableau.artificial_start;
        self.run_phase(&mut tableau, &phase_two_cost, allowed, &mut iterations)?;

        let x = tableau.structural_values(lp.num_vars());
        let value = dot(objective, &x);
        debug!(
            vars = lp.num_vars(),
            rows = lp.constraints().len(),
            iterations,
            objective = value,
            "simplex solved"
        );
        Ok(LpSolution {
            x,
            objective: value,
            iterations,
        })
    }

    /// Pivot until no column below `allowed` has a negative reduced cost.
    fn run_phase(
        &self,
        tableau: &mut Tableau,
        cost: &[f64],
        allowed: usize,
        iterations: &mut usize,
    ) -> Result<(), SolverError> {
        let tolerance = self.config.solver.tolerance;
        let mut degenerate_streak = 0;

        loop {
            let reduced = tableau.reduced_costs(cost, allowed);
            let use_bland = degenerate_streak >= self.config.bland_after;
            let entering = if use_bland {
                reduced.iter().position(|&d| d < -tolerance)
            } else {
                reduced
                    .iter()
                    .enumerate()
                    .filter(|&(_, &d)| d < -tolerance)
                    .min_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(j, _)| j)
            };
            let Some(entering) = entering else {
                return Ok(());
            };

            if *iterations >= self.config.solver.max_iterations {
                return Err(SolverError::MaxIterationsExceeded {
                    iterations: *iterations,
                });
            }

            let (leaving, ratio) = tableau
                .ratio_test(entering, tolerance)
                .ok_or(SolverError::Unbounded { column: entering })?;

            if ratio <= tolerance {
                degenerate_streak += 1;
            } else {
                degenerate_streak = 0;
            }
            trace!(entering, leaving, ratio, use_bland, "simplex pivot");
            tableau.pivot(leaving, entering);
            *iterations += 1;
        }
    }
}

/// Dense tableau in canonical form with respect to `basis`.
#[derive(Debug, Clone)]
struct Tableau {
    /// Constraint rows; the last entry of each row is the right-hand side.
    rows: Vec<Vec<f64>>,
    /// Basic column of each row.
    basis: Vec<usize>,
    /// Columns excluding the right-hand side.
    n_cols: usize,
    /// First artificial column; everything from here on is artificial.
    artificial_start: usize,
}

impl Tableau {
    fn build(lp: &LinearProgram) -> Self {
        let n = lp.num_vars();
        let normalised: Vec<(Vec<f64>, Relation, f64)> = lp
            .constraints()
            .iter()
            .map(|c| {
                if c.rhs < 0.0 {
                    (
                        c.coefficients.iter().map(|v| -v).collect(),
                        c.relation.flipped(),
                        -c.rhs,
                    )
                } else {
                    (c.coefficients.clone(), c.relation, c.rhs)
                }
            })
            .collect();

        let n_slack = normalised
            .iter()
            .filter(|(_, r, _)| *r != Relation::Equal)
            .count();
        let n_artificial = normalised
            .iter()
            .filter(|(_, r, _)| *r != Relation::LessEqual)
            .count();
        let n_cols = n + n_slack + n_artificial;
        let artificial_start = n + n_slack;

        let mut rows = Vec::with_capacity(normalised.len());
        let mut basis = Vec::with_capacity(normalised.len());
        let mut next_slack = n;
        let mut next_artificial = artificial_start;

        for (coefficients, relation, rhs) in normalised {
            let mut row = vec![0.0; n_cols + 1];
            row[..n].copy_from_slice(&coefficients);
            row[n_cols] = rhs;
            match relation {
                Relation::LessEqual => {
                    row[next_slack] = 1.0;
                    basis.push(next_slack);
                    next_slack += 1;
                }
                Relation::GreaterEqual => {
                    row[next_slack] = -1.0;
                    next_slack += 1;
                    row[next_artificial] = 1.0;
                    basis.push(next_artificial);
                    next_artificial += 1;
                }
                Relation::Equal => {
                    row[next_artificial] = 1.0;
                    basis.push(next_artificial);
                    next_artificial += 1;
                }
            }
            rows.push(row);
        }

        Self {
            rows,
            basis,
            n_cols,
            artificial_start,
        }
    }

    #[inline]
    fn rhs(&self, i: usize) -> f64 {
        self.rows[i][self.n_cols]
    }

    fn reduced_costs(&self, cost: &[f64], allowed: usize) -> Vec<f64> {
        let mut reduced = cost[..allowed].to_vec();
        for (row, &b) in self.rows.iter().zip(&self.basis) {
            let cb = cost[b];
            if cb == 0.0 {
                continue;
            }
            for (d, &a) in reduced.iter_mut().zip(&row[..allowed]) {
                *d -= cb * a;
            }
        }
        for &b in &self.basis {
            if b < allowed {
                reduced[b] = 0.0;
            }
        }
        reduced
    }

    /// Minimum-ratio row for `entering`, ties broken by smallest basic column.
    fn ratio_test(&self, entering: usize, tolerance: f64) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, row) in self.rows.iter().enumerate() {
            let a = row[entering];
            if a <= tolerance {
                continue;
            }
            let ratio = (self.rhs(i) / a).max(0.0);
            best = match best {
                None => Some((i, ratio)),
                Some((r, br)) => {
                    let tie = (ratio - br).abs() <= tolerance * br.abs().max(1.0);
                    if (!tie && ratio < br) || (tie && self.basis[i] < self.basis[r]) {
                        Some((i, ratio))
                    } else {
                        Some((r, br))
                    }
                }
            };
        }
        best
    }

    fn pivot(&mut self, r: usize, e: usize) {
        let p = self.rows[r][e];
        for v in self.rows[r].iter_mut() {
            *v /= p;
        }
        let pivot_row = self.rows[r].clone();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == r {
                continue;
            }
            let factor = row[e];
            if factor == 0.0 {
                continue;
            }
            for (v, &pv) in row.iter_mut().zip(&pivot_row) {
                *v -= factor * pv;
            }
            // Exact zero in the entering column keeps the basis canonical
            row[e] = 0.0;
        }
        self.basis[r] = e;
    }

    fn artificial_sum(&self) -> f64 {
        self.basis
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b >= self.artificial_start)
            .map(|(i, _)| self.rhs(i))
            .sum()
    }

    /// Pivot zero-level artificials out of the basis, dropping dependent rows.
    fn expel_artificials(&mut self, tolerance: f64) {
        let mut i = 0;
        while i < self.rows.len() {
            if self.basis[i] < self.artificial_start {
                i += 1;
                continue;
            }
            let replacement = (0..self.artificial_start).find(|&j| self.rows[i][j].abs() > tolerance);
            match replacement {
                Some(j) => {
                    self.pivot(i, j);
                    i += 1;
                }
                None => {
                    trace!(row = i, "dropping redundant constraint row");
                    self.rows.remove(i);
                    self.basis.remove(i);
                }
            }
        }
    }

    fn structural_values(&self, num_vars: usize) -> Vec<f64> {
        let mut x = vec![0.0; num_vars];
        for (i, &b) in self.basis.iter().enumerate() {
            if b < num_vars {
                x[b] = self.rhs(i).max(0.0);
            }
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::solvers::SolverConfig;
    use approx::assert_relative_eq;

    fn solver() -> SimplexSolver {
        SimplexSolver::with_defaults()
    }

    #[test]
    fn test_textbook_maximisation() {
        // max 3x + 5y  s.t. x <= 4, 2y <= 12, 3x + 2y <= 18  →  (2, 6), 36
        let lp = LinearProgram::new(2)
            .minimise(vec![-3.0, -5.0])
            .subject_to(LinearConstraint::le(vec![1.0, 0.0], 4.0))
            .subject_to(LinearConstraint::le(vec![0.0, 2.0], 12.0))
            .subject_to(LinearConstraint::le(vec![3.0, 2.0], 18.0));
        let sol = solver().solve(&lp).unwrap();
        assert_relative_eq!(sol.objective, -36.0, epsilon = 1e-9);
        assert_relative_eq!(sol.x[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(sol.x[1], 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_greater_equal_and_equality_rows() {
        // min 2x + 3y  s.t. x + y >= 4, x - y = 1  →  (2.5, 1.5), 9.5
        let lp = LinearProgram::new(2)
            .minimise(vec![2.0, 3.0])
            .subject_to(LinearConstraint::ge(vec![1.0, 1.0], 4.0))
            .subject_to(LinearConstraint::eq(vec![1.0, -1.0], 1.0));
        let sol = solver().solve(&lp).unwrap();
        assert_relative_eq!(sol.objective, 9.5, epsilon = 1e-9);
        assert_relative_eq!(sol.x[0], 2.5, epsilon = 1e-9);
        assert_relative_eq!(sol.x[1], 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_rhs_is_normalised() {
        // -x - y <= -2 is x + y >= 2
        let lp = LinearProgram::new(2)
            .minimise(vec![1.0, 2.0])
            .subject_to(LinearConstraint::le(vec![-1.0, -1.0], -2.0));
        let sol = solver().solve(&lp).unwrap();
        assert_relative_eq!(sol.objective, 2.0, epsilon = 1e-9);
        assert_relative_eq!(sol.x[0], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_infeasible() {
        let lp = LinearProgram::new(1)
            .minimise(vec![1.0])
            .subject_to(LinearConstraint::le(vec![1.0], 1.0))
            .subject_to(LinearConstraint::ge(vec![1.0], 2.0));
        let err = solver().solve(&lp).unwrap_err();
        assert!(err.is_infeasible());
    }

    #[test]
    fn test_unbounded() {
        let lp = LinearProgram::new(2)
            .minimise(vec![-1.0, 0.0])
            .subject_to(LinearConstraint::ge(vec![1.0, -1.0], 0.0));
        assert!(matches!(
            solver().solve(&lp),
            Err(SolverError::Unbounded { .. })
        ));
    }

    #[test]
    fn test_no_constraints() {
        let lp = LinearProgram::new(2).minimise(vec![1.0, 2.0]);
        let sol = solver().solve(&lp).unwrap();
        assert_eq!(sol.x, vec![0.0, 0.0]);
        assert_eq!(sol.iterations, 0);
    }

    #[test]
    fn test_redundant_equalities_are_dropped() {
        // Third row is the sum of the first two
        let lp = LinearProgram::new(3)
            .minimise(vec![1.0, 1.0, 1.0])
            .subject_to(LinearConstraint::eq(vec![1.0, 1.0, 0.0], 2.0))
            .subject_to(LinearConstraint::eq(vec![0.0, 1.0, 1.0], 3.0))
            .subject_to(LinearConstraint::eq(vec![1.0, 2.0, 1.0], 5.0));
        let sol = solver().solve(&lp).unwrap();
        assert_relative_eq!(sol.objective, 3.0, epsilon = 1e-9);
        assert!(lp.max_violation(&sol.x) < 1e-9);
    }

    #[test]
    fn test_degenerate_problem_terminates_with_bland() {
        // Beale's cycling example; Dantzig pricing cycles without a fallback
        let lp = LinearProgram::new(4)
            .minimise(vec![-0.75, 150.0, -0.02, 6.0])
            .subject_to(LinearConstraint::le(vec![0.25, -60.0, -0.04, 9.0], 0.0))
            .subject_to(LinearConstraint::le(vec![0.5, -90.0, -0.02, 3.0], 0.0))
            .subject_to(LinearConstraint::le(vec![0.0, 0.0, 1.0, 0.0], 1.0));
        for bland_after in [0, 5, 50] {
            let config = SimplexConfig::default().with_bland_after(bland_after);
            let sol = SimplexSolver::new(config).solve(&lp).unwrap();
            assert_relative_eq!(sol.objective, -0.05, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_max_iterations() {
        let lp = LinearProgram::new(2)
            .minimise(vec![-3.0, -5.0])
            .subject_to(LinearConstraint::le(vec![1.0, 0.0], 4.0))
            .subject_to(LinearConstraint::le(vec![0.0, 2.0], 12.0))
            .subject_to(LinearConstraint::le(vec![3.0, 2.0], 18.0));
        let config = SimplexConfig::new(SolverConfig::new(1e-9, 1));
        assert_eq!(
            SimplexSolver::new(config).solve(&lp),
            Err(SolverError::MaxIterationsExceeded { iterations: 1 })
        );
    }

    #[test]
    fn test_validation_errors() {
        let bad_objective = LinearProgram::new(2).minimise(vec![1.0]);
        assert!(matches!(
            solver().solve(&bad_objective),
            Err(SolverError::DimensionMismatch { .. })
        ));

        let bad_row = LinearProgram::new(2).subject_to(LinearConstraint::le(vec![1.0], 1.0));
        assert!(matches!(
            solver().solve(&bad_row),
            Err(SolverError::DimensionMismatch { .. })
        ));

        let nan = LinearProgram::new(1).minimise(vec![f64::NAN]);
        assert!(matches!(
            solver().solve(&nan),
            Err(SolverError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_find_feasible_point_ignores_objective() {
        let lp = LinearProgram::new(2)
            .minimise(vec![-1.0, -1.0])
            .subject_to(LinearConstraint::eq(vec![1.0, 1.0], 1.0));
        let sol = solver().find_feasible_point(&lp).unwrap();
        assert!(lp.max_violation(&sol.x) < 1e-12);
        assert_relative_eq!(sol.objective, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sparse_constraint() {
        let c = LinearConstraint::sparse(4, [(1, 2.0), (3, -1.0), (1, 1.0)], Relation::Equal, 0.0);
        assert_eq!(c.coefficients, vec![0.0, 3.0, 0.0, -1.0]);
    }

    #[test]
    fn test_relation_flip_and_display() {
        assert_eq!(Relation::LessEqual.flipped(), Relation::GreaterEqual);
        assert_eq!(Relation::Equal.flipped(), Relation::Equal);
        assert_eq!(format!("{}", Relation::GreaterEqual), ">=");
    }

    #[test]
    fn test_deterministic() {
        let lp = LinearProgram::new(3)
            .minimise(vec![1.0, 1.0, 1.0])
            .subject_to(LinearConstraint::ge(vec![1.0, 1.0, 0.0], 1.0))
            .subject_to(LinearConstraint::ge(vec![0.0, 1.0, 1.0], 1.0));
        let a = solver().solve(&lp).unwrap();
        let b = solver().solve(&lp).unwrap();
        assert_eq!(a, b);
    }
}
