//! Minimum-variance portfolio QPs and frontier sweeps.

use optim_core::math::solvers::{ActiveSetSolver, LinearConstraint, QuadraticProgram};
use tracing::{debug, warn};

use super::config::FrontierConfig;
use super::portfolio::{FrontierPoint, PortfolioSolution};
use super::sweep::{Frontier, FrontierSample};
use super::universe::AssetUniverse;
use crate::error::ModelError;

/// Efficient-frontier solver.
///
/// Each solve is an independent long-only minimum-variance QP; the solver
/// holds only configuration and can be shared across threads.
///
/// # Examples
///
/// ```
/// use optim_core::math::DenseMatrix;
/// use optim_models::frontier::{AssetUniverse, FrontierSolver};
///
/// let universe = AssetUniverse::from_returns(
///     vec![0.05, 0.10],
///     DenseMatrix::from_diagonal(&[0.04, 0.09]),
/// )
/// .unwrap();
///
/// let portfolio = FrontierSolver::with_defaults()
///     .min_variance_at_return(&universe, 0.08)
///     .unwrap();
/// assert!((portfolio.weights[0] - 0.4).abs() < 1e-8);
/// assert!((portfolio.weights[1] - 0.6).abs() < 1e-8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrontierSolver {
    config: FrontierConfig,
}

impl FrontierSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: FrontierConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &FrontierConfig {
        &self.config
    }

    /// Minimise `wᵀΣw` subject to `Σw = 1`, `μᵀw ≥ return_floor`, `w ≥ 0`.
    ///
    /// A floor equal to the largest expected return is feasible (the whole
    /// portfolio goes into that asset).
    ///
    /// # Errors
    ///
    /// - `ModelError::IllConditionedInput` if `return_floor` is not finite
    /// - `ModelError::InfeasibleModel` if `return_floor` exceeds the largest
    ///   expected return
    pub fn min_variance_at_return(
        &self,
        universe: &AssetUniverse,
        return_floor: f64,
    ) -> Result<PortfolioSolution, ModelError> {
        if !return_floor.is_finite() {
            return Err(ModelError::ill_conditioned(format!(
                "return floor {} is not finite",
                return_floor
            )));
        }
        let max_return = universe.max_return();
        if return_floor > max_return + self.config.return_tolerance {
            return Err(ModelError::infeasible(format!(
                "return floor {} exceeds the largest expected return {}",
                return_floor, max_return
            )));
        }
        self.solve(universe, Some(return_floor.min(max_return)))
    }

    /// Minimise `wᵀΣw` subject to `Σw = 1`, `w ≥ 0` only.
    ///
    /// # Errors
    ///
    /// Solver failures mapped through [`ModelError`].
    pub fn global_minimum_variance(
        &self,
        universe: &AssetUniverse,
    ) -> Result<PortfolioSolution, ModelError> {
        self.solve(universe, None)
    }

    /// Lazily solve each target in order.
    ///
    /// Failures are recorded per sample and never stop the sequence.
    pub fn frontier_iter<'a>(
        &'a self,
        universe: &'a AssetUniverse,
        targets: &'a [f64],
    ) -> impl Iterator<Item = FrontierSample> + 'a {
        targets.iter().map(move |&target| self.sample(universe, target))
    }

    /// Solve every target and collect the samples in target order.
    ///
    /// With the `parallel` feature the targets are solved on the rayon
    /// thread pool; the result is identical to the sequential sweep.
    #[cfg(feature = "parallel")]
    pub fn trace_frontier(&self, universe: &AssetUniverse, targets: &[f64]) -> Frontier {
        use rayon::prelude::*;

        let samples: Vec<FrontierSample> = targets
            .par_iter()
            .map(|&target| self.sample(universe, target))
            .collect();
        self.log_sweep(&samples);
        Frontier::new(samples)
    }

    /// Solve every target and collect the samples in target order.
    #[cfg(not(feature = "parallel"))]
    pub fn trace_frontier(&self, universe: &AssetUniverse, targets: &[f64]) -> Frontier {
        let samples: Vec<FrontierSample> = self.frontier_iter(universe, targets).collect();
        self.log_sweep(&samples);
        Frontier::new(samples)
    }

    fn sample(&self, universe: &AssetUniverse, target: f64) -> FrontierSample {
        let outcome = self
            .min_variance_at_return(universe, target)
            .map(|portfolio| FrontierPoint::from_portfolio(target, portfolio));
        if let Err(err) = &outcome {
            warn!(target, error = %err, "frontier target failed");
        }
        FrontierSample { target, outcome }
    }

    fn log_sweep(&self, samples: &[FrontierSample]) {
        let failed = samples.iter().filter(|s| !s.is_ok()).count();
        debug!(targets = samples.len(), failed, "frontier traced");
    }

    fn solve(
        &self,
        universe: &AssetUniverse,
        return_floor: Option<f64>,
    ) -> Result<PortfolioSolution, ModelError> {
        let k = universe.len();
        let mut qp = QuadraticProgram::new(universe.covariance().scaled(2.0), vec![0.0; k])
            .subject_to(LinearConstraint::eq(vec![1.0; k], 1.0));
        if let Some(floor) = return_floor {
            qp.add_constraint(LinearConstraint::ge(universe.expected_returns(), floor));
        }
        for i in 0..k {
            let mut row = vec![0.0; k];
            row[i] = 1.0;
            qp.add_constraint(LinearConstraint::ge(row, 0.0));
        }

        let solution = ActiveSetSolver::new(self.config.active_set).solve(&qp)?;
        let weights: Vec<f64> = solution.x.iter().map(|w| w.max(0.0)).collect();
        let variance = universe.variance(&weights).max(0.0);
        let expected_return = universe.expected_return(&weights);

        debug!(
            assets = k,
            floor = ?return_floor,
            risk = variance.sqrt(),
            expected_return,
            iterations = solution.iterations,
            "minimum-variance portfolio solved"
        );

        Ok(PortfolioSolution {
            weights,
            variance,
            risk: variance.sqrt(),
            expected_return,
            iterations: solution.iterations,
        })
    }
}
