//! Solver configuration types.

use num_traits::Float;

/// Configuration shared by the LP and QP solvers.
///
/// # Type Parameters
///
/// * `T` - Floating-point type for tolerance (e.g., `f64`)
///
/// # Example
///
/// ```
/// use optim_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!(config.tolerance < 1e-8);
/// assert!(config.max_iterations >= 1000);
///
/// let custom = SolverConfig {
///     tolerance: 1e-12,
///     max_iterations: 200,
/// };
/// assert_eq!(custom.max_iterations, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig<T: Float> {
    /// Feasibility and optimality tolerance.
    ///
    /// Reduced costs above `-tolerance` count as optimal, pivots below it are
    /// skipped, and phase-one residuals below `tolerance · max(1, Σ|b|)` count
    /// as feasible.
    pub tolerance: T,

    /// Maximum number of pivots (simplex) or working-set iterations (active set).
    ///
    /// Exceeding it returns `SolverError::MaxIterationsExceeded`.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Default values:
    /// - `tolerance`: 1e-9
    /// - `max_iterations`: 10_000
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-9).unwrap(),
            max_iterations: 10_000,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a new configuration with specified values.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use optim_core::math::solvers::SolverConfig;
    ///
    /// let config = SolverConfig::new(1e-12, 200);
    /// assert_eq!(config.max_iterations, 200);
    /// ```
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Tighter tolerance (1e-12) and a larger iteration budget (100_000).
    pub fn high_precision() -> Self {
        Self {
            tolerance: T::from(1e-12).unwrap(),
            max_iterations: 100_000,
        }
    }

    /// Relaxed tolerance (1e-6) and a smaller iteration budget (1_000).
    pub fn fast() -> Self {
        Self {
            tolerance: T::from(1e-6).unwrap(),
            max_iterations: 1_000,
        }
    }
}

/// Configuration for [`SimplexSolver`](super::SimplexSolver).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimplexConfig {
    /// Tolerance and iteration budget.
    pub solver: SolverConfig<f64>,
    /// Consecutive degenerate pivots after which Dantzig pricing gives way to
    /// Bland's rule; the next pivot that makes progress switches back.
    pub bland_after: usize,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            bland_after: 50,
        }
    }
}

impl SimplexConfig {
    /// Create a simplex configuration from shared solver settings.
    pub fn new(solver: SolverConfig<f64>) -> Self {
        Self {
            solver,
            ..Default::default()
        }
    }

    /// Set the degenerate-pivot threshold for switching to Bland's rule.
    ///
    /// `0` prices with Bland's rule from the first pivot.
    pub fn with_bland_after(mut self, bland_after: usize) -> Self {
        self.bland_after = bland_after;
        self
    }
}

/// Configuration for [`ActiveSetSolver`](super::ActiveSetSolver).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSetConfig {
    /// Tolerance and working-set iteration budget.
    pub solver: SolverConfig<f64>,
    /// Relative ridge added to the Hessian diagonal, scaled by `trace(Q) / n`.
    pub regularisation: f64,
    /// Settings for the phase-one LP that finds the starting point.
    pub phase_one: SimplexConfig,
}

impl Default for ActiveSetConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            regularisation: 1e-10,
            phase_one: SimplexConfig::default(),
        }
    }
}

impl ActiveSetConfig {
    /// Create an active-set configuration from shared solver settings.
    pub fn new(solver: SolverConfig<f64>) -> Self {
        Self {
            solver,
            phase_one: SimplexConfig::new(solver),
            ..Default::default()
        }
    }

    /// Set the relative Hessian ridge.
    ///
    /// # Panics
    ///
    /// Panics if `regularisation` is negative or not finite.
    pub fn with_regularisation(mut self, regularisation: f64) -> Self {
        assert!(
            regularisation.is_finite() && regularisation >= 0.0,
            "regularisation must be finite and non-negative"
        );
        self.regularisation = regularisation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config: SolverConfig<f64> = SolverConfig::default();
        assert!((config.tolerance - 1e-9).abs() < 1e-15);
        assert_eq!(config.max_iterations, 10_000);
    }

    #[test]
    fn test_new_config() {
        let config: SolverConfig<f64> = SolverConfig::new(1e-12, 200);
        assert!((config.tolerance - 1e-12).abs() < 1e-17);
        assert_eq!(config.max_iterations, 200);
    }

    #[test]
    #[should_panic(expected = "tolerance must be positive")]
    fn test_new_config_zero_tolerance_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(0.0, 100);
    }

    #[test]
    #[should_panic(expected = "max_iterations must be > 0")]
    fn test_new_config_zero_iterations_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(1e-10, 0);
    }

    #[test]
    fn test_presets() {
        let precise: SolverConfig<f64> = SolverConfig::high_precision();
        let fast: SolverConfig<f64> = SolverConfig::fast();
        assert!(precise.tolerance < fast.tolerance);
        assert!(precise.max_iterations > fast.max_iterations);
    }

    #[test]
    fn test_config_with_f32() {
        let config: SolverConfig<f32> = SolverConfig::default();
        assert!(config.tolerance > 0.0);
    }

    #[test]
    fn test_simplex_config() {
        let config = SimplexConfig::new(SolverConfig::fast()).with_bland_after(0);
        assert_eq!(config.bland_after, 0);
        assert_eq!(config.solver.max_iterations, 1_000);
        assert_eq!(SimplexConfig::default().bland_after, 50);
    }

    #[test]
    fn test_active_set_config_propagates_solver() {
        let config = ActiveSetConfig::new(SolverConfig::high_precision());
        assert_eq!(config.phase_one.solver, SolverConfig::high_precision());
        assert!((config.regularisation - 1e-10).abs() < 1e-20);
    }

    #[test]
    #[should_panic(expected = "regularisation must be finite and non-negative")]
    fn test_negative_regularisation_panics() {
        let _ = ActiveSetConfig::default().with_regularisation(-1.0);
    }
}
