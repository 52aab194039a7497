//! Frontier solver configuration.

use optim_core::math::solvers::{ActiveSetConfig, SolverConfig};

/// Configuration for [`FrontierSolver`](super::FrontierSolver).
///
/// # Examples
///
/// ```
/// use optim_models::frontier::FrontierConfig;
///
/// let config = FrontierConfig::default().with_return_tolerance(1e-6);
/// assert_eq!(config.return_tolerance, 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrontierConfig {
    /// Active-set settings for every portfolio QP.
    pub active_set: ActiveSetConfig,

    /// Slack allowed when comparing a return floor with the largest expected
    /// return; floors within it are clamped to the maximum.
    /// Default: 1e-9
    pub return_tolerance: f64,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self {
            active_set: ActiveSetConfig::default(),
            return_tolerance: 1e-9,
        }
    }
}

impl FrontierConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tighter QP tolerance and a larger iteration budget.
    pub fn high_precision() -> Self {
        Self {
            active_set: ActiveSetConfig::new(SolverConfig::high_precision()),
            ..Self::default()
        }
    }

    /// Set the active-set settings.
    pub fn with_active_set(mut self, active_set: ActiveSetConfig) -> Self {
        self.active_set = active_set;
        self
    }

    /// Set the return-floor tolerance.
    pub fn with_return_tolerance(mut self, tolerance: f64) -> Self {
        self.return_tolerance = tolerance;
        self
    }
}
