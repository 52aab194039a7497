//! Transport model configuration types.

use optim_core::math::solvers::{SimplexConfig, SolverConfig};

/// How arcs with a non-finite cost reach the linear program.
///
/// # Variants
///
/// - `Exclude`: Disallowed arcs get no flow variable at all (default)
/// - `Sentinel`: Disallowed arcs are priced at a large finite cost
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArcPolicy {
    /// Omit disallowed arcs; they can never carry flow.
    #[default]
    Exclude,

    /// Price disallowed arcs at the given unit cost.
    ///
    /// The cost must exceed `node_count · max_real_cost` so that any path of
    /// real arcs is cheaper per unit. Flow on such an arc is reported by
    /// `TransshipmentSolution::uses_disallowed_arcs`.
    Sentinel(f64),
}

/// Configuration for [`TransportSolver`](super::TransportSolver).
///
/// # Examples
///
/// ```
/// use optim_models::transport::{ArcPolicy, TransportConfig};
///
/// let config = TransportConfig::default().with_arc_policy(ArcPolicy::Sentinel(1e6));
/// assert_eq!(config.arc_policy, ArcPolicy::Sentinel(1e6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportConfig {
    /// Simplex settings for every transport LP.
    pub simplex: SimplexConfig,

    /// Treatment of disallowed transshipment arcs.
    /// Default: `ArcPolicy::Exclude`
    pub arc_policy: ArcPolicy,

    /// Relative threshold below which solved flows are reported as zero,
    /// scaled by the largest supply or capacity.
    /// Default: 1e-9
    pub flow_tolerance: f64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            simplex: SimplexConfig::default(),
            arc_policy: ArcPolicy::Exclude,
            flow_tolerance: 1e-9,
        }
    }
}

impl TransportConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tighter simplex tolerance and a larger pivot budget.
    pub fn high_precision() -> Self {
        Self {
            simplex: SimplexConfig::new(SolverConfig::high_precision()),
            flow_tolerance: 1e-12,
            ..Self::default()
        }
    }

    /// Set the simplex settings.
    pub fn with_simplex(mut self, simplex: SimplexConfig) -> Self {
        self.simplex = simplex;
        self
    }

    /// Set the disallowed-arc policy.
    pub fn with_arc_policy(mut self, arc_policy: ArcPolicy) -> Self {
        self.arc_policy = arc_policy;
        self
    }

    /// Set the flow reporting threshold.
    ///
    /// # Panics
    ///
    /// Panics if `flow_tolerance` is negative or not finite.
    pub fn with_flow_tolerance(mut self, flow_tolerance: f64) -> Self {
        assert!(
            flow_tolerance.is_finite() && flow_tolerance >= 0.0,
            "flow_tolerance must be finite and non-negative"
        );
        self.flow_tolerance = flow_tolerance;
        self
    }
}
