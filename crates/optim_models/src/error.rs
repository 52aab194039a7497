//! Model-level error types.
//!
//! Solver failures are translated into the two conditions a caller of a
//! transport or portfolio model can act on: the model has no feasible
//! point, or its input data is unusable.

use optim_core::types::SolverError;
use thiserror::Error;

/// Errors reported by the transport and frontier models.
///
/// # Variants
///
/// - `InfeasibleModel`: No flow or weight assignment satisfies the constraints
/// - `IllConditionedInput`: Dimensions, costs or covariance are unusable
/// - `Solver`: The underlying solver failed for another reason
///
/// # Examples
///
/// ```
/// use optim_core::types::SolverError;
/// use optim_models::ModelError;
///
/// let err: ModelError = SolverError::Infeasible { residual: 2.0 }.into();
/// assert!(err.is_infeasible());
///
/// let err: ModelError = SolverError::InvalidInput("NaN cost".to_string()).into();
/// assert!(err.is_ill_conditioned());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ModelError {
    /// No assignment satisfies the model constraints.
    #[error("Infeasible model: {0}")]
    InfeasibleModel(String),

    /// Input data that cannot form a well-posed model.
    #[error("Ill-conditioned input: {0}")]
    IllConditionedInput(String),

    /// Solver failure not attributable to the model data.
    #[error("Solver error: {0}")]
    Solver(#[source] SolverError),
}

impl ModelError {
    /// Create an infeasible-model error.
    pub fn infeasible(message: impl Into<String>) -> Self {
        Self::InfeasibleModel(message.into())
    }

    /// Create an ill-conditioned-input error.
    pub fn ill_conditioned(message: impl Into<String>) -> Self {
        Self::IllConditionedInput(message.into())
    }

    /// Whether this error reports an infeasible model.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::InfeasibleModel(_))
    }

    /// Whether this error reports unusable input.
    pub fn is_ill_conditioned(&self) -> bool {
        matches!(self, Self::IllConditionedInput(_))
    }
}

impl From<SolverError> for ModelError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::Infeasible { residual } => Self::InfeasibleModel(format!(
                "no feasible basis (phase one residual {:.3e})",
                residual
            )),
            SolverError::DimensionMismatch { .. }
            | SolverError::InvalidInput(_)
            | SolverError::SingularSystem { .. } => Self::IllConditionedInput(err.to_string()),
            other => Self::Solver(other),
        }
    }
}
