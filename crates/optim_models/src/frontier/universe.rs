//! Asset universe: expected returns and their covariance.

use optim_core::math::linalg::{dot, is_positive_semidefinite};
use optim_core::math::DenseMatrix;

use crate::error::ModelError;

/// Relative symmetry tolerance for the covariance matrix.
const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// Relative diagonal jitter for the positive semi-definiteness check.
const PSD_JITTER: f64 = 1e-9;

/// A single investable asset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Asset {
    /// Asset label.
    pub name: String,
    /// Expected return per period.
    pub expected_return: f64,
}

impl Asset {
    /// Create an asset.
    pub fn new(name: impl Into<String>, expected_return: f64) -> Self {
        Self {
            name: name.into(),
            expected_return,
        }
    }
}

/// Validated set of assets with a symmetric positive semi-definite covariance.
///
/// # Examples
///
/// ```
/// use optim_core::math::DenseMatrix;
/// use optim_models::frontier::AssetUniverse;
///
/// let universe = AssetUniverse::from_returns(
///     vec![0.05, 0.10],
///     DenseMatrix::from_diagonal(&[0.04, 0.09]),
/// )
/// .unwrap();
///
/// assert_eq!(universe.len(), 2);
/// assert_eq!(universe.max_return(), 0.10);
/// assert!((universe.variance(&[0.5, 0.5]) - 0.0325).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AssetUniverse {
    assets: Vec<Asset>,
    covariance: DenseMatrix<f64>,
}

impl AssetUniverse {
    /// Create a universe, validating the covariance.
    ///
    /// # Errors
    ///
    /// `ModelError::IllConditionedInput` if:
    /// - there are no assets
    /// - the covariance is not `k × k`
    /// - a return or covariance entry is not finite
    /// - the covariance is asymmetric, has a negative variance, or is not
    ///   positive semi-definite
    pub fn new(assets: Vec<Asset>, covariance: DenseMatrix<f64>) -> Result<Self, ModelError> {
        let k = assets.len();
        if k == 0 {
            return Err(ModelError::ill_conditioned(
                "asset universe needs at least one asset",
            ));
        }
        if covariance.shape() != (k, k) {
            return Err(ModelError::ill_conditioned(format!(
                "covariance is {}x{}, expected {}x{}",
                covariance.rows(),
                covariance.cols(),
                k,
                k
            )));
        }
        if let Some(asset) = assets.iter().find(|a| !a.expected_return.is_finite()) {
            return Err(ModelError::ill_conditioned(format!(
                "asset {} has non-finite expected return",
                asset.name
            )));
        }
        if !covariance.is_finite() {
            return Err(ModelError::ill_conditioned(
                "covariance contains a non-finite entry",
            ));
        }
        if !covariance.is_symmetric(SYMMETRY_TOLERANCE * covariance.max_abs()) {
            return Err(ModelError::ill_conditioned("covariance is not symmetric"));
        }
        if let Some(i) = (0..k).find(|&i| covariance[(i, i)] < 0.0) {
            return Err(ModelError::ill_conditioned(format!(
                "asset {} has negative variance {}",
                assets[i].name,
                covariance[(i, i)]
            )));
        }
        if !is_positive_semidefinite(&covariance, PSD_JITTER) {
            return Err(ModelError::ill_conditioned(
                "covariance is not positive semi-definite",
            ));
        }
        Ok(Self { assets, covariance })
    }

    /// Create a universe with generated names `Asset 1`, `Asset 2`, ….
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn from_returns(
        expected_returns: Vec<f64>,
        covariance: DenseMatrix<f64>,
    ) -> Result<Self, ModelError> {
        let assets = expected_returns
            .into_iter()
            .enumerate()
            .map(|(i, r)| Asset::new(format!("Asset {}", i + 1), r))
            .collect();
        Self::new(assets, covariance)
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Always `false`: a validated universe has at least one asset.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Assets in order.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Covariance matrix.
    pub fn covariance(&self) -> &DenseMatrix<f64> {
        &self.covariance
    }

    /// Expected returns in asset order.
    pub fn expected_returns(&self) -> Vec<f64> {
        self.assets.iter().map(|a| a.expected_return).collect()
    }

    /// Largest expected return: the highest floor a long-only portfolio can meet.
    pub fn max_return(&self) -> f64 {
        self.assets
            .iter()
            .map(|a| a.expected_return)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest expected return.
    pub fn min_return(&self) -> f64 {
        self.assets
            .iter()
            .map(|a| a.expected_return)
            .fold(f64::INFINITY, f64::min)
    }

    /// Portfolio variance `wᵀΣw`.
    pub fn variance(&self, weights: &[f64]) -> f64 {
        self.covariance.quadratic_form(weights)
    }

    /// Portfolio expected return `μᵀw`.
    pub fn expected_return(&self, weights: &[f64]) -> f64 {
        dot(&self.expected_returns(), weights)
    }
}
