//! Solved portfolios and frontier points.

/// Minimum-variance portfolio for one return floor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioSolution {
    /// Weight per asset; nonnegative and summing to one.
    pub weights: Vec<f64>,
    /// Portfolio variance `wᵀΣw`.
    pub variance: f64,
    /// Portfolio risk `sqrt(wᵀΣw)`.
    pub risk: f64,
    /// Achieved expected return `μᵀw`.
    pub expected_return: f64,
    /// Active-set iterations used.
    pub iterations: usize,
}

impl PortfolioSolution {
    /// Sum of the weights.
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Smallest weight (most negative short position, if any).
    pub fn min_weight(&self) -> f64 {
        self.weights.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Indices of assets held with weight above `threshold`.
    pub fn holdings(&self, threshold: f64) -> Vec<usize> {
        self.weights
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > threshold)
            .map(|(i, _)| i)
            .collect()
    }
}

/// One point on the efficient frontier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrontierPoint {
    /// Return floor the portfolio was solved for.
    pub target: f64,
    /// Achieved risk.
    pub risk: f64,
    /// Achieved expected return (at least `target`).
    pub achieved_return: f64,
    /// Optimal weights.
    pub weights: Vec<f64>,
}

impl FrontierPoint {
    /// Build a frontier point from a solved portfolio.
    pub fn from_portfolio(target: f64, portfolio: PortfolioSolution) -> Self {
        Self {
            target,
            risk: portfolio.risk,
            achieved_return: portfolio.expected_return,
            weights: portfolio.weights,
        }
    }

    /// Whether the return floor binds (achieved return within `tolerance` of it).
    pub fn floor_binds(&self, tolerance: f64) -> bool {
        (self.achieved_return - self.target).abs() <= tolerance
    }
}
