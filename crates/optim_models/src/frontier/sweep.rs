//! Ordered frontier sweeps.

use super::portfolio::FrontierPoint;
use crate::error::ModelError;

/// Outcome of solving one return target.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrontierSample {
    /// Return floor.
    pub target: f64,
    /// Solved point, or the error for this target alone.
    pub outcome: Result<FrontierPoint, ModelError>,
}

impl FrontierSample {
    /// Solved point, if any.
    pub fn point(&self) -> Option<&FrontierPoint> {
        self.outcome.as_ref().ok()
    }

    /// Failure, if any.
    pub fn error(&self) -> Option<&ModelError> {
        self.outcome.as_ref().err()
    }

    /// Whether the target was solved.
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Frontier samples in target order.
///
/// Failed targets stay in place so the sweep keeps one entry per target.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Frontier {
    samples: Vec<FrontierSample>,
}

impl Frontier {
    /// Wrap samples already in target order.
    pub fn new(samples: Vec<FrontierSample>) -> Self {
        Self { samples }
    }

    /// All samples.
    pub fn samples(&self) -> &[FrontierSample] {
        &self.samples
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the sweep had no targets.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Solved points in target order.
    pub fn points(&self) -> impl Iterator<Item = &FrontierPoint> + '_ {
        self.samples.iter().filter_map(FrontierSample::point)
    }

    /// `(target, error)` for every failed target.
    pub fn failures(&self) -> impl Iterator<Item = (f64, &ModelError)> + '_ {
        self.samples
            .iter()
            .filter_map(|s| s.error().map(|e| (s.target, e)))
    }

    /// Whether risk never decreases (beyond `tolerance`) as the target rises.
    pub fn is_monotone(&self, tolerance: f64) -> bool {
        let risks: Vec<f64> = self.points().map(|p| p.risk).collect();
        risks.windows(2).all(|w| w[1] >= w[0] - tolerance)
    }

    /// Consume the frontier, returning its samples.
    pub fn into_samples(self) -> Vec<FrontierSample> {
        self.samples
    }
}

impl FromIterator<FrontierSample> for Frontier {
    fn from_iter<I: IntoIterator<Item = FrontierSample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// `count` evenly spaced targets from `low` to `high` inclusive.
///
/// `count == 1` gives `[low]`; `count == 0` gives an empty sweep.
///
/// # Examples
///
/// ```
/// use optim_models::frontier::return_targets;
///
/// assert_eq!(return_targets(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(return_targets(0.2, 0.9, 1), vec![0.2]);
/// ```
pub fn return_targets(low: f64, high: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![low],
        _ => {
            let step = (high - low) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { high } else { low + step * i as f64 })
                .collect()
        }
    }
}
