//! Labelled flow matrices.

use optim_core::math::DenseMatrix;

use crate::error::ModelError;

/// Nonnegative shipped quantity per arc, labelled by origin and destination.
///
/// Direct solutions are bipartite (plants × sites). Network solutions are
/// square over the node set and also carry the net supply they were solved
/// against, so flow conservation can be checked after the fact.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowSolution {
    origins: Vec<String>,
    destinations: Vec<String>,
    flows: DenseMatrix<f64>,
    total_cost: f64,
    net_supply: Option<Vec<f64>>,
}

impl FlowSolution {
    /// Flows from `origins` (rows) to `destinations` (columns).
    pub(crate) fn bipartite(
        origins: Vec<String>,
        destinations: Vec<String>,
        flows: DenseMatrix<f64>,
        total_cost: f64,
    ) -> Self {
        Self {
            origins,
            destinations,
            flows,
            total_cost,
            net_supply: None,
        }
    }

    /// Square flows over `nodes` solved against `net_supply`.
    pub(crate) fn network(
        nodes: Vec<String>,
        flows: DenseMatrix<f64>,
        net_supply: Vec<f64>,
        total_cost: f64,
    ) -> Self {
        Self {
            origins: nodes.clone(),
            destinations: nodes,
            flows,
            total_cost,
            net_supply: Some(net_supply),
        }
    }

    /// Row labels.
    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    /// Column labels.
    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    /// Flow matrix.
    pub fn flows(&self) -> &DenseMatrix<f64> {
        &self.flows
    }

    /// Σ cost · flow over all arcs.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Net supply per node for network solutions.
    pub fn net_supply(&self) -> Option<&[f64]> {
        self.net_supply.as_deref()
    }

    /// Flow on arc `(i, j)`, or `None` when out of bounds.
    pub fn flow(&self, i: usize, j: usize) -> Option<f64> {
        self.flows.get(i, j)
    }

    /// Flow between two labelled endpoints.
    pub fn flow_between(&self, origin: &str, destination: &str) -> Option<f64> {
        let i = self.origins.iter().position(|o| o == origin)?;
        let j = self.destinations.iter().position(|d| d == destination)?;
        self.flow(i, j)
    }

    /// Total shipped out of each origin.
    pub fn row_totals(&self) -> Vec<f64> {
        self.flows.iter_rows().map(|row| row.iter().sum()).collect()
    }

    /// Total received by each destination.
    pub fn column_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.flows.cols()];
        for row in self.flows.iter_rows() {
            for (t, f) in totals.iter_mut().zip(row) {
                *t += f;
            }
        }
        totals
    }

    /// Total quantity shipped over all arcs.
    pub fn total_shipped(&self) -> f64 {
        self.flows.as_slice().iter().sum()
    }

    /// Arcs carrying positive flow, in row-major order.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.flows.iter_rows().enumerate().flat_map(move |(i, row)| {
            row.iter().enumerate().filter(|&(_, &f)| f > 0.0).map(move |(j, &f)| {
                (self.origins[i].as_str(), self.destinations[j].as_str(), f)
            })
        })
    }

    /// Outflow − inflow − net supply per node, for network solutions.
    ///
    /// Every entry is zero (within solver tolerance) for a valid solution.
    pub fn conservation_residuals(&self) -> Option<Vec<f64>> {
        let net_supply = self.net_supply.as_ref()?;
        let outflow = self.row_totals();
        let inflow = self.column_totals();
        Some(
            net_supply
                .iter()
                .enumerate()
                .map(|(k, b)| outflow[k] - inflow[k] - b)
                .collect(),
        )
    }

    /// Largest absolute conservation residual, for network solutions.
    pub fn max_conservation_residual(&self) -> Option<f64> {
        self.conservation_residuals()
            .map(|r| r.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())))
    }

    /// Replace the row and column labels.
    ///
    /// # Errors
    ///
    /// `ModelError::IllConditionedInput` if a label list has the wrong length.
    pub fn relabel(
        mut self,
        origins: Vec<String>,
        destinations: Vec<String>,
    ) -> Result<Self, ModelError> {
        super::network::check_len("origin labels", self.flows.rows(), origins.len())?;
        super::network::check_len("destination labels", self.flows.cols(), destinations.len())?;
        self.origins = origins;
        self.destinations = destinations;
        Ok(self)
    }

    /// Copy without row and column `k`; the net supply of the remaining nodes
    /// absorbs the flow exchanged with `k`.
    pub(crate) fn without_node(&self, k: usize) -> Self {
        let n = self.flows.rows();
        let keep: Vec<usize> = (0..n).filter(|&i| i != k).collect();
        let mut flows = DenseMatrix::zeros(keep.len(), keep.len());
        for (a, &i) in keep.iter().enumerate() {
            for (b, &j) in keep.iter().enumerate() {
                flows[(a, b)] = self.flows[(i, j)];
            }
        }
        let net_supply = self.net_supply.as_ref().map(|b| {
            keep.iter()
                .map(|&i| b[i] + self.flows[(k, i)] - self.flows[(i, k)])
                .collect()
        });
        Self {
            origins: keep.iter().map(|&i| self.origins[i].clone()).collect(),
            destinations: keep.iter().map(|&i| self.destinations[i].clone()).collect(),
            flows,
            total_cost: self.total_cost,
            net_supply,
        }
    }

    pub(crate) fn set_total_cost(&mut self, total_cost: f64) {
        self.total_cost = total_cost;
    }
}
