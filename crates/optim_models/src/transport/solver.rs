//! Transportation and transshipment LP builders.

use optim_core::math::solvers::{LinearConstraint, LinearProgram, Relation, SimplexSolver};
use optim_core::math::DenseMatrix;
use tracing::debug;

use super::config::{ArcPolicy, TransportConfig};
use super::flow::FlowSolution;
use super::network::{check_costs, check_len, check_quantities, Node, TransshipmentNetwork};
use crate::error::ModelError;

/// Result of a direct (plant → site) transportation solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectSolution {
    /// Minimum total shipping cost.
    pub total_cost: f64,
    /// Plants × sites flow matrix.
    pub flows: FlowSolution,
}

/// Result of a transshipment solve over `{dummy, plants…, sites…}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransshipmentSolution {
    nodes: Vec<Node>,
    flows: FlowSolution,
    dummy_cost: f64,
    disallowed_flow: f64,
}

impl TransshipmentSolution {
    /// Minimum total cost, including dummy arcs and any sentinel-priced arcs.
    pub fn total_cost(&self) -> f64 {
        self.flows.total_cost()
    }

    /// Nodes in LP order; the dummy comes first.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Square node × node flows.
    pub fn flows(&self) -> &FlowSolution {
        &self.flows
    }

    /// Total flow leaving the dummy node (unused site capacity).
    pub fn dummy_flow(&self) -> f64 {
        self.flows.row_totals().first().copied().unwrap_or(0.0)
    }

    /// Total cost excluding arcs that leave the dummy node.
    pub fn real_cost(&self) -> f64 {
        self.total_cost() - self.dummy_cost
    }

    /// Flows between real facilities only.
    ///
    /// Sites keep their conservation balance: the capacity the dummy filled
    /// is deducted from their net demand.
    pub fn without_dummy(&self) -> FlowSolution {
        let mut reduced = self.flows.without_node(0);
        reduced.set_total_cost(self.real_cost());
        reduced
    }

    /// Whether any flow travels over a sentinel-priced arc.
    ///
    /// Always `false` under `ArcPolicy::Exclude`.
    pub fn uses_disallowed_arcs(&self) -> bool {
        self.disallowed_flow > 0.0
    }

    /// Total flow carried by sentinel-priced arcs.
    pub fn disallowed_flow(&self) -> f64 {
        self.disallowed_flow
    }
}

/// One LP column: a directed arc with its effective unit cost.
#[derive(Debug, Clone, Copy)]
struct Arc {
    from: usize,
    to: usize,
    cost: f64,
    disallowed: bool,
}

/// Transportation problem solver.
///
/// Builds the direct and transshipment LPs and solves them with the
/// two-phase simplex. Holds only configuration, so one instance can serve
/// any number of concurrent solves.
///
/// # Examples
///
/// ```
/// use optim_core::math::DenseMatrix;
/// use optim_models::transport::TransportSolver;
///
/// let costs = DenseMatrix::from_rows(vec![vec![4.0, 6.0], vec![5.0, 3.0]]).unwrap();
/// let solution = TransportSolver::with_defaults()
///     .solve_direct(&costs, &[20.0, 30.0], &[25.0, 40.0])
///     .unwrap();
///
/// assert!((solution.total_cost - 170.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransportSolver {
    config: TransportConfig,
}

impl TransportSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Ship every plant's supply to capacity-limited sites at minimum cost.
    ///
    /// Minimises `Σ costs[i][j] · flow[i][j]` subject to
    /// `Σ_j flow[i][j] = supply[i]`, `Σ_i flow[i][j] ≤ demand[j]` and
    /// `flow ≥ 0`. A `+∞` cost marks an arc that cannot be used.
    ///
    /// # Errors
    ///
    /// - `ModelError::IllConditionedInput` for mismatched sizes, negative or
    ///   NaN costs, or negative supplies and demands
    /// - `ModelError::InfeasibleModel` if `Σ supply > Σ demand` or some plant
    ///   has no usable arc
    pub fn solve_direct(
        &self,
        costs: &DenseMatrix<f64>,
        supply: &[f64],
        demand: &[f64],
    ) -> Result<DirectSolution, ModelError> {
        let (m, n) = costs.shape();
        check_len("supply", m, supply.len())?;
        check_len("demand", n, demand.len())?;
        check_costs("costs", costs.as_slice())?;
        check_quantities("supply", supply)?;
        check_quantities("demand", demand)?;

        let total_supply: f64 = supply.iter().sum();
        let total_demand: f64 = demand.iter().sum();
        self.check_balance(total_supply, total_demand)?;

        let arcs: Vec<Arc> = (0..m)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .filter(|&(i, j)| costs[(i, j)].is_finite())
            .map(|(i, j)| Arc {
                from: i,
                to: j,
                cost: costs[(i, j)],
                disallowed: false,
            })
            .collect();

        let mut lp = LinearProgram::new(arcs.len()).minimise(arcs.iter().map(|a| a.cost).collect());
        for (i, &s) in supply.iter().enumerate() {
            let entries = arcs.iter().enumerate().filter(|(_, a)| a.from == i).map(|(k, _)| (k, 1.0));
            lp.add_constraint(LinearConstraint::sparse(arcs.len(), entries, Relation::Equal, s));
        }
        for (j, &d) in demand.iter().enumerate() {
            let entries = arcs.iter().enumerate().filter(|(_, a)| a.to == j).map(|(k, _)| (k, 1.0));
            lp.add_constraint(LinearConstraint::sparse(
                arcs.len(),
                entries,
                Relation::LessEqual,
                d,
            ));
        }

        let solution = SimplexSolver::new(self.config.simplex).solve(&lp)?;
        let scale = scale_of(supply.iter().chain(demand));
        let (flows, total_cost, _) = self.collect_flows(&arcs, &solution.x, (m, n), scale);

        debug!(
            plants = m,
            sites = n,
            total_cost,
            pivots = solution.iterations,
            "direct transport solved"
        );

        let origins = (1..=m).map(|i| format!("Plant {}", i)).collect();
        let destinations = (1..=n).map(|j| format!("Site {}", j)).collect();
        Ok(DirectSolution {
            total_cost,
            flows: FlowSolution::bipartite(origins, destinations, flows, total_cost),
        })
    }

    /// Route plant supply through the network to disposal sites at minimum cost.
    ///
    /// Minimises `Σ cost · flow` over all arcs subject to
    /// `outflow − inflow = net supply` at every node and `flow ≥ 0`. The
    /// dummy node supplies `Σ capacity − Σ supply`, which keeps the system
    /// balanced. Disallowed arcs follow the configured [`ArcPolicy`].
    ///
    /// # Errors
    ///
    /// - `ModelError::IllConditionedInput` from [`TransshipmentNetwork::validate`],
    ///   or a sentinel cost that is not above `node_count · max_real_cost`
    /// - `ModelError::InfeasibleModel` if `Σ supply > Σ capacity` or some
    ///   node is cut off from every site
    pub fn solve_transshipment(
        &self,
        network: &TransshipmentNetwork,
    ) -> Result<TransshipmentSolution, ModelError> {
        network.validate()?;
        self.check_balance(network.total_supply(), network.total_capacity())?;

        let nodes = network.nodes();
        let n = nodes.len();
        let costs = network.cost_matrix();
        let sentinel = self.sentinel_cost(network)?;

        let mut arcs = Vec::new();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let c = costs[(i, j)];
                if c.is_finite() {
                    arcs.push(Arc {
                        from: i,
                        to: j,
                        cost: c,
                        disallowed: false,
                    });
                } else if let Some(s) = sentinel {
                    arcs.push(Arc {
                        from: i,
                        to: j,
                        cost: s,
                        disallowed: true,
                    });
                }
            }
        }

        let net_supply = network.net_supply();
        let mut lp = LinearProgram::new(arcs.len()).minimise(arcs.iter().map(|a| a.cost).collect());
        for (k, &b) in net_supply.iter().enumerate() {
            let entries = arcs.iter().enumerate().filter_map(|(idx, a)| {
                if a.from == k {
                    Some((idx, 1.0))
                } else if a.to == k {
                    Some((idx, -1.0))
                } else {
                    None
                }
            });
            lp.add_constraint(LinearConstraint::sparse(arcs.len(), entries, Relation::Equal, b));
        }

        debug!(nodes = n, arcs = arcs.len(), policy = ?self.config.arc_policy, "transshipment LP built");
        let solution = SimplexSolver::new(self.config.simplex).solve(&lp)?;
        let scale = scale_of(net_supply.iter());
        let (flows, total_cost, disallowed_flow) =
            self.collect_flows(&arcs, &solution.x, (n, n), scale);

        let dummy_cost: f64 = arcs
            .iter()
            .filter(|a| a.from == 0)
            .map(|a| a.cost * flows[(a.from, a.to)])
            .sum();

        debug!(
            nodes = n,
            total_cost,
            disallowed_flow,
            pivots = solution.iterations,
            "transshipment solved"
        );

        let names = nodes.iter().map(|node| node.name.clone()).collect();
        Ok(TransshipmentSolution {
            flows: FlowSolution::network(names, flows, net_supply, total_cost),
            nodes,
            dummy_cost,
            disallowed_flow,
        })
    }

    fn check_balance(&self, supply: f64, capacity: f64) -> Result<(), ModelError> {
        let tolerance = self.config.simplex.solver.tolerance * supply.max(capacity).max(1.0);
        if supply > capacity + tolerance {
            return Err(ModelError::infeasible(format!(
                "total supply {} exceeds total capacity {}",
                supply, capacity
            )));
        }
        Ok(())
    }

    /// Sentinel price under `ArcPolicy::Sentinel`, checked against the real costs.
    fn sentinel_cost(&self, network: &TransshipmentNetwork) -> Result<Option<f64>, ModelError> {
        match self.config.arc_policy {
            ArcPolicy::Exclude => Ok(None),
            ArcPolicy::Sentinel(cost) => {
                let floor = network.node_count() as f64 * network.max_real_cost();
                if !cost.is_finite() || cost <= floor {
                    return Err(ModelError::ill_conditioned(format!(
                        "sentinel cost {} must be finite and exceed {} (node count × largest real cost)",
                        cost, floor
                    )));
                }
                Ok(Some(cost))
            }
        }
    }

    /// Scatter LP columns back into a flow matrix, zeroing solver noise.
    ///
    /// Returns the flows, `Σ cost · flow` and the flow on disallowed arcs.
    fn collect_flows(
        &self,
        arcs: &[Arc],
        x: &[f64],
        shape: (usize, usize),
        scale: f64,
    ) -> (DenseMatrix<f64>, f64, f64) {
        let threshold = self.config.flow_tolerance * scale;
        let mut flows = DenseMatrix::zeros(shape.0, shape.1);
        let mut total_cost = 0.0;
        let mut disallowed_flow = 0.0;
        for (arc, &value) in arcs.iter().zip(x) {
            let value = if value <= threshold { 0.0 } else { value };
            flows[(arc.from, arc.to)] = value;
            total_cost += arc.cost * value;
            if arc.disallowed {
                disallowed_flow += value;
            }
        }
        (flows, total_cost, disallowed_flow)
    }
}

fn scale_of<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values.fold(1.0_f64, |acc, v| acc.max(v.abs()))
}
