//! Transshipment network description.
//!
//! A [`TransshipmentNetwork`] holds the plants, disposal sites and the cost
//! tables between them. It expands into the square node set
//! `{dummy, plants…, sites…}` used by the transshipment LP:
//!
//! | from \ to | dummy      | plants      | sites        |
//! |-----------|------------|-------------|--------------|
//! | dummy     | 0          | disallowed  | dummy costs  |
//! | plants    | disallowed | plant costs | direct costs |
//! | sites     | disallowed | disallowed  | site costs   |
//!
//! A non-finite table entry also marks a disallowed arc; the diagonal is
//! always zero.

use std::fmt;

use optim_core::math::DenseMatrix;

use crate::error::ModelError;

/// Name given to the balancing node.
pub const DUMMY_NODE: &str = "Dummy";

/// Role of a node in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Plant with waste to ship.
    Source,
    /// Plant with nothing to ship; relays flow only.
    Hub,
    /// Disposal site.
    Sink,
    /// Synthetic node absorbing the capacity surplus.
    Dummy,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Source => "source",
            NodeKind::Hub => "hub",
            NodeKind::Sink => "sink",
            NodeKind::Dummy => "dummy",
        };
        write!(f, "{}", name)
    }
}

/// A network node with its signed net supply.
///
/// Positive net supply ships out, negative absorbs, zero relays.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Node label.
    pub name: String,
    /// Node role.
    pub kind: NodeKind,
    /// Outflow minus inflow required at this node.
    pub net_supply: f64,
}

impl Node {
    /// Create a node.
    pub fn new(name: impl Into<String>, kind: NodeKind, net_supply: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            net_supply,
        }
    }

    /// Whether this is the balancing dummy node.
    pub fn is_dummy(&self) -> bool {
        self.kind == NodeKind::Dummy
    }
}

/// Plants, disposal sites and the cost tables connecting them.
///
/// Tables not supplied through the builder methods default to "every
/// off-diagonal arc disallowed", except the dummy costs which default to zero.
///
/// # Examples
///
/// ```
/// use optim_core::math::DenseMatrix;
/// use optim_models::transport::TransshipmentNetwork;
///
/// let direct = DenseMatrix::from_rows(vec![vec![4.0, 6.0], vec![5.0, 3.0]]).unwrap();
/// let network = TransshipmentNetwork::new(
///     vec!["P1".into(), "P2".into()],
///     vec!["S1".into(), "S2".into()],
///     vec![20.0, 30.0],
///     vec![25.0, 40.0],
/// )
/// .with_direct_costs(direct);
///
/// assert_eq!(network.node_count(), 5);
/// assert_eq!(network.net_supply()[0], 15.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransshipmentNetwork {
    plants: Vec<String>,
    sites: Vec<String>,
    supply: Vec<f64>,
    capacity: Vec<f64>,
    plant_costs: DenseMatrix<f64>,
    direct_costs: DenseMatrix<f64>,
    site_costs: DenseMatrix<f64>,
    dummy_costs: Vec<f64>,
}

impl TransshipmentNetwork {
    /// Create a network with every arc disallowed and zero dummy costs.
    pub fn new(
        plants: Vec<String>,
        sites: Vec<String>,
        supply: Vec<f64>,
        capacity: Vec<f64>,
    ) -> Self {
        let p = plants.len();
        let s = sites.len();
        Self {
            plant_costs: disallowed_square(p),
            direct_costs: DenseMatrix::filled(p, s, f64::INFINITY),
            site_costs: disallowed_square(s),
            dummy_costs: vec![0.0; s],
            plants,
            sites,
            supply,
            capacity,
        }
    }

    /// Set the plant → plant cost table (`plants × plants`).
    pub fn with_plant_costs(mut self, costs: DenseMatrix<f64>) -> Self {
        self.plant_costs = costs;
        self
    }

    /// Set the plant → site cost table (`plants × sites`).
    pub fn with_direct_costs(mut self, costs: DenseMatrix<f64>) -> Self {
        self.direct_costs = costs;
        self
    }

    /// Set the site → site cost table (`sites × sites`).
    pub fn with_site_costs(mut self, costs: DenseMatrix<f64>) -> Self {
        self.site_costs = costs;
        self
    }

    /// Set the dummy → site cost vector (`sites`).
    pub fn with_dummy_costs(mut self, costs: Vec<f64>) -> Self {
        self.dummy_costs = costs;
        self
    }

    /// Plant names.
    pub fn plants(&self) -> &[String] {
        &self.plants
    }

    /// Disposal site names.
    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    /// Plant supplies.
    pub fn supply(&self) -> &[f64] {
        &self.supply
    }

    /// Site capacities.
    pub fn capacity(&self) -> &[f64] {
        &self.capacity
    }

    /// Total plant supply.
    pub fn total_supply(&self) -> f64 {
        self.supply.iter().sum()
    }

    /// Total site capacity.
    pub fn total_capacity(&self) -> f64 {
        self.capacity.iter().sum()
    }

    /// Number of nodes including the dummy.
    pub fn node_count(&self) -> usize {
        1 + self.plants.len() + self.sites.len()
    }

    /// Net supply per node in node order: dummy, plants, sites.
    pub fn net_supply(&self) -> Vec<f64> {
        let mut b = Vec::with_capacity(self.node_count());
        b.push(self.total_capacity() - self.total_supply());
        b.extend_from_slice(&self.supply);
        b.extend(self.capacity.iter().map(|c| -c));
        b
    }

    /// Nodes in LP order: dummy, plants, sites.
    pub fn nodes(&self) -> Vec<Node> {
        let b = self.net_supply();
        let mut nodes = Vec::with_capacity(self.node_count());
        nodes.push(Node::new(DUMMY_NODE, NodeKind::Dummy, b[0]));
        for (i, name) in self.plants.iter().enumerate() {
            let kind = if self.supply[i] > 0.0 {
                NodeKind::Source
            } else {
                NodeKind::Hub
            };
            nodes.push(Node::new(name.clone(), kind, b[1 + i]));
        }
        let offset = 1 + self.plants.len();
        for (j, name) in self.sites.iter().enumerate() {
            nodes.push(Node::new(name.clone(), NodeKind::Sink, b[offset + j]));
        }
        nodes
    }

    /// Square node-to-node cost matrix; `f64::INFINITY` marks a disallowed arc.
    ///
    /// # Panics
    ///
    /// Panics if a cost table is smaller than the node lists; call
    /// [`validate`](Self::validate) first.
    pub fn cost_matrix(&self) -> DenseMatrix<f64> {
        let n = self.node_count();
        let p = self.plants.len();
        let s = self.sites.len();
        let site = |j: usize| 1 + p + j;

        let mut costs = disallowed_square(n);
        for j in 0..s {
            costs[(0, site(j))] = self.dummy_costs[j];
        }
        for i in 0..p {
            for j in 0..p {
                if i != j {
                    costs[(1 + i, 1 + j)] = self.plant_costs[(i, j)];
                }
            }
            for j in 0..s {
                costs[(1 + i, site(j))] = self.direct_costs[(i, j)];
            }
        }
        for i in 0..s {
            for j in 0..s {
                if i != j {
                    costs[(site(i), site(j))] = self.site_costs[(i, j)];
                }
            }
        }
        costs
    }

    /// Largest finite off-diagonal cost (zero when no arc is allowed).
    pub fn max_real_cost(&self) -> f64 {
        let costs = self.cost_matrix();
        let n = costs.rows();
        (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .filter(|&(i, j)| i != j)
            .map(|(i, j)| costs[(i, j)])
            .filter(|c| c.is_finite())
            .fold(0.0, f64::max)
    }

    /// Check names, table shapes, costs and quantities.
    ///
    /// # Errors
    ///
    /// `ModelError::IllConditionedInput` when:
    /// - there are no plants or no sites
    /// - a table or vector has the wrong size
    /// - a cost is negative or NaN
    /// - a supply or capacity is negative or not finite
    pub fn validate(&self) -> Result<(), ModelError> {
        let p = self.plants.len();
        let s = self.sites.len();
        if p == 0 || s == 0 {
            return Err(ModelError::ill_conditioned(
                "network needs at least one plant and one site",
            ));
        }
        check_len("supply", p, self.supply.len())?;
        check_len("capacity", s, self.capacity.len())?;
        check_len("dummy costs", s, self.dummy_costs.len())?;
        check_shape("plant costs", (p, p), self.plant_costs.shape())?;
        check_shape("direct costs", (p, s), self.direct_costs.shape())?;
        check_shape("site costs", (s, s), self.site_costs.shape())?;

        check_costs("plant costs", self.plant_costs.as_slice())?;
        check_costs("direct costs", self.direct_costs.as_slice())?;
        check_costs("site costs", self.site_costs.as_slice())?;
        check_costs("dummy costs", &self.dummy_costs)?;
        check_quantities("supply", &self.supply)?;
        check_quantities("capacity", &self.capacity)?;
        Ok(())
    }
}

fn disallowed_square(n: usize) -> DenseMatrix<f64> {
    let mut m = DenseMatrix::filled(n, n, f64::INFINITY);
    for i in 0..n {
        m[(i, i)] = 0.0;
    }
    m
}

pub(crate) fn check_len(what: &str, expected: usize, found: usize) -> Result<(), ModelError> {
    if expected != found {
        return Err(ModelError::ill_conditioned(format!(
            "{} has length {}, expected {}",
            what, found, expected
        )));
    }
    Ok(())
}

pub(crate) fn check_shape(
    what: &str,
    expected: (usize, usize),
    found: (usize, usize),
) -> Result<(), ModelError> {
    if expected != found {
        return Err(ModelError::ill_conditioned(format!(
            "{} is {}x{}, expected {}x{}",
            what, found.0, found.1, expected.0, expected.1
        )));
    }
    Ok(())
}

/// Costs must be nonnegative; `+∞` marks a disallowed arc.
pub(crate) fn check_costs(what: &str, costs: &[f64]) -> Result<(), ModelError> {
    if let Some(c) = costs.iter().find(|c| c.is_nan() || **c < 0.0) {
        return Err(ModelError::ill_conditioned(format!(
            "{} contain invalid cost {}",
            what, c
        )));
    }
    Ok(())
}

pub(crate) fn check_quantities(what: &str, values: &[f64]) -> Result<(), ModelError> {
    if let Some(v) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(ModelError::ill_conditioned(format!(
            "{} contains invalid quantity {}",
            what, v
        )));
    }
    Ok(())
}
