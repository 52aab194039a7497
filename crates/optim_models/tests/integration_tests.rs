//! Integration tests for the transport and frontier models.
//!
//! These tests drive the public model API end to end on the waste-disposal
//! network and a four-asset universe, and check the structural invariants
//! of both models with property-based tests.

use approx::assert_relative_eq;
use optim_core::math::DenseMatrix;
use optim_models::frontier::{
    global_minimum_variance, min_variance_at_return, return_targets, trace_frontier,
    AssetUniverse, FrontierSolver,
};
use optim_models::transport::{
    solve_direct, solve_transshipment, ArcPolicy, NodeKind, TransportConfig, TransportSolver,
    TransshipmentNetwork,
};
use optim_models::ModelError;
use proptest::prelude::*;

const INF: f64 = f64::INFINITY;

fn plant_supply() -> Vec<f64> {
    vec![45.0, 26.0, 42.0, 53.0, 29.0, 38.0]
}

fn site_capacity() -> Vec<f64> {
    vec![65.0, 80.0, 105.0]
}

fn direct_costs() -> DenseMatrix<f64> {
    DenseMatrix::from_rows(vec![
        vec![13.0, 16.0, 18.0],
        vec![11.0, 13.0, 16.0],
        vec![19.0, 14.0, 13.0],
        vec![8.0, 19.0, 13.0],
        vec![18.0, 13.0, 20.0],
        vec![15.0, 16.0, 13.0],
    ])
    .unwrap()
}

fn disposal_network() -> TransshipmentNetwork {
    let plants = (1..=6).map(|i| format!("Plant {}", i)).collect();
    let sites = vec!["Site A".to_string(), "Site B".to_string(), "Site C".to_string()];
    TransshipmentNetwork::new(plants, sites, plant_supply(), site_capacity())
        .with_plant_costs(
            DenseMatrix::from_rows(vec![
                vec![0.0, 3.0, INF, 5.0, INF, 4.0],
                vec![3.0, 0.0, 2.0, INF, 4.0, INF],
                vec![INF, 2.0, 0.0, INF, INF, 6.0],
                vec![5.0, INF, INF, 0.0, 3.0, INF],
                vec![INF, 4.0, INF, 3.0, 0.0, 2.0],
                vec![4.0, INF, 6.0, INF, 2.0, 0.0],
            ])
            .unwrap(),
        )
        .with_direct_costs(direct_costs())
        .with_site_costs(
            DenseMatrix::from_rows(vec![
                vec![0.0, 4.0, 7.0],
                vec![4.0, 0.0, 3.0],
                vec![7.0, 3.0, 0.0],
            ])
            .unwrap(),
        )
        .with_dummy_costs(vec![0.0, 0.0, 0.0])
}

fn four_assets() -> AssetUniverse {
    AssetUniverse::from_returns(
        vec![0.08, 0.12, 0.15, 0.06],
        DenseMatrix::from_rows(vec![
            vec![0.040, 0.006, 0.010, 0.002],
            vec![0.006, 0.090, 0.018, 0.004],
            vec![0.010, 0.018, 0.160, 0.003],
            vec![0.002, 0.004, 0.003, 0.020],
        ])
        .unwrap(),
    )
    .unwrap()
}

// ============================================================================
// Direct Transport Tests
// ============================================================================

/// Test the reference waste-disposal case reaches the known optimum.
#[test]
fn test_reference_direct_case() {
    let solution = solve_direct(&direct_costs(), &plant_supply(), &site_capacity()).unwrap();

    assert_relative_eq!(solution.total_cost, 2879.0, epsilon = 1e-6);

    let flows = &solution.flows;
    assert!(flows.flows().as_slice().iter().all(|&f| f >= 0.0));
    for (shipped, supply) in flows.row_totals().iter().zip(plant_supply()) {
        assert_relative_eq!(*shipped, supply, epsilon = 1e-6);
    }
    for (received, capacity) in flows.column_totals().iter().zip(site_capacity()) {
        assert!(*received <= capacity + 1e-6);
    }

    // Reported cost is Σ cost · flow
    let costs = direct_costs();
    let recomputed: f64 = (0..6)
        .flat_map(|i| (0..3).map(move |j| (i, j)))
        .map(|(i, j)| costs[(i, j)] * flows.flows()[(i, j)])
        .sum();
    assert_relative_eq!(recomputed, solution.total_cost, epsilon = 1e-6);
}

/// Test that relabelling keeps the flows addressable by facility name.
#[test]
fn test_direct_relabel() {
    let solution = solve_direct(&direct_costs(), &plant_supply(), &site_capacity()).unwrap();
    let plants: Vec<String> = (1..=6).map(|i| format!("P{}", i)).collect();
    let sites = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    let flows = solution.flows.relabel(plants, sites).unwrap();

    let from_p4: f64 = ["A", "B", "C"]
        .iter()
        .map(|site| flows.flow_between("P4", site).unwrap())
        .sum();
    assert_relative_eq!(from_p4, 53.0, epsilon = 1e-6);
    assert!(flows.flow_between("P7", "A").is_none());
    assert!(flows.routes().all(|(_, _, f)| f > 0.0));
}

/// Test that oversupply is reported as an infeasible model.
#[test]
fn test_direct_oversupply() {
    let err = solve_direct(&direct_costs(), &plant_supply(), &[65.0, 80.0, 80.0]).unwrap_err();
    assert!(matches!(err, ModelError::InfeasibleModel(_)));
}

// ============================================================================
// Transshipment Tests
// ============================================================================

/// Test the reference network under the default exclusion policy.
#[test]
fn test_reference_transshipment() {
    let network = disposal_network();
    let solution = solve_transshipment(&network).unwrap();

    assert_relative_eq!(solution.total_cost(), 2871.0, epsilon = 1e-6);
    assert_relative_eq!(solution.dummy_flow(), 17.0, epsilon = 1e-6);
    assert_relative_eq!(solution.real_cost(), 2871.0, epsilon = 1e-6);
    assert!(!solution.uses_disallowed_arcs());

    let residual = solution.flows().max_conservation_residual().unwrap();
    assert!(residual < 1e-6, "conservation residual {}", residual);

    let nodes = solution.nodes();
    assert_eq!(nodes.len(), 10);
    assert_eq!(nodes[0].kind, NodeKind::Dummy);
    assert_eq!(nodes[9].name, "Site C");
}

/// Test that transshipment is never worse than shipping directly.
#[test]
fn test_transshipment_not_worse_than_direct() {
    let direct = solve_direct(&direct_costs(), &plant_supply(), &site_capacity()).unwrap();
    let network = solve_transshipment(&disposal_network()).unwrap();
    assert!(network.real_cost() <= direct.total_cost + 1e-6);
}

/// Test that a calibrated sentinel reproduces the exclusion optimum.
#[test]
fn test_sentinel_policy_matches_exclusion() {
    let solver =
        TransportSolver::new(TransportConfig::default().with_arc_policy(ArcPolicy::Sentinel(1e6)));
    let solution = solver.solve_transshipment(&disposal_network()).unwrap();

    assert_relative_eq!(solution.total_cost(), 2871.0, epsilon = 1e-6);
    assert!(!solution.uses_disallowed_arcs());
    assert!(solution.flows().max_conservation_residual().unwrap() < 1e-6);
}

/// Test that an uncalibrated sentinel is rejected before solving.
#[test]
fn test_sentinel_below_calibration_floor() {
    // 10 nodes × largest real cost 20 = 200
    let solver =
        TransportSolver::new(TransportConfig::default().with_arc_policy(ArcPolicy::Sentinel(150.0)));
    let err = solver.solve_transshipment(&disposal_network()).unwrap_err();
    assert!(err.is_ill_conditioned());
}

/// Test the dummy-free view keeps every real site balanced.
#[test]
fn test_without_dummy_view() {
    let solution = solve_transshipment(&disposal_network()).unwrap();
    let reduced = solution.without_dummy();

    assert_eq!(reduced.origins().len(), 9);
    assert!(!reduced.origins().iter().any(|o| o == "Dummy"));
    assert!(reduced.max_conservation_residual().unwrap() < 1e-6);
    // Sites receive exactly the real supply
    let absorbed: f64 = reduced.net_supply().unwrap()[6..].iter().map(|b| -b).sum();
    assert_relative_eq!(absorbed, 233.0, epsilon = 1e-6);
}

/// Test that oversupply is infeasible for the network model too.
#[test]
fn test_transshipment_oversupply() {
    let network = TransshipmentNetwork::new(
        vec!["P".to_string()],
        vec!["S".to_string()],
        vec![100.0],
        vec![50.0],
    )
    .with_direct_costs(DenseMatrix::filled(1, 1, 1.0));
    assert!(solve_transshipment(&network).unwrap_err().is_infeasible());
}

/// Test that repeated solves are identical.
#[test]
fn test_transport_determinism() {
    let first = solve_transshipment(&disposal_network()).unwrap();
    let second = solve_transshipment(&disposal_network()).unwrap();
    assert_eq!(first, second);

    let a = solve_direct(&direct_costs(), &plant_supply(), &site_capacity()).unwrap();
    let b = solve_direct(&direct_costs(), &plant_supply(), &site_capacity()).unwrap();
    assert_eq!(a, b);
}

// ============================================================================
// Frontier Tests
// ============================================================================

/// Test the global minimum-variance portfolio of the four-asset universe.
#[test]
fn test_global_minimum_variance() {
    let universe = four_assets();
    let gmv = global_minimum_variance(&universe).unwrap();

    assert_relative_eq!(gmv.risk, 0.11384496779510213, epsilon = 1e-7);
    assert_relative_eq!(gmv.expected_return, 0.07470005563069938, epsilon = 1e-7);
    assert_relative_eq!(gmv.total_weight(), 1.0, epsilon = 1e-9);
}

/// Test binding return floors against independently computed optima.
#[test]
fn test_binding_floors() {
    let universe = four_assets();

    let p = min_variance_at_return(&universe, 0.11).unwrap();
    assert_relative_eq!(p.risk, 0.17797264330153584, epsilon = 1e-7);
    assert_relative_eq!(p.expected_return, 0.11, epsilon = 1e-8);

    let p = min_variance_at_return(&universe, 0.12).unwrap();
    assert_relative_eq!(p.risk, 0.20925496091796644, epsilon = 1e-7);
    assert!(p.weights[3] < 1e-8);
}

/// Test the portfolio invariants at the boundary floors.
#[test]
fn test_boundary_floors() {
    let universe = four_assets();

    let top = min_variance_at_return(&universe, 0.15).unwrap();
    assert_relative_eq!(top.weights[2], 1.0, epsilon = 1e-9);
    assert_relative_eq!(top.risk, 0.4, epsilon = 1e-9);

    let err = min_variance_at_return(&universe, 0.1500001).unwrap_err();
    assert!(err.is_infeasible());
}

/// Test the frontier sweep is ordered, monotone and records failures.
#[test]
fn test_frontier_sweep() {
    let universe = four_assets();
    let targets = return_targets(0.06, 0.165, 15);
    let frontier = trace_frontier(&universe, &targets);

    assert_eq!(frontier.len(), 15);
    for (sample, target) in frontier.samples().iter().zip(&targets) {
        assert_eq!(sample.target, *target);
    }
    assert!(frontier.is_monotone(1e-9));

    // 0.1575 and 0.165 lie above the best single asset
    let failures: Vec<f64> = frontier.failures().map(|(t, _)| t).collect();
    assert_eq!(failures.len(), 2);
    assert!(failures.iter().all(|&t| t > 0.15));

    for point in frontier.points() {
        assert!(point.achieved_return >= point.target - 1e-6);
    }
}

/// Test the lazy sweep matches the eager one exactly.
#[test]
fn test_frontier_iter_matches_trace() {
    let universe = four_assets();
    let targets = return_targets(0.06, 0.15, 10);
    let solver = FrontierSolver::with_defaults();

    let eager = solver.trace_frontier(&universe, &targets);
    let lazy: Vec<_> = solver.frontier_iter(&universe, &targets).collect();
    assert_eq!(eager.samples(), &lazy[..]);
}

/// Test that an invalid covariance never reaches the solver.
#[test]
fn test_ill_conditioned_universe() {
    let err = AssetUniverse::from_returns(
        vec![0.1, 0.2, 0.3],
        DenseMatrix::from_rows(vec![
            vec![1.0, 0.9, 0.9],
            vec![0.9, 1.0, -0.9],
            vec![0.9, -0.9, 1.0],
        ])
        .unwrap(),
    )
    .unwrap_err();
    assert!(err.is_ill_conditioned());
}

// ============================================================================
// Property-Based Tests
// ============================================================================

prop_compose! {
    /// Random direct problem with total supply below total demand.
    fn direct_problem()(m in 1usize..5, n in 1usize..5)(
        costs in prop::collection::vec(0.0f64..50.0, m * n),
        supply in prop::collection::vec(0.0f64..40.0, m),
        demand in prop::collection::vec(1.0f64..40.0, n),
        m in Just(m),
        n in Just(n),
    ) -> (DenseMatrix<f64>, Vec<f64>, Vec<f64>) {
        let total_demand: f64 = demand.iter().sum();
        let total_supply: f64 = supply.iter().sum();
        let scale = if total_supply > total_demand { total_demand / total_supply } else { 1.0 };
        let supply = supply.iter().map(|s| s * scale * 0.999).collect();
        (DenseMatrix::from_row_major(m, n, costs).unwrap(), supply, demand)
    }
}

prop_compose! {
    /// Random fully connected network with spare site capacity.
    fn network_problem()(p in 1usize..4, s in 1usize..4)(
        plant_costs in prop::collection::vec(1.0f64..20.0, p * p),
        direct in prop::collection::vec(1.0f64..30.0, p * s),
        site_costs in prop::collection::vec(1.0f64..20.0, s * s),
        supply in prop::collection::vec(0.0f64..30.0, p),
        capacity in prop::collection::vec(10.0f64..40.0, s),
        p in Just(p),
        s in Just(s),
    ) -> TransshipmentNetwork {
        let total_capacity: f64 = capacity.iter().sum();
        let total_supply: f64 = supply.iter().sum();
        let scale = if total_supply > total_capacity { total_capacity / total_supply } else { 1.0 };
        let mut plant_costs = DenseMatrix::from_row_major(p, p, plant_costs).unwrap();
        let mut site_costs = DenseMatrix::from_row_major(s, s, site_costs).unwrap();
        for i in 0..p { plant_costs[(i, i)] = 0.0; }
        for i in 0..s { site_costs[(i, i)] = 0.0; }
        TransshipmentNetwork::new(
            (0..p).map(|i| format!("P{}", i)).collect(),
            (0..s).map(|i| format!("S{}", i)).collect(),
            supply.iter().map(|v| v * scale * 0.999).collect(),
            capacity,
        )
        .with_plant_costs(plant_costs)
        .with_direct_costs(DenseMatrix::from_row_major(p, s, direct).unwrap())
        .with_site_costs(site_costs)
    }
}

prop_compose! {
    /// Random universe with covariance BᵀB + εI.
    fn universe()(k in 1usize..6)(
        returns in prop::collection::vec(-0.05f64..0.2, k),
        factors in prop::collection::vec(-0.3f64..0.3, k * k),
        k in Just(k),
    ) -> AssetUniverse {
        let b = DenseMatrix::from_row_major(k, k, factors).unwrap();
        let mut cov = DenseMatrix::identity(k).scaled(1e-4);
        for i in 0..k {
            for j in 0..k {
                cov[(i, j)] += (0..k).map(|r| b[(r, i)] * b[(r, j)]).sum::<f64>();
            }
        }
        AssetUniverse::from_returns(returns, cov).unwrap()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Direct flows are nonnegative, ship all supply and respect capacities.
    #[test]
    fn prop_direct_flow_invariants((costs, supply, demand) in direct_problem()) {
        let solution = solve_direct(&costs, &supply, &demand).unwrap();
        let flows = &solution.flows;

        prop_assert!(flows.flows().as_slice().iter().all(|&f| f >= 0.0));
        for (shipped, s) in flows.row_totals().iter().zip(&supply) {
            prop_assert!((shipped - s).abs() < 1e-6);
        }
        for (received, d) in flows.column_totals().iter().zip(&demand) {
            prop_assert!(*received <= d + 1e-6);
        }
        let recomputed: f64 = costs
            .as_slice()
            .iter()
            .zip(flows.flows().as_slice())
            .map(|(c, f)| c * f)
            .sum();
        prop_assert!((recomputed - solution.total_cost).abs() < 1e-6 * recomputed.max(1.0));
    }

    /// Transshipment flows conserve at every node; the dummy ships the spare capacity.
    #[test]
    fn prop_transshipment_conservation(network in network_problem()) {
        let solution = solve_transshipment(&network).unwrap();
        let residual = solution.flows().max_conservation_residual().unwrap();
        prop_assert!(residual < 1e-6);

        let spare = (network.total_capacity() - network.total_supply()).max(0.0);
        prop_assert!((solution.dummy_flow() - spare).abs() < 1e-6);
    }

    /// Portfolios are fully invested, long-only and meet the floor.
    #[test]
    fn prop_portfolio_invariants(universe in universe(), fraction in 0.0f64..=1.0) {
        let floor = universe.min_return() + fraction * (universe.max_return() - universe.min_return());
        let p = min_variance_at_return(&universe, floor).unwrap();

        prop_assert!((p.total_weight() - 1.0).abs() < 1e-6);
        prop_assert!(p.min_weight() >= -1e-6);
        prop_assert!(p.expected_return >= floor - 1e-6);
    }

    /// Risk is non-decreasing along any increasing sweep.
    #[test]
    fn prop_frontier_monotone(universe in universe()) {
        let targets = return_targets(universe.min_return(), universe.max_return(), 8);
        let frontier = trace_frontier(&universe, &targets);
        prop_assert_eq!(frontier.failures().count(), 0);
        prop_assert!(frontier.is_monotone(1e-7));
    }
}
