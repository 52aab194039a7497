//! Integration tests for the LP and QP solvers.
//!
//! These tests exercise the public solver API end to end: problem
//! construction, both simplex phases, the active-set iteration and the
//! error paths a caller can observe.

use approx::assert_relative_eq;
use optim_core::math::solvers::{
    ActiveSetConfig, ActiveSetSolver, LinearConstraint, LinearProgram, QuadraticProgram, Relation,
    SimplexConfig, SimplexSolver, SolverConfig,
};
use optim_core::math::DenseMatrix;
use optim_core::types::SolverError;
use proptest::prelude::*;

// ============================================================================
// Simplex Tests
// ============================================================================

/// Test a small balanced transportation problem solved as a plain LP.
#[test]
fn test_balanced_transport_lp() {
    // Two plants (supply 20, 30), two sites (demand 25, 25)
    let costs = [4.0, 6.0, 5.0, 3.0];
    let lp = LinearProgram::new(4)
        .minimise(costs.to_vec())
        .subject_to(LinearConstraint::eq(vec![1.0, 1.0, 0.0, 0.0], 20.0))
        .subject_to(LinearConstraint::eq(vec![0.0, 0.0, 1.0, 1.0], 30.0))
        .subject_to(LinearConstraint::eq(vec![1.0, 0.0, 1.0, 0.0], 25.0))
        .subject_to(LinearConstraint::eq(vec![0.0, 1.0, 0.0, 1.0], 25.0));

    let solution = SimplexSolver::with_defaults().solve(&lp).unwrap();

    // Plant 0 serves site 0 fully, plant 1 covers the rest
    assert_relative_eq!(solution.objective, 20.0 * 4.0 + 5.0 * 5.0 + 25.0 * 3.0, epsilon = 1e-9);
    assert!(lp.max_violation(&solution.x) < 1e-9);
}

/// Test that Bland-only pricing reaches the same optimum as Dantzig pricing.
#[test]
fn test_pricing_rules_agree() {
    let lp = LinearProgram::new(3)
        .minimise(vec![-2.0, -3.0, -4.0])
        .subject_to(LinearConstraint::le(vec![3.0, 2.0, 1.0], 10.0))
        .subject_to(LinearConstraint::le(vec![2.0, 5.0, 3.0], 15.0));

    let dantzig = SimplexSolver::with_defaults().solve(&lp).unwrap();
    let bland = SimplexSolver::new(SimplexConfig::default().with_bland_after(0))
        .solve(&lp)
        .unwrap();

    assert_relative_eq!(dantzig.objective, bland.objective, epsilon = 1e-9);
    assert_relative_eq!(dantzig.objective, -20.0, epsilon = 1e-9);
}

/// Test that an infeasible LP reports a positive phase-one residual.
#[test]
fn test_infeasible_residual_reported() {
    let lp = LinearProgram::new(2)
        .minimise(vec![1.0, 1.0])
        .subject_to(LinearConstraint::le(vec![1.0, 1.0], 1.0))
        .subject_to(LinearConstraint::ge(vec![1.0, 1.0], 3.0));

    match SimplexSolver::with_defaults().solve(&lp) {
        Err(SolverError::Infeasible { residual }) => assert_relative_eq!(residual, 2.0, epsilon = 1e-9),
        other => panic!("expected infeasible, got {:?}", other),
    }
}

// ============================================================================
// Active-Set Tests
// ============================================================================

/// Test a two-asset minimum-variance problem with a binding return floor.
#[test]
fn test_two_asset_minimum_variance() {
    let hessian = DenseMatrix::from_diagonal(&[0.08, 0.18]);
    let qp = QuadraticProgram::new(hessian, vec![0.0, 0.0])
        .subject_to(LinearConstraint::eq(vec![1.0, 1.0], 1.0))
        .subject_to(LinearConstraint::ge(vec![0.05, 0.10], 0.08))
        .subject_to(LinearConstraint::ge(vec![1.0, 0.0], 0.0))
        .subject_to(LinearConstraint::ge(vec![0.0, 1.0], 0.0));

    let solution = ActiveSetSolver::with_defaults().solve(&qp).unwrap();

    assert_relative_eq!(solution.x[0], 0.4, epsilon = 1e-8);
    assert_relative_eq!(solution.x[1], 0.6, epsilon = 1e-8);
    assert_eq!(solution.active_set, vec![1]);
    // Variance wᵀΣw = ½ wᵀ(2Σ)w
    assert_relative_eq!(solution.objective.sqrt(), 0.19697715603592206, epsilon = 1e-8);
}

/// Test that the high-precision preset solves the same problem.
#[test]
fn test_high_precision_preset() {
    let qp = QuadraticProgram::new(DenseMatrix::identity(3).scaled(2.0), vec![0.0, 0.0, 0.0])
        .subject_to(LinearConstraint::eq(vec![1.0, 1.0, 1.0], 3.0));
    let config = ActiveSetConfig::new(SolverConfig::high_precision());

    let solution = ActiveSetSolver::new(config).solve(&qp).unwrap();
    for xi in &solution.x {
        assert_relative_eq!(*xi, 1.0, epsilon = 1e-10);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

/// Cheapest-first fill of `Σx >= demand` under `0 <= x <= capacity`.
fn greedy_cover(costs: &[f64], capacity: &[f64], demand: f64) -> f64 {
    let mut order: Vec<usize> = (0..costs.len()).collect();
    order.sort_by(|&a, &b| costs[a].total_cmp(&costs[b]));
    let mut remaining = demand;
    let mut total = 0.0;
    for i in order {
        let take = remaining.min(capacity[i]);
        total += take * costs[i];
        remaining -= take;
    }
    total
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Covering LPs with positive costs match the greedy optimum.
    #[test]
    fn prop_covering_lp_matches_greedy(
        entries in prop::collection::vec((1.0f64..20.0, 1.0f64..10.0), 1..8),
        fill in 0.0f64..1.0,
    ) {
        let (costs, capacity): (Vec<f64>, Vec<f64>) = entries.into_iter().unzip();
        let n = costs.len();
        let demand = fill * capacity.iter().sum::<f64>();

        let mut lp = LinearProgram::new(n)
            .minimise(costs.clone())
            .subject_to(LinearConstraint::ge(vec![1.0; n], demand));
        for (i, &cap) in capacity.iter().enumerate() {
            lp.add_constraint(LinearConstraint::sparse(n, [(i, 1.0)], Relation::LessEqual, cap));
        }

        let solution = SimplexSolver::with_defaults().solve(&lp).unwrap();
        let expected = greedy_cover(&costs, &capacity, demand);

        prop_assert!((solution.objective - expected).abs() < 1e-7 * expected.max(1.0));
        prop_assert!(lp.max_violation(&solution.x) < 1e-7);
    }

    /// Simplex-constrained QPs beat every vertex and the uniform point.
    #[test]
    fn prop_qp_on_simplex_is_optimal(
        factors in prop::collection::vec(-1.0f64..1.0, 9),
        linear in prop::collection::vec(-1.0f64..1.0, 3),
    ) {
        // Q = BᵀB + I is positive definite
        let b = DenseMatrix::from_row_major(3, 3, factors).unwrap();
        let bt = b.transpose();
        let mut q = DenseMatrix::identity(3);
        for i in 0..3 {
            for j in 0..3 {
                let col_j = b.column(j);
                q[(i, j)] += bt.row(i).iter().zip(&col_j).map(|(x, y)| x * y).sum::<f64>();
            }
        }

        let mut qp = QuadraticProgram::new(q, linear)
            .subject_to(LinearConstraint::eq(vec![1.0; 3], 1.0));
        for i in 0..3 {
            let mut row = vec![0.0; 3];
            row[i] = 1.0;
            qp.add_constraint(LinearConstraint::ge(row, 0.0));
        }

        let solution = ActiveSetSolver::with_defaults().solve(&qp).unwrap();
        prop_assert!(qp.max_violation(&solution.x) < 1e-8);

        let mut candidates = vec![vec![1.0 / 3.0; 3]];
        for i in 0..3 {
            let mut vertex = vec![0.0; 3];
            vertex[i] = 1.0;
            candidates.push(vertex);
        }
        for candidate in candidates {
            prop_assert!(solution.objective <= qp.objective_value(&candidate) + 1e-8);
        }
    }
}
