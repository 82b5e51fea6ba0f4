use crate::lagrange_space;
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use mms_convergence::exact::ExactSolution;
use mms_convergence::expr::Expr;
use mms_convergence::oracle::{LinearSolver, SolutionPair, SolverConfig, SolverOracle};
use mms_convergence::poisson::{assemble_linear_system, PoissonMmsOracle};
use mms_convergence::quadrature::TriangleQuadrature;
use mms_convergence::space::FunctionSpace;
use nalgebra::DMatrix;

#[test]
fn exact_solution_keeps_its_representation() {
    let symbolic = PoissonMmsOracle::new(Expr::x() * Expr::y());
    match symbolic.exact_solution() {
        ExactSolution::Symbolic(expr) => assert_eq!(expr, &(Expr::x() * Expr::y())),
        other => panic!("expected a symbolic solution, got {:?}", other),
    }

    let plain = PoissonMmsOracle::from_functions(|x: &[f64]| x[0], |_: &[f64]| 0.0);
    assert!(matches!(plain.exact_solution(), ExactSolution::Function(_)));
}

#[test]
fn zero_resolution_is_an_error() {
    let oracle = PoissonMmsOracle::new(Expr::x());
    assert!(oracle.solve(0, 1, &SolverConfig::default()).is_err());
}

#[test]
fn unsupported_degree_is_an_error() {
    let oracle = PoissonMmsOracle::new(Expr::x());
    assert!(oracle.solve(4, 0, &SolverConfig::default()).is_err());
}

#[test]
fn assembled_matrix_is_symmetric() {
    let space = lagrange_space(3, 2);
    let quadrature = TriangleQuadrature::with_strength(4);
    let boundary_values = space.interpolate(&|x: &[f64]| x[0] + x[1]);
    let (matrix, rhs) = assemble_linear_system(&space, &quadrature, &|_: &[f64]| 1.0, &boundary_values).unwrap();
    assert_eq!(rhs.len(), space.num_dofs());

    let dense = DMatrix::from(&matrix);
    assert_matrix_eq!(dense, dense.transpose(), comp = abs, tol = 1e-13);
}

#[test]
fn assembly_checks_boundary_value_count() {
    let space = lagrange_space(2, 1);
    let quadrature = TriangleQuadrature::with_strength(2);
    let boundary_values = lagrange_space(3, 1).interpolate(&|_: &[f64]| 0.0);
    assert!(assemble_linear_system(&space, &quadrature, &|_: &[f64]| 1.0, &boundary_values).is_err());
}

#[test]
fn quadratic_solution_is_reproduced_by_quadratic_elements() {
    // u = x^2 + y^2 lies in the P2 space, so the Galerkin solution is exact
    let u = Expr::x().powi(2) + Expr::y().powi(2);
    let oracle = PoissonMmsOracle::new(u.clone());
    let SolutionPair { approx, exact } = oracle.solve(3, 2, &SolverConfig::default()).unwrap();
    assert!(matches!(exact, ExactSolution::Symbolic(_)));

    let expected = approx.space().interpolate(&|x: &[f64]| u.evaluate(x));
    assert_matrix_eq!(approx.coefficients().clone(), expected, comp = abs, tol = 1e-11);
}

#[test]
fn linear_solvers_agree() {
    let u = (3.0 * Expr::x()).sin() * Expr::y().exp();
    let oracle = PoissonMmsOracle::new(u);
    let cholesky = oracle.solve(5, 2, &SolverConfig::default()).unwrap();
    let lu_config = SolverConfig {
        linear_solver: LinearSolver::DenseLu,
        ..SolverConfig::default()
    };
    let lu = oracle.solve(5, 2, &lu_config).unwrap();
    assert_matrix_eq!(
        cholesky.approx.coefficients().clone(),
        lu.approx.coefficients().clone(),
        comp = abs,
        tol = 1e-10
    );
}

#[test]
fn function_oracle_returns_plain_function() {
    let oracle = PoissonMmsOracle::from_functions(|x: &[f64]| x[0] * (1.0 - x[0]), |_: &[f64]| 2.0);
    let SolutionPair { approx, exact } = oracle.solve(4, 2, &SolverConfig::default()).unwrap();
    assert!(matches!(exact, ExactSolution::Function(_)));

    // Value at the center node (2, 2) of the 9 x 9 node grid
    let center = 4 * approx.space().nodes_per_dim() + 4;
    assert_scalar_eq!(approx.coefficients()[center], 0.25, comp = abs, tol = 1e-12);
}

#[test]
fn solver_config_deserializes_with_defaults() {
    let config: SolverConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, SolverConfig::default());
    let json = r#"{ "linear_solver": "dense_lu", "quadrature_strength": 9 }"#;
    let config: SolverConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.linear_solver, LinearSolver::DenseLu);
    assert_eq!(config.quadrature_strength, Some(9));
}

#[test]
fn oracles_can_be_used_by_reference() {
    fn solve_with<O: SolverOracle>(oracle: O) -> usize {
        oracle
            .solve(2, 1, &SolverConfig::default())
            .unwrap()
            .approx
            .space()
            .num_dofs()
    }
    let oracle = PoissonMmsOracle::new(Expr::x());
    assert_eq!(solve_with(&oracle), 9);
}
