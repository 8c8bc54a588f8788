//! Scenarios (5) and (6): construction-time validation never returns a
//! partially-built solver object.

use altro::constraint::ConstraintSet;
use altro::cost::LqrCost;
use altro::model::double_integrator::DoubleIntegrator;
use altro::model::IntegratorRule;
use altro::options::SolverOptions;
use altro::problem::Problem;
use altro::solver::Solver;
use altro::AltroError;
use nalgebra::{DMatrix, DVector};
use std::str::FromStr;

#[test]
fn bad_integrator_name_is_invalid_input() {
    let err = IntegratorRule::from_str("euler-explicit").unwrap_err();
    assert!(matches!(err, AltroError::InvalidInput(_)));
}

#[test]
fn mismatched_initial_state_dimension_is_invalid_input() {
    let model = DoubleIntegrator::new(1);
    let cost = LqrCost::new(
        DMatrix::identity(2, 2),
        DMatrix::identity(1, 1),
        DMatrix::identity(2, 2),
        DVector::from_vec(vec![1.0, 0.0]),
    );
    let err = Problem::new(
        model,
        cost,
        ConstraintSet::new(),
        IntegratorRule::Rk4,
        10,
        0.1,
        DVector::zeros(3),
    )
    .unwrap_err();
    assert!(matches!(err, AltroError::InvalidInput(_)));
}

#[test]
fn invalid_solver_options_reject_construction_before_any_solve() {
    let model = DoubleIntegrator::new(1);
    let cost = LqrCost::new(
        DMatrix::identity(2, 2),
        DMatrix::identity(1, 1),
        DMatrix::identity(2, 2),
        DVector::from_vec(vec![1.0, 0.0]),
    );
    let problem =
        Problem::new(model, cost, ConstraintSet::new(), IntegratorRule::Rk4, 10, 0.1, DVector::zeros(2)).unwrap();

    let mut opts = SolverOptions::default();
    opts.square_root = true;
    let err = Solver::new(problem, opts).unwrap_err();
    assert!(matches!(err, AltroError::InvalidInput(_)));
}

#[test]
fn control_guess_with_wrong_step_count_is_invalid_input() {
    let model = DoubleIntegrator::new(1);
    let cost = LqrCost::new(
        DMatrix::identity(2, 2),
        DMatrix::identity(1, 1),
        DMatrix::identity(2, 2),
        DVector::from_vec(vec![1.0, 0.0]),
    );
    let problem =
        Problem::new(model, cost, ConstraintSet::new(), IntegratorRule::Rk4, 10, 0.1, DVector::zeros(2)).unwrap();
    let solver = Solver::new(problem, SolverOptions::default()).unwrap();

    let x_guess = vec![DVector::zeros(2); 10];
    let u_guess = vec![DVector::zeros(1); 10]; // should be 9 (n_knots - 1)
    let cancel = altro::solver::CancelToken::new();
    let mut observer = altro::solver::NullObserver;

    let err = solver.solve(x_guess, u_guess, &cancel, &mut observer).unwrap_err();
    assert!(matches!(err, AltroError::InvalidInput(_)));
}
