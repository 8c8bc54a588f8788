//! End-to-end scenarios (1), (2), (4) from the solver's testable-properties
//! list: unconstrained swing-up, control-bounded swing-up, and a terminal
//! goal constraint driven to tight satisfaction by the AL multipliers.

use altro::constraint::{BoundConstraint, ConstraintSet, GoalConstraint};
use altro::cost::LqrCost;
use altro::model::pendulum::Pendulum;
use altro::model::IntegratorRule;
use altro::options::SolverOptions;
use altro::problem::Problem;
use altro::solver::{CancelToken, NullObserver, SolveStatus, Solver};
use approx::assert_abs_diff_eq;
use nalgebra::{DMatrix, DVector};

const N_KNOTS: usize = 51;
const DT: f64 = 0.1;

fn swing_up_cost() -> LqrCost {
    LqrCost::new(
        DMatrix::identity(2, 2) * 0.1,
        DMatrix::identity(1, 1) * 0.1,
        DMatrix::identity(2, 2) * 1000.0,
        DVector::from_vec(vec![std::f64::consts::PI, 0.0]),
    )
}

fn straight_line_guess(x0: &DVector<f64>, xf: &DVector<f64>) -> Vec<DVector<f64>> {
    (0..N_KNOTS)
        .map(|k| {
            let t = k as f64 / (N_KNOTS - 1) as f64;
            x0 * (1.0 - t) + xf * t
        })
        .collect()
}

#[test]
fn unconstrained_swing_up_reaches_goal() {
    let model = Pendulum::default();
    let x0 = DVector::zeros(2);
    let xf = DVector::from_vec(vec![std::f64::consts::PI, 0.0]);
    let problem =
        Problem::new(model, swing_up_cost(), ConstraintSet::new(), IntegratorRule::Rk4, N_KNOTS, DT, x0.clone())
            .unwrap();

    let solver = Solver::new(problem, SolverOptions::default()).unwrap();
    let x_guess = straight_line_guess(&x0, &xf);
    let u_guess = vec![DVector::zeros(1); N_KNOTS - 1];
    let cancel = CancelToken::new();
    let mut observer = NullObserver;

    let (outcome, traj) = solver.solve(x_guess, u_guess, &cancel, &mut observer).unwrap();
    assert_eq!(outcome.status, SolveStatus::Converged);
    assert!(outcome.outer_iterations <= 1, "unconstrained problem needs no AL iteration beyond the first");

    let final_state = traj.x.last().unwrap();
    assert_abs_diff_eq!((final_state - &xf).norm(), 0.0, epsilon = 1e-3);
}

#[test]
fn control_bounded_swing_up_respects_torque_limit() {
    let model = Pendulum::default();
    let x0 = DVector::zeros(2);
    let xf = DVector::from_vec(vec![std::f64::consts::PI, 0.0]);
    let mut constraints = ConstraintSet::new();
    let u_min = DVector::from_vec(vec![-2.0]);
    let u_max = DVector::from_vec(vec![2.0]);
    constraints.add_stage(Box::new(BoundConstraint::control_only(u_min, u_max, 2)));

    let problem = Problem::new(model, swing_up_cost(), constraints, IntegratorRule::Rk4, N_KNOTS, DT, x0.clone())
        .unwrap();
    let solver = Solver::new(problem, SolverOptions::default()).unwrap();
    let x_guess = straight_line_guess(&x0, &xf);
    let u_guess = vec![DVector::zeros(1); N_KNOTS - 1];
    let cancel = CancelToken::new();
    let mut observer = NullObserver;

    let (outcome, traj) = solver.solve(x_guess, u_guess, &cancel, &mut observer).unwrap();
    assert_eq!(outcome.status, SolveStatus::Converged);

    let final_state = traj.x.last().unwrap();
    assert_abs_diff_eq!((final_state - &xf).norm(), 0.0, epsilon = 1e-3);

    let max_violation = traj.u.iter().map(|u| (u[0].abs() - 2.0).max(0.0)).fold(0.0_f64, f64::max);
    assert!(max_violation < 1e-3, "max control bound violation {max_violation} exceeds tolerance");
}

#[test]
fn goal_constraint_is_satisfied_tighter_than_quadratic_terminal_cost_alone() {
    let model = Pendulum::default();
    let x0 = DVector::zeros(2);
    let xf = DVector::from_vec(vec![std::f64::consts::PI, 0.0]);
    let mut constraints = ConstraintSet::new();
    constraints.add_terminal(Box::new(GoalConstraint::new(xf.clone())));

    let problem = Problem::new(model, swing_up_cost(), constraints, IntegratorRule::Rk4, N_KNOTS, DT, x0.clone())
        .unwrap();
    let opts = SolverOptions::default();
    let solver = Solver::new(problem, opts.clone()).unwrap();
    let x_guess = straight_line_guess(&x0, &xf);
    let u_guess = vec![DVector::zeros(1); N_KNOTS - 1];
    let cancel = CancelToken::new();
    let mut observer = NullObserver;

    let (outcome, traj) = solver.solve(x_guess, u_guess, &cancel, &mut observer).unwrap();
    assert_eq!(outcome.status, SolveStatus::Converged);

    let final_state = traj.x.last().unwrap();
    assert!((final_state - &xf).norm() < opts.constraint_tolerance);
}
