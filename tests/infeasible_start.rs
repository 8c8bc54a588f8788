//! Scenario (3): pendulum with box state/control bounds, solved from an
//! infeasible (dynamically inconsistent) straight-line state guess.

use altro::constraint::{BoundConstraint, ConstraintSet};
use altro::cost::LqrCost;
use altro::model::pendulum::Pendulum;
use altro::model::IntegratorRule;
use altro::options::SolverOptions;
use altro::problem::Problem;
use altro::solver::{CancelToken, NullObserver, SolveStatus, Solver};
use nalgebra::{DMatrix, DVector};

const N_KNOTS: usize = 51;
const DT: f64 = 0.1;

#[test]
fn straight_line_guess_converges_under_infeasible_start() {
    let model = Pendulum::default();
    let x0 = DVector::zeros(2);
    let xf = DVector::from_vec(vec![std::f64::consts::PI, 0.0]);

    let cost = LqrCost::new(
        DMatrix::identity(2, 2) * 0.1,
        DMatrix::identity(1, 1) * 0.1,
        DMatrix::identity(2, 2) * 1000.0,
        xf.clone(),
    );

    let mut constraints = ConstraintSet::new();
    let x_min = DVector::from_vec(vec![-10.0, -10.0]);
    let x_max = DVector::from_vec(vec![10.0, 10.0]);
    let u_min = DVector::from_vec(vec![-3.0]);
    let u_max = DVector::from_vec(vec![3.0]);
    constraints.add_stage(Box::new(BoundConstraint::new(&x_min, &x_max, &u_min, &u_max)));

    let problem =
        Problem::new(model, cost, constraints, IntegratorRule::Rk4, N_KNOTS, DT, x0.clone()).unwrap();

    let mut opts = SolverOptions::default();
    opts.infeasible_start = true;
    let opts_for_check = opts.clone();
    let solver = Solver::new(problem, opts).unwrap();

    // a straight-line interpolation between x0 and xf, which does not
    // satisfy the pendulum's own dynamics at any interior knot.
    let x_guess: Vec<DVector<f64>> = (0..N_KNOTS)
        .map(|k| {
            let t = k as f64 / (N_KNOTS - 1) as f64;
            &x0 * (1.0 - t) + &xf * t
        })
        .collect();
    let u_guess = vec![DVector::zeros(1); N_KNOTS - 1];
    let cancel = CancelToken::new();
    let mut observer = NullObserver;

    let (outcome, traj) = solver.solve(x_guess, u_guess, &cancel, &mut observer).unwrap();
    assert_eq!(outcome.status, SolveStatus::Converged);

    let final_state = traj.x.last().unwrap();
    assert!((final_state - &xf).norm() < 1e-3);

    let max_control_violation = traj.u.iter().map(|u| (u[0].abs() - 3.0).max(0.0)).fold(0.0_f64, f64::max);
    assert!(max_control_violation < opts_for_check.constraint_tolerance);
}
