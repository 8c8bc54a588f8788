//! The inner driver (section 4.F): iterates cost/constraint expansion,
//! dynamics linearization, backward pass, and forward pass until the
//! trajectory converges, manages the regularization schedule, and logs at
//! inner-iteration boundaries.

use super::cancel::CancelToken;
use super::observer::SolverObserver;
use super::regularization::Regularization;
use super::status::SolveStatus;
use crate::backward_pass::backward_pass;
use crate::cost::StageCost;
use crate::forward_pass::forward_pass;
use crate::model::{discrete_jacobian, Dynamics};
use crate::options::SolverOptions;
use crate::problem::Problem;
use crate::trajectory::Trajectory;

pub struct IlqrOutcome {
    pub status: SolveStatus,
    pub iterations: usize,
    pub final_cost: f64,
    pub cost_history: Vec<f64>,
}

/// Re-evaluates every stage/terminal cost and constraint oracle, and every
/// dynamics Jacobian, at the current trajectory. Component B + the
/// Jacobian half of component A, run once per inner iteration; existing
/// multipliers/penalties in `traj.stage_constraints`/`terminal_constraint`
/// are left untouched — only `c`, `Cx`, `Cu` are refreshed.
fn expand<M: Dynamics, C: StageCost>(problem: &Problem<M, C>, traj: &mut Trajectory) {
    for k in 0..traj.steps() {
        traj.stage_cost[k] = problem.cost.stage(&traj.x[k], &traj.u[k]);
        let (a, b) = discrete_jacobian(
            problem.rule,
            &problem.model,
            &traj.x[k],
            &traj.u[k],
            problem.dt,
            &mut traj.jac_scratch,
        );
        traj.a[k] = a;
        traj.b[k] = b;

        let (c, cx, cu, kinds) = problem.constraints.evaluate_stage(&traj.x[k], &traj.u[k]);
        let exp = &mut traj.stage_constraints[k];
        exp.c = c;
        exp.cx = cx;
        exp.cu = cu;
        exp.kinds = kinds;
    }

    let last = traj.steps();
    traj.terminal_cost = problem.cost.terminal(&traj.x[last]);
    let (c, cx, _cu, kinds) = problem.constraints.evaluate_terminal(&traj.x[last]);
    traj.terminal_constraint.c = c;
    traj.terminal_constraint.cx = cx;
    traj.terminal_constraint.kinds = kinds;
}

/// Total augmented cost of the current (non-shadow) trajectory, assuming
/// `expand` has just run so `traj.stage_cost`/`traj.stage_constraints`
/// reflect `(x, u)`.
fn trajectory_cost(traj: &Trajectory) -> f64 {
    let mut total: f64 = traj.stage_cost.iter().map(|s| s.l).sum();
    total += traj
        .stage_constraints
        .iter()
        .map(|c| c.augmented_cost())
        .sum::<f64>();
    total += traj.terminal_cost.l + traj.terminal_constraint.augmented_cost();
    total
}

/// Runs the inner iLQR loop to convergence (or to one of its own failure
/// modes) against whatever multipliers/penalties are currently held in
/// `traj`'s constraint expansions.
///
/// `RegularizationMax` and `LineSearchFailure` (section 7's error table)
/// are solve-time outcomes, not thrown errors: section 6 lists both as
/// members of the solver's returned status tag, so a regularization
/// ceiling hit here surfaces as `IlqrOutcome::status` against the best
/// trajectory reached so far, never as a discarded `Err` that would lose
/// the caller's partial progress. Only construction-time problems
/// (`Problem::new`, `Solver::new`, guess-shape checks) are raised as
/// `AltroError::InvalidInput`.
pub fn solve_ilqr<M: Dynamics, C: StageCost>(
    problem: &Problem<M, C>,
    traj: &mut Trajectory,
    opts: &SolverOptions,
    reg: &mut Regularization,
    cost_tolerance: f64,
    outer_iteration: usize,
    cancel: &CancelToken,
    observer: &mut dyn SolverObserver,
) -> IlqrOutcome {
    expand(problem, traj);
    let mut cost = trajectory_cost(traj);
    let mut cost_history = vec![cost];

    for iteration in 0..opts.iterations {
        if cancel.is_cancelled() {
            return IlqrOutcome { status: SolveStatus::Cancelled, iterations: iteration, final_cost: cost, cost_history };
        }

        let mut accepted_cost = None;
        loop {
            match backward_pass(traj, reg.rho) {
                Ok(reduction) => {
                    let outcome = forward_pass(problem, traj, cost, reduction, opts);
                    if outcome.accepted {
                        reg.decrease();
                        accepted_cost = Some(outcome.cost);
                        break;
                    } else if reg.increase().is_err() {
                        return IlqrOutcome {
                            status: SolveStatus::LineSearchFailure,
                            iterations: iteration,
                            final_cost: cost,
                            cost_history,
                        };
                    }
                }
                Err(_) => {
                    if reg.increase().is_err() {
                        return IlqrOutcome {
                            status: SolveStatus::RegularizationMax,
                            iterations: iteration,
                            final_cost: cost,
                            cost_history,
                        };
                    }
                }
            }

            if cancel.is_cancelled() {
                return IlqrOutcome { status: SolveStatus::Cancelled, iterations: iteration, final_cost: cost, cost_history };
            }
        }
        let accepted_cost = accepted_cost.expect("loop only breaks once a forward pass is accepted");

        traj.commit();
        expand(problem, traj);

        let new_cost = trajectory_cost(traj);
        debug_assert!((new_cost - accepted_cost).abs() < 1e-6 + 1e-6 * accepted_cost.abs());

        let delta_j = cost - new_cost;
        cost = new_cost;
        cost_history.push(cost);

        observer.on_inner_iteration(outer_iteration, iteration, cost, reg.rho);
        if opts.verbose {
            log::debug!("ilqr iter {iteration}: cost={cost:.6e} rho={:.3e}", reg.rho);
        }

        let max_gain = traj.gain_d.iter().map(|d| d.amax()).fold(0.0_f64, f64::max);
        let rel_tol = cost_tolerance * (1.0 + cost.abs());
        if delta_j.abs() < rel_tol || max_gain < cost_tolerance {
            return IlqrOutcome { status: SolveStatus::Converged, iterations: iteration + 1, final_cost: cost, cost_history };
        }
    }

    IlqrOutcome { status: SolveStatus::MaxIterations, iterations: opts.iterations, final_cost: cost, cost_history }
}
