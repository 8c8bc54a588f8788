//! The closed-loop line-searched rollout. Section 4.E: backtrack on `α`
//! until the actual-to-expected cost reduction ratio falls in
//! `[line_search_lower, line_search_upper]`, rejecting any step whose
//! rollout produces a non-finite value as if it had failed that test.

use crate::backward_pass::ExpectedReduction;
use crate::constraint::al_value;
use crate::cost::StageCost;
use crate::model::{discrete_dynamics, Dynamics};
use crate::options::SolverOptions;
use crate::problem::Problem;
use crate::trajectory::Trajectory;

#[derive(Clone, Copy, Debug)]
pub struct ForwardPassOutcome {
    pub accepted: bool,
    pub cost: f64,
    pub alpha: f64,
    pub bisections: usize,
}

pub fn forward_pass<M: Dynamics, C: StageCost>(
    problem: &Problem<M, C>,
    traj: &mut Trajectory,
    current_cost: f64,
    reduction: ExpectedReduction,
    opts: &SolverOptions,
) -> ForwardPassOutcome {
    let mut alpha = 1.0;

    for bisection in 0..opts.iterations_linesearch {
        let (cost, finite) = rollout(problem, traj, alpha);

        if finite {
            let expected_decrease = -reduction.at(alpha);
            let actual_decrease = current_cost - cost;

            let accept = if expected_decrease.abs() < 1e-12 {
                actual_decrease >= -1e-10
            } else {
                let ratio = actual_decrease / expected_decrease;
                ratio >= opts.line_search_lower && ratio <= opts.line_search_upper
            };

            if accept {
                return ForwardPassOutcome { accepted: true, cost, alpha, bisections: bisection };
            }
        }

        alpha *= 0.5;
    }

    ForwardPassOutcome { accepted: false, cost: current_cost, alpha, bisections: opts.iterations_linesearch }
}

/// Simulates the closed-loop rollout `ū_k = u_k + α·d_k + K_k·(x̄_k − x_k)`
/// into `traj.x_bar`/`traj.u_bar`, returning the candidate augmented cost
/// and whether every intermediate value stayed finite.
fn rollout<M: Dynamics, C: StageCost>(
    problem: &Problem<M, C>,
    traj: &mut Trajectory,
    alpha: f64,
) -> (f64, bool) {
    traj.x_bar[0] = problem.x_init.clone();
    let mut cost = 0.0;
    let mut finite = true;

    for k in 0..traj.steps() {
        let dx = &traj.x_bar[k] - &traj.x[k];
        let u_bar = &traj.u[k] + &traj.gain_d[k] * alpha + &traj.gain_k[k] * &dx;
        traj.u_bar[k] = u_bar.clone();

        let stage = problem.cost.stage(&traj.x_bar[k], &u_bar);
        let (c, _, _, kinds) = problem.constraints.evaluate_stage(&traj.x_bar[k], &u_bar);
        let al = al_value(&c, &traj.stage_constraints[k].lambda, &traj.stage_constraints[k].mu, &kinds);

        if !stage.l.is_finite() || !al.is_finite() {
            finite = false;
            break;
        }
        cost += stage.l + al;

        let x_next = discrete_dynamics(problem.rule, &problem.model, &traj.x_bar[k], &u_bar, problem.dt);
        if !x_next.iter().all(|v| v.is_finite()) {
            finite = false;
            break;
        }
        traj.x_bar[k + 1] = x_next;
    }

    if finite {
        let last = traj.steps();
        let terminal = problem.cost.terminal(&traj.x_bar[last]);
        let (c, _, kinds) = {
            let (c, cx, _cu, kinds) = problem.constraints.evaluate_terminal(&traj.x_bar[last]);
            (c, cx, kinds)
        };
        let al = al_value(&c, &traj.terminal_constraint.lambda, &traj.terminal_constraint.mu, &kinds);
        if !terminal.l.is_finite() || !al.is_finite() {
            finite = false;
        } else {
            cost += terminal.l + al;
        }
    }

    (cost, finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::ConstraintSet;
    use crate::cost::LqrCost;
    use crate::model::double_integrator::DoubleIntegrator;
    use crate::model::IntegratorRule;
    use crate::trajectory::Trajectory;
    use nalgebra::{DMatrix, DVector};

    #[test]
    fn zero_gains_reproduces_open_loop_rollout() {
        let model = DoubleIntegrator::new(1);
        let cost = LqrCost::new(
            DMatrix::identity(2, 2),
            DMatrix::identity(1, 1),
            DMatrix::identity(2, 2),
            DVector::from_vec(vec![1.0, 0.0]),
        );
        let x_init = DVector::zeros(2);
        let problem = Problem::new(model, cost, ConstraintSet::new(), IntegratorRule::Rk4, 5, 0.1, x_init).unwrap();
        let mut traj = Trajectory::new(2, 1, 5, 0, 0, 1.0, &problem.x_init);
        // gains all zero -> rollout should just be open-loop with u=0
        let reduction = ExpectedReduction::default();
        let outcome = forward_pass(&problem, &mut traj, 1e9, reduction, &crate::options::SolverOptions::default());
        assert!(outcome.accepted);
    }
}
