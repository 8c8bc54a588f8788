//! The outer driver (section 4.G): runs [`solve_ilqr`] to convergence
//! against a fixed multiplier/penalty set, then updates multipliers via
//! Hestenes-Powell and scales penalties on rows whose violation failed to
//! shrink sufficiently, repeating until `c_max` drops below
//! `constraint_tolerance` or `iterations_outerloop` is exhausted.

use super::cancel::CancelToken;
use super::ilqr::solve_ilqr;
use super::observer::SolverObserver;
use super::regularization::Regularization;
use super::status::{SolveHistory, SolveOutcome, SolveStatus};
use crate::constraint::ConstraintKind;
use crate::cost::StageCost;
use crate::model::Dynamics;
use crate::options::SolverOptions;
use crate::problem::Problem;
use crate::trajectory::Trajectory;

/// `max(0, c)` for an inequality row's violation, `|c|` for an equality
/// row's — the scalar the AL tolerance and penalty-update logic both test.
fn row_violation(kind: ConstraintKind, c: f64) -> f64 {
    match kind {
        ConstraintKind::Inequality => c.max(0.0),
        ConstraintKind::Equality => c.abs(),
    }
}

/// Largest constraint violation across every stage and the terminal knot.
fn constraint_violation(traj: &Trajectory) -> f64 {
    let mut c_max: f64 = 0.0;
    for exp in &traj.stage_constraints {
        for i in 0..exp.c.len() {
            c_max = c_max.max(row_violation(exp.kinds[i], exp.c[i]));
        }
    }
    for i in 0..traj.terminal_constraint.c.len() {
        c_max = c_max.max(row_violation(traj.terminal_constraint.kinds[i], traj.terminal_constraint.c[i]));
    }
    c_max
}

/// Hestenes-Powell multiplier update, `λᵢ ← max(0, λᵢ + μᵢcᵢ)` for
/// inequalities and `λᵢ ← λᵢ + μᵢcᵢ` for equalities, followed by a
/// per-row penalty scaling: rows whose violation did not shrink by at
/// least `penalty_scaling`'s implied factor relative to the previous
/// outer iteration have their `μ` multiplied by `penalty_scaling`; rows
/// that shrank enough keep their current penalty. This selective scaling
/// (rather than scaling every row uniformly) avoids inflating penalties on
/// constraints that are already converging, matching the source's default
/// multiplier-update behavior; a caller that prefers uniform scaling can
/// reach the same fixed point by setting `penalty_scaling` to a smaller
/// factor, since every row is scaled at least once before it is satisfied.
fn update_multipliers(exp: &mut crate::constraint::ConstraintExpansion, previous: &[f64], scaling: f64) {
    for i in 0..exp.c.len() {
        let c = exp.c[i];
        let updated = exp.lambda[i] + exp.mu[i] * c;
        exp.lambda[i] = match exp.kinds[i] {
            ConstraintKind::Equality => updated,
            ConstraintKind::Inequality => updated.max(0.0),
        };

        let violation = row_violation(exp.kinds[i], c);
        let shrank_enough = violation <= 0.25 * previous[i];
        if !shrank_enough {
            exp.mu[i] *= scaling;
        }
    }
}

fn previous_violations(exp: &crate::constraint::ConstraintExpansion) -> Vec<f64> {
    (0..exp.c.len()).map(|i| row_violation(exp.kinds[i], exp.c[i])).collect()
}

/// Runs the full Augmented Lagrangian loop against `traj`'s current
/// trajectory, mutating it in place and returning the terminal status plus
/// per-outer-iteration diagnostics (section 6's return value).
pub fn solve<M: Dynamics, C: StageCost>(
    problem: &Problem<M, C>,
    traj: &mut Trajectory,
    opts: &SolverOptions,
    cancel: &CancelToken,
    observer: &mut dyn SolverObserver,
) -> SolveOutcome {
    let mut reg = Regularization::new(opts.bp_reg_initial, opts.bp_reg_min, opts.bp_reg_max, opts.bp_reg_increase_factor);
    let mut history = SolveHistory::default();
    let mut c_max = f64::INFINITY;

    for outer in 0..opts.iterations_outerloop {
        if cancel.is_cancelled() {
            return SolveOutcome {
                status: SolveStatus::Cancelled,
                history,
                outer_iterations: outer,
                final_rho: reg.rho,
                final_mu_max: max_penalty(traj),
            };
        }

        // The last outer iteration is the one expected to close the solve:
        // once the previous sweep already met the constraint tolerance, hold
        // the inner loop to the tighter final tolerance instead of the
        // looser intermediate one used while constraints are still active.
        let inner_tolerance = if c_max < opts.constraint_tolerance {
            opts.cost_tolerance
        } else {
            opts.cost_tolerance_intermediate
        };

        let inner = solve_ilqr(problem, traj, opts, &mut reg, inner_tolerance, outer, cancel, observer);

        match inner.status {
            SolveStatus::Cancelled => {
                return SolveOutcome {
                    status: SolveStatus::Cancelled,
                    history,
                    outer_iterations: outer,
                    final_rho: reg.rho,
                    final_mu_max: max_penalty(traj),
                }
            }
            SolveStatus::Converged => {}
            other => {
                history.cost.push(inner.final_cost);
                return SolveOutcome {
                    status: other,
                    history,
                    outer_iterations: outer,
                    final_rho: reg.rho,
                    final_mu_max: max_penalty(traj),
                };
            }
        }

        c_max = constraint_violation(traj);
        history.cost.push(inner.final_cost);
        history.constraint_violation.push(c_max);
        history.inner_iterations.push(inner.iterations);
        observer.on_outer_iteration(outer, inner.final_cost, c_max);
        if opts.verbose {
            log::info!("al outer {outer}: cost={:.6e} c_max={c_max:.3e}", inner.final_cost);
        }

        if c_max < opts.constraint_tolerance {
            return SolveOutcome {
                status: SolveStatus::Converged,
                history,
                outer_iterations: outer + 1,
                final_rho: reg.rho,
                final_mu_max: max_penalty(traj),
            };
        }

        for k in 0..traj.steps() {
            let previous = previous_violations(&traj.stage_constraints[k]);
            update_multipliers(&mut traj.stage_constraints[k], &previous, opts.penalty_scaling);
        }
        let previous = previous_violations(&traj.terminal_constraint);
        update_multipliers(&mut traj.terminal_constraint, &previous, opts.penalty_scaling);
    }

    SolveOutcome {
        status: SolveStatus::ConstraintViolation,
        history,
        outer_iterations: opts.iterations_outerloop,
        final_rho: reg.rho,
        final_mu_max: max_penalty(traj),
    }
}

fn max_penalty(traj: &Trajectory) -> f64 {
    let stage_max = traj
        .stage_constraints
        .iter()
        .flat_map(|exp| exp.mu.iter().copied())
        .fold(0.0_f64, f64::max);
    let terminal_max = traj.terminal_constraint.mu.iter().copied().fold(0.0_f64, f64::max);
    stage_max.max(terminal_max)
}
