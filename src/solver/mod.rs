//! The public solver surface: wires [`SolverOptions`](crate::options::SolverOptions)
//! validation, the Augmented Lagrangian outer loop, and the infeasible-start
//! wrapper behind a single entry point per problem.

pub mod augmented_lagrangian;
pub mod cancel;
pub mod ilqr;
pub mod infeasible;
pub mod observer;
pub mod regularization;
pub mod status;

pub use cancel::CancelToken;
pub use infeasible::InfeasibleOutcome;
pub use observer::{NullObserver, RecordingObserver, SolverObserver};
pub use status::{SolveHistory, SolveOutcome, SolveStatus};

use crate::cost::StageCost;
use crate::error::{AltroError, Result};
use crate::model::Dynamics;
use crate::options::SolverOptions;
use crate::problem::Problem;
use crate::trajectory::Trajectory;
use nalgebra::DVector;

/// Both solve paths require `x_guess` to carry one state per knot and
/// `u_guess` one control per step; an initial guess of the wrong shape is
/// a construction-time mistake, not something the solver should silently
/// truncate or pad.
fn check_guess_shape<M: Dynamics, C: StageCost>(
    problem: &Problem<M, C>,
    x_guess: &[DVector<f64>],
    u_guess: &[DVector<f64>],
) -> Result<()> {
    if x_guess.len() != problem.n_knots {
        return Err(AltroError::InvalidInput(format!(
            "x_guess has {} knots but the problem has {}",
            x_guess.len(),
            problem.n_knots
        )));
    }
    if u_guess.len() != problem.steps() {
        return Err(AltroError::InvalidInput(format!(
            "u_guess has {} steps but the problem has {}",
            u_guess.len(),
            problem.steps()
        )));
    }
    Ok(())
}

/// A solver bound to one [`Problem`] and [`SolverOptions`] pair.
/// Construction validates the options once; [`Solver::solve`] consumes the
/// solver (and with it the problem) since the infeasible-start path needs
/// to move the problem's model, cost, and constraint set into its
/// slack-augmented wrappers — a plain solve never actually needs the move,
/// but one signature covering both paths is simpler than two.
pub struct Solver<M: Dynamics, C: StageCost> {
    problem: Problem<M, C>,
    opts: SolverOptions,
}

impl<M: Dynamics, C: StageCost> Solver<M, C> {
    pub fn new(problem: Problem<M, C>, opts: SolverOptions) -> Result<Self> {
        opts.validate()?;
        Ok(Solver { problem, opts })
    }

    pub fn options(&self) -> &SolverOptions {
        &self.opts
    }

    pub fn problem(&self) -> &Problem<M, C> {
        &self.problem
    }
}

impl<M: Dynamics + Clone, C: StageCost + Clone> Solver<M, C> {
    /// Solves from an explicit initial guess. When `opts.infeasible_start`
    /// is set, `x_guess`/`u_guess` need not satisfy the dynamics — slacks
    /// absorb the mismatch and are driven to zero by the Augmented
    /// Lagrangian loop, followed by one unconstrained polishing pass on
    /// the original model. Otherwise the guess is rolled forward as given.
    /// Requires `M: Clone, C: Clone` since the infeasible-start path needs
    /// the original model/cost back after moving them into its
    /// slack-augmented wrappers.
    pub fn solve(
        self,
        x_guess: Vec<DVector<f64>>,
        u_guess: Vec<DVector<f64>>,
        cancel: &CancelToken,
        observer: &mut dyn SolverObserver,
    ) -> Result<(SolveOutcome, Trajectory)> {
        let Solver { problem, opts } = self;
        check_guess_shape(&problem, &x_guess, &u_guess)?;

        if opts.infeasible_start {
            let n = problem.model.state_dim();
            let m = problem.model.control_dim();
            let n_knots = problem.n_knots;

            let result = infeasible::solve_infeasible(problem, x_guess, u_guess, &opts, cancel, observer)?;
            let mut traj = Trajectory::new(n, m, n_knots, 0, 0, opts.penalty_initial, &result.x[0]);
            traj.x = result.x;
            traj.u = result.u;
            return Ok((result.outcome, traj));
        }

        let n = problem.model.state_dim();
        let m = problem.model.control_dim();
        let stage_p = problem.constraints.stage_dim();
        let terminal_p = problem.constraints.terminal_dim();
        let mut traj =
            Trajectory::new(n, m, problem.n_knots, stage_p, terminal_p, opts.penalty_initial, &problem.x_init);
        traj.x = x_guess;
        traj.u = u_guess;

        let outcome = augmented_lagrangian::solve(&problem, &mut traj, &opts, cancel, observer);
        Ok((outcome, traj))
    }
}
