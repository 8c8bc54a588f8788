//! Infeasible-start: lets a caller seed the solve with a state trajectory
//! that need not satisfy the dynamics exactly, by augmenting the control
//! with a per-knot slack `s_k` added *after* the discrete step:
//! `x_{k+1} = f_d(x_k, u_k, Δt) + s_k`, matching section 4.H step 1
//! verbatim. [`SlackAugmented`] overrides [`Dynamics::discrete_step`] to
//! run the inner model's own discrete step unmodified and add the slack
//! on afterward, so the result is exact for every integrator and every
//! dynamics model, linear or not — any `(x_k)` sequence becomes
//! dynamically consistent by setting `s_k = x_{k+1} - f_d(x_k, u_k, Δt)`
//! once, at the initial guess. An equality constraint then drives every
//! slack to zero under the ordinary Augmented Lagrangian loop; by the
//! time it converges, the slack-free original dynamics are satisfied
//! everywhere.

use super::augmented_lagrangian;
use super::cancel::CancelToken;
use super::ilqr::solve_ilqr;
use super::observer::SolverObserver;
use super::regularization::Regularization;
use super::status::{SolveOutcome, SolveStatus};
use crate::constraint::{Constraint, ConstraintKind, ConstraintSet, TerminalConstraint};
use crate::cost::{StageCost, StageExpansion, TerminalExpansion};
use crate::error::{AltroError, Result};
use crate::model::{discrete_dynamics, Dynamics, IntegratorRule};
use crate::options::SolverOptions;
use crate::problem::Problem;
use crate::scalar::ADScalar;
use crate::trajectory::Trajectory;
use nalgebra::{DMatrix, DVector};

/// Wraps a dynamics model with `n` extra slack controls appended after the
/// original `m` controls. The slack has no continuous-time meaning — it
/// is added to the state only once, after a full discrete step of the
/// unmodified inner model — so [`Dynamics::eval`] simply drops it and
/// [`Dynamics::discrete_step`] is overridden instead of relying on the
/// default continuous-integration path.
pub struct SlackAugmented<M: Dynamics> {
    inner: M,
}

impl<M: Dynamics> SlackAugmented<M> {
    pub fn new(inner: M) -> Self {
        SlackAugmented { inner }
    }
}

impl<M: Dynamics> Dynamics for SlackAugmented<M> {
    fn state_dim(&self) -> usize {
        self.inner.state_dim()
    }

    fn control_dim(&self) -> usize {
        self.inner.control_dim() + self.inner.state_dim()
    }

    fn eval<S: ADScalar>(&self, x: &[S], u: &[S]) -> Vec<S> {
        let m = self.inner.control_dim();
        self.inner.eval(x, &u[..m])
    }

    fn discrete_step<S: ADScalar>(&self, rule: IntegratorRule, x: &[S], u: &[S], dt: f64) -> Vec<S> {
        let m = self.inner.control_dim();
        let n = self.inner.state_dim();
        let mut x_next = self.inner.discrete_step(rule, x, &u[..m], dt);
        for i in 0..n {
            x_next[i] = x_next[i] + u[m + i];
        }
        x_next
    }
}

/// Pads a stage cost's control Jacobian/Hessian with zero blocks over the
/// slack dimensions — the slack controls carry no direct cost of their
/// own, only the equality constraint pulling them to zero.
pub struct AugmentedCost<C: StageCost> {
    inner: C,
    slack_dim: usize,
}

impl<C: StageCost> AugmentedCost<C> {
    pub fn new(inner: C, slack_dim: usize) -> Self {
        AugmentedCost { inner, slack_dim }
    }
}

impl<C: StageCost> StageCost for AugmentedCost<C> {
    fn n(&self) -> usize {
        self.inner.n()
    }

    fn m(&self) -> usize {
        self.inner.m() + self.slack_dim
    }

    fn stage(&self, x: &DVector<f64>, u_full: &DVector<f64>) -> StageExpansion {
        let m = self.inner.m();
        let u = DVector::from_iterator(m, u_full.iter().take(m).copied());
        let exp = self.inner.stage(x, &u);

        let m_full = self.m();
        let mut l_u = DVector::zeros(m_full);
        let mut l_uu = DMatrix::zeros(m_full, m_full);
        let mut l_ux = DMatrix::zeros(m_full, self.n());
        for i in 0..m {
            l_u[i] = exp.l_u[i];
            for j in 0..m {
                l_uu[(i, j)] = exp.l_uu[(i, j)];
            }
            for j in 0..self.n() {
                l_ux[(i, j)] = exp.l_ux[(i, j)];
            }
        }

        StageExpansion { l: exp.l, l_x: exp.l_x, l_u, l_xx: exp.l_xx, l_uu, l_ux }
    }

    fn terminal(&self, x: &DVector<f64>) -> TerminalExpansion {
        self.inner.terminal(x)
    }
}

/// Re-slices an original stage constraint's control columns out of the
/// augmented `[u; s]` vector, so a constraint written against the
/// original control dimension works unmodified against the augmented
/// problem.
struct IgnoreSlackControls {
    inner: Box<dyn Constraint>,
    m: usize,
}

impl Constraint for IgnoreSlackControls {
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn kind(&self) -> ConstraintKind {
        self.inner.kind()
    }

    fn evaluate(&self, x: &DVector<f64>, u_full: &DVector<f64>) -> (DVector<f64>, DMatrix<f64>, DMatrix<f64>) {
        let u = DVector::from_iterator(self.m, u_full.iter().take(self.m).copied());
        let (c, cx, cu) = self.inner.evaluate(x, &u);
        let mut cu_full = DMatrix::zeros(cu.nrows(), u_full.len());
        for i in 0..cu.nrows() {
            for j in 0..self.m {
                cu_full[(i, j)] = cu[(i, j)];
            }
        }
        (c, cx, cu_full)
    }
}

/// `s_k = 0`, `n` equality rows with `Cu = [0_{n x m} | I_n]`.
struct SlackEqualityConstraint {
    n: usize,
    m: usize,
}

impl Constraint for SlackEqualityConstraint {
    fn dim(&self) -> usize {
        self.n
    }

    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Equality
    }

    fn evaluate(&self, x: &DVector<f64>, u_full: &DVector<f64>) -> (DVector<f64>, DMatrix<f64>, DMatrix<f64>) {
        let mut c = DVector::zeros(self.n);
        for i in 0..self.n {
            c[i] = u_full[self.m + i];
        }
        let cx = DMatrix::zeros(self.n, x.len());
        let mut cu = DMatrix::zeros(self.n, u_full.len());
        for i in 0..self.n {
            cu[(i, self.m + i)] = 1.0;
        }
        (c, cx, cu)
    }
}

pub struct InfeasibleOutcome {
    pub outcome: SolveOutcome,
    pub x: Vec<DVector<f64>>,
    pub u: Vec<DVector<f64>>,
}

/// Builds the slack-augmented problem around `problem`, seeds the slack
/// controls so `x_guess` is dynamically consistent at iteration zero, and
/// runs the ordinary Augmented Lagrangian loop against the slack equality
/// rows alongside whatever constraints `problem` already carried. Once the
/// outer loop reports [`SolveStatus::Converged`], the slack columns are
/// stripped and one unconstrained iLQR pass is re-run on the original
/// (unaugmented) model, warm-started from the stripped trajectory, per
/// section 4.H step 5 — the AL loop alone only guarantees the slacks are
/// within `constraint_tolerance` of zero, not that the resulting `(x, u)`
/// is a local optimum of the original unconstrained problem. `M` and `C`
/// must be `Clone` so the original model/cost survive the move into their
/// slack-augmented wrappers for this second pass.
pub fn solve_infeasible<M: Dynamics + Clone, C: StageCost + Clone>(
    problem: Problem<M, C>,
    x_guess: Vec<DVector<f64>>,
    u_guess: Vec<DVector<f64>>,
    opts: &SolverOptions,
    cancel: &CancelToken,
    observer: &mut dyn SolverObserver,
) -> Result<InfeasibleOutcome> {
    let n_knots = problem.n_knots;
    if x_guess.len() != n_knots {
        return Err(AltroError::InvalidInput(format!(
            "x_guess has {} knots but the problem has {n_knots}",
            x_guess.len()
        )));
    }
    if u_guess.len() != n_knots - 1 {
        return Err(AltroError::InvalidInput(format!(
            "u_guess has {} steps but the problem has {}",
            u_guess.len(),
            n_knots - 1
        )));
    }

    let n = problem.model.state_dim();
    let m = problem.model.control_dim();
    let rule = problem.rule;
    let dt = problem.dt;
    let x_init = problem.x_init.clone();

    let Problem { model, cost, constraints, .. } = problem;
    let original_model = model.clone();
    let original_cost = cost.clone();
    let (stage, terminal) = constraints.into_parts();

    let augmented_model = SlackAugmented::new(model);
    let augmented_cost = AugmentedCost::new(cost, n);

    let mut augmented_constraints = ConstraintSet::new();
    for c in stage {
        augmented_constraints.add_stage(Box::new(IgnoreSlackControls { inner: c, m }));
    }
    augmented_constraints.add_stage(Box::new(SlackEqualityConstraint { n, m }));
    for c in terminal {
        augmented_constraints.add_terminal(c);
    }

    let augmented_problem =
        Problem::new(augmented_model, augmented_cost, augmented_constraints, rule, n_knots, dt, x_init.clone())?;

    let stage_p = augmented_problem.constraints.stage_dim();
    let terminal_p = augmented_problem.constraints.terminal_dim();
    let mut traj = Trajectory::new(n, m + n, n_knots, stage_p, terminal_p, opts.penalty_initial, &augmented_problem.x_init);

    traj.x = x_guess;
    for k in 0..traj.steps() {
        let u_step = &u_guess[k];
        let x_next_nominal = discrete_dynamics(rule, &augmented_problem.model.inner, &traj.x[k], u_step, dt);
        let slack = &traj.x[k + 1] - &x_next_nominal;

        let mut u_full = DVector::zeros(m + n);
        for i in 0..m {
            u_full[i] = u_step[i];
        }
        for i in 0..n {
            u_full[m + i] = slack[i];
        }
        traj.u[k] = u_full;
    }
    // Equality rows should start near their penalty weight, not the
    // looser default, so the early AL iterations squeeze slack quickly.
    for exp in traj.stage_constraints.iter_mut() {
        for i in 0..exp.kinds.len() {
            if exp.kinds[i] == ConstraintKind::Equality {
                exp.mu[i] = opts.penalty_initial_infeasible;
            }
        }
    }

    let outcome = augmented_lagrangian::solve(&augmented_problem, &mut traj, opts, cancel, observer);

    let x = traj.x.clone();
    let u: Vec<DVector<f64>> =
        traj.u.iter().map(|u_full| DVector::from_iterator(m, u_full.iter().take(m).copied())).collect();

    if outcome.status != SolveStatus::Converged {
        return Ok(InfeasibleOutcome { outcome, x, u });
    }

    // Strip the slacks and re-run one unconstrained polishing iLQR pass on
    // the original model, warm-started from the stripped trajectory.
    let polish_problem =
        match Problem::new(original_model, original_cost, ConstraintSet::new(), rule, n_knots, dt, x_init.clone()) {
            Ok(p) => p,
            Err(_) => return Ok(InfeasibleOutcome { outcome, x, u }),
        };

    let mut polish_traj = Trajectory::new(n, m, n_knots, 0, 0, opts.penalty_initial, &x_init);
    polish_traj.x = x.clone();
    polish_traj.u = u.clone();

    let mut reg = Regularization::new(opts.bp_reg_initial, opts.bp_reg_min, opts.bp_reg_max, opts.bp_reg_increase_factor);
    let polish_outcome =
        solve_ilqr(&polish_problem, &mut polish_traj, opts, &mut reg, opts.cost_tolerance, 0, cancel, observer);

    match polish_outcome.status {
        SolveStatus::Converged | SolveStatus::MaxIterations => {
            Ok(InfeasibleOutcome { outcome, x: polish_traj.x, u: polish_traj.u })
        }
        _ => Ok(InfeasibleOutcome { outcome, x, u }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::LqrCost;
    use crate::model::double_integrator::DoubleIntegrator;
    use crate::solver::observer::NullObserver;
    use nalgebra::DMatrix;

    #[test]
    fn inconsistent_initial_guess_converges_to_feasible_trajectory() {
        let model = DoubleIntegrator::new(1);
        let cost = LqrCost::new(
            DMatrix::identity(2, 2),
            DMatrix::identity(1, 1) * 0.1,
            DMatrix::identity(2, 2) * 10.0,
            DVector::from_vec(vec![1.0, 0.0]),
        );
        let x_init = DVector::zeros(2);
        let problem =
            Problem::new(model, cost, ConstraintSet::new(), IntegratorRule::Rk4, 10, 0.1, x_init).unwrap();

        // a state guess that ignores the dynamics entirely
        let x_guess: Vec<DVector<f64>> =
            (0..10).map(|k| DVector::from_vec(vec![k as f64 * 0.2, 0.0])).collect();
        let u_guess = vec![DVector::zeros(1); 9];

        let opts = SolverOptions::default();
        let cancel = CancelToken::new();
        let mut observer = NullObserver;

        let result = solve_infeasible(problem, x_guess, u_guess, &opts, &cancel, &mut observer).unwrap();
        assert_eq!(result.x.len(), 10);
        assert_eq!(result.u.len(), 9);
    }

    /// The slack must be added *after* the discrete step of the unmodified
    /// model, not folded into the continuous rate before integration — the
    /// two only agree for dynamics linear in `x`. This checks it against a
    /// genuinely nonlinear fixture.
    #[test]
    fn slack_is_added_after_the_discrete_step_not_before_integration() {
        use crate::model::pendulum::Pendulum;

        let inner = Pendulum::default();
        let augmented = SlackAugmented::new(inner);

        let x = DVector::from_vec(vec![0.3, -0.2]);
        let u_inner = DVector::from_vec(vec![0.5]);
        let s = DVector::from_vec(vec![0.1, -0.05]);
        let dt = 0.1;

        let mut u_full = DVector::zeros(3);
        u_full[0] = u_inner[0];
        u_full[1] = s[0];
        u_full[2] = s[1];

        let expected = discrete_dynamics(IntegratorRule::Rk4, &inner, &x, &u_inner, dt) + &s;
        let actual = discrete_dynamics(IntegratorRule::Rk4, &augmented, &x, &u_full, dt);

        assert!((actual - expected).norm() < 1e-12);
    }
}
