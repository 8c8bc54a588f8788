//! Continuous dynamics models, explicit integrators, and the Jacobian
//! machinery shared by every fixture in [`crate::model`] and by the
//! infeasible-start wrapper's augmented model.

mod integrator;
pub mod double_integrator;
pub mod pendulum;
pub mod planar_quadrotor;

pub use integrator::{discrete_dynamics, discrete_jacobian, IntegratorRule};

use crate::scalar::{ADScalar, Dual64};
use nalgebra::{DMatrix, DVector};

/// A continuous-time dynamics oracle `ẋ = f(x, u)`.
///
/// Implementations provide a single generic `eval`, written once against
/// [`ADScalar`], from which both a plain evaluation (`S = f64`) and an
/// exact Jacobian column (`S = Dual64`) are derived without symbolic
/// differentiation or finite differences.
pub trait Dynamics: Send + Sync {
    fn state_dim(&self) -> usize;
    fn control_dim(&self) -> usize;

    /// Evaluates `ẋ = f(x, u)` for any scalar type implementing [`ADScalar`].
    fn eval<S: ADScalar>(&self, x: &[S], u: &[S]) -> Vec<S>;

    /// Advances one knot interval under `rule`, generic over the scalar
    /// type so the same path serves plain rollout and dual-number
    /// Jacobian sweeps. Defaults to integrating [`eval`](Self::eval)
    /// directly; overridden by wrapper models — e.g. the infeasible-start
    /// slack augmentation — that need to change the discretization itself
    /// (adding a term *after* the discrete step) rather than only
    /// perturbing the continuous rate fed into the default integrator.
    fn discrete_step<S: ADScalar>(&self, rule: IntegratorRule, x: &[S], u: &[S], dt: f64) -> Vec<S> {
        integrator::step(rule, self, x, u, dt)
    }

    /// Plain `f64` evaluation, used outside of Jacobian computation.
    fn dynamics(&self, x: &DVector<f64>, u: &DVector<f64>) -> DVector<f64> {
        let xs: Vec<f64> = x.iter().copied().collect();
        let us: Vec<f64> = u.iter().copied().collect();
        DVector::from_vec(self.eval(&xs, &us))
    }

    /// Continuous-time Jacobians `(∂f/∂x, ∂f/∂u)` at `(x, u)`, obtained by
    /// one dual-number sweep per input direction: `n + m` evaluations of
    /// `eval`, each a plain `Copy` `Dual64`. The `xs`/`us` dual buffers are
    /// allocated once and overwritten entry-by-entry for each sweep rather
    /// than re-collected per column.
    fn jacobian(&self, x: &DVector<f64>, u: &DVector<f64>) -> (DMatrix<f64>, DMatrix<f64>) {
        let n = self.state_dim();
        let m = self.control_dim();
        let mut a = DMatrix::zeros(n, n);
        let mut b = DMatrix::zeros(n, m);

        let mut xs: Vec<Dual64> = x.iter().map(|&v| Dual64::constant(v)).collect();
        let mut us: Vec<Dual64> = u.iter().map(|&v| Dual64::constant(v)).collect();

        for i in 0..n {
            xs[i] = Dual64::variable(x[i]);
            let y = self.eval(&xs, &us);
            xs[i] = Dual64::constant(x[i]);
            for row in 0..n {
                a[(row, i)] = y[row].eps;
            }
        }

        for i in 0..m {
            us[i] = Dual64::variable(u[i]);
            let y = self.eval(&xs, &us);
            us[i] = Dual64::constant(u[i]);
            for row in 0..n {
                b[(row, i)] = y[row].eps;
            }
        }

        (a, b)
    }
}

/// Backing storage for [`discrete_jacobian`]'s dual-number sweeps, held by
/// [`crate::trajectory::Trajectory`] and reused across every knot and every
/// solver iteration so the hot iteration path's Jacobian computation never
/// allocates a `Vec` itself — only overwrites entries already in place.
pub struct JacobianScratch {
    xs: Vec<Dual64>,
    us: Vec<Dual64>,
}

impl JacobianScratch {
    pub fn new(n: usize, m: usize) -> Self {
        JacobianScratch { xs: vec![Dual64::constant(0.0); n], us: vec![Dual64::constant(0.0); m] }
    }
}
