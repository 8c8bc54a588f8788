use super::{Dynamics, JacobianScratch};
use crate::error::{AltroError, Result};
use crate::scalar::{ADScalar, Dual64};
use nalgebra::{DMatrix, DVector};
use std::str::FromStr;

/// Explicit, single-step, zero-order-hold quadrature rule for advancing the
/// continuous dynamics by one knot interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegratorRule {
    Midpoint,
    Rk3,
    Rk4,
}

impl FromStr for IntegratorRule {
    type Err = AltroError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "midpoint" => Ok(IntegratorRule::Midpoint),
            "rk3" => Ok(IntegratorRule::Rk3),
            "rk4" => Ok(IntegratorRule::Rk4),
            other => Err(AltroError::InvalidInput(format!(
                "unknown integrator rule '{other}' (expected one of: midpoint, rk3, rk4)"
            ))),
        }
    }
}

/// Advances one knot interval using `rule`, generic over the scalar type so
/// the same recursion serves plain evaluation and dual-number
/// differentiation. This is [`Dynamics::discrete_step`]'s default
/// implementation; kept as a free function so it stays callable without
/// going through a trait object.
pub(crate) fn step<S: ADScalar, D: Dynamics + ?Sized>(
    rule: IntegratorRule,
    model: &D,
    x: &[S],
    u: &[S],
    dt: f64,
) -> Vec<S> {
    let dt = S::constant(dt);
    let add = |a: &[S], b: &[S], scale: S| -> Vec<S> {
        a.iter().zip(b.iter()).map(|(&ai, &bi)| ai + bi * scale).collect()
    };
    let scale = |a: &[S], s: S| -> Vec<S> { a.iter().map(|&ai| ai * s).collect() };

    match rule {
        IntegratorRule::Midpoint => {
            let f1 = model.eval(x, u);
            let half = S::constant(0.5);
            let x_mid = add(x, &f1, dt * half);
            let f2 = model.eval(&x_mid, u);
            add(x, &f2, dt)
        }
        IntegratorRule::Rk3 => {
            let k1 = scale(&model.eval(x, u), dt);
            let x2 = add(x, &k1, S::constant(0.5));
            let k2 = scale(&model.eval(&x2, u), dt);
            // x - k1 + 2*k2
            let x3: Vec<S> = x
                .iter()
                .zip(k1.iter())
                .zip(k2.iter())
                .map(|((&xi, &k1i), &k2i)| xi - k1i + k2i * S::constant(2.0))
                .collect();
            let k3 = scale(&model.eval(&x3, u), dt);

            x.iter()
                .zip(k1.iter())
                .zip(k2.iter())
                .zip(k3.iter())
                .map(|(((&xi, &k1i), &k2i), &k3i)| {
                    xi + (k1i + k2i * S::constant(4.0) + k3i) * S::constant(1.0 / 6.0)
                })
                .collect()
        }
        IntegratorRule::Rk4 => {
            let half = S::constant(0.5);
            let k1 = scale(&model.eval(x, u), dt);
            let x2 = add(x, &k1, half);
            let k2 = scale(&model.eval(&x2, u), dt);
            let x3 = add(x, &k2, half);
            let k3 = scale(&model.eval(&x3, u), dt);
            let x4 = add(x, &k3, S::constant(1.0));
            let k4 = scale(&model.eval(&x4, u), dt);

            (0..x.len())
                .map(|i| {
                    x[i] + (k1[i] + k2[i] * S::constant(2.0) + k3[i] * S::constant(2.0) + k4[i])
                        * S::constant(1.0 / 6.0)
                })
                .collect()
        }
    }
}

/// `x' = f_d(x, u, Δt)` under the chosen integrator. Goes through
/// [`Dynamics::discrete_step`] rather than calling [`step`] directly, so a
/// wrapper model (e.g. the infeasible-start slack augmentation) can
/// replace the discretization itself instead of only perturbing the
/// continuous rate fed into it.
pub fn discrete_dynamics<D: Dynamics + ?Sized>(
    rule: IntegratorRule,
    model: &D,
    x: &DVector<f64>,
    u: &DVector<f64>,
    dt: f64,
) -> DVector<f64> {
    let xs: Vec<f64> = x.iter().copied().collect();
    let us: Vec<f64> = u.iter().copied().collect();
    DVector::from_vec(model.discrete_step(rule, &xs, &us, dt))
}

/// `(A, B) = (∂f_d/∂x, ∂f_d/∂u)` at `(x, u, Δt)`, via one dual-number sweep
/// per input direction through the whole discrete step (not a chain rule
/// through the continuous Jacobian — the integrator's intermediate stages
/// are differentiated exactly along with the dynamics). `scratch`'s
/// `xs`/`us` buffers are reused across knots and iterations: each sweep
/// overwrites one entry in place rather than collecting a fresh `Vec`,
/// keeping this function allocation-free for anything but `a`/`b`
/// themselves.
pub fn discrete_jacobian<D: Dynamics + ?Sized>(
    rule: IntegratorRule,
    model: &D,
    x: &DVector<f64>,
    u: &DVector<f64>,
    dt: f64,
    scratch: &mut JacobianScratch,
) -> (DMatrix<f64>, DMatrix<f64>) {
    let n = model.state_dim();
    let m = model.control_dim();
    let mut a = DMatrix::zeros(n, n);
    let mut b = DMatrix::zeros(n, m);

    for i in 0..n {
        scratch.xs[i] = Dual64::constant(x[i]);
    }
    for i in 0..m {
        scratch.us[i] = Dual64::constant(u[i]);
    }

    for i in 0..n {
        scratch.xs[i] = Dual64::variable(x[i]);
        let y = model.discrete_step(rule, &scratch.xs, &scratch.us, dt);
        scratch.xs[i] = Dual64::constant(x[i]);
        for row in 0..n {
            a[(row, i)] = y[row].eps;
        }
    }

    for i in 0..m {
        scratch.us[i] = Dual64::variable(u[i]);
        let y = model.discrete_step(rule, &scratch.xs, &scratch.us, dt);
        scratch.us[i] = Dual64::constant(u[i]);
        for row in 0..n {
            b[(row, i)] = y[row].eps;
        }
    }

    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::double_integrator::DoubleIntegrator;

    #[test]
    fn unknown_rule_is_invalid_input() {
        let err = IntegratorRule::from_str("euler").unwrap_err();
        assert!(matches!(err, AltroError::InvalidInput(_)));
    }

    #[test]
    fn known_rules_parse() {
        assert_eq!(IntegratorRule::from_str("midpoint").unwrap(), IntegratorRule::Midpoint);
        assert_eq!(IntegratorRule::from_str("RK3").unwrap(), IntegratorRule::Rk3);
        assert_eq!(IntegratorRule::from_str("rk4").unwrap(), IntegratorRule::Rk4);
    }

    #[test]
    fn double_integrator_rk4_matches_closed_form() {
        // ẋ = [v; u], a linear system every rule should integrate exactly.
        let model = DoubleIntegrator::new(1);
        let x = DVector::from_vec(vec![0.0, 1.0]);
        let u = DVector::from_vec(vec![0.5]);
        let dt = 0.1;
        let x_next = discrete_dynamics(IntegratorRule::Rk4, &model, &x, &u, dt);
        // exact solution for constant acceleration: p' = p + v*dt + 0.5*u*dt^2, v' = v + u*dt
        let expected_p = 0.0 + 1.0 * dt + 0.5 * 0.5 * dt * dt;
        let expected_v = 1.0 + 0.5 * dt;
        assert!((x_next[0] - expected_p).abs() < 1e-10);
        assert!((x_next[1] - expected_v).abs() < 1e-10);
    }
}
