//! The Riccati-like recursion: given dynamics Jacobians and the augmented
//! quadratic stage costs, sweeps backward from the terminal knot and emits
//! feedback gain `K`, feedforward `d`, and the value-function quadratic.
//! Section 4.D.

use crate::error::{AltroError, Result};
use crate::trajectory::Trajectory;
use nalgebra::{DMatrix, Cholesky};

/// Expected cost reduction terms accumulated across the sweep:
/// `ΔV(α) ≈ α·delta_v1 + α²·delta_v2`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpectedReduction {
    pub delta_v1: f64,
    pub delta_v2: f64,
}

impl ExpectedReduction {
    pub fn at(&self, alpha: f64) -> f64 {
        alpha * self.delta_v1 + alpha * alpha * self.delta_v2
    }
}

/// Runs one backward sweep at regularization `rho`. On a non-positive-
/// definite `Q̃_uu` at any knot, returns `Err(NotPositiveDefinite)`
/// immediately — gains and value function computed so far are stale and
/// must not be used; the caller increases `rho` and restarts the whole
/// sweep from the terminal knot (section 4.D).
pub fn backward_pass(traj: &mut Trajectory, rho: f64) -> Result<ExpectedReduction> {
    let steps = traj.steps();

    let (mut s, mut s_vec) = {
        let (l_x, l_xx) = traj.terminal_constraint.augment_terminal(&traj.terminal_cost);
        (l_xx, l_x)
    };

    let mut reduction = ExpectedReduction::default();

    for k in (0..steps).rev() {
        let (l_x, l_u, l_xx, l_uu, l_ux) = traj.stage_constraints[k].augment_stage(&traj.stage_cost[k]);
        let a = &traj.a[k];
        let b = &traj.b[k];

        let q_x = &l_x + a.transpose() * &s_vec;
        let q_u = &l_u + b.transpose() * &s_vec;
        let q_xx = &l_xx + a.transpose() * &s * a;
        let q_uu = &l_uu + b.transpose() * &s * b;
        let q_ux = &l_ux + b.transpose() * &s * a;

        let m = q_uu.nrows();
        let mut q_uu_reg = &q_uu + DMatrix::identity(m, m) * rho;
        q_uu_reg = (&q_uu_reg + q_uu_reg.transpose()) * 0.5;

        let chol = match Cholesky::new(q_uu_reg) {
            Some(c) => c,
            None => return Err(AltroError::NotPositiveDefinite(rho)),
        };

        let gain_k = -chol.solve(&q_ux);
        let gain_d = -chol.solve(&q_u);

        let mut s_new = &q_xx
            + gain_k.transpose() * &q_uu * &gain_k
            + gain_k.transpose() * &q_ux
            + q_ux.transpose() * &gain_k;
        s_new = (&s_new + s_new.transpose()) * 0.5;

        let s_vec_new =
            &q_x + gain_k.transpose() * &q_uu * &gain_d + gain_k.transpose() * &q_u + q_ux.transpose() * &gain_d;

        reduction.delta_v1 += gain_d.dot(&q_u);
        reduction.delta_v2 += 0.5 * gain_d.dot(&(&q_uu * &gain_d));

        traj.gain_k[k] = gain_k;
        traj.gain_d[k] = gain_d;
        traj.value_s[k] = s_new.clone();
        traj.value_s_vec[k] = s_vec_new.clone();

        s = s_new;
        s_vec = s_vec_new;
    }

    Ok(reduction)
}
