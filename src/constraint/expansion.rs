//! Assembly of the augmented-Lagrangian stage cost
//! `l̃ = l + λᵀc + ½cᵀIμc` and its gradients/Hessians, per section 4.B.
//! The constraint's own second derivative is dropped (Gauss–Newton
//! approximation) — this is the approximation that makes AL+iLQR
//! tractable and is a required semantic, not an optimization shortcut.

use super::ConstraintKind;
use crate::cost::{StageExpansion, TerminalExpansion};
use nalgebra::{DMatrix, DVector};

/// Per-knot constraint evaluation and AL bookkeeping: values, Jacobians,
/// multipliers, penalties, and the resulting active-set mask.
#[derive(Clone, Debug)]
pub struct ConstraintExpansion {
    pub c: DVector<f64>,
    pub cx: DMatrix<f64>,
    pub cu: DMatrix<f64>,
    pub kinds: Vec<ConstraintKind>,
    pub lambda: DVector<f64>,
    pub mu: DVector<f64>,
}

impl ConstraintExpansion {
    pub fn new(p: usize, n: usize, m: usize, penalty_initial: f64) -> Self {
        ConstraintExpansion {
            c: DVector::zeros(p),
            cx: DMatrix::zeros(p, n),
            cu: DMatrix::zeros(p, m),
            kinds: Vec::with_capacity(p),
            lambda: DVector::zeros(p),
            mu: DVector::from_element(p, penalty_initial),
        }
    }

    /// Rows contributing to the augmented Hessian: inequality rows active
    /// iff `c_i > 0 || lambda_i > 0`; equality rows always active.
    pub fn active_mask(&self) -> Vec<bool> {
        self.kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| match kind {
                ConstraintKind::Equality => true,
                ConstraintKind::Inequality => self.c[i] > 0.0 || self.lambda[i] > 0.0,
            })
            .collect()
    }

    fn active_penalty_times_c(&self) -> DVector<f64> {
        let active = self.active_mask();
        DVector::from_iterator(
            self.c.len(),
            (0..self.c.len()).map(|i| if active[i] { self.mu[i] * self.c[i] } else { 0.0 }),
        )
    }

    /// `mu` restricted to active rows, zero elsewhere — the diagonal of
    /// `Iμ` materialized as a plain vector.
    fn active_penalty(&self) -> DVector<f64> {
        let active = self.active_mask();
        DVector::from_iterator(
            self.c.len(),
            (0..self.c.len()).map(|i| if active[i] { self.mu[i] } else { 0.0 }),
        )
    }

    fn scale_rows(&self, jac: &DMatrix<f64>, weights: &DVector<f64>) -> DMatrix<f64> {
        let mut scaled = jac.clone();
        for row in 0..jac.nrows() {
            for col in 0..jac.ncols() {
                scaled[(row, col)] *= weights[row];
            }
        }
        scaled
    }

    /// `leftᵀ Iμ right`, e.g. `Cxᵀ Iμ Cx` when `left == right == Cx`, or
    /// `Cuᵀ Iμ Cx` for the cross term.
    fn weighted_cross(&self, left: &DMatrix<f64>, right: &DMatrix<f64>) -> DMatrix<f64> {
        let weights = self.active_penalty();
        left.transpose() * self.scale_rows(right, &weights)
    }

    fn weighted_gram(&self, jac: &DMatrix<f64>) -> DMatrix<f64> {
        self.weighted_cross(jac, jac)
    }

    /// `λ + Iμ·c`, the vector multiplying each Jacobian in the gradient.
    fn dual_term(&self) -> DVector<f64> {
        &self.lambda + self.active_penalty_times_c()
    }

    pub fn augmented_cost(&self) -> f64 {
        al_value(&self.c, &self.lambda, &self.mu, &self.kinds)
    }

    /// Adds the AL terms onto a stage's quadratic cost model, returning the
    /// combined `L_x, L_u, L_xx, L_uu, L_ux`.
    pub fn augment_stage(
        &self,
        stage: &StageExpansion,
    ) -> (DVector<f64>, DVector<f64>, DMatrix<f64>, DMatrix<f64>, DMatrix<f64>) {
        let dual = self.dual_term();
        let l_x = &stage.l_x + self.cx.transpose() * &dual;
        let l_u = &stage.l_u + self.cu.transpose() * &dual;
        let l_xx = &stage.l_xx + self.weighted_gram(&self.cx);
        let l_uu = &stage.l_uu + self.weighted_gram(&self.cu);
        let l_ux = &stage.l_ux + self.weighted_cross(&self.cu, &self.cx);
        (l_x, l_u, l_xx, l_uu, l_ux)
    }

    /// Same as [`augment_stage`](Self::augment_stage) but for the terminal
    /// knot, where there is no control Jacobian.
    pub fn augment_terminal(&self, terminal: &TerminalExpansion) -> (DVector<f64>, DMatrix<f64>) {
        let dual = self.dual_term();
        let l_x = &terminal.l_x + self.cx.transpose() * &dual;
        let l_xx = &terminal.l_xx + self.weighted_gram(&self.cx);
        (l_x, l_xx)
    }
}

/// `λᵀc + ½cᵀIμc` evaluated at an arbitrary `c` against fixed multipliers
/// and penalties — used by the forward-pass line search to re-score a
/// candidate rollout's constraint values without materializing a full
/// [`ConstraintExpansion`] (no Jacobians are needed there).
pub fn al_value(c: &DVector<f64>, lambda: &DVector<f64>, mu: &DVector<f64>, kinds: &[ConstraintKind]) -> f64 {
    let mut total = 0.0;
    for i in 0..c.len() {
        let active = match kinds[i] {
            ConstraintKind::Equality => true,
            ConstraintKind::Inequality => c[i] > 0.0 || lambda[i] > 0.0,
        };
        total += lambda[i] * c[i];
        if active {
            total += 0.5 * mu[i] * c[i] * c[i];
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_inequality_contributes_nothing() {
        let mut exp = ConstraintExpansion::new(1, 2, 1, 1.0);
        exp.kinds = vec![ConstraintKind::Inequality];
        exp.c[0] = -1.0; // strictly feasible
        exp.lambda[0] = 0.0;
        exp.cx = DMatrix::from_row_slice(1, 2, &[1.0, 0.0]);

        let stage = StageExpansion {
            l: 0.0,
            l_x: DVector::zeros(2),
            l_u: DVector::zeros(1),
            l_xx: DMatrix::identity(2, 2),
            l_uu: DMatrix::identity(1, 1),
            l_ux: DMatrix::zeros(1, 2),
        };
        let (l_x, _l_u, l_xx, _l_uu, _l_ux) = exp.augment_stage(&stage);
        assert!(l_x.norm() < 1e-12);
        assert_eq!(l_xx, DMatrix::identity(2, 2));
    }

    #[test]
    fn active_inequality_adds_penalty_gram() {
        let mut exp = ConstraintExpansion::new(1, 2, 1, 2.0);
        exp.kinds = vec![ConstraintKind::Inequality];
        exp.c[0] = 1.0; // violated -> active
        exp.cx = DMatrix::from_row_slice(1, 2, &[1.0, 0.0]);

        let stage = StageExpansion {
            l: 0.0,
            l_x: DVector::zeros(2),
            l_u: DVector::zeros(1),
            l_xx: DMatrix::zeros(2, 2),
            l_uu: DMatrix::zeros(1, 1),
            l_ux: DMatrix::zeros(1, 2),
        };
        let (l_x, _l_u, l_xx, _l_uu, _l_ux) = exp.augment_stage(&stage);
        // L_x = Cx^T * (lambda + mu*c) = [1,0]^T * (0 + 2*1) = [2, 0]
        assert!((l_x[0] - 2.0).abs() < 1e-12);
        assert!((l_xx[(0, 0)] - 2.0).abs() < 1e-12);
    }
}
