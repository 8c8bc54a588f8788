use super::{Constraint, ConstraintKind};
use nalgebra::{DMatrix, DVector};

#[derive(Clone, Copy)]
struct BoundRow {
    on_control: bool,
    index: usize,
    bound: f64,
    upper: bool,
}

/// Box constraints on state and/or control: `x_min <= x <= x_max`,
/// `u_min <= u <= u_max`. Each finite bound becomes one inequality row;
/// `f64::INFINITY`/`NEG_INFINITY` entries are elided rather than kept as
/// dead rows, per the external-interfaces contract.
pub struct BoundConstraint {
    rows: Vec<BoundRow>,
    n: usize,
    m: usize,
}

impl BoundConstraint {
    pub fn new(
        x_min: &DVector<f64>,
        x_max: &DVector<f64>,
        u_min: &DVector<f64>,
        u_max: &DVector<f64>,
    ) -> Self {
        let n = x_min.len();
        let m = u_min.len();
        assert_eq!(x_max.len(), n);
        assert_eq!(u_max.len(), m);

        let mut rows = Vec::new();
        for i in 0..n {
            if x_max[i].is_finite() {
                rows.push(BoundRow { on_control: false, index: i, bound: x_max[i], upper: true });
            }
            if x_min[i].is_finite() {
                rows.push(BoundRow { on_control: false, index: i, bound: x_min[i], upper: false });
            }
        }
        for i in 0..m {
            if u_max[i].is_finite() {
                rows.push(BoundRow { on_control: true, index: i, bound: u_max[i], upper: true });
            }
            if u_min[i].is_finite() {
                rows.push(BoundRow { on_control: true, index: i, bound: u_min[i], upper: false });
            }
        }

        BoundConstraint { rows, n, m }
    }

    /// Only control bounds (no state rows) — the common case for a
    /// torque/force-limited actuator.
    pub fn control_only(u_min: DVector<f64>, u_max: DVector<f64>, n: usize) -> Self {
        let inf = DVector::from_element(n, f64::INFINITY);
        let neg_inf = DVector::from_element(n, f64::NEG_INFINITY);
        Self::new(&neg_inf, &inf, &u_min, &u_max)
    }
}

impl Constraint for BoundConstraint {
    fn dim(&self) -> usize {
        self.rows.len()
    }

    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Inequality
    }

    fn evaluate(
        &self,
        x: &DVector<f64>,
        u: &DVector<f64>,
    ) -> (DVector<f64>, DMatrix<f64>, DMatrix<f64>) {
        let p = self.rows.len();
        let mut c = DVector::zeros(p);
        let mut cx = DMatrix::zeros(p, self.n);
        let mut cu = DMatrix::zeros(p, self.m);

        for (row, b) in self.rows.iter().enumerate() {
            let (value, jac_sign) = if b.on_control {
                (u[b.index], 1.0)
            } else {
                (x[b.index], 1.0)
            };
            let sign = if b.upper { 1.0 } else { -1.0 };
            c[row] = sign * (value - b.bound);
            if b.on_control {
                cu[(row, b.index)] = sign * jac_sign;
            } else {
                cx[(row, b.index)] = sign * jac_sign;
            }
        }

        (c, cx, cu)
    }
}
