use super::{StageCost, StageExpansion, TerminalExpansion};
use nalgebra::{DMatrix, DVector};

/// `l = ½(x-x_f)ᵀQ(x-x_f) + ½uᵀRu`, terminal `½(x-x_f)ᵀQ_f(x-x_f)`. The
/// standard cost fixture named in the external-interfaces contract.
#[derive(Clone, Debug)]
pub struct LqrCost {
    q: DMatrix<f64>,
    r: DMatrix<f64>,
    q_f: DMatrix<f64>,
    x_f: DVector<f64>,
}

impl LqrCost {
    pub fn new(q: DMatrix<f64>, r: DMatrix<f64>, q_f: DMatrix<f64>, x_f: DVector<f64>) -> Self {
        assert_eq!(q.nrows(), q.ncols());
        assert_eq!(q_f.nrows(), q_f.ncols());
        assert_eq!(r.nrows(), r.ncols());
        assert_eq!(q.nrows(), x_f.len());
        assert_eq!(q.nrows(), q_f.nrows());
        LqrCost { q, r, q_f, x_f }
    }
}

impl StageCost for LqrCost {
    fn n(&self) -> usize {
        self.q.nrows()
    }

    fn m(&self) -> usize {
        self.r.nrows()
    }

    fn stage(&self, x: &DVector<f64>, u: &DVector<f64>) -> StageExpansion {
        let dx = x - &self.x_f;
        let l = 0.5 * (dx.transpose() * &self.q * &dx)[(0, 0)]
            + 0.5 * (u.transpose() * &self.r * u)[(0, 0)];
        StageExpansion {
            l,
            l_x: &self.q * &dx,
            l_u: &self.r * u,
            l_xx: self.q.clone(),
            l_uu: self.r.clone(),
            l_ux: DMatrix::zeros(self.m(), self.n()),
        }
    }

    fn terminal(&self, x: &DVector<f64>) -> TerminalExpansion {
        let dx = x - &self.x_f;
        let l = 0.5 * (dx.transpose() * &self.q_f * &dx)[(0, 0)];
        TerminalExpansion {
            l,
            l_x: &self.q_f * &dx,
            l_xx: self.q_f.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_at_target_with_zero_control() {
        let n = 2;
        let m = 1;
        let q = DMatrix::identity(n, n);
        let r = DMatrix::identity(m, m);
        let q_f = DMatrix::identity(n, n) * 10.0;
        let x_f = DVector::from_vec(vec![1.0, 0.0]);
        let cost = LqrCost::new(q, r, q_f, x_f.clone());

        let exp = cost.stage(&x_f, &DVector::zeros(m));
        assert!(exp.l.abs() < 1e-12);
        assert!(exp.l_x.norm() < 1e-12);
    }
}
