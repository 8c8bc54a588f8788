use super::{ConstraintKind, TerminalConstraint};
use nalgebra::{DMatrix, DVector};

/// Terminal equality `x_N - x_f = 0`. Driven to (near-)exact satisfaction
/// by the AL multipliers, unlike a quadratic terminal cost alone.
pub struct GoalConstraint {
    x_f: DVector<f64>,
}

impl GoalConstraint {
    pub fn new(x_f: DVector<f64>) -> Self {
        GoalConstraint { x_f }
    }
}

impl TerminalConstraint for GoalConstraint {
    fn dim(&self) -> usize {
        self.x_f.len()
    }

    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Equality
    }

    fn evaluate(&self, x: &DVector<f64>) -> (DVector<f64>, DMatrix<f64>) {
        let c = x - &self.x_f;
        let cx = DMatrix::identity(self.x_f.len(), x.len());
        (c, cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_at_goal() {
        let x_f = DVector::from_vec(vec![1.0, 2.0]);
        let gc = GoalConstraint::new(x_f.clone());
        let (c, cx) = gc.evaluate(&x_f);
        assert!(c.norm() < 1e-12);
        assert_eq!(cx, DMatrix::identity(2, 2));
    }
}
