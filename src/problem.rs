//! The immutable problem description: horizon, step size, initial state,
//! dynamics model, cost, and constraint set. Resolved once at construction
//! and never mutated by the solver.

use crate::constraint::ConstraintSet;
use crate::cost::StageCost;
use crate::error::{AltroError, Result};
use crate::model::{Dynamics, IntegratorRule};
use nalgebra::DVector;

pub struct Problem<M: Dynamics, C: StageCost> {
    pub model: M,
    pub cost: C,
    pub constraints: ConstraintSet,
    pub rule: IntegratorRule,
    pub n_knots: usize,
    pub dt: f64,
    pub x_init: DVector<f64>,
}

impl<M: Dynamics, C: StageCost> Problem<M, C> {
    pub fn new(
        model: M,
        cost: C,
        constraints: ConstraintSet,
        rule: IntegratorRule,
        n_knots: usize,
        dt: f64,
        x_init: DVector<f64>,
    ) -> Result<Self> {
        if n_knots < 2 {
            return Err(AltroError::InvalidInput(format!(
                "n_knots must be >= 2 to have at least one control interval, got {n_knots}"
            )));
        }
        if dt <= 0.0 {
            return Err(AltroError::InvalidInput(format!("dt must be positive, got {dt}")));
        }
        if x_init.len() != model.state_dim() {
            return Err(AltroError::InvalidInput(format!(
                "x_init has dimension {} but model expects state dimension {}",
                x_init.len(),
                model.state_dim()
            )));
        }
        if cost.n() != model.state_dim() || cost.m() != model.control_dim() {
            return Err(AltroError::InvalidInput(format!(
                "cost dimensions ({}, {}) do not match model dimensions ({}, {})",
                cost.n(),
                cost.m(),
                model.state_dim(),
                model.control_dim()
            )));
        }

        Ok(Problem { model, cost, constraints, rule, n_knots, dt, x_init })
    }

    pub fn n(&self) -> usize {
        self.model.state_dim()
    }

    pub fn m(&self) -> usize {
        self.model.control_dim()
    }

    pub fn steps(&self) -> usize {
        self.n_knots - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::LqrCost;
    use crate::model::pendulum::Pendulum;
    use nalgebra::DMatrix;

    fn lqr_fixture() -> LqrCost {
        LqrCost::new(
            DMatrix::identity(2, 2) * 0.1,
            DMatrix::identity(1, 1) * 0.1,
            DMatrix::identity(2, 2) * 1000.0,
            DVector::from_vec(vec![std::f64::consts::PI, 0.0]),
        )
    }

    #[test]
    fn rejects_mismatched_initial_state() {
        let err = Problem::new(
            Pendulum::default(),
            lqr_fixture(),
            ConstraintSet::new(),
            IntegratorRule::Rk4,
            10,
            0.1,
            DVector::zeros(3),
        )
        .unwrap_err();
        assert!(matches!(err, AltroError::InvalidInput(_)));
    }

    #[test]
    fn rejects_non_positive_dt() {
        let err = Problem::new(
            Pendulum::default(),
            lqr_fixture(),
            ConstraintSet::new(),
            IntegratorRule::Rk4,
            10,
            0.0,
            DVector::zeros(2),
        )
        .unwrap_err();
        assert!(matches!(err, AltroError::InvalidInput(_)));
    }

    #[test]
    fn rejects_too_short_horizon() {
        let err = Problem::new(
            Pendulum::default(),
            lqr_fixture(),
            ConstraintSet::new(),
            IntegratorRule::Rk4,
            1,
            0.1,
            DVector::zeros(2),
        )
        .unwrap_err();
        assert!(matches!(err, AltroError::InvalidInput(_)));
    }
}
