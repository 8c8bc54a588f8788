//! The primary working set: state/control sequences, their line-search
//! shadows, per-step dynamics Jacobians, cost/constraint expansions, and
//! the backward pass's feedback gains and value-function quadratic.
//! Allocated once at solve start; every solver iteration mutates this
//! struct in place (see section 3's lifecycle note).

use crate::constraint::ConstraintExpansion;
use crate::cost::{StageExpansion, TerminalExpansion};
use crate::model::JacobianScratch;
use nalgebra::{DMatrix, DVector};

pub struct Trajectory {
    pub n: usize,
    pub m: usize,
    pub n_knots: usize,

    pub x: Vec<DVector<f64>>,
    pub u: Vec<DVector<f64>>,
    pub x_bar: Vec<DVector<f64>>,
    pub u_bar: Vec<DVector<f64>>,

    pub a: Vec<DMatrix<f64>>,
    pub b: Vec<DMatrix<f64>>,

    pub stage_cost: Vec<StageExpansion>,
    pub terminal_cost: TerminalExpansion,

    pub stage_constraints: Vec<ConstraintExpansion>,
    pub terminal_constraint: ConstraintExpansion,

    pub gain_k: Vec<DMatrix<f64>>,
    pub gain_d: Vec<DVector<f64>>,

    /// `S_k`, index `k` holds the value-function Hessian fed *into* the
    /// backward-pass step at knot `k` (i.e. `S_{k+1}` as used in the
    /// recursion); terminal value lives in `terminal_cost`/
    /// `terminal_constraint` and is not duplicated here.
    pub value_s: Vec<DMatrix<f64>>,
    pub value_s_vec: Vec<DVector<f64>>,

    /// Backing storage for [`crate::model::discrete_jacobian`]'s
    /// per-knot dual-number sweeps, allocated once here rather than once
    /// per knot per iteration.
    pub jac_scratch: JacobianScratch,
}

impl Trajectory {
    pub fn new(
        n: usize,
        m: usize,
        n_knots: usize,
        stage_p: usize,
        terminal_p: usize,
        penalty_initial: f64,
        x_init: &DVector<f64>,
    ) -> Self {
        assert_eq!(x_init.len(), n);
        let steps = n_knots - 1;

        let x = vec![x_init.clone(); n_knots];
        let x_bar = x.clone();
        let u = vec![DVector::zeros(m); steps];
        let u_bar = u.clone();

        let a = vec![DMatrix::zeros(n, n); steps];
        let b = vec![DMatrix::zeros(n, m); steps];

        let stage_cost = (0..steps)
            .map(|_| StageExpansion {
                l: 0.0,
                l_x: DVector::zeros(n),
                l_u: DVector::zeros(m),
                l_xx: DMatrix::zeros(n, n),
                l_uu: DMatrix::zeros(m, m),
                l_ux: DMatrix::zeros(m, n),
            })
            .collect();
        let terminal_cost = TerminalExpansion {
            l: 0.0,
            l_x: DVector::zeros(n),
            l_xx: DMatrix::zeros(n, n),
        };

        let stage_constraints = (0..steps)
            .map(|_| ConstraintExpansion::new(stage_p, n, m, penalty_initial))
            .collect();
        let terminal_constraint = ConstraintExpansion::new(terminal_p, n, 0, penalty_initial);

        let gain_k = vec![DMatrix::zeros(m, n); steps];
        let gain_d = vec![DVector::zeros(m); steps];
        let value_s = vec![DMatrix::zeros(n, n); steps];
        let value_s_vec = vec![DVector::zeros(n); steps];
        let jac_scratch = JacobianScratch::new(n, m);

        Trajectory {
            n,
            m,
            n_knots,
            x,
            u,
            x_bar,
            u_bar,
            a,
            b,
            stage_cost,
            terminal_cost,
            stage_constraints,
            terminal_constraint,
            gain_k,
            gain_d,
            value_s,
            value_s_vec,
            jac_scratch,
        }
    }

    pub fn steps(&self) -> usize {
        self.n_knots - 1
    }

    /// Commits the shadow rollout produced by an accepted forward pass as
    /// the new working trajectory.
    pub fn commit(&mut self) {
        std::mem::swap(&mut self.x, &mut self.x_bar);
        std::mem::swap(&mut self.u, &mut self.u_bar);
    }
}
