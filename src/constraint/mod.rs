//! Constraint oracles and the per-knot constraint set. Values are always
//! reported so that `g(x,u) <= 0` (inequality) or `h(x,u) = 0` (equality);
//! a [`ConstraintSet`] packs inequality rows first and equality rows after,
//! matching the trajectory data model's row layout.

mod bound;
mod goal;
pub mod expansion;

pub use bound::BoundConstraint;
pub use goal::GoalConstraint;
pub use expansion::{al_value, ConstraintExpansion};

use nalgebra::{DMatrix, DVector};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    Inequality,
    Equality,
}

/// A stage constraint, evaluated at every non-terminal knot.
pub trait Constraint: Send + Sync {
    fn dim(&self) -> usize;
    fn kind(&self) -> ConstraintKind;
    /// Returns `(c, Cx, Cu)`; `c` is signed so that the feasible region is
    /// `c <= 0` for inequalities and `c == 0` for equalities.
    fn evaluate(&self, x: &DVector<f64>, u: &DVector<f64>) -> (DVector<f64>, DMatrix<f64>, DMatrix<f64>);
}

/// A terminal-only constraint, evaluated once at knot `N`.
pub trait TerminalConstraint: Send + Sync {
    fn dim(&self) -> usize;
    fn kind(&self) -> ConstraintKind;
    fn evaluate(&self, x: &DVector<f64>) -> (DVector<f64>, DMatrix<f64>);
}

/// The full collection of constraints attached to a problem. Construction
/// is the one place this crate reaches for `Box<dyn Trait>`: a problem can
/// carry any mix of registered constraint types at once, and this is a
/// cold, construction-time list — per-knot evaluation is a flat loop with
/// no branching on solver state.
#[derive(Default)]
pub struct ConstraintSet {
    stage: Vec<Box<dyn Constraint>>,
    terminal: Vec<Box<dyn TerminalConstraint>>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        ConstraintSet { stage: Vec::new(), terminal: Vec::new() }
    }

    pub fn add_stage(&mut self, c: Box<dyn Constraint>) {
        self.stage.push(c);
    }

    pub fn add_terminal(&mut self, c: Box<dyn TerminalConstraint>) {
        self.terminal.push(c);
    }

    pub fn stage_dim(&self) -> usize {
        self.stage.iter().map(|c| c.dim()).sum()
    }

    pub fn terminal_dim(&self) -> usize {
        self.terminal.iter().map(|c| c.dim()).sum()
    }

    /// Consumes the set, handing back its boxed stage and terminal
    /// constraints — used by the infeasible-start wrapper to rebuild an
    /// equivalent set around an augmented control vector.
    pub fn into_parts(self) -> (Vec<Box<dyn Constraint>>, Vec<Box<dyn TerminalConstraint>>) {
        (self.stage, self.terminal)
    }

    /// Evaluates every stage constraint at `(x, u)` and packs the result:
    /// inequality rows first, equality rows after. Returns the stacked
    /// `(c, Cx, Cu)` and the per-row kind for active-set bookkeeping.
    pub fn evaluate_stage(
        &self,
        x: &DVector<f64>,
        u: &DVector<f64>,
    ) -> (DVector<f64>, DMatrix<f64>, DMatrix<f64>, Vec<ConstraintKind>) {
        let n = x.len();
        let m = u.len();
        pack(
            self.stage.iter().map(|c| (c.kind(), c.evaluate(x, u))),
            n,
            m,
        )
    }

    /// Same as [`evaluate_stage`](Self::evaluate_stage) but for the
    /// terminal knot, where there is no control Jacobian (`Cu` is `p x 0`).
    pub fn evaluate_terminal(
        &self,
        x: &DVector<f64>,
    ) -> (DVector<f64>, DMatrix<f64>, DMatrix<f64>, Vec<ConstraintKind>) {
        let n = x.len();
        pack(
            self.terminal
                .iter()
                .map(|c| {
                    let (c_val, cx) = c.evaluate(x);
                    (c.kind(), (c_val, cx, DMatrix::zeros(c.dim(), 0)))
                }),
            n,
            0,
        )
    }
}

fn pack(
    blocks: impl Iterator<Item = (ConstraintKind, (DVector<f64>, DMatrix<f64>, DMatrix<f64>))>,
    n: usize,
    m: usize,
) -> (DVector<f64>, DMatrix<f64>, DMatrix<f64>, Vec<ConstraintKind>) {
    let blocks: Vec<_> = blocks.collect();
    let mut ordered: Vec<&(ConstraintKind, (DVector<f64>, DMatrix<f64>, DMatrix<f64>))> = blocks
        .iter()
        .filter(|(k, _)| *k == ConstraintKind::Inequality)
        .collect();
    ordered.extend(blocks.iter().filter(|(k, _)| *k == ConstraintKind::Equality));

    let p: usize = ordered.iter().map(|(_, (c, _, _))| c.len()).sum();
    let mut c = DVector::zeros(p);
    let mut cx = DMatrix::zeros(p, n);
    let mut cu = DMatrix::zeros(p, m);
    let mut kinds = Vec::with_capacity(p);

    let mut row = 0;
    for (kind, (block_c, block_cx, block_cu)) in ordered {
        let rows = block_c.len();
        for i in 0..rows {
            c[row + i] = block_c[i];
            for j in 0..n {
                cx[(row + i, j)] = block_cx[(i, j)];
            }
            for j in 0..m {
                cu[(row + i, j)] = block_cu[(i, j)];
            }
            kinds.push(*kind);
        }
        row += rows;
    }

    (c, cx, cu, kinds)
}
