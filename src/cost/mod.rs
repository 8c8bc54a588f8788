//! Stage and terminal cost oracles and their quadratic expansions, the raw
//! material the backward pass consumes after the augmented-Lagrangian
//! terms from [`crate::constraint`] are folded in.

mod lqr;

pub use lqr::LqrCost;

use nalgebra::{DMatrix, DVector};

/// Quadratic model of a stage cost `l(x, u)` at one knot:
/// `l, l_x, l_u, l_xx, l_uu, l_ux`.
#[derive(Clone, Debug)]
pub struct StageExpansion {
    pub l: f64,
    pub l_x: DVector<f64>,
    pub l_u: DVector<f64>,
    pub l_xx: DMatrix<f64>,
    pub l_uu: DMatrix<f64>,
    pub l_ux: DMatrix<f64>,
}

/// Quadratic model of the terminal cost `l_f(x_N)`: `l, l_x, l_xx`.
#[derive(Clone, Debug)]
pub struct TerminalExpansion {
    pub l: f64,
    pub l_x: DVector<f64>,
    pub l_xx: DMatrix<f64>,
}

/// A stage-cost oracle, evaluated and quadratically expanded at every
/// knot. A prebuilt LQR cost (`LqrCost`) is the standard fixture; user
/// costs implement this trait directly.
pub trait StageCost: Send + Sync {
    fn n(&self) -> usize;
    fn m(&self) -> usize;

    fn stage(&self, x: &DVector<f64>, u: &DVector<f64>) -> StageExpansion;
    fn terminal(&self, x: &DVector<f64>) -> TerminalExpansion;
}
