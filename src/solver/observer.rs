//! Caching/verbose/benchmark hooks (design notes 9's "observer" reading of
//! the source's diagnostic options), fired at outer- and inner-iteration
//! boundaries and never interleaved with the hot numeric loop.

pub trait SolverObserver {
    fn on_outer_iteration(&mut self, _outer: usize, _cost: f64, _constraint_violation: f64) {}
    fn on_inner_iteration(&mut self, _outer: usize, _inner: usize, _cost: f64, _rho: f64) {}
}

/// The default: does nothing. The solver always carries an observer
/// (never an `Option`), so the hot loop never branches on whether one is
/// attached.
#[derive(Default)]
pub struct NullObserver;

impl SolverObserver for NullObserver {}

/// Fills the `cache_trajectories`/`benchmark` diagnostic option's promise:
/// records a cost/constraint snapshot per outer and per inner iteration
/// without the solver branching on attachment.
#[derive(Default, Debug, Clone)]
pub struct RecordingObserver {
    pub outer: Vec<(usize, f64, f64)>,
    pub inner: Vec<(usize, usize, f64, f64)>,
}

impl SolverObserver for RecordingObserver {
    fn on_outer_iteration(&mut self, outer: usize, cost: f64, constraint_violation: f64) {
        self.outer.push((outer, cost, constraint_violation));
    }

    fn on_inner_iteration(&mut self, outer: usize, inner: usize, cost: f64, rho: f64) {
        self.inner.push((outer, inner, cost, rho));
    }
}
