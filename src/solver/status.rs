//! The solver's terminal status and per-iteration diagnostic history
//! (section 6's "Return value").

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    Converged,
    MaxIterations,
    LineSearchFailure,
    RegularizationMax,
    Cancelled,
    InvalidInput,
    /// Not in section 6's enumerated status set, but named explicitly by
    /// section 7's error table ("returned as status, not thrown; caller
    /// decides") — see DESIGN.md for this reconciliation. Raised when the
    /// AL outer loop exhausts `iterations_outerloop` with `c_max` still
    /// above `constraint_tolerance`.
    ConstraintViolation,
}

/// Per-outer-iteration cost/constraint diagnostics, plus the solve's final
/// regularization and penalty state — kept for diagnosis, not used by the
/// solver itself once returned.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct SolveHistory {
    pub cost: Vec<f64>,
    pub constraint_violation: Vec<f64>,
    pub inner_iterations: Vec<usize>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub history: SolveHistory,
    pub outer_iterations: usize,
    pub final_rho: f64,
    pub final_mu_max: f64,
}
