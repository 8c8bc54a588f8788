//! Error kinds. Only [`AltroError::InvalidInput`] is ever returned to a
//! caller as an `Err` — it fires at construction (`Problem::new`,
//! `Solver::new`, or an initial-guess shape check) and leaves no partial
//! solver state behind. `RegularizationMax`, `LineSearchFailure`,
//! `ConstraintViolation`, and `Cancelled` are solve-time outcomes, not
//! thrown errors: section 6 of the spec lists all four as members of the
//! solver's returned status tag, so the solve-time variant of this enum
//! ([`NotPositiveDefinite`](AltroError::NotPositiveDefinite)) is used only
//! as an internal sentinel inside the backward-pass retry loop and is
//! converted to a [`crate::solver::SolveStatus`] before it ever reaches a
//! caller — never unwound as an `Err` that would discard the best
//! trajectory found so far.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AltroError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AltroError {
    /// Raised at construction: unknown integrator name, negative Δt,
    /// dimension mismatch, a malformed `SolverOptions`, or a warm-start
    /// trajectory/multiplier of the wrong shape. No partial solver state
    /// is returned when this fires.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The regularized control Hessian Q̃_uu failed to factor as positive
    /// definite at the knot given regularization `rho`. Caught internally
    /// by the backward pass's caller, which increases `rho` and restarts
    /// the sweep; never surfaces to a solver caller directly — the solver
    /// reports a ceiling hit as `SolveStatus::RegularizationMax` instead.
    #[error("Q_uu regularized by rho={0} is not positive definite")]
    NotPositiveDefinite(f64),

    /// Internal sentinel returned by [`crate::solver::regularization::Regularization::increase`]
    /// once `rho` would exceed `bp_reg_max`; the inner iLQR driver converts
    /// this into `SolveStatus::RegularizationMax` (or `LineSearchFailure`,
    /// if the ceiling was hit while retrying a rejected line search rather
    /// than a failed Cholesky factorization) rather than propagating it.
    #[error("regularization exceeded bp_reg_max ({0}) without a positive definite Q_uu")]
    RegularizationMax(f64),
}
