//! Solver configuration. A plain struct, not a stringly-typed map — the
//! "unknown option name is a construction-time error" requirement is
//! satisfied by the type system itself: there is no key to mistype. Each
//! field mirrors one entry of the option table; [`SolverOptions::validate`]
//! is the only source of [`AltroError::InvalidInput`] for this struct.

use crate::error::{AltroError, Result};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct SolverOptions {
    /// Inner iLQR exit tolerance on `|ΔJ|` for the final outer iteration.
    pub cost_tolerance: f64,
    /// Inner iLQR exit tolerance on `|ΔJ|` for non-final outer iterations;
    /// looser than `cost_tolerance` so early AL iterations don't over-solve.
    pub cost_tolerance_intermediate: f64,
    /// AL exit tolerance on the constraint max-violation `c_max`.
    pub constraint_tolerance: f64,
    /// Max inner iLQR iterations per call.
    pub iterations: usize,
    /// Max outer AL iterations.
    pub iterations_outerloop: usize,
    /// Max line-search bisections per backward/forward attempt.
    pub iterations_linesearch: usize,
    /// Initial backward-pass regularization ρ.
    pub bp_reg_initial: f64,
    /// Multiplicative factor φ applied to ρ on a regularization increase.
    pub bp_reg_increase_factor: f64,
    /// Fatal threshold: the backward pass gives up once ρ exceeds this.
    pub bp_reg_max: f64,
    /// Floor under which ρ is clipped to exactly zero.
    pub bp_reg_min: f64,
    /// Initial penalty weight μ₀ for ordinary constraints.
    pub penalty_initial: f64,
    /// Initial penalty weight for infeasible-start slack-equality rows;
    /// larger than `penalty_initial` to squeeze slacks to zero quickly.
    pub penalty_initial_infeasible: f64,
    /// Multiplicative penalty growth factor (`mu_al_update`, φ) applied to
    /// rows whose constraint violation did not sufficiently shrink.
    pub penalty_scaling: f64,
    /// Sufficient-decrease lower bound c₁ for the line search ratio test.
    pub line_search_lower: f64,
    /// Sufficient-decrease upper bound c₂; `1.0` accepts any step that
    /// achieves at least the expected reduction (source convention).
    pub line_search_upper: f64,
    /// Use the square-root (QR-based) value-function update instead of the
    /// plain symmetric form. Rejected at construction if requested, since
    /// this implementation does not yet provide it (see `validate`).
    pub square_root: bool,
    /// Treat the supplied initial trajectory as dynamically inconsistent
    /// and solve via the infeasible-start slack-control augmentation.
    pub infeasible_start: bool,
    /// Emit `log` records at outer/inner iteration boundaries.
    pub verbose: bool,
    /// Retain a `RecordingObserver`-style snapshot of each iteration.
    pub cache_trajectories: bool,
    /// Reserved for timing instrumentation; diagnostic only, never gates
    /// numerical behavior.
    pub benchmark: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            cost_tolerance: 1e-5,
            cost_tolerance_intermediate: 1e-2,
            constraint_tolerance: 1e-2,
            iterations: 100,
            iterations_outerloop: 25,
            iterations_linesearch: 25,
            bp_reg_initial: 0.0,
            bp_reg_increase_factor: 1.6,
            bp_reg_max: 1e8,
            bp_reg_min: 1e-8,
            penalty_initial: 1.0,
            penalty_initial_infeasible: 1e3,
            penalty_scaling: 100.0,
            line_search_lower: 1e-4,
            line_search_upper: 1.0,
            square_root: false,
            infeasible_start: false,
            verbose: false,
            cache_trajectories: false,
            benchmark: false,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f64| -> Result<()> {
            if v <= 0.0 {
                Err(AltroError::InvalidInput(format!("{name} must be positive, got {v}")))
            } else {
                Ok(())
            }
        };

        positive("cost_tolerance", self.cost_tolerance)?;
        positive("cost_tolerance_intermediate", self.cost_tolerance_intermediate)?;
        positive("constraint_tolerance", self.constraint_tolerance)?;
        positive("bp_reg_increase_factor", self.bp_reg_increase_factor)?;
        positive("bp_reg_max", self.bp_reg_max)?;
        positive("penalty_initial", self.penalty_initial)?;
        positive("penalty_initial_infeasible", self.penalty_initial_infeasible)?;
        positive("penalty_scaling", self.penalty_scaling)?;

        if self.bp_reg_initial < 0.0 {
            return Err(AltroError::InvalidInput("bp_reg_initial must be >= 0".into()));
        }
        if self.bp_reg_min < 0.0 {
            return Err(AltroError::InvalidInput("bp_reg_min must be >= 0".into()));
        }
        if self.iterations == 0 {
            return Err(AltroError::InvalidInput("iterations must be >= 1".into()));
        }
        if self.iterations_outerloop == 0 {
            return Err(AltroError::InvalidInput("iterations_outerloop must be >= 1".into()));
        }
        if self.iterations_linesearch == 0 {
            return Err(AltroError::InvalidInput("iterations_linesearch must be >= 1".into()));
        }
        if self.line_search_lower <= 0.0 || self.line_search_lower >= self.line_search_upper {
            return Err(AltroError::InvalidInput(
                "line_search_lower must be positive and less than line_search_upper".into(),
            ));
        }
        if self.square_root {
            return Err(AltroError::InvalidInput(
                "square_root mode is not implemented by this solver".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        SolverOptions::default().validate().unwrap();
    }

    #[test]
    fn negative_tolerance_is_invalid() {
        let mut opts = SolverOptions::default();
        opts.cost_tolerance = -1.0;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn zero_linesearch_iterations_is_invalid() {
        let mut opts = SolverOptions::default();
        opts.iterations_linesearch = 0;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn square_root_is_rejected() {
        let mut opts = SolverOptions::default();
        opts.square_root = true;
        assert!(opts.validate().is_err());
    }
}
