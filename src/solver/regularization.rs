//! The ρ/dρ schedule described in section 4.D: geometric growth on a
//! non-positive-definite backward pass or a line-search failure, geometric
//! decay (clipped to exactly zero near the floor) on an accepted step.

use crate::error::{AltroError, Result};

pub struct Regularization {
    pub rho: f64,
    pub drho: f64,
    rho_min: f64,
    rho_max: f64,
    phi: f64,
}

impl Regularization {
    pub fn new(initial: f64, rho_min: f64, rho_max: f64, phi: f64) -> Self {
        Regularization { rho: initial, drho: 1.0, rho_min, rho_max, phi }
    }

    /// Called after a failed backward pass (non-PD `Q̃_uu`) or a line-search
    /// exhaustion. Returns `Err(RegularizationMax)` once `rho` would exceed
    /// the configured ceiling — fatal, per section 7's error table.
    pub fn increase(&mut self) -> Result<()> {
        self.drho = (self.drho * self.phi).max(self.phi);
        self.rho = (self.rho * self.drho).max(self.rho_min);
        if self.rho > self.rho_max {
            return Err(AltroError::RegularizationMax(self.rho));
        }
        Ok(())
    }

    /// Called after an accepted forward-pass step.
    pub fn decrease(&mut self) {
        self.drho = (self.drho / self.phi).min(1.0 / self.phi);
        self.rho *= self.drho;
        if self.rho < self.rho_min {
            self.rho = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increase_then_decrease_is_not_identity() {
        let mut reg = Regularization::new(0.0, 1e-8, 1e8, 1.6);
        reg.increase().unwrap();
        let after_increase = reg.rho;
        assert!(after_increase > 0.0);
        reg.decrease();
        assert!(reg.rho <= after_increase);
    }

    #[test]
    fn exceeding_max_is_fatal() {
        let mut reg = Regularization::new(1e7, 1e-8, 1e8, 1.6);
        // repeated increases should eventually exceed rho_max
        let mut result = Ok(());
        for _ in 0..10 {
            result = reg.increase();
            if result.is_err() {
                break;
            }
        }
        assert!(result.is_err());
    }
}
