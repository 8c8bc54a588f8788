//! Single-link torque-actuated pendulum: the swing-up fixture used by the
//! end-to-end solver scenarios.

use super::Dynamics;
use crate::scalar::ADScalar;

/// `ẋ = [x2; (u - b*x2 - m*g*l*sin(x1)) / I]`, state `x = [θ, θ̇]`.
#[derive(Clone, Copy, Debug)]
pub struct Pendulum {
    pub mass: f64,
    pub length: f64,
    pub damping: f64,
    pub gravity: f64,
}

impl Pendulum {
    pub fn new(mass: f64, length: f64, damping: f64, gravity: f64) -> Self {
        Pendulum { mass, length, damping, gravity }
    }

    fn inertia(&self) -> f64 {
        self.mass * self.length * self.length
    }
}

impl Default for Pendulum {
    fn default() -> Self {
        Pendulum::new(1.0, 0.5, 0.1, 9.81)
    }
}

impl Dynamics for Pendulum {
    fn state_dim(&self) -> usize {
        2
    }

    fn control_dim(&self) -> usize {
        1
    }

    fn eval<S: ADScalar>(&self, x: &[S], u: &[S]) -> Vec<S> {
        let inertia = S::constant(self.inertia());
        let b = S::constant(self.damping);
        let mgl = S::constant(self.mass * self.gravity * self.length);

        let theta = x[0];
        let theta_dot = x[1];
        let torque = u[0];

        let theta_ddot = (torque - theta_dot * b - theta.sin() * mgl) / inertia;
        vec![theta_dot, theta_ddot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    #[test]
    fn upright_equilibrium_with_zero_torque_is_not_stationary_at_bottom() {
        let model = Pendulum::default();
        let x = DVector::from_vec(vec![0.0, 0.0]);
        let u = DVector::from_vec(vec![0.0]);
        let xdot = model.dynamics(&x, &u);
        // hanging straight down: sin(0) = 0, so zero acceleration.
        assert!((xdot[1]).abs() < 1e-12);
    }

    #[test]
    fn jacobian_matches_analytic_linearization_at_hang_down() {
        let model = Pendulum::default();
        let x = DVector::from_vec(vec![0.0, 0.0]);
        let u = DVector::from_vec(vec![0.0]);
        let (a, b) = model.jacobian(&x, &u);
        let inertia = model.inertia();
        // ∂θ̈/∂θ = -mgl*cos(θ)/I = -mgl/I at θ=0
        let expected = -(model.mass * model.gravity * model.length) / inertia;
        assert!((a[(1, 0)] - expected).abs() < 1e-9);
        assert!((a[(1, 1)] - (-model.damping / inertia)).abs() < 1e-9);
        assert!((b[(1, 0)] - (1.0 / inertia)).abs() < 1e-9);
        assert!((a[(0, 1)] - 1.0).abs() < 1e-9);
    }
}
