//! Planar (2D) quadrotor: thrust-differential underactuated fixture.
//! State `x = [px, pz, θ, vx, vz, θ̇]`, controls `u = [f1, f2]` (per-rotor
//! thrust). A test fixture, not core — see the purpose/scope Non-goals.

use super::Dynamics;
use crate::scalar::ADScalar;

#[derive(Clone, Copy, Debug)]
pub struct PlanarQuadrotor {
    pub mass: f64,
    pub arm_length: f64,
    pub inertia: f64,
    pub gravity: f64,
}

impl Default for PlanarQuadrotor {
    fn default() -> Self {
        PlanarQuadrotor {
            mass: 0.5,
            arm_length: 0.17,
            inertia: 0.0023,
            gravity: 9.81,
        }
    }
}

impl Dynamics for PlanarQuadrotor {
    fn state_dim(&self) -> usize {
        6
    }

    fn control_dim(&self) -> usize {
        2
    }

    fn eval<S: ADScalar>(&self, x: &[S], u: &[S]) -> Vec<S> {
        let mass = S::constant(self.mass);
        let arm = S::constant(self.arm_length);
        let inertia = S::constant(self.inertia);
        let gravity = S::constant(self.gravity);

        let theta = x[2];
        let vx = x[3];
        let vz = x[4];
        let theta_dot = x[5];
        let f1 = u[0];
        let f2 = u[1];

        let total_thrust = f1 + f2;
        let ax = -(total_thrust) * theta.sin() / mass;
        let az = (total_thrust) * theta.cos() / mass - gravity;
        let theta_ddot = arm * (f2 - f1) / inertia;

        vec![vx, vz, theta_dot, ax, az, theta_ddot]
    }
}
