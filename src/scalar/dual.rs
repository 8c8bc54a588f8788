use super::ADScalar;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A forward-mode dual number carrying one directional derivative alongside
/// its value: `val + eps * epsilon`, with `epsilon^2 = 0`.
///
/// Differentiating a [`Dynamics`](crate::model::Dynamics) implementation
/// with respect to a single input component amounts to seeding that
/// component's `eps` to `1.0` and every other input's `eps` to `0.0`, then
/// reading `.eps` off the result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dual64 {
    pub val: f64,
    pub eps: f64,
}

impl Dual64 {
    pub fn new(val: f64, eps: f64) -> Self {
        Dual64 { val, eps }
    }

    /// A constant with no dependence on the differentiation direction.
    pub fn constant(val: f64) -> Self {
        Dual64 { val, eps: 0.0 }
    }

    /// The seed value for the direction being differentiated.
    pub fn variable(val: f64) -> Self {
        Dual64 { val, eps: 1.0 }
    }
}

impl Add for Dual64 {
    type Output = Dual64;
    fn add(self, rhs: Dual64) -> Dual64 {
        Dual64::new(self.val + rhs.val, self.eps + rhs.eps)
    }
}

impl Sub for Dual64 {
    type Output = Dual64;
    fn sub(self, rhs: Dual64) -> Dual64 {
        Dual64::new(self.val - rhs.val, self.eps - rhs.eps)
    }
}

impl Mul for Dual64 {
    type Output = Dual64;
    fn mul(self, rhs: Dual64) -> Dual64 {
        Dual64::new(self.val * rhs.val, self.val * rhs.eps + self.eps * rhs.val)
    }
}

impl Div for Dual64 {
    type Output = Dual64;
    fn div(self, rhs: Dual64) -> Dual64 {
        Dual64::new(
            self.val / rhs.val,
            (self.eps * rhs.val - self.val * rhs.eps) / (rhs.val * rhs.val),
        )
    }
}

impl Neg for Dual64 {
    type Output = Dual64;
    fn neg(self) -> Dual64 {
        Dual64::new(-self.val, -self.eps)
    }
}

impl ADScalar for Dual64 {
    fn constant(v: f64) -> Self {
        Dual64::constant(v)
    }

    fn sin(self) -> Self {
        Dual64::new(self.val.sin(), self.eps * self.val.cos())
    }

    fn cos(self) -> Self {
        Dual64::new(self.val.cos(), -self.eps * self.val.sin())
    }

    fn sqrt(self) -> Self {
        let s = self.val.sqrt();
        Dual64::new(s, self.eps / (2.0 * s))
    }

    fn powi(self, n: i32) -> Self {
        Dual64::new(
            self.val.powi(n),
            self.eps * (n as f64) * self.val.powi(n - 1),
        )
    }

    fn value(self) -> f64 {
        self.val
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_of_sin_matches_cos() {
        let x = Dual64::variable(0.7);
        let y = x.sin();
        assert!((y.eps - 0.7_f64.cos()).abs() < 1e-12);
    }

    #[test]
    fn product_rule() {
        let x = Dual64::variable(2.0);
        let y = Dual64::constant(3.0);
        let z = x * x + y;
        // d/dx (x^2 + 3) at x=2 is 2x = 4
        assert!((z.eps - 4.0).abs() < 1e-12);
        assert!((z.val - 7.0).abs() < 1e-12);
    }
}
