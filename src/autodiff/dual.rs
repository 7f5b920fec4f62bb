//! Forward-mode automatic differentiation via `f64` dual numbers.
//!
//! A [`Dual`] evaluates a function and its directional derivative in one
//! pass. Seed the input of interest with [`Dual::var`] and every other input
//! with [`Dual::constant`]; the `dot` field of the result is the partial
//! derivative with respect to the seeded input.

use std::f64::consts::PI;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A dual number `val + dot·ε` with `ε² = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual {
    /// Primal (function) value.
    pub val: f64,
    /// Tangent (derivative) value.
    pub dot: f64,
}

impl Dual {
    /// Create a constant (derivative = 0).
    #[inline]
    pub fn constant(val: f64) -> Self {
        Self { val, dot: 0.0 }
    }

    /// Create an independent variable (derivative = 1).
    #[inline]
    pub fn var(val: f64) -> Self {
        Self { val, dot: 1.0 }
    }

    /// Create a dual with explicit tangent.
    #[inline]
    pub fn new(val: f64, dot: f64) -> Self {
        Self { val, dot }
    }

    /// Natural logarithm: d/dx ln(x) = 1/x.
    #[inline]
    pub fn ln(self) -> Self {
        Self { val: self.val.ln(), dot: self.dot / self.val }
    }

    /// d/dx ln(1 + x) = 1/(1 + x).
    #[inline]
    pub fn ln_1p(self) -> Self {
        Self { val: self.val.ln_1p(), dot: self.dot / (1.0 + self.val) }
    }

    /// Exponential: d/dx exp(x) = exp(x).
    #[inline]
    pub fn exp(self) -> Self {
        let e = self.val.exp();
        Self { val: e, dot: self.dot * e }
    }

    /// Square root: d/dx sqrt(x) = 1/(2*sqrt(x)).
    #[inline]
    pub fn sqrt(self) -> Self {
        let s = self.val.sqrt();
        Self { val: s, dot: self.dot / (2.0 * s) }
    }

    /// Absolute value: d/dx |x| = sign(x).
    #[inline]
    pub fn abs(self) -> Self {
        Self { val: self.val.abs(), dot: self.dot * self.val.signum() }
    }

    /// Error function: d/dx erf(x) = 2/sqrt(pi) · exp(-x²).
    #[inline]
    pub fn erf(self) -> Self {
        let slope = 2.0 / PI.sqrt() * (-self.val * self.val).exp();
        Self { val: statrs::function::erf::erf(self.val), dot: self.dot * slope }
    }

    /// General power `self^exponent` with both sides differentiable.
    ///
    /// The `ln(base)` term is only formed when the exponent carries a
    /// tangent, so a constant exponent on a non-positive base does not turn
    /// the derivative into `NaN`.
    #[inline]
    pub fn powf(self, exponent: Self) -> Self {
        let val = self.val.powf(exponent.val);
        let mut dot = self.dot * exponent.val * self.val.powf(exponent.val - 1.0);
        if exponent.dot != 0.0 {
            dot += exponent.dot * val * self.val.ln();
        }
        Self { val, dot }
    }
}

// --- Arithmetic: Dual op Dual ---

impl Add for Dual {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self { val: self.val + rhs.val, dot: self.dot + rhs.dot }
    }
}

impl Sub for Dual {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self { val: self.val - rhs.val, dot: self.dot - rhs.dot }
    }
}

impl Mul for Dual {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self { val: self.val * rhs.val, dot: self.dot * rhs.val + self.val * rhs.dot }
    }
}

impl Div for Dual {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self {
            val: self.val / rhs.val,
            dot: (self.dot * rhs.val - self.val * rhs.dot) / (rhs.val * rhs.val),
        }
    }
}

impl Neg for Dual {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self { val: -self.val, dot: -self.dot }
    }
}

impl From<f64> for Dual {
    fn from(val: f64) -> Self {
        Self::constant(val)
    }
}

impl PartialOrd for Dual {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.val.partial_cmp(&other.val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_and_var_seeds() {
        let c = Dual::constant(5.0);
        let x = Dual::var(3.0);
        assert_eq!((c.val, c.dot), (5.0, 0.0));
        assert_eq!((x.val, x.dot), (3.0, 1.0));
    }

    #[test]
    fn test_ln_and_ln_1p_derivatives() {
        let x = Dual::var(2.0);
        assert_relative_eq!(x.ln().dot, 0.5, epsilon = 1e-15);
        assert_relative_eq!(x.ln_1p().dot, 1.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_exp_and_sqrt_derivatives() {
        let x = Dual::var(4.0);
        assert_relative_eq!(x.exp().dot, 4.0_f64.exp(), epsilon = 1e-12);
        assert_relative_eq!(x.sqrt().dot, 0.25, epsilon = 1e-15);
    }

    #[test]
    fn test_erf_derivative_matches_gaussian_kernel() {
        let x = Dual::var(0.7);
        let expected = 2.0 / PI.sqrt() * (-0.49_f64).exp();
        assert_relative_eq!(x.erf().dot, expected, epsilon = 1e-14);
        assert_relative_eq!(x.erf().val, statrs::function::erf::erf(0.7), epsilon = 1e-15);
    }

    #[test]
    fn test_powf_derivative_in_base_and_exponent() {
        // d/dx x^3 at x = 2 is 12.
        let base = Dual::var(2.0).powf(Dual::constant(3.0));
        assert_relative_eq!(base.dot, 12.0, epsilon = 1e-12);

        // d/dy 2^y at y = 3 is 8 ln 2.
        let expo = Dual::constant(2.0).powf(Dual::var(3.0));
        assert_relative_eq!(expo.dot, 8.0 * 2.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_powf_constant_exponent_on_zero_base_has_finite_tangent() {
        let y = Dual::new(0.0, 0.0).powf(Dual::constant(2.0));
        assert_eq!(y.val, 0.0);
        assert!(y.dot.is_finite());
    }

    #[test]
    fn test_quotient_rule() {
        // d/dx (x / (1 + x)) = 1 / (1 + x)^2
        let x = Dual::var(1.0);
        let y = x / (Dual::constant(1.0) + x);
        assert_relative_eq!(y.dot, 0.25, epsilon = 1e-15);
    }
}
