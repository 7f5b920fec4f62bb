//! [`Real`] trait: abstraction over `f32`, `f64` and [`Dual`] that lets the
//! mixture engine be written once and reused for plain evaluation **and**
//! forward-mode gradient computation.

use crate::autodiff::dual::Dual;
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Above this scaled argument `softplus` is evaluated as the identity.
pub const SOFTPLUS_LINEAR_CUTOFF: f64 = 20.0;

/// A scalar type the mixture engine can evaluate with.
///
/// Required methods are the differentiable primitives; the provided methods
/// are built only from those primitives so `Dual` gets correct tangents for
/// free.
pub trait Real:
    Copy
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + PartialOrd
{
    /// Wrap an `f64` constant (derivative = 0 for AD types).
    fn from_f64(v: f64) -> Self;

    /// Extract the primal (function) value.
    fn value(&self) -> f64;

    /// Machine epsilon of the underlying precision.
    fn epsilon() -> f64;

    /// Natural logarithm.
    fn ln(self) -> Self;

    /// `ln(1 + x)`.
    fn ln_1p(self) -> Self;

    /// Exponential.
    fn exp(self) -> Self;

    /// Square root.
    fn sqrt(self) -> Self;

    /// Absolute value.
    fn abs(self) -> Self;

    /// Gauss error function.
    fn erf(self) -> Self;

    /// Power with a (possibly differentiable) exponent.
    fn powf(self, exponent: Self) -> Self;

    #[inline]
    fn zero() -> Self {
        Self::from_f64(0.0)
    }

    #[inline]
    fn one() -> Self {
        Self::from_f64(1.0)
    }

    #[inline]
    fn nan() -> Self {
        Self::from_f64(f64::NAN)
    }

    #[inline]
    fn is_nan(&self) -> bool {
        self.value().is_nan()
    }

    /// Logistic function, evaluated on the side that cannot overflow.
    #[inline]
    fn sigmoid(self) -> Self {
        if self.value() >= 0.0 {
            Self::one() / (Self::one() + (-self).exp())
        } else {
            let e = self.exp();
            e / (Self::one() + e)
        }
    }

    /// `softplus_β(x) = ln(1 + exp(βx)) / β`, linear once `βx` exceeds
    /// [`SOFTPLUS_LINEAR_CUTOFF`].
    #[inline]
    fn softplus(self, beta: f64) -> Self {
        let scaled = self * Self::from_f64(beta);
        if scaled.value() > SOFTPLUS_LINEAR_CUTOFF {
            self
        } else {
            scaled.exp().ln_1p() / Self::from_f64(beta)
        }
    }
}

// --- f64 implementation ---

impl Real for f64 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn value(&self) -> f64 {
        *self
    }

    #[inline]
    fn epsilon() -> f64 {
        f64::EPSILON
    }

    #[inline]
    fn ln(self) -> Self {
        f64::ln(self)
    }

    #[inline]
    fn ln_1p(self) -> Self {
        f64::ln_1p(self)
    }

    #[inline]
    fn exp(self) -> Self {
        f64::exp(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn erf(self) -> Self {
        statrs::function::erf::erf(self)
    }

    #[inline]
    fn powf(self, exponent: Self) -> Self {
        f64::powf(self, exponent)
    }
}

// --- f32 implementation ---

impl Real for f32 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn value(&self) -> f64 {
        *self as f64
    }

    #[inline]
    fn epsilon() -> f64 {
        f32::EPSILON as f64
    }

    #[inline]
    fn ln(self) -> Self {
        f32::ln(self)
    }

    #[inline]
    fn ln_1p(self) -> Self {
        f32::ln_1p(self)
    }

    #[inline]
    fn exp(self) -> Self {
        f32::exp(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        f32::sqrt(self)
    }

    #[inline]
    fn abs(self) -> Self {
        f32::abs(self)
    }

    #[inline]
    fn erf(self) -> Self {
        statrs::function::erf::erf(self as f64) as f32
    }

    #[inline]
    fn powf(self, exponent: Self) -> Self {
        f32::powf(self, exponent)
    }
}

// --- Dual implementation ---

impl Real for Dual {
    #[inline]
    fn from_f64(v: f64) -> Self {
        Dual::constant(v)
    }

    #[inline]
    fn value(&self) -> f64 {
        self.val
    }

    #[inline]
    fn epsilon() -> f64 {
        f64::EPSILON
    }

    #[inline]
    fn ln(self) -> Self {
        Dual::ln(self)
    }

    #[inline]
    fn ln_1p(self) -> Self {
        Dual::ln_1p(self)
    }

    #[inline]
    fn exp(self) -> Self {
        Dual::exp(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        Dual::sqrt(self)
    }

    #[inline]
    fn abs(self) -> Self {
        Dual::abs(self)
    }

    #[inline]
    fn erf(self) -> Self {
        Dual::erf(self)
    }

    #[inline]
    fn powf(self, exponent: Self) -> Self {
        Dual::powf(self, exponent)
    }
}
