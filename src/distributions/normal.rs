//! Normal CDF expressed through `erf`, so it stays differentiable.
use crate::autodiff::Real;
use std::f64::consts::SQRT_2;

/// `Φ(z) = ½ (1 + erf(z / √2))`.
#[inline]
pub fn standard_normal_cdf<S: Real>(z: S) -> S {
    let half = S::from_f64(0.5);
    half * (S::one() + (z / S::from_f64(SQRT_2)).erf())
}

/// CDF of `N(mu, sigma²)` at `x`; `sigma` is the standard deviation.
#[inline]
pub fn normal_cdf<S: Real>(x: S, mu: S, sigma: S) -> S {
    standard_normal_cdf((x - mu) / sigma)
}
