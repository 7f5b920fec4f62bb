//! Generalized Pareto (GP) tail primitives.
//!
//! The GP models excesses `z = x - u` over a threshold `u` with shape `xi`
//! and scale `sigma > 0`. `xi == 0` is the exponential limit; the branch is
//! chosen on the primal value of `xi`.

use crate::autodiff::Real;

/// GP log density of an excess `z >= 0`:
///
/// - `xi != 0`: `-(ln sigma + (1 + 1/xi) · ln(1 + xi·z/sigma))`
/// - `xi == 0`: `-(ln sigma + z/sigma)`
///
/// Returns `-∞` when `1 + xi·z/sigma < 0` (outside the support of a
/// negative-shape GP) and `NaN` for a `NaN` excess or parameter.
pub fn gpd_ln_pdf<S: Real>(excess: f64, xi: S, sigma: S) -> S {
    if excess.is_nan() || xi.is_nan() || sigma.is_nan() {
        return S::nan();
    }
    let z = S::from_f64(excess);
    if xi.value() == 0.0 {
        return -(sigma.ln() + z / sigma);
    }
    let scaled = xi * z / sigma;
    if scaled.value() < -1.0 {
        return S::from_f64(f64::NEG_INFINITY);
    }
    -(sigma.ln() + (S::one() + S::one() / xi) * scaled.ln_1p())
}

/// GP CDF of `x` above threshold `thresh`:
/// `1 - (1 + xi·(x - thresh)/sigma)^(-1/xi)`, or `1 - exp(-(x - thresh)/sigma)`
/// when `xi == 0`.
///
/// `0` below the threshold and `1` beyond the upper end point of a
/// negative-shape GP.
pub fn gpd_cdf<S: Real>(x: f64, xi: S, sigma: S, thresh: f64) -> S {
    let excess = x - thresh;
    if excess.is_nan() || xi.is_nan() || sigma.is_nan() {
        return S::nan();
    }
    if excess < 0.0 {
        return S::zero();
    }
    let z = S::from_f64(excess);
    if xi.value() == 0.0 {
        return S::one() - (-z / sigma).exp();
    }
    let base = S::one() + xi * z / sigma;
    if base.value() <= 0.0 {
        return S::one();
    }
    S::one() - base.powf(-(S::one() / xi))
}

/// GP mean above the threshold: `thresh + sigma / (1 - xi)` (finite for
/// `xi < 1`).
#[inline]
pub fn gpd_mean<S: Real>(xi: S, sigma: S, thresh: f64) -> S {
    S::from_f64(thresh) + sigma / (S::one() - xi)
}
