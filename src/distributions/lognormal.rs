//! Lognormal and upper-truncated lognormal primitives.
//!
//! Parameters are `(mu, var)`: the mean and **variance** of `ln X`. The
//! observation side (`x`, truncation bounds) is plain `f64` data.

use crate::autodiff::Real;
use crate::distributions::normal::standard_normal_cdf;
use std::f64::consts::{PI, SQRT_2};

/// Value substituted for an observation of exactly `0` before evaluating the
/// lognormal log density. Zero mass is carried by the zero gate, so the
/// density is never used at a true zero; the substitution only keeps
/// `ln(0) = -∞` out of values and tangents.
pub const LOG_DENSITY_ZERO_PLACEHOLDER: f64 = 10.0;

/// Added to normalisers (`F(t)`, `Φ(β)`) before dividing or taking logs.
pub const TRUNC_EPS: f64 = 1e-6;

/// `ln f(x; mu, var)` for the lognormal density.
///
/// An observation of exactly `0` is replaced by
/// [`LOG_DENSITY_ZERO_PLACEHOLDER`]. Negative or `NaN` observations yield
/// `NaN`.
pub fn lognormal_ln_pdf<S: Real>(x: f64, mu: S, var: S) -> S {
    let x = if x == 0.0 { LOG_DENSITY_ZERO_PLACEHOLDER } else { x };
    let ln_x = x.ln();
    let half = S::from_f64(0.5);

    let normaliser = S::from_f64(-ln_x - 0.5 * (2.0 * PI).ln()) - half * var.ln();
    let centred = S::from_f64(ln_x) - mu;
    normaliser - centred * centred / (S::from_f64(2.0) * var)
}

/// Lognormal CDF `F(x) = Φ((ln x - mu) / sqrt(var))`.
///
/// Exactly `0` for `x <= 0` and exactly `1` for `x = +∞`.
pub fn lognormal_cdf<S: Real>(x: f64, mu: S, var: S) -> S {
    if x.is_nan() {
        return S::nan();
    }
    if x <= 0.0 {
        return S::zero();
    }
    if x == f64::INFINITY {
        return S::one();
    }
    let half = S::from_f64(0.5);
    half + half * ((S::from_f64(x.ln()) - mu) / (var.sqrt() * S::from_f64(SQRT_2))).erf()
}

/// Mean of the untruncated lognormal, `exp(mu + var / 2)`.
#[inline]
pub fn lognormal_mean<S: Real>(mu: S, var: S) -> S {
    (mu + var / S::from_f64(2.0)).exp()
}

/// Log density of the lognormal truncated above at `thresh`:
/// `ln f(x) - ln(F(thresh) + TRUNC_EPS)`.
///
/// For `thresh = +∞` the normaliser is exactly 1 and no correction term is
/// applied.
pub fn truncated_lognormal_ln_pdf<S: Real>(x: f64, thresh: f64, mu: S, var: S) -> S {
    let ln_pdf = lognormal_ln_pdf(x, mu, var);
    if thresh == f64::INFINITY {
        return ln_pdf;
    }
    ln_pdf - (lognormal_cdf(thresh, mu, var) + S::from_f64(TRUNC_EPS)).ln()
}

/// CDF of the lognormal restricted to `[lower, upper]`.
///
/// Missing bounds default to `lower = -∞`, `upper = +∞`. The result is `0`
/// below `lower`, `1` above `upper`, and `0` wherever the mass inside the
/// bounds is exactly zero.
pub fn truncated_lognormal_cdf<S: Real>(
    x: f64, mu: S, var: S, lower: Option<f64>, upper: Option<f64>,
) -> S {
    if x.is_nan() {
        return S::nan();
    }
    let lower = lower.unwrap_or(f64::NEG_INFINITY);
    let upper = upper.unwrap_or(f64::INFINITY);

    let lower_cdf = lognormal_cdf(lower, mu, var);
    let mass = lognormal_cdf(upper, mu, var) - lower_cdf;
    if mass.value() == 0.0 || x < lower {
        return S::zero();
    }
    if x > upper {
        return S::one();
    }
    (lognormal_cdf(x, mu, var) - lower_cdf) / mass
}

/// Mean of the lognormal truncated above at `upper`:
///
/// `exp(mu + var/2) · Φ(β - σ) / (TRUNC_EPS + Φ(β))`, `β = (ln upper - mu) / σ`.
///
/// Falls back to [`lognormal_mean`] when `upper = +∞`.
pub fn truncated_lognormal_mean<S: Real>(mu: S, var: S, upper: f64) -> S {
    let plain = lognormal_mean(mu, var);
    if upper == f64::INFINITY {
        return plain;
    }
    let sigma = var.sqrt();
    let beta = (S::from_f64(upper.ln()) - mu) / sigma;
    plain * standard_normal_cdf(beta - sigma)
        / (S::from_f64(TRUNC_EPS) + standard_normal_cdf(beta))
}
