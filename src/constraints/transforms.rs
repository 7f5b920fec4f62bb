//! Elementwise constraint transforms.
//!
//! Each transform maps an unconstrained raw value onto the valid domain of
//! one distribution parameter:
//!
//! - [`constrain_probability`]: ℝ → `(PROB_EPS, 1 - PROB_EPS)`
//! - [`constrain_positive`]: ℝ → `[POS_EPS, ∞)`
//! - [`constrain_upper_bounded`]: ℝ → `(-∞, bound)` (or `(0, bound)`)
//! - [`constrain_gp_shape`]: ℝ → `(-∞, upper)`, identity on `(-∞, 0]`
//!
//! All of them are monotone, continuous, differentiable almost everywhere,
//! and map `NaN` to `NaN`. Constants mirror the values the model was trained
//! with and are public so callers can reason about the ranges.

use crate::autodiff::Real;
use crate::constraints::options::PositiveTransform;

/// Distance kept between gate probabilities and `{0, 1}`.
pub const PROB_EPS: f64 = 0.01;

/// Offset added after every positivity transform.
pub const POS_EPS: f64 = 0.01;

/// Added to the max excess before dividing by it.
pub const GP_EPS: f64 = 1e-6;

/// Upper bound on the lognormal variance.
pub const VAR_UPPER: f64 = 30.0;

/// Upper bound on the GP scale (non-continuity mode).
pub const SCALE_UPPER: f64 = 40.0;

/// Upper bound on the GP shape.
pub const XI_UPPER: f64 = 0.9;

/// Softplus sharpness used for the GP shape bound.
pub const XI_SHARPNESS: f64 = 5.0;

/// Softplus sharpness used for the variance and scale bounds.
pub const BOUND_SHARPNESS: f64 = 1.0;

/// Number of ULPs (relative to `max(|bound|, 1)`) kept inside a bound once
/// the underlying transform saturates.
const SATURATION_ULPS: f64 = 4.0;

/// `sigmoid(raw) · (1 - 2ε) + ε` with `ε = PROB_EPS`.
///
/// Where the sigmoid saturates the result is held a few ULPs inside
/// `(ε, 1 - ε)`, so the band is open in floating point as well.
#[inline]
pub fn constrain_probability<S: Real>(raw: S) -> S {
    let p = raw.sigmoid() * S::from_f64(1.0 - 2.0 * PROB_EPS) + S::from_f64(PROB_EPS);
    let margin = S::epsilon() * SATURATION_ULPS;
    let (lo, hi) = (PROB_EPS + margin, 1.0 - PROB_EPS - margin);
    if p.value() < lo {
        S::from_f64(lo)
    } else if p.value() > hi {
        S::from_f64(hi)
    } else {
        p
    }
}

/// `transform(raw) + POS_EPS`.
#[inline]
pub fn constrain_positive<S: Real>(raw: S, transform: PositiveTransform) -> S {
    transform.apply_raw(raw) + S::from_f64(POS_EPS)
}

/// Soft upper bound: `bound - softplus_β(bound - x)`, where `x` is `raw` or,
/// when `positive` is given, `constrain_positive(raw, positive)`.
///
/// The softplus gap is floored a few ULPs above zero, so the result stays
/// strictly below `bound` even where `softplus` underflows.
pub fn constrain_upper_bounded<S: Real>(
    raw: S, bound: f64, positive: Option<PositiveTransform>, sharpness: f64,
) -> S {
    let x = match positive {
        Some(transform) => constrain_positive(raw, transform),
        None => raw,
    };
    let gap = (S::from_f64(bound) - x).softplus(sharpness);
    let floor = S::epsilon() * bound.abs().max(1.0) * SATURATION_ULPS;
    let gap = if gap.value() < floor { S::from_f64(floor) } else { gap };
    S::from_f64(bound) - gap
}

/// Bound the GP shape above by `upper` without touching non-positive values.
///
/// Blends the raw shape with its soft-bounded version using the weight
/// `w = clamp(xi / upper, 0, 1)`: `w · bounded(xi) + (1 - w) · xi`. For
/// `xi <= 0` the weight is zero and `xi` is returned unchanged, so the GP
/// support condition `1 + xi·z/sigma > 0` is never made harder to satisfy.
pub fn constrain_gp_shape<S: Real>(xi: S, upper: f64, sharpness: f64) -> S {
    let weight = xi / S::from_f64(upper);
    if weight.value() <= 0.0 {
        return xi;
    }
    let bounded = constrain_upper_bounded(xi, upper, None, sharpness);
    if weight.value() >= 1.0 {
        return bounded;
    }
    weight * bounded + (S::one() - weight) * xi
}
