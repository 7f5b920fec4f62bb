//! Per-cell log-likelihood of the zero / lognormal / GP mixture.
//!
//! For an observation `x` with threshold `t`, gate probabilities
//! `(p0, pe)` and component parameters, the log-likelihood is the sum of
//! the applicable terms:
//!
//! | case              | gate terms                     | density term                  |
//! |-------------------|--------------------------------|-------------------------------|
//! | `x == 0`          | `ln p0`                        | —                             |
//! | `0 < x <= t`      | `ln(1-p0) + ln(1-pe)`          | truncated lognormal at `x`    |
//! | `x > t`, `x > 0`  | `ln(1-p0) + ln pe`             | GP at excess `x - t`          |
//! | `x < 0`           | `ln(1-p0)`                     | —                             |
//!
//! Inapplicable terms are exact zeros, not masked `NaN`s, so a cell is
//! `NaN` only if its observation or a parameter used by an applicable term
//! is `NaN`, or if it is positive and its threshold is `NaN`. Where `t = +∞` the excess probability is
//! treated as exactly 0 (the `ln(1-pe)` term vanishes) and the lognormal is
//! untruncated, which reproduces the hurdle model.

use crate::autodiff::Real;
use crate::constraints::{GateProbs, GpParams, LognormalParams};
use crate::distributions::{gpd_ln_pdf, truncated_lognormal_ln_pdf};
use crate::mixture::{
    errors::MixtureResult,
    validation::{CellParams, batch_len, data_cells},
};
use ndarray::{Array1, ArrayView1};

/// Mixture log-likelihood per cell.
///
/// # Errors
/// - Shape errors if any per-cell input neither matches the batch length nor
///   has length 1.
pub fn mixture_loglik<S: Real>(
    samples: ArrayView1<'_, f64>, gp: &GpParams<S>, moderate: &LognormalParams<S>,
    gates: &GateProbs<S>, thresholds: ArrayView1<'_, f64>,
) -> MixtureResult<Array1<S>> {
    let mut lens = CellParams::lens(gp, moderate, gates).to_vec();
    lens.extend([samples.len(), thresholds.len()]);
    let n = batch_len(&lens);

    let params = CellParams::new(n, gp, moderate, gates)?;
    let samples = data_cells(samples, n, "samples")?;
    let thresholds = data_cells(thresholds, n, "threshold")?;

    Ok(Array1::from_shape_fn(n, |i| cell_loglik(samples.at(i), thresholds.at(i), &params, i)))
}

fn cell_loglik<S: Real>(x: f64, t: f64, p: &CellParams<'_, S>, i: usize) -> S {
    if x.is_nan() {
        return S::nan();
    }
    let zero_prob = p.zero.at(i);
    if x == 0.0 {
        return zero_prob.ln();
    }
    let mut total = (S::one() - zero_prob).ln();
    if x < 0.0 {
        return total;
    }
    if t.is_nan() {
        return S::nan();
    }

    if x > t {
        total = total
            + p.excess.at(i).ln()
            + gpd_ln_pdf(x - t, p.xi.at(i), p.sigma.at(i));
    } else {
        if t != f64::INFINITY {
            total = total + (S::one() - p.excess.at(i)).ln();
        }
        total = total + truncated_lognormal_ln_pdf(x, t, p.mu.at(i), p.var.at(i));
    }
    total
}
