//! Threshold policies.
//!
//! Purpose
//! -------
//! Derive per-location excess thresholds from historical observations and
//! turn them into the two roles the mixture uses:
//!
//! - the *actual* threshold, which defines what counts as extreme for
//!   classification and locates the GP;
//! - the *effective* threshold, which the model uses to split the moderate
//!   and excess components (`+∞` when the GP tail is disabled).
//!
//! Conventions
//! -----------
//! - History is a `(time, location)` matrix; missing observations are `NaN`
//!   and are ignored, as are zeros (thresholds are quantiles of rainy
//!   values).
//! - Quantiles use linear interpolation between order statistics.
//! - A location with no positive history gets a `+∞` threshold, i.e. it is
//!   modelled as a hurdle model.

use crate::constraints::{ConstraintError, GP_EPS};
use crate::mixture::errors::{MixtureError, MixtureResult};
use log::debug;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use rand::Rng;

/// Effective and actual thresholds for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    /// Threshold separating the components inside the model.
    pub effective: Array1<f64>,
    /// Threshold defining extremes for classification and the GP location.
    pub actual: Array1<f64>,
}

impl Thresholds {
    /// Fixed policy: the model threshold is the actual threshold when the
    /// GP tail is enabled and `+∞` otherwise.
    pub fn fixed(actual: Array1<f64>, use_evt: bool) -> Self {
        let effective = effective_thresholds(actual.view(), use_evt);
        Thresholds { effective, actual }
    }

    /// Explicit pair, e.g. a sampled model threshold with the fixed
    /// evaluation threshold.
    ///
    /// # Errors
    /// - Shape error if the two arrays differ in length.
    pub fn new(effective: Array1<f64>, actual: Array1<f64>) -> MixtureResult<Self> {
        if effective.len() != actual.len() {
            return Err(ConstraintError::ShapeMismatch {
                what: "effective threshold",
                expected: actual.len(),
                found: effective.len(),
            }
            .into());
        }
        Ok(Thresholds { effective, actual })
    }

    pub fn len(&self) -> usize {
        self.actual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty()
    }
}

/// Per-location `q`-quantile of strictly positive, non-missing history.
///
/// # Errors
/// - [`MixtureError::InvalidOption`] unless `0 <= q <= 1`.
pub fn quantile_thresholds(history: ArrayView2<'_, f64>, q: f64) -> MixtureResult<Array1<f64>> {
    check_level("quantile", q)?;
    Ok(history.axis_iter(Axis(1)).map(|column| positive_quantile(column, q)).collect())
}

/// Variable-threshold policy: for every location draw a quantile level
/// uniformly from `[lo, hi]` and use that quantile of its positive history.
///
/// # Errors
/// - [`MixtureError::InvalidOption`] unless `0 <= lo <= hi <= 1`.
pub fn sample_thresholds<R: Rng + ?Sized>(
    history: ArrayView2<'_, f64>, lo: f64, hi: f64, rng: &mut R,
) -> MixtureResult<Array1<f64>> {
    check_level("lower quantile level", lo)?;
    check_level("upper quantile level", hi)?;
    if lo > hi {
        return Err(MixtureError::InvalidOption {
            name: "lower quantile level",
            value: lo,
            reason: "must not exceed the upper level",
        });
    }
    Ok(history
        .axis_iter(Axis(1))
        .map(|column| {
            let level = if lo == hi { lo } else { rng.gen_range(lo..=hi) };
            positive_quantile(column, level)
        })
        .collect())
}

/// `actual` when the GP tail is enabled, all `+∞` otherwise.
pub fn effective_thresholds(actual: ArrayView1<'_, f64>, use_evt: bool) -> Array1<f64> {
    if use_evt { actual.to_owned() } else { Array1::from_elem(actual.len(), f64::INFINITY) }
}

/// Largest excess the GP must support per cell: `max_value - t` (at least
/// `GP_EPS`) for a finite threshold, `max_value` otherwise.
pub fn max_excess(thresholds: ArrayView1<'_, f64>, max_value: f64) -> Array1<f64> {
    thresholds.mapv(|t| if t.is_finite() { (max_value - t).max(GP_EPS) } else { max_value })
}

fn check_level(name: &'static str, value: f64) -> MixtureResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MixtureError::InvalidOption { name, value, reason: "must lie in [0, 1]" })
    }
}

fn positive_quantile(column: ArrayView1<'_, f64>, q: f64) -> f64 {
    let mut values: Vec<f64> = column.iter().copied().filter(|v| *v > 0.0).collect();
    if values.is_empty() {
        debug!("no positive history for a location; using an infinite threshold");
        return f64::INFINITY;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let pos = q * (values.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    values[lower] + frac * (values[upper] - values[lower])
}
