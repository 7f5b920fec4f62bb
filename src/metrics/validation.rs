//! metrics::validation — joint missing-value masking for paired inputs.

use crate::metrics::errors::{MetricError, MetricResult};
use ndarray::ArrayView1;

/// Pairs `(a[i], b[i])` at every cell where neither side is `NaN`.
///
/// # Errors
/// - [`MetricError::LengthMismatch`] if the inputs differ in length.
/// - [`MetricError::NoValidPairs`] if no cell survives the mask.
pub fn joint_pairs(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> MetricResult<Vec<(f64, f64)>> {
    if a.len() != b.len() {
        return Err(MetricError::LengthMismatch { left: a.len(), right: b.len() });
    }
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(x, y)| (*x, *y))
        .collect();
    if pairs.is_empty() {
        return Err(MetricError::NoValidPairs);
    }
    Ok(pairs)
}

/// Class index of a label, if it is an integer in `0..classes`.
pub(crate) fn class_index(label: f64, classes: usize) -> MetricResult<usize> {
    if label >= 0.0 && label.fract() == 0.0 && (label as usize) < classes {
        Ok(label as usize)
    } else {
        Err(MetricError::LabelOutOfRange { label, classes })
    }
}
