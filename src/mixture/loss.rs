//! Missing-aware reductions used by the training loss.

use crate::autodiff::Real;
use crate::constraints::validation::Cells;
use crate::mixture::{errors::MixtureResult, validation::batch_len};
use ndarray::ArrayView1;

/// Mean over the non-`NaN` entries; `NaN` if there are none.
pub fn nan_mean<S: Real>(values: ArrayView1<'_, S>) -> S {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((S::zero(), 0usize), |(sum, count), v| (sum + *v, count + 1));
    if count == 0 { S::nan() } else { sum / S::from_f64(count as f64) }
}

/// RMSE between predictions and observations over cells where neither is
/// missing; `NaN` if there are none.
///
/// # Errors
/// - Shape error if the inputs differ in length (and neither has length 1).
pub fn masked_rmse<S: Real>(
    pred: ArrayView1<'_, S>, truth: ArrayView1<'_, f64>,
) -> MixtureResult<S> {
    let n = batch_len(&[pred.len(), truth.len()]);
    let pred = Cells::new(pred, n, "predictions")?;
    let truth = Cells::new(truth, n, "observations")?;

    let mut sum = S::zero();
    let mut count = 0usize;
    for i in 0..n {
        let (p, t) = (pred.at(i), truth.at(i));
        if p.is_nan() || t.is_nan() {
            continue;
        }
        let diff = p - S::from_f64(t);
        sum = sum + diff * diff;
        count += 1;
    }
    if count == 0 {
        return Ok(S::nan());
    }
    Ok((sum / S::from_f64(count as f64)).sqrt())
}
