//! Agreement statistics for continuous predictions: Pearson correlation,
//! Brier score and RMSE over jointly non-missing cells.

use crate::metrics::{
    errors::{MetricError, MetricResult},
    validation::joint_pairs,
};
use ndarray::ArrayView1;
use statrs::statistics::Statistics;

/// Sample Pearson correlation.
///
/// # Errors
/// - Length mismatch or no jointly non-missing cells.
/// - [`MetricError::DegenerateVariance`] if either side is constant (this
///   includes a single valid cell).
pub fn pearson(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> MetricResult<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = joint_pairs(a, b)?.into_iter().unzip();
    if xs.len() < 2 {
        return Err(MetricError::DegenerateVariance);
    }
    let sd_x = xs.iter().std_dev();
    let sd_y = ys.iter().std_dev();
    if sd_x == 0.0 || sd_y == 0.0 {
        return Err(MetricError::DegenerateVariance);
    }
    Ok(xs.iter().covariance(ys.iter()) / (sd_x * sd_y))
}

/// Mean squared difference, e.g. between predicted excess probabilities and
/// 0/1 outcomes.
///
/// # Errors
/// - Length mismatch or no jointly non-missing cells.
pub fn brier_score(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> MetricResult<f64> {
    let pairs = joint_pairs(a, b)?;
    Ok(pairs.iter().map(|(x, y)| (x - y) * (x - y)).mean())
}

/// Root mean squared difference.
///
/// # Errors
/// - Length mismatch or no jointly non-missing cells.
pub fn rmse(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> MetricResult<f64> {
    Ok(brier_score(a, b)?.sqrt())
}
