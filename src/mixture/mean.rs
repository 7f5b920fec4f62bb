//! Per-cell predictive mean of the mixture.

use crate::autodiff::Real;
use crate::constraints::{GateProbs, GpParams, LognormalParams};
use crate::distributions::{gpd_mean, truncated_lognormal_mean};
use crate::mixture::{
    errors::MixtureResult,
    validation::{CellParams, batch_len, data_cells, effective_excess},
};
use log::debug;
use ndarray::{Array1, ArrayView1};

/// Mixture mean per cell:
///
/// `(1-p0)(1-pe) · E[LN | X <= t] + (1-p0) pe · (t + sigma / (1 - xi))`
///
/// The zero component contributes nothing. The GP term is only formed for
/// cells with a finite threshold; when every threshold in the batch is `+∞`
/// it is skipped for the whole batch, which gives exactly the hurdle-model
/// mean `(1-p0) · exp(mu + var/2)`.
///
/// # Errors
/// - Shape errors if any per-cell input neither matches the batch length nor
///   has length 1.
pub fn mixture_mean<S: Real>(
    gp: &GpParams<S>, moderate: &LognormalParams<S>, gates: &GateProbs<S>,
    thresholds: ArrayView1<'_, f64>,
) -> MixtureResult<Array1<S>> {
    let mut lens = CellParams::lens(gp, moderate, gates).to_vec();
    lens.push(thresholds.len());
    let n = batch_len(&lens);

    let params = CellParams::new(n, gp, moderate, gates)?;
    let use_tail = thresholds.iter().any(|t| *t != f64::INFINITY);
    if !use_tail {
        debug!("all {n} thresholds are +inf; skipping the GP mean term");
    }
    let thresholds = data_cells(thresholds, n, "threshold")?;

    Ok(Array1::from_shape_fn(n, |i| {
        let t = thresholds.at(i);
        if t.is_nan() {
            return S::nan();
        }
        let non_zero = S::one() - params.zero.at(i);
        let excess_prob = effective_excess(params.excess.at(i), t);
        let mut mean = non_zero
            * (S::one() - excess_prob)
            * truncated_lognormal_mean(params.mu.at(i), params.var.at(i), t);
        if use_tail && t != f64::INFINITY {
            mean = mean + non_zero * excess_prob * gpd_mean(params.xi.at(i), params.sigma.at(i), t);
        }
        mean
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::lognormal_mean;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn params() -> (GpParams<f64>, LognormalParams<f64>, GateProbs<f64>) {
        (
            GpParams { xi: array![0.1, 0.5], sigma: array![2.0, 3.0] },
            LognormalParams { mu: array![1.0, 0.5], var: array![1.0, 0.3] },
            GateProbs { zero: array![0.3, 0.6], excess: array![0.2, 0.1] },
        )
    }

    #[test]
    fn all_infinite_thresholds_give_hurdle_mean() {
        // Purpose
        // -------
        // With every threshold at +∞ the mean is (1 - p0) · exp(mu + var/2),
        // whatever the GP parameters are (even NaN).
        let (_, moderate, gates) = params();
        let gp = GpParams { xi: array![f64::NAN, f64::NAN], sigma: array![f64::NAN, f64::NAN] };

        let mean = mixture_mean(&gp, &moderate, &gates, array![f64::INFINITY].view()).unwrap();

        assert_relative_eq!(mean[0], 0.7 * lognormal_mean(1.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(mean[1], 0.4 * lognormal_mean(0.5, 0.3), epsilon = 1e-12);
    }

    #[test]
    fn finite_threshold_mixes_truncated_and_gp_means() {
        let (gp, moderate, gates) = params();
        let mean = mixture_mean(&gp, &moderate, &gates, array![10.0, 8.0].view()).unwrap();

        let expected0 = 0.7 * 0.8 * truncated_lognormal_mean(1.0, 1.0, 10.0)
            + 0.7 * 0.2 * (10.0 + 2.0 / 0.9);
        assert_relative_eq!(mean[0], expected0, epsilon = 1e-12);
        let expected1 = 0.4 * 0.9 * truncated_lognormal_mean(0.5, 0.3, 8.0)
            + 0.4 * 0.1 * (8.0 + 3.0 / 0.5);
        assert_relative_eq!(mean[1], expected1, epsilon = 1e-12);
    }

    #[test]
    fn mixed_batch_skips_tail_only_where_threshold_is_infinite() {
        let (gp, moderate, gates) = params();
        let mean =
            mixture_mean(&gp, &moderate, &gates, array![10.0, f64::INFINITY].view()).unwrap();

        assert!(mean[0].is_finite());
        assert_relative_eq!(mean[1], 0.4 * lognormal_mean(0.5, 0.3), epsilon = 1e-12);
    }

    #[test]
    fn empty_thresholds_with_shared_parameters_give_empty_mean() {
        let gp = GpParams { xi: array![0.1], sigma: array![2.0] };
        let moderate = LognormalParams { mu: array![1.0], var: array![1.0] };
        let gates = GateProbs { zero: array![0.3], excess: array![0.2] };

        let mean = mixture_mean(&gp, &moderate, &gates, Array1::<f64>::zeros(0).view()).unwrap();

        assert!(mean.is_empty());
    }

    #[test]
    fn nan_threshold_is_local() {
        let (gp, moderate, gates) = params();
        let mean = mixture_mean(&gp, &moderate, &gates, array![f64::NAN, 8.0].view()).unwrap();
        assert!(mean[0].is_nan());
        assert!(mean[1].is_finite());
    }
}
