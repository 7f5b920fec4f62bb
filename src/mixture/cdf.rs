//! Per-cell CDF of the mixture.
//!
//! `F(x) = p0 · 1[x >= 0]
//!       + (1-p0)(1-pe) · F_LN(x | x <= t_eff) · 1[x > 0]
//!       + (1-p0) pe · F_GP(x - t_act) · 1[x > t_eff]`
//!
//! `t_eff` is the threshold the model separates components with (`+∞` for
//! the hurdle model, where `pe` is taken as exactly 0); `t_act` locates the
//! GP. The two coincide whenever the GP tail is in use with a fixed
//! threshold.

use crate::autodiff::Real;
use crate::constraints::{GateProbs, GpParams, LognormalParams};
use crate::distributions::{gpd_cdf, truncated_lognormal_cdf};
use crate::mixture::{
    errors::MixtureResult,
    validation::{CellParams, batch_len, data_cells, effective_excess},
};
use ndarray::{Array1, ArrayView1};

/// Mixture CDF per cell.
///
/// `NaN` where the sample is missing, or where a positive sample meets a
/// missing threshold; `0` for negative samples and `p0` at zero.
///
/// # Errors
/// - Shape errors if any per-cell input neither matches the batch length nor
///   has length 1.
pub fn mixture_cdf<S: Real>(
    samples: ArrayView1<'_, f64>, gp: &GpParams<S>, moderate: &LognormalParams<S>,
    gates: &GateProbs<S>, effective_thresholds: ArrayView1<'_, f64>,
    actual_thresholds: ArrayView1<'_, f64>,
) -> MixtureResult<Array1<S>> {
    let mut lens = CellParams::lens(gp, moderate, gates).to_vec();
    lens.extend([samples.len(), effective_thresholds.len(), actual_thresholds.len()]);
    let n = batch_len(&lens);

    let params = CellParams::new(n, gp, moderate, gates)?;
    let samples = data_cells(samples, n, "samples")?;
    let effective = data_cells(effective_thresholds, n, "effective threshold")?;
    let actual = data_cells(actual_thresholds, n, "actual threshold")?;

    Ok(Array1::from_shape_fn(n, |i| {
        cell_cdf(samples.at(i), effective.at(i), actual.at(i), &params, i)
    }))
}

fn cell_cdf<S: Real>(x: f64, t_eff: f64, t_act: f64, p: &CellParams<'_, S>, i: usize) -> S {
    if x.is_nan() {
        return S::nan();
    }
    if x < 0.0 {
        return S::zero();
    }
    let zero_prob = p.zero.at(i);
    if x == 0.0 {
        return zero_prob;
    }
    if t_eff.is_nan() || t_act.is_nan() {
        return S::nan();
    }

    let non_zero = S::one() - zero_prob;
    let excess_prob = effective_excess(p.excess.at(i), t_eff);
    let moderate = truncated_lognormal_cdf(x, p.mu.at(i), p.var.at(i), None, Some(t_eff));
    let mut total = zero_prob + non_zero * (S::one() - excess_prob) * moderate;
    if x > t_eff {
        total = total + non_zero * excess_prob * gpd_cdf(x, p.xi.at(i), p.sigma.at(i), t_act);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};
    use proptest::prelude::*;

    fn params() -> (GpParams<f64>, LognormalParams<f64>, GateProbs<f64>) {
        (
            GpParams { xi: array![0.1], sigma: array![2.0] },
            LognormalParams { mu: array![1.0], var: array![1.0] },
            GateProbs { zero: array![0.3], excess: array![0.2] },
        )
    }

    fn cdf_at(x: f64, threshold: f64) -> f64 {
        let (gp, moderate, gates) = params();
        mixture_cdf(
            array![x].view(),
            &gp,
            &moderate,
            &gates,
            array![threshold].view(),
            array![threshold].view(),
        )
        .unwrap()[0]
    }

    #[test]
    fn cdf_edges() {
        // Purpose
        // -------
        // 0 below zero, the zero mass at zero, the non-excess mass at the
        // threshold, and 1 at +∞, for both the full and the hurdle model.
        assert_eq!(cdf_at(-1e-9, 10.0), 0.0);
        assert_relative_eq!(cdf_at(0.0, 10.0), 0.3, epsilon = 1e-15);
        assert_relative_eq!(cdf_at(10.0, 10.0), 0.3 + 0.7 * 0.8, epsilon = 1e-12);
        assert_relative_eq!(cdf_at(f64::INFINITY, 10.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cdf_at(f64::INFINITY, f64::INFINITY), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn hurdle_cdf_has_no_excess_component() {
        let x = 20.0;
        let expected = 0.3 + 0.7 * crate::distributions::lognormal_cdf(x, 1.0, 1.0);
        assert_relative_eq!(cdf_at(x, f64::INFINITY), expected, epsilon = 1e-12);
    }

    #[test]
    fn gp_mass_is_located_at_actual_threshold() {
        // Given effective threshold 10 and actual threshold 12
        // Expect the GP CDF evaluated at x - 12.
        let (gp, moderate, gates) = params();
        let out = mixture_cdf(
            array![20.0].view(),
            &gp,
            &moderate,
            &gates,
            array![10.0].view(),
            array![12.0].view(),
        )
        .unwrap();
        let expected = 0.3 + 0.7 * 0.8 + 0.7 * 0.2 * gpd_cdf(20.0, 0.1, 2.0, 12.0);
        assert_relative_eq!(out[0], expected, epsilon = 1e-12);
    }

    #[test]
    fn missing_inputs_propagate_only_locally() {
        let (gp, moderate, gates) = params();
        let out = mixture_cdf(
            array![f64::NAN, 5.0, 5.0].view(),
            &gp,
            &moderate,
            &gates,
            array![10.0, f64::NAN, 10.0].view(),
            array![10.0].view(),
        )
        .unwrap();
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(out[2].is_finite());
    }

    #[test]
    // Purpose
    // -------
    // Missing thresholds only matter for positive samples.
    //
    // Given
    // -----
    // - samples [0, -2, 5] with NaN effective and actual thresholds.
    //
    // Expect
    // ------
    // - p0 at zero, 0 for the negative sample, NaN for the positive one.
    fn nan_threshold_leaves_zero_and_negative_cells_defined() {
        let (gp, moderate, gates) = params();
        let out = mixture_cdf(
            array![0.0, -2.0, 5.0].view(),
            &gp,
            &moderate,
            &gates,
            array![f64::NAN].view(),
            array![f64::NAN].view(),
        )
        .unwrap();
        assert_relative_eq!(out[0], 0.3, epsilon = 1e-15);
        assert_eq!(out[1], 0.0);
        assert!(out[2].is_nan());
    }

    #[test]
    fn empty_batch_with_shared_parameters_is_empty() {
        let (gp, moderate, gates) = params();
        let out = mixture_cdf(
            Array1::<f64>::zeros(0).view(),
            &gp,
            &moderate,
            &gates,
            array![10.0].view(),
            array![10.0].view(),
        )
        .unwrap();
        assert!(out.is_empty());
    }

    proptest! {
        #[test]
        fn prop_cdf_is_monotone_and_bounded(
            a in 0.0f64..400.0,
            b in 0.0f64..400.0,
            hurdle in proptest::bool::ANY,
        ) {
            let threshold = if hurdle { f64::INFINITY } else { 10.0 };
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (gp, moderate, gates) = params();
            let xs: Array1<f64> = array![lo, hi];
            let out = mixture_cdf(
                xs.view(),
                &gp,
                &moderate,
                &gates,
                array![threshold].view(),
                array![threshold].view(),
            ).unwrap();
            prop_assert!(out[0] <= out[1] + 1e-12);
            prop_assert!(out[0] >= 0.0 && out[1] <= 1.0 + 1e-12);
        }
    }
}
