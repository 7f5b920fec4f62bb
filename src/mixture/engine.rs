//! Mixture engine: thresholds, constraints and per-cell outputs for one
//! batch of network output.
//!
//! The engine owns validated [`MixtureOptions`] and is parameterised by the
//! scalar type, which fixes the numeric precision (`f32`/`f64`) or switches
//! on forward-mode derivatives ([`Dual`](crate::autodiff::Dual)) for the whole
//! pipeline.
use crate::{
    autodiff::Real,
    constraints::{ConstrainedParameters, RawParameters, constrain_all},
    mixture::{
        cdf::mixture_cdf,
        errors::MixtureResult,
        labels::classify_excess,
        loglik::mixture_loglik,
        loss::{masked_rmse, nan_mean},
        mean::mixture_mean,
        options::MixtureOptions,
        thresholds::{Thresholds, max_excess, quantile_thresholds, sample_thresholds},
    },
};
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::Rng;
use std::marker::PhantomData;

/// Per-cell outputs of the mixture for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureOutput<S> {
    /// Log-likelihood under the effective threshold.
    pub loglik: Array1<S>,
    /// CDF at the observation.
    pub cdf: Array1<S>,
    /// Predictive mean.
    pub mean: Array1<S>,
    /// Observed class under the actual threshold (`0`, `1`, `2` or `NaN`).
    pub labels: Array1<f64>,
}

/// Zero / lognormal / GP mixture evaluated in scalar type `S`.
///
/// # Notes
/// - `MixtureEngine::<f32>` and `MixtureEngine::<f64>` select the working
///   precision; observations and thresholds are always `f64`.
/// - The engine is stateless between calls apart from its options.
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureEngine<S> {
    options: MixtureOptions,
    _scalar: PhantomData<S>,
}

impl<S: Real> MixtureEngine<S> {
    pub fn new(options: MixtureOptions) -> Self {
        MixtureEngine { options, _scalar: PhantomData }
    }

    pub fn options(&self) -> &MixtureOptions {
        &self.options
    }

    /// Thresholds for a batch from per-location history (`time × location`).
    ///
    /// ## Steps
    /// 1. The actual threshold is the `quantile` of positive history.
    /// 2. Without EVT the effective threshold is `+∞` everywhere.
    /// 3. With `variable_threshold` the effective threshold is a fresh
    ///    quantile drawn from `variable_range`; otherwise it is the actual
    ///    threshold.
    ///
    /// # Errors
    /// - [`MixtureError::InvalidOption`](crate::mixture::MixtureError) for
    ///   out-of-range quantile levels.
    pub fn thresholds<R: Rng + ?Sized>(
        &self, history: ArrayView2<'_, f64>, rng: &mut R,
    ) -> MixtureResult<Thresholds> {
        let actual = quantile_thresholds(history, self.options.quantile)?;
        if !self.options.use_evt || !self.options.variable_threshold {
            return Ok(Thresholds::fixed(actual, self.options.use_evt));
        }
        let (lo, hi) = self.options.variable_range;
        let effective = sample_thresholds(history, lo, hi, rng)?;
        Thresholds::new(effective, actual)
    }

    /// Constrain raw network output against the effective thresholds.
    ///
    /// # Errors
    /// - Shape errors if the thresholds neither match the batch nor have
    ///   length 1.
    pub fn constrain(
        &self, raw: &RawParameters<S>, thresholds: &Thresholds,
    ) -> MixtureResult<ConstrainedParameters<S>> {
        let effective = thresholds.effective.view();
        let max_excess = max_excess(effective, self.options.max_value);
        Ok(constrain_all(raw, max_excess.view(), &self.options.constraints, Some(effective))?)
    }

    /// Constrain and evaluate log-likelihood, CDF, mean and labels.
    ///
    /// # Errors
    /// - Shape errors from any stage.
    pub fn evaluate(
        &self, raw: &RawParameters<S>, samples: ArrayView1<'_, f64>, thresholds: &Thresholds,
    ) -> MixtureResult<MixtureOutput<S>> {
        let params = self.constrain(raw, thresholds)?;
        self.evaluate_constrained(&params, samples, thresholds)
    }

    /// Evaluate per-cell outputs for already constrained parameters.
    ///
    /// # Errors
    /// - Shape errors if any input neither matches the batch nor has length 1.
    pub fn evaluate_constrained(
        &self, params: &ConstrainedParameters<S>, samples: ArrayView1<'_, f64>,
        thresholds: &Thresholds,
    ) -> MixtureResult<MixtureOutput<S>> {
        let effective = thresholds.effective.view();
        let actual = thresholds.actual.view();
        let ConstrainedParameters { gates, gp, moderate } = params;

        Ok(MixtureOutput {
            loglik: mixture_loglik(samples, gp, moderate, gates, effective)?,
            cdf: mixture_cdf(samples, gp, moderate, gates, effective, actual)?,
            mean: mixture_mean(gp, moderate, gates, effective)?,
            labels: classify_excess(samples, actual)?,
        })
    }

    /// Training loss:
    /// `mean_weight · RMSE(mean, samples) + (1 - mean_weight) · NLL`,
    /// with both terms restricted to non-missing cells.
    ///
    /// # Errors
    /// - Shape errors from any stage.
    pub fn loss(
        &self, raw: &RawParameters<S>, samples: ArrayView1<'_, f64>, thresholds: &Thresholds,
    ) -> MixtureResult<S> {
        let params = self.constrain(raw, thresholds)?;
        let effective = thresholds.effective.view();
        let ConstrainedParameters { gates, gp, moderate } = &params;

        let loglik = mixture_loglik(samples, gp, moderate, gates, effective)?;
        let mean = mixture_mean(gp, moderate, gates, effective)?;
        let nll = nan_mean(loglik.mapv(|l| -l).view());
        let rmse = masked_rmse(mean.view(), samples)?;

        let w = self.options.mean_weight;
        Ok(S::from_f64(w) * rmse + S::from_f64(1.0 - w) * nll)
    }
}

impl<S: Real> Default for MixtureEngine<S> {
    fn default() -> Self {
        MixtureEngine::new(MixtureOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autodiff::Dual;
    use crate::constraints::{ConstraintOptions, ModerateDensity, PositiveTransform};
    use crate::distributions::lognormal_mean;
    use crate::mixture::MixtureError;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn raw_output() -> Array2<f64> {
        array![
            [-0.5, -1.0, 0.2, 0.3, 1.0, -0.2],
            [0.1, -0.5, -0.3, 0.8, 0.5, 0.4],
            [1.0, 0.0, 0.0, -0.4, 1.5, 0.0],
            [-2.0, 0.5, 0.6, 0.1, 0.2, 1.0],
        ]
    }

    fn history() -> Array2<f64> {
        Array2::from_shape_fn((40, 4), |(t, loc)| {
            if t % 3 == 0 { 0.0 } else { (t as f64 + 1.0) * (loc as f64 + 1.0) * 0.5 }
        })
    }

    #[test]
    fn evaluate_matches_direct_composition() {
        // Purpose
        // -------
        // The engine is a thin composition; its outputs must equal calling
        // constrain_all and the aggregators directly.
        let engine = MixtureEngine::<f64>::default();
        let raw = RawParameters::from_network_output(raw_output().view(), true).unwrap();
        let thresholds = Thresholds::fixed(array![10.0, 12.0, 8.0, 15.0], true);
        let samples = array![0.0, 5.0, 50.0, f64::NAN];

        let out = engine.evaluate(&raw, samples.view(), &thresholds).unwrap();

        let max_excess = max_excess(thresholds.effective.view(), engine.options().max_value);
        let params = constrain_all(
            &raw,
            max_excess.view(),
            &ConstraintOptions::default(),
            Some(thresholds.effective.view()),
        )
        .unwrap();
        let loglik = mixture_loglik(
            samples.view(),
            &params.gp,
            &params.moderate,
            &params.gates,
            thresholds.effective.view(),
        )
        .unwrap();
        assert_eq!(out.labels.slice(ndarray::s![..3]), array![0.0, 1.0, 2.0]);
        assert!(out.labels[3].is_nan());
        assert_relative_eq!(out.loglik[0], params.gates.zero[0].ln(), epsilon = 1e-12);
        for i in 0..3 {
            assert_relative_eq!(out.loglik[i], loglik[i], epsilon = 1e-12);
        }
        assert!(out.loglik[3].is_nan() && out.cdf[3].is_nan());
        assert!(out.mean[3].is_finite());
    }

    #[test]
    fn hurdle_engine_reproduces_hurdle_mean() {
        let engine = MixtureEngine::<f64>::new(MixtureOptions::hurdle());
        let raw = RawParameters::from_network_output(raw_output().view(), false).unwrap();
        let thresholds = engine.thresholds(history().view(), &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(thresholds.effective.iter().all(|t| *t == f64::INFINITY));
        assert!(thresholds.actual.iter().all(|t| t.is_finite()));

        let params = engine.constrain(&raw, &thresholds).unwrap();
        let out = engine.evaluate_constrained(&params, array![1.0].view(), &thresholds).unwrap();

        for i in 0..params.len() {
            let expected = (1.0 - params.gates.zero[i])
                * lognormal_mean(params.moderate.mu[i], params.moderate.var[i]);
            assert_relative_eq!(out.mean[i], expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn variable_thresholds_keep_actual_threshold_fixed() {
        let options = MixtureOptions { variable_threshold: true, ..MixtureOptions::default() };
        let engine = MixtureEngine::<f64>::new(options);
        let mut rng = StdRng::seed_from_u64(11);

        let fixed = quantile_thresholds(history().view(), options.quantile).unwrap();
        let lo = quantile_thresholds(history().view(), options.variable_range.0).unwrap();
        let hi = quantile_thresholds(history().view(), options.variable_range.1).unwrap();
        for _ in 0..5 {
            let t = engine.thresholds(history().view(), &mut rng).unwrap();
            assert_eq!(t.actual, fixed);
            for loc in 0..t.len() {
                assert!(t.effective[loc] >= lo[loc] - 1e-12);
                assert!(t.effective[loc] <= hi[loc] + 1e-12);
            }
        }
    }

    #[test]
    fn loss_combines_rmse_and_nll() {
        let engine = MixtureEngine::<f64>::default();
        let raw = RawParameters::from_network_output(raw_output().view(), true).unwrap();
        let thresholds = Thresholds::fixed(array![10.0], true);
        let samples = array![0.0, 5.0, 50.0, f64::NAN];

        let out = engine.evaluate(&raw, samples.view(), &thresholds).unwrap();
        let nll = -(out.loglik[0] + out.loglik[1] + out.loglik[2]) / 3.0;
        let rmse = masked_rmse(out.mean.view(), samples.view()).unwrap();
        let loss = engine.loss(&raw, samples.view(), &thresholds).unwrap();

        assert_relative_eq!(loss, 0.9 * rmse + 0.1 * nll, epsilon = 1e-10);
    }

    #[test]
    fn f32_engine_agrees_with_f64() {
        // Given the same raw output in both precisions
        // Expect losses to agree to single precision.
        let raw64 = RawParameters::from_network_output(raw_output().view(), true).unwrap();
        let raw32 =
            RawParameters::from_network_output(raw_output().mapv(|v| v as f32).view(), true).unwrap();
        let thresholds = Thresholds::fixed(array![10.0, 12.0, 8.0, 15.0], true);
        let samples = array![0.0, 5.0, 50.0, 3.0];

        let l64 = MixtureEngine::<f64>::default().loss(&raw64, samples.view(), &thresholds).unwrap();
        let l32 = MixtureEngine::<f32>::default().loss(&raw32, samples.view(), &thresholds).unwrap();

        assert_relative_eq!(l32 as f64, l64, max_relative = 1e-3);
    }

    #[test]
    fn dual_loss_value_matches_f64() {
        let raw64 = RawParameters::from_network_output(raw_output().view(), true).unwrap();
        let raw_dual =
            RawParameters::from_network_output(raw_output().mapv(Dual::constant).view(), true)
                .unwrap();
        let thresholds = Thresholds::fixed(array![10.0], true);
        let samples = array![0.0, 5.0, 50.0, 3.0];

        let l64 = MixtureEngine::<f64>::default().loss(&raw64, samples.view(), &thresholds).unwrap();
        let ld = MixtureEngine::<Dual>::default().loss(&raw_dual, samples.view(), &thresholds).unwrap();

        assert_relative_eq!(ld.val, l64, epsilon = 1e-12);
        assert_eq!(ld.dot, 0.0);
    }

    #[test]
    fn continuity_engine_ties_scale_to_moderate_density() {
        let constraints =
            ConstraintOptions::new(PositiveTransform::Exp, ModerateDensity::Lognormal, true);
        let options = MixtureOptions { constraints, ..MixtureOptions::default() };
        let engine = MixtureEngine::<f64>::new(options);
        let raw = RawParameters::from_network_output(raw_output().view(), true).unwrap();
        let thresholds = Thresholds::fixed(array![10.0], true);

        let params = engine.constrain(&raw, &thresholds).unwrap();

        for i in 0..params.len() {
            let density = crate::distributions::lognormal_ln_pdf(
                10.0,
                params.moderate.mu[i],
                params.moderate.var[i],
            )
            .exp();
            assert_relative_eq!(params.gp.sigma[i], density, max_relative = 1e-12);
        }
    }

    #[test]
    fn mismatched_thresholds_are_rejected() {
        let engine = MixtureEngine::<f64>::default();
        let raw = RawParameters::from_network_output(raw_output().view(), true).unwrap();
        let thresholds = Thresholds::fixed(array![10.0, 12.0], true);

        let err = engine.constrain(&raw, &thresholds).unwrap_err();
        assert!(matches!(err, MixtureError::Constraint(_)));
    }
}
