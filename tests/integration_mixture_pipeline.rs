//! Integration tests for the rainfall mixture pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path a training/evaluation loop takes: history
//!   → thresholds, raw network output → constrained parameters → per-cell
//!   log-likelihood, CDF, mean and labels → loss and evaluation metrics.
//! - Exercise the full mixture, the hurdle model and the variable-threshold
//!   policy on the same synthetic data.
//!
//! Coverage
//! --------
//! - `mixture::MixtureEngine`: thresholds, constrain, evaluate, loss.
//! - `constraints::RawParameters`: splitting `(n, 6)` and `(n, 4)` output.
//! - `metrics`: accuracy, F1, AUC, Pearson, Brier score on engine output.
//! - `autodiff::Dual`: loss gradient w.r.t. raw output against central
//!   differences.
//!
//! Exclusions
//! ----------
//! - Edge cases of the individual distributions and transforms; those are
//!   covered by unit tests.
//! - Python bindings.
use finitediff::FiniteDiff;
use hurdle_gpd::{
    autodiff::Dual,
    constraints::{ConstrainedParameters, RawParameters},
    metrics::{accuracy, auc, brier_score, f1, pearson},
    mixture::{LABEL_EXCESS, MixtureEngine, MixtureOptions, Thresholds},
};
use ndarray::{Array1, Array2, Axis};
use rand::{Rng, SeedableRng, rngs::StdRng};

const LOCATIONS: usize = 9;

/// Purpose
/// -------
/// Synthetic `time × location` rainfall history: roughly 40% dry days and
/// lognormal-ish wet amounts whose scale grows with the location index.
fn history(seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((200, LOCATIONS), |(_, loc)| {
        if rng.gen_bool(0.4) {
            0.0
        } else {
            let z: f64 = rng.gen_range(-2.0..2.0);
            (1.0 + 0.2 * loc as f64) * z.exp()
        }
    })
}

/// Deterministic stand-in for network output, one row per location.
fn raw_output(width: usize) -> Array2<f64> {
    Array2::from_shape_fn((LOCATIONS, width), |(loc, k)| {
        0.3 * ((loc * width + k) as f64 * 0.7).sin()
    })
}

/// Observations covering every class: zero, moderate and excess, plus one
/// missing cell.
fn observations(actual: &Array1<f64>) -> Array1<f64> {
    let mut obs = Array1::from_shape_fn(LOCATIONS, |loc| match loc % 3 {
        0 => 0.0,
        1 => 0.5 * actual[loc],
        _ => actual[loc] + 5.0,
    });
    obs[LOCATIONS - 1] = f64::NAN;
    obs
}

/// Class probabilities `(zero, moderate, excess)` per cell from constrained
/// parameters.
fn class_probs(params: &ConstrainedParameters<f64>) -> Array2<f64> {
    Array2::from_shape_fn((params.len(), 3), |(i, c)| {
        let p0 = params.gates.zero[i];
        let pe = params.gates.excess[i];
        match c {
            0 => p0,
            1 => (1.0 - p0) * (1.0 - pe),
            _ => (1.0 - p0) * pe,
        }
    })
}

#[test]
// Purpose
// -------
// Run the full mixture end to end and check every per-cell output.
//
// Given
// -----
// - Default options (GP tail, fixed 0.6-quantile thresholds).
// - Observations with zero, moderate, excess and missing cells.
//
// Expect
// ------
// - Labels follow the construction of the observations.
// - Log-likelihood and CDF are `NaN` only at the missing cell.
// - CDFs lie in [0, 1]; means are positive; the loss is finite.
fn full_mixture_pipeline_produces_consistent_outputs() {
    // Arrange
    let engine = MixtureEngine::<f64>::default();
    let thresholds = engine.thresholds(history(1).view(), &mut StdRng::seed_from_u64(2)).unwrap();
    assert!(thresholds.actual.iter().all(|t| t.is_finite() && *t > 0.0));
    let raw = RawParameters::from_network_output(raw_output(6).view(), true).unwrap();
    let samples = observations(&thresholds.actual);

    // Act
    let out = engine.evaluate(&raw, samples.view(), &thresholds).unwrap();
    let loss = engine.loss(&raw, samples.view(), &thresholds).unwrap();

    // Assert
    for i in 0..LOCATIONS - 1 {
        assert_eq!(out.labels[i], (i % 3) as f64, "label at {i}");
        assert!(out.loglik[i].is_finite(), "loglik at {i} = {}", out.loglik[i]);
        assert!((0.0..=1.0).contains(&out.cdf[i]), "cdf at {i} = {}", out.cdf[i]);
    }
    let last = LOCATIONS - 1;
    assert!(out.labels[last].is_nan() && out.loglik[last].is_nan() && out.cdf[last].is_nan());
    assert!(out.mean.iter().all(|m| m.is_finite() && *m > 0.0));
    assert!(loss.is_finite());
}

#[test]
// Purpose
// -------
// Feed engine output into every evaluation metric.
//
// Given
// -----
// - Predicted labels = argmax of the gate-implied class probabilities.
// - True labels from the engine.
//
// Expect
// ------
// - Scores lie in their valid ranges and the missing cell is ignored.
fn engine_output_feeds_evaluation_metrics() {
    // Arrange
    let engine = MixtureEngine::<f64>::default();
    let thresholds = engine.thresholds(history(3).view(), &mut StdRng::seed_from_u64(4)).unwrap();
    let raw = RawParameters::from_network_output(raw_output(6).view(), true).unwrap();
    let samples = observations(&thresholds.actual);
    let params = engine.constrain(&raw, &thresholds).unwrap();
    let out = engine.evaluate_constrained(&params, samples.view(), &thresholds).unwrap();

    let probs = class_probs(&params);
    let predicted: Array1<f64> = probs
        .axis_iter(Axis(0))
        .map(|row| {
            (0..3).max_by(|&a, &b| row[a].total_cmp(&row[b])).map_or(f64::NAN, |c| c as f64)
        })
        .collect();
    let is_excess = out.labels.mapv(|l| {
        if l.is_nan() { f64::NAN } else if l == LABEL_EXCESS { 1.0 } else { 0.0 }
    });

    // Act
    let acc = accuracy(out.labels.view(), predicted.view()).unwrap();
    let f1_scores = f1(out.labels.view(), predicted.view()).unwrap();
    let auc_scores = auc(out.labels.view(), probs.view()).unwrap();
    let brier = brier_score(probs.column(2), is_excess.view()).unwrap();
    let r = pearson(out.mean.view(), samples.view()).unwrap();

    // Assert
    assert!((0.0..=1.0).contains(&acc));
    assert!((f1_scores.micro - acc).abs() < 1e-12);
    assert!((0.0..=1.0).contains(&f1_scores.macro_avg));
    assert!((0.0..=1.0).contains(&auc_scores.ovo));
    assert!((0.0..=1.0).contains(&auc_scores.ovr));
    assert!((0.0..=1.0).contains(&brier));
    assert!((-1.0..=1.0).contains(&r));
}

#[test]
// Purpose
// -------
// The hurdle configuration accepts 4-column output and ignores the tail.
//
// Expect
// ------
// - Effective thresholds are +∞, actual thresholds finite.
// - Mean = (1 - p0) · exp(mu + var/2) per cell.
// - Labels still use the actual thresholds, so excess cells are labelled 2.
fn hurdle_pipeline_uses_actual_thresholds_only_for_labels() {
    let engine = MixtureEngine::<f64>::new(MixtureOptions::hurdle());
    let thresholds = engine.thresholds(history(5).view(), &mut StdRng::seed_from_u64(6)).unwrap();
    let raw = RawParameters::from_network_output(raw_output(4).view(), false).unwrap();
    let samples = observations(&thresholds.actual);

    let params = engine.constrain(&raw, &thresholds).unwrap();
    let out = engine.evaluate_constrained(&params, samples.view(), &thresholds).unwrap();

    assert!(thresholds.effective.iter().all(|t| *t == f64::INFINITY));
    for i in 0..LOCATIONS {
        let p0 = params.gates.zero[i];
        let expected = (1.0 - p0) * (params.moderate.mu[i] + params.moderate.var[i] / 2.0).exp();
        assert!((out.mean[i] - expected).abs() <= 1e-10 * expected.max(1.0));
    }
    assert_eq!(out.labels[2], LABEL_EXCESS);
    assert!(out.loglik[2].is_finite());
}

#[test]
// Purpose
// -------
// Variable thresholds change the model split but not the labels.
fn variable_threshold_pipeline_keeps_labels_on_actual_threshold() {
    let options = MixtureOptions { variable_threshold: true, ..MixtureOptions::default() };
    let engine = MixtureEngine::<f64>::new(options);
    let hist = history(7);
    let raw = RawParameters::from_network_output(raw_output(6).view(), true).unwrap();
    let mut rng = StdRng::seed_from_u64(8);

    let first = engine.thresholds(hist.view(), &mut rng).unwrap();
    let samples = observations(&first.actual);
    let out = engine.evaluate(&raw, samples.view(), &first).unwrap();

    for i in 0..LOCATIONS - 1 {
        assert_eq!(out.labels[i], (i % 3) as f64);
    }
    let fixed = Thresholds::fixed(first.actual.clone(), true);
    let fixed_out = engine.evaluate(&raw, samples.view(), &fixed).unwrap();
    for i in 0..LOCATIONS - 1 {
        assert_eq!(out.labels[i], fixed_out.labels[i]);
    }
    assert!(fixed_out.labels[LOCATIONS - 1].is_nan());
}

#[test]
// Purpose
// -------
// Forward-mode derivatives of the training loss w.r.t. every raw network
// output agree with central differences of the `f64` loss.
fn loss_gradient_matches_central_differences() {
    // Arrange
    let engine64 = MixtureEngine::<f64>::default();
    let engine_dual = MixtureEngine::<Dual>::default();
    let thresholds = engine64.thresholds(history(9).view(), &mut StdRng::seed_from_u64(10)).unwrap();
    let samples = observations(&thresholds.actual);
    let base = raw_output(6);
    let flat: Array1<f64> = base.iter().copied().collect();
    let shape = base.dim();

    let loss_at = |theta: &Array1<f64>| -> f64 {
        let output = Array2::from_shape_vec(shape, theta.to_vec()).unwrap();
        let raw = RawParameters::from_network_output(output.view(), true).unwrap();
        engine64.loss(&raw, samples.view(), &thresholds).unwrap()
    };

    // Act
    let numeric = flat.central_diff(&loss_at);

    // Assert
    for k in 0..flat.len() {
        let seeded: Vec<Dual> = flat
            .iter()
            .enumerate()
            .map(|(j, v)| if j == k { Dual::var(*v) } else { Dual::constant(*v) })
            .collect();
        let output = Array2::from_shape_vec(shape, seeded).unwrap();
        let raw = RawParameters::from_network_output(output.view(), true).unwrap();
        let loss = engine_dual.loss(&raw, samples.view(), &thresholds).unwrap();

        assert!(
            (loss.dot - numeric[k]).abs() <= 1e-5 * numeric[k].abs().max(1.0),
            "raw entry {k}: dual {} vs numeric {}",
            loss.dot,
            numeric[k]
        );
    }
}
