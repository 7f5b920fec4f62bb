//! hurdle_gpd — zero / truncated-lognormal / generalized Pareto mixture
//! statistics for spatiotemporal rainfall models, with optional Python
//! bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the mixture engine to Python via the `_hurdle_gpd` extension
//! module. A network predicts six raw values per (location, time) cell; this
//! crate turns them into valid mixture parameters and evaluates likelihood,
//! CDF, predictive mean, labels and evaluation metrics.
//!
//! Key behaviors
//! -------------
//! - [`autodiff`]: the [`Real`](autodiff::Real) scalar abstraction (`f32`,
//!   `f64`, forward-mode [`Dual`](autodiff::Dual)).
//! - [`distributions`]: lognormal (plain and truncated), normal and GP
//!   densities, CDFs and means.
//! - [`constraints`]: raw network output → constrained parameters.
//! - [`mixture`]: per-cell log-likelihood, CDF, mean and labels, thresholds,
//!   and the [`MixtureEngine`](mixture::MixtureEngine) training loss.
//! - [`metrics`]: accuracy, F1, AUC, correlation and Brier score.
//!
//! Invariants & assumptions
//! ------------------------
//! - Missing observations are `NaN` and propagate only into the cells they
//!   belong to.
//! - A threshold of `+∞` turns the mixture into the plain hurdle model.
//! - All heavy numerical work lives in the inner modules; the PyO3 items
//!   here only convert arrays and map errors.
//!
//! Conventions
//! -----------
//! - Paired parameters cross the Python boundary as `(n, 2)` float64 arrays:
//!   gates `(zero, excess)`, GP `(xi, sigma)`, lognormal `(mu, var)`.
//! - Errors from core Rust code are converted to `ValueError` at the PyO3
//!   boundary with the Rust `Display` message.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code depends on the inner modules directly and can ignore
//!   the items guarded by the `python-bindings` feature.
//! - The Python training loop imports `_hurdle_gpd.mixture` and
//!   `_hurdle_gpd.metrics`.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   the end-to-end pipeline test under `tests/`.

pub mod autodiff;
pub mod constraints;
pub mod distributions;
pub mod metrics;
pub mod mixture;
#[cfg(feature = "python-bindings")]
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    constraints::{GateProbs, GpParams, LognormalParams, RawParameters},
    utils::{
        extract_constraint_options, extract_f64_array, extract_f64_matrix, extract_optional_array,
    },
};

/// Parameter pairs as returned to Python: gates, GP, lognormal.
#[cfg(feature = "python-bindings")]
type PyParamPairs<'py> =
    (Bound<'py, PyArray2<f64>>, Bound<'py, PyArray2<f64>>, Bound<'py, PyArray2<f64>>);

#[cfg(feature = "python-bindings")]
fn extract_params<'py>(
    py: Python<'py>, gp: &Bound<'py, PyAny>, moderate: &Bound<'py, PyAny>,
    gates: &Bound<'py, PyAny>,
) -> PyResult<(GpParams<f64>, LognormalParams<f64>, GateProbs<f64>)> {
    let gp = GpParams::from_pairs(extract_f64_matrix(py, gp)?.as_array())?;
    let moderate = LognormalParams::from_pairs(extract_f64_matrix(py, moderate)?.as_array())?;
    let gates = GateProbs::from_pairs(extract_f64_matrix(py, gates)?.as_array())?;
    Ok((gp, moderate, gates))
}

/// constrain_all — map raw `(n, 6)` (or `(n, 4)` without EVT) network
/// output to `(gates, gp, lognormal)` parameter pairs.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "constrain_all",
    signature = (
        raw,
        max_excess,
        thresholds = None,
        positive = None,
        density = None,
        continuity = None,
        use_evt = true,
    ),
    text_signature = "(raw, max_excess, /, thresholds=None, positive='exp', density='lognormal', \
                      continuity=False, use_evt=True)"
)]
#[allow(clippy::too_many_arguments)]
fn py_constrain_all<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>, max_excess: &Bound<'py, PyAny>,
    thresholds: Option<&Bound<'py, PyAny>>, positive: Option<&str>, density: Option<&str>,
    continuity: Option<bool>, use_evt: bool,
) -> PyResult<PyParamPairs<'py>> {
    let raw = extract_f64_matrix(py, raw)?;
    let raw = RawParameters::from_network_output(raw.as_array(), use_evt)?;
    let max_excess = extract_f64_array(py, max_excess)?;
    let thresholds = extract_optional_array(py, thresholds)?;
    let options = extract_constraint_options(positive, density, continuity)?;

    let params = constraints::constrain_all(
        &raw,
        max_excess.as_array(),
        &options,
        thresholds.as_ref().map(|t| t.as_array()),
    )?;
    Ok((
        params.gates.to_pairs().into_pyarray(py),
        params.gp.to_pairs().into_pyarray(py),
        params.moderate.to_pairs().into_pyarray(py),
    ))
}

/// mixture_loglik — per-cell log-likelihood.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "mixture_loglik",
    text_signature = "(samples, gp, moderate, gates, thresholds, /)"
)]
fn py_mixture_loglik<'py>(
    py: Python<'py>, samples: &Bound<'py, PyAny>, gp: &Bound<'py, PyAny>,
    moderate: &Bound<'py, PyAny>, gates: &Bound<'py, PyAny>, thresholds: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let (gp, moderate, gates) = extract_params(py, gp, moderate, gates)?;
    let samples = extract_f64_array(py, samples)?;
    let thresholds = extract_f64_array(py, thresholds)?;
    let out =
        mixture::mixture_loglik(samples.as_array(), &gp, &moderate, &gates, thresholds.as_array())?;
    Ok(out.into_pyarray(py))
}

/// mixture_cdf — per-cell CDF; `actual_thresholds` defaults to the
/// effective ones.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "mixture_cdf",
    signature = (samples, gp, moderate, gates, effective_thresholds, actual_thresholds = None),
    text_signature = "(samples, gp, moderate, gates, effective_thresholds, /, actual_thresholds=None)"
)]
fn py_mixture_cdf<'py>(
    py: Python<'py>, samples: &Bound<'py, PyAny>, gp: &Bound<'py, PyAny>,
    moderate: &Bound<'py, PyAny>, gates: &Bound<'py, PyAny>,
    effective_thresholds: &Bound<'py, PyAny>, actual_thresholds: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let (gp, moderate, gates) = extract_params(py, gp, moderate, gates)?;
    let samples = extract_f64_array(py, samples)?;
    let effective = extract_f64_array(py, effective_thresholds)?;
    let actual = extract_optional_array(py, actual_thresholds)?;
    let actual_view = actual.as_ref().map_or(effective.as_array(), |a| a.as_array());
    let out = mixture::mixture_cdf(
        samples.as_array(),
        &gp,
        &moderate,
        &gates,
        effective.as_array(),
        actual_view,
    )?;
    Ok(out.into_pyarray(py))
}

/// mixture_mean — per-cell predictive mean.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "mixture_mean", text_signature = "(gp, moderate, gates, thresholds, /)")]
fn py_mixture_mean<'py>(
    py: Python<'py>, gp: &Bound<'py, PyAny>, moderate: &Bound<'py, PyAny>,
    gates: &Bound<'py, PyAny>, thresholds: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let (gp, moderate, gates) = extract_params(py, gp, moderate, gates)?;
    let thresholds = extract_f64_array(py, thresholds)?;
    let out = mixture::mixture_mean(&gp, &moderate, &gates, thresholds.as_array())?;
    Ok(out.into_pyarray(py))
}

/// class_labels — 0 (zero), 1 (moderate), 2 (excess), NaN (missing).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "class_labels", text_signature = "(samples, thresholds, /)")]
fn py_class_labels<'py>(
    py: Python<'py>, samples: &Bound<'py, PyAny>, thresholds: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let samples = extract_f64_array(py, samples)?;
    let thresholds = extract_f64_array(py, thresholds)?;
    let out = mixture::classify_excess(samples.as_array(), thresholds.as_array())?;
    Ok(out.into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "accuracy", text_signature = "(a, b, /)")]
fn py_accuracy<'py>(
    py: Python<'py>, a: &Bound<'py, PyAny>, b: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let (a, b) = (extract_f64_array(py, a)?, extract_f64_array(py, b)?);
    Ok(metrics::accuracy(a.as_array(), b.as_array())?)
}

/// f1 — `(micro, macro)` F1 scores.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "f1", text_signature = "(truth, pred, /)")]
fn py_f1<'py>(
    py: Python<'py>, truth: &Bound<'py, PyAny>, pred: &Bound<'py, PyAny>,
) -> PyResult<(f64, f64)> {
    let (truth, pred) = (extract_f64_array(py, truth)?, extract_f64_array(py, pred)?);
    let scores = metrics::f1(truth.as_array(), pred.as_array())?;
    Ok((scores.micro, scores.macro_avg))
}

/// auc — `(ovo, ovr)` macro AUC of `(n, k)` class probabilities.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "auc", text_signature = "(truth, probs, /)")]
fn py_auc<'py>(
    py: Python<'py>, truth: &Bound<'py, PyAny>, probs: &Bound<'py, PyAny>,
) -> PyResult<(f64, f64)> {
    let truth = extract_f64_array(py, truth)?;
    let probs = extract_f64_matrix(py, probs)?;
    let scores = metrics::auc(truth.as_array(), probs.as_array())?;
    Ok((scores.ovo, scores.ovr))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "pearson", text_signature = "(a, b, /)")]
fn py_pearson<'py>(
    py: Python<'py>, a: &Bound<'py, PyAny>, b: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let (a, b) = (extract_f64_array(py, a)?, extract_f64_array(py, b)?);
    Ok(metrics::pearson(a.as_array(), b.as_array())?)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "brier_score", text_signature = "(a, b, /)")]
fn py_brier_score<'py>(
    py: Python<'py>, a: &Bound<'py, PyAny>, b: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let (a, b) = (extract_f64_array(py, a)?, extract_f64_array(py, b)?);
    Ok(metrics::brier_score(a.as_array(), b.as_array())?)
}

/// _hurdle_gpd — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_hurdle_gpd` Python module and register its `mixture` and
/// `metrics` submodules.
///
/// Key behaviors
/// -------------
/// - Create both submodules and attach them to the parent module.
/// - Register the submodules in `sys.modules` so they are importable via
///   dotted paths from Python.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating submodules or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _hurdle_gpd<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let mixture_mod = PyModule::new(_py, "mixture")?;
    let metrics_mod = PyModule::new(_py, "metrics")?;
    mixture_functions(m, &mixture_mod)?;
    metric_functions(m, &metrics_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("hurdle_gpd.mixture", mixture_mod)?;
    _py.import("sys")?.getattr("modules")?.set_item("hurdle_gpd.metrics", metrics_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn mixture_functions<'py>(
    hurdle_gpd: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_constrain_all, m)?)?;
    m.add_function(wrap_pyfunction!(py_mixture_loglik, m)?)?;
    m.add_function(wrap_pyfunction!(py_mixture_cdf, m)?)?;
    m.add_function(wrap_pyfunction!(py_mixture_mean, m)?)?;
    m.add_function(wrap_pyfunction!(py_class_labels, m)?)?;
    hurdle_gpd.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn metric_functions<'py>(
    hurdle_gpd: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_accuracy, m)?)?;
    m.add_function(wrap_pyfunction!(py_f1, m)?)?;
    m.add_function(wrap_pyfunction!(py_auc, m)?)?;
    m.add_function(wrap_pyfunction!(py_pearson, m)?)?;
    m.add_function(wrap_pyfunction!(py_brier_score, m)?)?;
    hurdle_gpd.add_submodule(m)?;
    Ok(())
}
