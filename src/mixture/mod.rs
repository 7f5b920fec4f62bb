//! mixture — zero / truncated-lognormal / GP-tail mixture for rainfall.
//!
//! Purpose
//! -------
//! Combine the three components into per-cell log-likelihood, CDF and
//! predictive mean for a batch of observations, derive the discrete
//! {zero, moderate, excess} labels, and assemble these into the training
//! loss through [`MixtureEngine`].
//!
//! Key behaviors
//! -------------
//! - [`mixture_loglik`] sums the applicable gate and density terms per cell;
//!   inapplicable terms are exact zeros.
//! - [`mixture_cdf`] separates the threshold that splits components
//!   (effective) from the one that locates the GP (actual).
//! - [`mixture_mean`] skips the GP term entirely when every threshold is
//!   `+∞`, reproducing the hurdle-model mean exactly.
//! - [`classify_excess`] labels observations against the actual threshold.
//! - [`MixtureEngine`] derives thresholds from history, constrains raw
//!   network output and evaluates everything in one scalar type.
//!
//! Invariants & assumptions
//! ------------------------
//! - A cell's output is `NaN` iff an input it depends on is `NaN`.
//! - A threshold of `+∞` means "no excess component" for that cell: the
//!   excess probability is taken as exactly 0 and the lognormal is not
//!   truncated.
//! - Observations exactly at the threshold are moderate (strict `>`).
//!
//! Conventions
//! -----------
//! - Observations and thresholds are `f64`; parameters are generic over
//!   [`Real`](crate::autodiff::Real).
//! - Every per-cell input may have length 1 and is broadcast; the batch
//!   length is the longest input.
//!
//! Downstream usage
//! ----------------
//! - Training loops build a [`MixtureEngine`] once, then per batch call
//!   [`MixtureEngine::thresholds`] and [`MixtureEngine::loss`].
//! - Evaluation loops use [`MixtureEngine::evaluate`] and hand the labels
//!   and CDFs to [`crate::metrics`].
//!
//! Testing notes
//! -------------
//! - Each submodule tests its edge cases (zero, at-threshold, `+∞`
//!   thresholds, `NaN` locality).
//! - `mixture_loglik` derivatives are checked against `finitediff`.
//! - CDF monotonicity is a `proptest` property.

pub mod cdf;
pub mod components;
pub mod engine;
pub mod errors;
pub mod labels;
pub mod loglik;
pub mod loss;
pub mod mean;
pub mod options;
pub mod thresholds;
mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::cdf::mixture_cdf;
pub use self::components::{
    gp_cdf, gp_log_density, gp_mean, lognormal_cdf, lognormal_log_density,
    truncated_lognormal_cdf, truncated_lognormal_mean,
};
pub use self::engine::{MixtureEngine, MixtureOutput};
pub use self::errors::{MixtureError, MixtureResult};
pub use self::labels::{LABEL_EXCESS, LABEL_MODERATE, LABEL_ZERO, classify_excess};
pub use self::loglik::mixture_loglik;
pub use self::loss::{masked_rmse, nan_mean};
pub use self::mean::mixture_mean;
pub use self::options::{
    DEFAULT_MAX_VALUE, DEFAULT_MEAN_WEIGHT, DEFAULT_QUANTILE, DEFAULT_VARIABLE_RANGE,
    MixtureOptions,
};
pub use self::thresholds::{
    Thresholds, effective_thresholds, max_excess, quantile_thresholds, sample_thresholds,
};
