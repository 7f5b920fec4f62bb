//! Mixture options — model-level configuration for [`MixtureEngine`].
//!
//! Purpose
//! -------
//! Hold the switches that select between the full zero / lognormal / GP
//! mixture and the plain hurdle model, the threshold policy, and the
//! training-loss weighting, validated once at construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - `max_value` is finite and `> 0`.
//! - `quantile` and both ends of `variable_range` lie in `(0, 1)`, with
//!   `variable_range.0 <= variable_range.1`.
//! - `mean_weight ∈ [0, 1]`.
//! - Continuity mode requires the extreme-value component.
//!
//! [`MixtureEngine`]: crate::mixture::MixtureEngine

use crate::constraints::ConstraintOptions;
use crate::mixture::errors::{MixtureError, MixtureResult};

/// Largest value the GP tail must assign density to.
pub const DEFAULT_MAX_VALUE: f64 = 250.0;
/// Quantile of positive history defining the threshold.
pub const DEFAULT_QUANTILE: f64 = 0.6;
/// Weight on the RMSE term of the training loss.
pub const DEFAULT_MEAN_WEIGHT: f64 = 0.9;
/// Range of quantile levels drawn under the variable-threshold policy.
pub const DEFAULT_VARIABLE_RANGE: (f64, f64) = (0.5, 0.9);

/// Model-level configuration.
///
/// Fields:
/// - `use_evt` — include the GP tail; `false` gives the hurdle model.
/// - `variable_threshold` — draw a random model threshold per location and
///   batch during training; the fixed quantile threshold is then used only
///   for classification and the GP location.
/// - `constraints` — options forwarded to
///   [`constrain_all`](crate::constraints::constrain_all).
/// - `max_value`, `quantile`, `mean_weight`, `variable_range` — see the
///   module invariants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixtureOptions {
    pub use_evt: bool,
    pub variable_threshold: bool,
    pub constraints: ConstraintOptions,
    pub max_value: f64,
    pub quantile: f64,
    pub mean_weight: f64,
    pub variable_range: (f64, f64),
}

impl MixtureOptions {
    /// Validate and build options.
    ///
    /// # Errors
    /// - [`MixtureError::InvalidOption`] for an out-of-range numeric field.
    /// - [`MixtureError::IncompatibleOptions`] for continuity without EVT.
    pub fn new(
        use_evt: bool, variable_threshold: bool, constraints: ConstraintOptions, max_value: f64,
        quantile: f64, mean_weight: f64, variable_range: (f64, f64),
    ) -> MixtureResult<Self> {
        if !max_value.is_finite() || max_value <= 0.0 {
            return Err(MixtureError::InvalidOption {
                name: "max_value",
                value: max_value,
                reason: "must be finite and > 0",
            });
        }
        check_unit_open("quantile", quantile)?;
        check_unit_open("variable_range.0", variable_range.0)?;
        check_unit_open("variable_range.1", variable_range.1)?;
        if variable_range.0 > variable_range.1 {
            return Err(MixtureError::InvalidOption {
                name: "variable_range",
                value: variable_range.0,
                reason: "lower end must not exceed upper end",
            });
        }
        if !(0.0..=1.0).contains(&mean_weight) {
            return Err(MixtureError::InvalidOption {
                name: "mean_weight",
                value: mean_weight,
                reason: "must lie in [0, 1]",
            });
        }
        if constraints.continuity && !use_evt {
            return Err(MixtureError::IncompatibleOptions {
                reason: "continuity mode requires use_evt = true",
            });
        }
        Ok(MixtureOptions {
            use_evt,
            variable_threshold,
            constraints,
            max_value,
            quantile,
            mean_weight,
            variable_range,
        })
    }

    /// Hurdle model: no GP tail, otherwise defaults.
    pub fn hurdle() -> Self {
        MixtureOptions { use_evt: false, ..MixtureOptions::default() }
    }
}

impl Default for MixtureOptions {
    fn default() -> Self {
        MixtureOptions {
            use_evt: true,
            variable_threshold: false,
            constraints: ConstraintOptions::default(),
            max_value: DEFAULT_MAX_VALUE,
            quantile: DEFAULT_QUANTILE,
            mean_weight: DEFAULT_MEAN_WEIGHT,
            variable_range: DEFAULT_VARIABLE_RANGE,
        }
    }
}

fn check_unit_open(name: &'static str, value: f64) -> MixtureResult<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(MixtureError::InvalidOption { name, value, reason: "must lie in (0, 1)" })
    }
}
