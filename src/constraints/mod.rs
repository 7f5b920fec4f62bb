//! constraints — map unconstrained network outputs onto valid mixture
//! parameters.
//!
//! Purpose
//! -------
//! Turn the six raw values the network emits per cell into gate
//! probabilities, GP tail parameters and lognormal parameters that are
//! always valid for the mixture likelihood, so the network can be trained
//! with an unconstrained optimizer.
//!
//! Key behaviors
//! -------------
//! - Elementwise transforms ([`constrain_probability`], [`constrain_positive`],
//!   [`constrain_upper_bounded`], [`constrain_gp_shape`]) are smooth, monotone
//!   and keep outputs strictly inside their ranges, even in saturation.
//! - [`constrain_gp`] couples shape and scale to the largest excess the GP
//!   must support, so `1 + xi·z/sigma > 0` for every `z ∈ [0, max_excess]`.
//! - [`constrain_all`] applies the full set according to
//!   [`ConstraintOptions`], including continuity mode where the GP scale is
//!   derived from the moderate density at the threshold.
//!
//! Invariants & assumptions
//! ------------------------
//! - Gate probabilities lie in `(PROB_EPS, 1 - PROB_EPS)`.
//! - Lognormal variance lies in `(0, VAR_UPPER)`; GP scale in
//!   `(0, SCALE_UPPER)` outside continuity mode; GP shape `< XI_UPPER`.
//! - `NaN` in a raw value yields `NaN` only in the parameters derived from
//!   that value.
//!
//! Conventions
//! -----------
//! - Per-cell inputs may be given with length 1 and are broadcast
//!   ([`validation::Cells`]); any other mismatch is
//!   [`ConstraintError::ShapeMismatch`].
//! - Continuity mode does not re-check the derived GP scale against
//!   `SCALE_UPPER`; out-of-range scales are reported through `log::warn!`.
//!
//! Downstream usage
//! ----------------
//! - [`crate::mixture::MixtureEngine`] calls [`constrain_all`] with the
//!   effective thresholds and the max excess derived from them.
//! - The individual transforms are public for callers that build their own
//!   parameterisations.
//!
//! Testing notes
//! -------------
//! - Range invariants are checked with `proptest` over wide raw ranges.
//! - Saturation is checked in both `f32` and `f64`.

pub mod errors;
pub mod options;
pub mod params;
pub mod transforms;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ConstraintError, ConstraintResult};
pub use self::options::{ConstraintOptions, ModerateDensity, PositiveTransform};
pub use self::params::{
    ConstrainedParameters, GateProbs, GpParams, LognormalParams, RawParameters, constrain_all,
    constrain_gates, constrain_gp, constrain_gp_legacy, constrain_lognormal,
};
pub use self::transforms::{
    BOUND_SHARPNESS, GP_EPS, POS_EPS, PROB_EPS, SCALE_UPPER, VAR_UPPER, XI_SHARPNESS, XI_UPPER,
    constrain_gp_shape, constrain_positive, constrain_probability, constrain_upper_bounded,
};
