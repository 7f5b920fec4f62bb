//! distributions — closed-form scalar primitives for the mixture components.
//!
//! Purpose
//! -------
//! Provide the per-cell building blocks of the zero / lognormal / GP
//! mixture: log densities, CDFs and means of the (optionally truncated)
//! lognormal and of the Generalized Pareto distribution, plus the normal
//! CDF they are expressed in.
//!
//! Key behaviors
//! -------------
//! - All routines are generic over [`Real`](crate::autodiff::Real) in their
//!   parameters and take observations/thresholds as plain `f64` data.
//! - `NaN` inputs produce `NaN` outputs. Branches (GP `xi == 0`, GP support
//!   end point, truncation bounds) are decided on primal values and only the
//!   taken branch is evaluated.
//!
//! Invariants & assumptions
//! ------------------------
//! - Lognormal parameters follow the `(mu, variance)` convention: if
//!   `X ~ LogNormal(mu, var)` then `ln X ~ N(mu, var)`.
//! - GP excesses are measured from the threshold (`x - u`); the GP mean is
//!   only finite for `xi < 1`, which the shape constraint guarantees.
//!
//! Downstream usage
//! ----------------
//! - [`crate::constraints`] evaluates [`lognormal_ln_pdf`] at the threshold
//!   to derive the continuity-mode GP scale.
//! - [`crate::mixture`] vectorizes these primitives over batches and
//!   combines them with the gating probabilities.
//!
//! Testing notes
//! -------------
//! - Unit tests compare against `statrs` where an equivalent distribution
//!   exists (normal, lognormal) and against closed forms otherwise.

pub mod gpd;
pub mod lognormal;
pub mod normal;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::gpd::{gpd_cdf, gpd_ln_pdf, gpd_mean};
pub use self::lognormal::{
    LOG_DENSITY_ZERO_PLACEHOLDER, TRUNC_EPS, lognormal_cdf, lognormal_ln_pdf, lognormal_mean,
    truncated_lognormal_cdf, truncated_lognormal_ln_pdf, truncated_lognormal_mean,
};
pub use self::normal::{normal_cdf, standard_normal_cdf};
