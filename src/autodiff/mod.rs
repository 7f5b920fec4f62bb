//! autodiff — differentiable scalar layer for the mixture engine.
//!
//! Purpose
//! -------
//! Let every constraint, density, and mixture routine be written once and
//! evaluated either for plain values (`f32`, `f64`) or for forward-mode
//! derivatives ([`Dual`]). The upstream training loop differentiates the
//! engine through this layer; the engine itself never builds gradients.
//!
//! Key behaviors
//! -------------
//! - [`Real`] abstracts the handful of primitives the engine needs
//!   (`ln`, `ln_1p`, `exp`, `sqrt`, `abs`, `erf`, `powf`) plus derived
//!   helpers (`sigmoid`, `softplus`) expressed purely in those primitives.
//! - [`Dual`] carries a primal value and a single tangent; arithmetic and
//!   transcendental functions apply the chain rule.
//!
//! Invariants & assumptions
//! ------------------------
//! - Branching is done on primal values only (`value()`), so a branch that
//!   is not taken contributes neither value nor tangent.
//! - `NaN` primal values are preserved by every primitive; comparisons with
//!   `NaN` are always false and callers rely on that for missing-data
//!   propagation.
//!
//! Conventions
//! -----------
//! - Precision is a type parameter, not process-wide state: choose `f32`
//!   or `f64` when constructing an engine.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`dual`] check each primitive's tangent against its
//!   closed-form derivative.
//! - Unit tests in [`scalar`] check the derived helpers for stability at
//!   extreme arguments and agreement across `f32`/`f64`/`Dual`.

pub mod dual;
pub mod scalar;

pub use self::dual::Dual;
pub use self::scalar::Real;
