//! metrics — comparison statistics between predictions and observations.
//!
//! Purpose
//! -------
//! Score model output against observed data for the evaluation loop:
//! label agreement (accuracy, F1), probabilistic ranking quality (AUC) and
//! continuous agreement (Pearson correlation, Brier score, RMSE).
//!
//! Key behaviors
//! -------------
//! - Every statistic first builds a joint missing-value mask over its two
//!   inputs ([`joint_pairs`]) and is computed on the surviving cells only.
//! - [`f1`] returns micro and macro averages as [`F1Scores`]; [`auc`]
//!   returns macro one-vs-one (Hand–Till) and one-vs-rest AUC as
//!   [`AucScores`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Paired inputs have equal length; no broadcasting.
//! - Class labels are the integers produced by
//!   [`classify_excess`](crate::mixture::classify_excess) (`0`, `1`, `2`)
//!   or any other non-negative integers; AUC requires every class with a
//!   probability column to occur.
//!
//! Conventions
//! -----------
//! - Stateless reducers from arrays to scalars; failures are reported as
//!   [`MetricError`] rather than `NaN`.
//!
//! Testing notes
//! -------------
//! - Unit tests use small hand-computed examples, including ties for AUC
//!   and missing cells for every statistic.

pub mod auc;
pub mod classification;
pub mod errors;
pub mod regression;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::auc::{AucScores, auc};
pub use self::classification::{F1Scores, accuracy, f1};
pub use self::errors::{MetricError, MetricResult};
pub use self::regression::{brier_score, pearson, rmse};
pub use self::validation::joint_pairs;
