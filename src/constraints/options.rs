//! Constraint options — which transforms map raw outputs into valid
//! parameters.
//!
//! [`PositiveTransform`] and [`ModerateDensity`] parse case-insensitively
//! from strings so Python callers and config files can name them.
//! [`ConstraintOptions`] bundles them with the continuity flag.

use crate::autodiff::Real;
use crate::constraints::errors::ConstraintError;
use std::str::FromStr;

/// Transform used to map a raw value onto `(0, ∞)`.
///
/// Every variant adds [`POS_EPS`](crate::constraints::POS_EPS) so the result
/// is bounded away from zero:
/// - `Exp`: `exp(x) + ε`
/// - `Abs`: `|x| + ε`
/// - `Square`: `x² + ε`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositiveTransform {
    #[default]
    Exp,
    Abs,
    Square,
}

impl PositiveTransform {
    /// Apply the transform without the `ε` offset.
    #[inline]
    pub fn apply_raw<S: Real>(self, x: S) -> S {
        match self {
            PositiveTransform::Exp => x.exp(),
            PositiveTransform::Abs => x.abs(),
            PositiveTransform::Square => x * x,
        }
    }
}

impl FromStr for PositiveTransform {
    type Err = ConstraintError;

    /// Parse a positivity transform (case-insensitive): `"exp"`, `"abs"`,
    /// `"square"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exp" => Ok(PositiveTransform::Exp),
            "abs" => Ok(PositiveTransform::Abs),
            "square" => Ok(PositiveTransform::Square),
            _ => Err(ConstraintError::InvalidPositiveTransform {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'exp', 'abs' or 'square'.",
            }),
        }
    }
}

/// Density family for moderate (non-zero, non-excess) rainfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModerateDensity {
    #[default]
    Lognormal,
}

impl FromStr for ModerateDensity {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lognormal" => Ok(ModerateDensity::Lognormal),
            _ => Err(ConstraintError::UnsupportedDensity { name: s.to_string() }),
        }
    }
}

/// Configuration for [`constrain_all`](crate::constraints::constrain_all).
///
/// Fields:
/// - `positive` — transform used for every positivity constraint.
/// - `moderate` — moderate-rainfall density family.
/// - `continuity` — derive the GP scale from the moderate density at the
///   threshold instead of from the raw scale output.
///
/// Default: `Exp`, `Lognormal`, `continuity = false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConstraintOptions {
    pub positive: PositiveTransform,
    pub moderate: ModerateDensity,
    pub continuity: bool,
}

impl ConstraintOptions {
    pub fn new(positive: PositiveTransform, moderate: ModerateDensity, continuity: bool) -> Self {
        ConstraintOptions { positive, moderate, continuity }
    }
}
