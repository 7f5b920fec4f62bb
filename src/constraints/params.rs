//! Raw and constrained mixture parameters, and the batch constraint
//! operations that map one onto the other.
//!
//! Layout
//! ------
//! The network emits six raw values per cell, grouped in pairs:
//! gates `[zero, excess]`, GP `[shape, scale]`, moderate `[mu, var]`.
//! [`RawParameters`] keeps the three `(n, 2)` blocks; the constrained side is
//! split into named columns ([`GateProbs`], [`GpParams`],
//! [`LognormalParams`]).

use crate::autodiff::Real;
use crate::constraints::{
    errors::{ConstraintError, ConstraintResult},
    options::{ConstraintOptions, ModerateDensity, PositiveTransform},
    transforms::{
        BOUND_SHARPNESS, GP_EPS, SCALE_UPPER, VAR_UPPER, XI_SHARPNESS, XI_UPPER,
        constrain_gp_shape, constrain_positive, constrain_probability, constrain_upper_bounded,
    },
    validation::{Cells, common_rows, join_pairs, split_pairs},
};
use crate::distributions::lognormal_ln_pdf;
use log::warn;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};

/// Unconstrained network output for a batch of `n` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RawParameters<S> {
    gates: Array2<S>,
    gp: Array2<S>,
    moderate: Array2<S>,
}

impl<S: Real> RawParameters<S> {
    /// Build from the three `(n, 2)` blocks.
    ///
    /// # Errors
    /// - [`ConstraintError::PairedColumns`] if a block is not two columns wide.
    /// - [`ConstraintError::ShapeMismatch`] if the blocks disagree on `n`.
    pub fn new(gates: Array2<S>, gp: Array2<S>, moderate: Array2<S>) -> ConstraintResult<Self> {
        common_rows(&[(&gates.view(), "gates"), (&gp.view(), "gp"), (&moderate.view(), "moderate")])?;
        Ok(RawParameters { gates, gp, moderate })
    }

    /// Split a flat network output into parameter blocks.
    ///
    /// - `use_evt = true`: `(n, 6)` laid out as gates, GP, moderate.
    /// - `use_evt = false`: `(n, 6)` as above, or `(n, 4)` laid out as gates,
    ///   moderate, with the raw GP block filled with zeros.
    ///
    /// # Errors
    /// - [`ConstraintError::RawWidth`] for any other width.
    pub fn from_network_output(output: ArrayView2<'_, S>, use_evt: bool) -> ConstraintResult<Self> {
        let n = output.nrows();
        match (output.ncols(), use_evt) {
            (6, _) => Self::new(
                output.slice(s![.., 0..2]).to_owned(),
                output.slice(s![.., 2..4]).to_owned(),
                output.slice(s![.., 4..6]).to_owned(),
            ),
            (4, false) => Self::new(
                output.slice(s![.., 0..2]).to_owned(),
                Array2::from_elem((n, 2), S::zero()),
                output.slice(s![.., 2..4]).to_owned(),
            ),
            (found, true) => Err(ConstraintError::RawWidth { expected: "6", found }),
            (found, false) => Err(ConstraintError::RawWidth { expected: "4 or 6", found }),
        }
    }

    pub fn len(&self) -> usize {
        self.gates.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn gates(&self) -> ArrayView2<'_, S> {
        self.gates.view()
    }

    pub fn gp(&self) -> ArrayView2<'_, S> {
        self.gp.view()
    }

    pub fn moderate(&self) -> ArrayView2<'_, S> {
        self.moderate.view()
    }
}

/// Constrained gate probabilities: `P(zero)` and `P(excess)` per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GateProbs<S> {
    pub zero: Array1<S>,
    pub excess: Array1<S>,
}

/// Constrained GP tail parameters (shape `xi`, scale `sigma`) per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GpParams<S> {
    pub xi: Array1<S>,
    pub sigma: Array1<S>,
}

/// Constrained lognormal parameters (`mu`, variance `var`) per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct LognormalParams<S> {
    pub mu: Array1<S>,
    pub var: Array1<S>,
}

impl<S: Real> GateProbs<S> {
    /// Read `[zero, excess]` columns from an `(n, 2)` block.
    pub fn from_pairs(pairs: ArrayView2<'_, S>) -> ConstraintResult<Self> {
        let (zero, excess) = split_pairs(pairs, "gate probabilities")?;
        Ok(GateProbs { zero, excess })
    }

    pub fn to_pairs(&self) -> Array2<S> {
        join_pairs(&self.zero, &self.excess)
    }
}

impl<S: Real> GpParams<S> {
    /// Read `[xi, sigma]` columns from an `(n, 2)` block.
    pub fn from_pairs(pairs: ArrayView2<'_, S>) -> ConstraintResult<Self> {
        let (xi, sigma) = split_pairs(pairs, "gp parameters")?;
        Ok(GpParams { xi, sigma })
    }

    pub fn to_pairs(&self) -> Array2<S> {
        join_pairs(&self.xi, &self.sigma)
    }
}

impl<S: Real> LognormalParams<S> {
    /// Read `[mu, var]` columns from an `(n, 2)` block.
    pub fn from_pairs(pairs: ArrayView2<'_, S>) -> ConstraintResult<Self> {
        let (mu, var) = split_pairs(pairs, "lognormal parameters")?;
        Ok(LognormalParams { mu, var })
    }

    pub fn to_pairs(&self) -> Array2<S> {
        join_pairs(&self.mu, &self.var)
    }
}

/// All constrained parameters for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedParameters<S> {
    pub gates: GateProbs<S>,
    pub gp: GpParams<S>,
    pub moderate: LognormalParams<S>,
}

impl<S> ConstrainedParameters<S> {
    pub fn len(&self) -> usize {
        self.gates.zero.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Map raw `[zero, excess]` gate outputs to probabilities in
/// `(PROB_EPS, 1 - PROB_EPS)`.
pub fn constrain_gates<S: Real>(raw: ArrayView2<'_, S>) -> ConstraintResult<GateProbs<S>> {
    let (zero, excess) = split_pairs(raw, "raw gates")?;
    Ok(GateProbs {
        zero: zero.mapv(constrain_probability),
        excess: excess.mapv(constrain_probability),
    })
}

/// Constrain lognormal parameters: `mu` passes through, the variance is
/// made positive and softly bounded above by [`VAR_UPPER`].
///
/// # Errors
/// - [`ConstraintError::ShapeMismatch`] if `raw_var` does not match `mu`.
pub fn constrain_lognormal<S: Real>(
    mu: ArrayView1<'_, S>, raw_var: ArrayView1<'_, S>, transform: PositiveTransform,
) -> ConstraintResult<LognormalParams<S>> {
    let n = mu.len();
    let raw_var = Cells::new(raw_var, n, "raw lognormal variance")?;
    let var = Array1::from_shape_fn(n, |i| {
        constrain_upper_bounded(raw_var.at(i), VAR_UPPER, Some(transform), BOUND_SHARPNESS)
    });
    Ok(LognormalParams { mu: mu.to_owned(), var })
}

/// Constrain GP parameters so the tail supports `[0, max_excess]`.
///
/// - Scale: `sigma = 1 / initial_density` in continuity mode, otherwise the
///   raw scale made positive and softly bounded by [`SCALE_UPPER`].
/// - Shape: `xi = (pos(raw_shape) - 1) · sigma / (max_excess + GP_EPS)`,
///   then bounded above by [`XI_UPPER`] with
///   [`constrain_gp_shape`]. Since `pos(·) > 0` this gives
///   `xi > -sigma / max_excess`, i.e. `1 + xi·z/sigma > 0` on the whole
///   range.
///
/// # Errors
/// - [`ConstraintError::MissingInitialDensity`] if `continuity` is set and
///   `initial_density` is `None`.
/// - [`ConstraintError::ShapeMismatch`] for per-cell inputs that neither
///   match `raw_shape` nor have length 1.
pub fn constrain_gp<S: Real>(
    raw_shape: ArrayView1<'_, S>, raw_scale: ArrayView1<'_, S>, max_excess: ArrayView1<'_, f64>,
    transform: PositiveTransform, continuity: bool, initial_density: Option<ArrayView1<'_, S>>,
) -> ConstraintResult<GpParams<S>> {
    let n = raw_shape.len();
    let max_excess = Cells::new(max_excess, n, "max excess")?;

    let sigma = if continuity {
        let density = initial_density.ok_or(ConstraintError::MissingInitialDensity)?;
        let density = Cells::new(density, n, "initial density")?;
        let sigma = Array1::from_shape_fn(n, |i| S::one() / density.at(i));
        warn_on_continuity_scale(&sigma);
        sigma
    } else {
        let raw_scale = Cells::new(raw_scale, n, "raw gp scale")?;
        Array1::from_shape_fn(n, |i| {
            constrain_upper_bounded(raw_scale.at(i), SCALE_UPPER, Some(transform), BOUND_SHARPNESS)
        })
    };

    let xi = Array1::from_shape_fn(n, |i| {
        let k = constrain_positive(raw_shape[i], transform);
        let xi = (k - S::one()) * sigma[i] / S::from_f64(max_excess.at(i) + GP_EPS);
        constrain_gp_shape(xi, XI_UPPER, XI_SHARPNESS)
    });
    Ok(GpParams { xi, sigma })
}

/// Earlier GP parameterisation: `sigma = pos(raw_scale)`,
/// `xi = pos(raw_shape) - sigma / (max_excess + GP_EPS)`. Unbounded above;
/// kept for comparison runs.
pub fn constrain_gp_legacy<S: Real>(
    raw_shape: ArrayView1<'_, S>, raw_scale: ArrayView1<'_, S>, max_excess: ArrayView1<'_, f64>,
    transform: PositiveTransform,
) -> ConstraintResult<GpParams<S>> {
    let n = raw_shape.len();
    let raw_scale = Cells::new(raw_scale, n, "raw gp scale")?;
    let max_excess = Cells::new(max_excess, n, "max excess")?;

    let sigma = Array1::from_shape_fn(n, |i| constrain_positive(raw_scale.at(i), transform));
    let xi = Array1::from_shape_fn(n, |i| {
        constrain_positive(raw_shape[i], transform)
            - sigma[i] / S::from_f64(max_excess.at(i) + GP_EPS)
    });
    Ok(GpParams { xi, sigma })
}

/// Apply every constraint to a batch of raw parameters.
///
/// In continuity mode the GP scale is tied to the moderate density at the
/// threshold (`sigma = f(threshold; mu, var)` via `initial_density = 1/f`),
/// so `thresholds` is required.
///
/// # Errors
/// - [`ConstraintError::ContinuityWithoutThreshold`] if continuity is
///   enabled and `thresholds` is `None`.
/// - Shape errors from the individual constraints.
pub fn constrain_all<S: Real>(
    raw: &RawParameters<S>, max_excess: ArrayView1<'_, f64>, options: &ConstraintOptions,
    thresholds: Option<ArrayView1<'_, f64>>,
) -> ConstraintResult<ConstrainedParameters<S>> {
    let gates = constrain_gates(raw.gates())?;

    let moderate = match options.moderate {
        ModerateDensity::Lognormal => {
            let block = raw.moderate();
            constrain_lognormal(block.column(0), block.column(1), options.positive)?
        }
    };

    let initial_density = if options.continuity {
        let thresholds = thresholds.ok_or(ConstraintError::ContinuityWithoutThreshold)?;
        let thresholds = Cells::new(thresholds, raw.len(), "threshold")?;
        Some(Array1::from_shape_fn(raw.len(), |i| {
            S::one() / lognormal_ln_pdf(thresholds.at(i), moderate.mu[i], moderate.var[i]).exp()
        }))
    } else {
        None
    };

    let block = raw.gp();
    let gp = constrain_gp(
        block.column(0),
        block.column(1),
        max_excess,
        options.positive,
        options.continuity,
        initial_density.as_ref().map(|d| d.view()),
    )?;

    Ok(ConstrainedParameters { gates, gp, moderate })
}

fn warn_on_continuity_scale<S: Real>(sigma: &Array1<S>) {
    let offending = sigma
        .iter()
        .filter(|s| {
            let v = s.value();
            !v.is_finite() || v <= 0.0 || v > SCALE_UPPER
        })
        .count();
    if offending > 0 {
        warn!(
            "continuity mode produced {offending} of {} GP scale values outside (0, {SCALE_UPPER}]",
            sigma.len()
        );
    }
}
