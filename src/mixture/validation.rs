//! Batch-length resolution and per-cell parameter access for the mixture
//! aggregator.

use crate::autodiff::Real;
use crate::constraints::{GateProbs, GpParams, LognormalParams, validation::Cells};
use crate::mixture::errors::MixtureResult;
use ndarray::ArrayView1;

/// Batch length implied by a set of per-cell inputs: the longest one, or 0
/// as soon as any input is empty (length-1 inputs broadcast to nothing).
/// Inputs of any other length than this or 1 are rejected by [`Cells::new`].
pub(crate) fn batch_len(lens: &[usize]) -> usize {
    if lens.contains(&0) {
        return 0;
    }
    lens.iter().copied().max().unwrap_or(0)
}

/// Validated per-cell view over all constrained parameters of a batch.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CellParams<'a, S> {
    pub zero: Cells<'a, S>,
    pub excess: Cells<'a, S>,
    pub xi: Cells<'a, S>,
    pub sigma: Cells<'a, S>,
    pub mu: Cells<'a, S>,
    pub var: Cells<'a, S>,
}

impl<'a, S: Real> CellParams<'a, S> {
    pub(crate) fn lens(
        gp: &GpParams<S>, moderate: &LognormalParams<S>, gates: &GateProbs<S>,
    ) -> [usize; 6] {
        [
            gates.zero.len(),
            gates.excess.len(),
            gp.xi.len(),
            gp.sigma.len(),
            moderate.mu.len(),
            moderate.var.len(),
        ]
    }

    pub(crate) fn new(
        n: usize, gp: &'a GpParams<S>, moderate: &'a LognormalParams<S>, gates: &'a GateProbs<S>,
    ) -> MixtureResult<Self> {
        Ok(CellParams {
            zero: Cells::new(gates.zero.view(), n, "zero probability")?,
            excess: Cells::new(gates.excess.view(), n, "excess probability")?,
            xi: Cells::new(gp.xi.view(), n, "gp shape")?,
            sigma: Cells::new(gp.sigma.view(), n, "gp scale")?,
            mu: Cells::new(moderate.mu.view(), n, "lognormal mu")?,
            var: Cells::new(moderate.var.view(), n, "lognormal variance")?,
        })
    }
}

/// Per-cell view over an `f64` data input (samples, thresholds).
pub(crate) fn data_cells<'a>(
    data: ArrayView1<'a, f64>, n: usize, what: &'static str,
) -> MixtureResult<Cells<'a, f64>> {
    Ok(Cells::new(data, n, what)?)
}

/// Excess probability actually used by a cell: exactly zero where the
/// threshold is `+∞`, so the excess component vanishes structurally.
#[inline]
pub(crate) fn effective_excess<S: Real>(excess: S, threshold: f64) -> S {
    if threshold == f64::INFINITY { S::zero() } else { excess }
}
