//! Batch evaluation of the individual mixture components.
//!
//! Thin vectorized wrappers around [`crate::distributions`]: each validates
//! its per-cell inputs (length `n` or 1) and applies the scalar primitive
//! cell by cell. `NaN` stays confined to the cells it occurs in.

use crate::autodiff::Real;
use crate::constraints::{GpParams, LognormalParams, validation::Cells};
use crate::distributions;
use crate::mixture::{errors::MixtureResult, validation::batch_len};
use ndarray::{Array1, ArrayView1};

/// Lognormal log density per cell (zero observations use the placeholder
/// value, see [`distributions::LOG_DENSITY_ZERO_PLACEHOLDER`]).
pub fn lognormal_log_density<S: Real>(
    x: ArrayView1<'_, f64>, moderate: &LognormalParams<S>,
) -> MixtureResult<Array1<S>> {
    let n = batch_len(&[x.len(), moderate.mu.len(), moderate.var.len()]);
    let (x, mu, var) = lognormal_cells(x, moderate, n)?;
    Ok(Array1::from_shape_fn(n, |i| distributions::lognormal_ln_pdf(x.at(i), mu.at(i), var.at(i))))
}

/// Lognormal CDF per cell.
pub fn lognormal_cdf<S: Real>(
    x: ArrayView1<'_, f64>, moderate: &LognormalParams<S>,
) -> MixtureResult<Array1<S>> {
    let n = batch_len(&[x.len(), moderate.mu.len(), moderate.var.len()]);
    let (x, mu, var) = lognormal_cells(x, moderate, n)?;
    Ok(Array1::from_shape_fn(n, |i| distributions::lognormal_cdf(x.at(i), mu.at(i), var.at(i))))
}

/// Lognormal CDF restricted to `[lower, upper]` per cell; missing bounds
/// default to `-∞` / `+∞`.
pub fn truncated_lognormal_cdf<S: Real>(
    x: ArrayView1<'_, f64>, moderate: &LognormalParams<S>, lower: Option<ArrayView1<'_, f64>>,
    upper: Option<ArrayView1<'_, f64>>,
) -> MixtureResult<Array1<S>> {
    let n = batch_len(&[
        x.len(),
        moderate.mu.len(),
        moderate.var.len(),
        lower.map_or(1, |l| l.len()),
        upper.map_or(1, |u| u.len()),
    ]);
    let (x, mu, var) = lognormal_cells(x, moderate, n)?;
    let lower = lower.map(|l| Cells::new(l, n, "lower bound")).transpose()?;
    let upper = upper.map(|u| Cells::new(u, n, "upper bound")).transpose()?;
    Ok(Array1::from_shape_fn(n, |i| {
        distributions::truncated_lognormal_cdf(
            x.at(i),
            mu.at(i),
            var.at(i),
            lower.map(|l| l.at(i)),
            upper.map(|u| u.at(i)),
        )
    }))
}

/// Mean of the lognormal truncated above at `upper`, per cell.
pub fn truncated_lognormal_mean<S: Real>(
    moderate: &LognormalParams<S>, upper: ArrayView1<'_, f64>,
) -> MixtureResult<Array1<S>> {
    let n = batch_len(&[upper.len(), moderate.mu.len(), moderate.var.len()]);
    let (upper, mu, var) = lognormal_cells(upper, moderate, n)?;
    Ok(Array1::from_shape_fn(n, |i| {
        distributions::truncated_lognormal_mean(mu.at(i), var.at(i), upper.at(i))
    }))
}

/// GP log density of excesses per cell.
pub fn gp_log_density<S: Real>(
    excess: ArrayView1<'_, f64>, gp: &GpParams<S>,
) -> MixtureResult<Array1<S>> {
    let n = batch_len(&[excess.len(), gp.xi.len(), gp.sigma.len()]);
    let (excess, xi, sigma) = gp_cells(excess, gp, n)?;
    Ok(Array1::from_shape_fn(n, |i| distributions::gpd_ln_pdf(excess.at(i), xi.at(i), sigma.at(i))))
}

/// GP CDF of `x` above `thresh`, per cell.
pub fn gp_cdf<S: Real>(
    x: ArrayView1<'_, f64>, gp: &GpParams<S>, thresh: ArrayView1<'_, f64>,
) -> MixtureResult<Array1<S>> {
    let n = batch_len(&[x.len(), gp.xi.len(), gp.sigma.len(), thresh.len()]);
    let (x, xi, sigma) = gp_cells(x, gp, n)?;
    let thresh = Cells::new(thresh, n, "threshold")?;
    Ok(Array1::from_shape_fn(n, |i| {
        distributions::gpd_cdf(x.at(i), xi.at(i), sigma.at(i), thresh.at(i))
    }))
}

/// GP mean above `thresh`, per cell.
pub fn gp_mean<S: Real>(gp: &GpParams<S>, thresh: ArrayView1<'_, f64>) -> MixtureResult<Array1<S>> {
    let n = batch_len(&[thresh.len(), gp.xi.len(), gp.sigma.len()]);
    let (thresh, xi, sigma) = gp_cells(thresh, gp, n)?;
    Ok(Array1::from_shape_fn(n, |i| distributions::gpd_mean(xi.at(i), sigma.at(i), thresh.at(i))))
}

type DataAndPair<'a, 'b, S> = (Cells<'a, f64>, Cells<'b, S>, Cells<'b, S>);

fn lognormal_cells<'a, 'b, S: Real>(
    data: ArrayView1<'a, f64>, moderate: &'b LognormalParams<S>, n: usize,
) -> MixtureResult<DataAndPair<'a, 'b, S>> {
    Ok((
        Cells::new(data, n, "observations")?,
        Cells::new(moderate.mu.view(), n, "lognormal mu")?,
        Cells::new(moderate.var.view(), n, "lognormal variance")?,
    ))
}

fn gp_cells<'a, 'b, S: Real>(
    data: ArrayView1<'a, f64>, gp: &'b GpParams<S>, n: usize,
) -> MixtureResult<DataAndPair<'a, 'b, S>> {
    Ok((
        Cells::new(data, n, "observations")?,
        Cells::new(gp.xi.view(), n, "gp shape")?,
        Cells::new(gp.sigma.view(), n, "gp scale")?,
    ))
}
