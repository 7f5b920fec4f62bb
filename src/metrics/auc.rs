//! Multiclass ROC AUC from predicted class probabilities.
//!
//! Both averages reduce to the binary Mann–Whitney AUC
//! `(R₊ - n₊(n₊ + 1)/2) / (n₊ n₋)`, where `R₊` is the rank sum of the
//! positive scores among all scores and tied scores share their average
//! rank.
//!
//! - One-vs-rest: class `c` against every other class, scored by column
//!   `c`; macro average over classes.
//! - One-vs-one (Hand & Till, 2001): for each pair `(a, b)` the mean of
//!   `AUC(a | b)` scored by column `a` and `AUC(b | a)` scored by column
//!   `b`, restricted to rows of class `a` or `b`; macro average over pairs.

use crate::metrics::{
    errors::{MetricError, MetricResult},
    validation::class_index,
};
use ndarray::{ArrayView1, ArrayView2, Axis};

/// Macro-averaged one-vs-one and one-vs-rest AUC.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AucScores {
    pub ovo: f64,
    pub ovr: f64,
}

/// Multiclass AUC of `probs` (`n × k`, one column per class) against
/// integer labels in `0..k`.
///
/// Rows with a missing label or any missing probability are dropped.
///
/// # Errors
/// - [`MetricError::ProbabilityWidth`] if `k < 2`.
/// - [`MetricError::LengthMismatch`] if `truth` and `probs` disagree on `n`.
/// - [`MetricError::LabelOutOfRange`] for a label outside `0..k`.
/// - [`MetricError::NoValidPairs`] if no row survives the mask.
/// - [`MetricError::MissingClass`] if some class never occurs.
pub fn auc(truth: ArrayView1<'_, f64>, probs: ArrayView2<'_, f64>) -> MetricResult<AucScores> {
    let k = probs.ncols();
    if k < 2 {
        return Err(MetricError::ProbabilityWidth { found: k });
    }
    if truth.len() != probs.nrows() {
        return Err(MetricError::LengthMismatch { left: truth.len(), right: probs.nrows() });
    }

    let mut labels = Vec::with_capacity(truth.len());
    let mut rows = Vec::with_capacity(truth.len());
    for (label, row) in truth.iter().zip(probs.axis_iter(Axis(0))) {
        if label.is_nan() || row.iter().any(|p| p.is_nan()) {
            continue;
        }
        labels.push(class_index(*label, k)?);
        rows.push(row);
    }
    if labels.is_empty() {
        return Err(MetricError::NoValidPairs);
    }
    if let Some(class) = (0..k).find(|c| !labels.contains(c)) {
        return Err(MetricError::MissingClass { class });
    }

    let ovr = (0..k)
        .map(|c| {
            let scored: Vec<(f64, bool)> =
                rows.iter().zip(&labels).map(|(row, label)| (row[c], *label == c)).collect();
            binary_auc(&scored)
        })
        .sum::<f64>()
        / k as f64;

    let mut pair_total = 0.0;
    let mut pairs = 0usize;
    for a in 0..k {
        for b in (a + 1)..k {
            let in_pair = |label: &usize| *label == a || *label == b;
            let scored_by = |col: usize, positive: usize| -> Vec<(f64, bool)> {
                rows.iter()
                    .zip(&labels)
                    .filter(|(_, label)| in_pair(*label))
                    .map(|(row, label)| (row[col], *label == positive))
                    .collect()
            };
            pair_total += 0.5 * (binary_auc(&scored_by(a, a)) + binary_auc(&scored_by(b, b)));
            pairs += 1;
        }
    }

    Ok(AucScores { ovo: pair_total / pairs as f64, ovr })
}

/// Mann–Whitney AUC of `(score, is_positive)` pairs with average ranks for
/// ties. Callers guarantee both groups are non-empty.
fn binary_auc(scored: &[(f64, bool)]) -> f64 {
    let mut order: Vec<usize> = (0..scored.len()).collect();
    order.sort_by(|&i, &j| scored[i].0.total_cmp(&scored[j].0));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scored[order[end]].0 == scored[order[start]].0 {
            end += 1;
        }
        // 1-based ranks start+1..=end share their mean
        let rank = (start + end + 1) as f64 / 2.0;
        positive_rank_sum += rank * order[start..end].iter().filter(|&&i| scored[i].1).count() as f64;
        start = end;
    }

    let n_pos = scored.iter().filter(|(_, positive)| *positive).count() as f64;
    let n_neg = scored.len() as f64 - n_pos;
    (positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg)
}
