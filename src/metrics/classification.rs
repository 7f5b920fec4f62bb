//! Label agreement statistics: accuracy and F1.

use crate::metrics::{errors::MetricResult, validation::joint_pairs};
use ndarray::ArrayView1;

/// Micro- and macro-averaged F1 scores.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct F1Scores {
    /// Global `TP / (TP + (FP + FN) / 2)`; equals accuracy for single-label
    /// multiclass data.
    pub micro: f64,
    /// Unweighted mean of per-class F1 over every label seen in either
    /// input.
    pub macro_avg: f64,
}

/// Fraction of jointly non-missing cells where `a == b`.
///
/// # Errors
/// - Length mismatch or no jointly non-missing cells.
pub fn accuracy(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> MetricResult<f64> {
    let pairs = joint_pairs(a, b)?;
    let hits = pairs.iter().filter(|(x, y)| x == y).count();
    Ok(hits as f64 / pairs.len() as f64)
}

/// Micro and macro F1 of predicted against true labels.
///
/// A class with no true and no predicted support does not exist for the
/// macro average; a class whose F1 is undefined otherwise counts as 0.
///
/// # Errors
/// - Length mismatch or no jointly non-missing cells.
pub fn f1(truth: ArrayView1<'_, f64>, pred: ArrayView1<'_, f64>) -> MetricResult<F1Scores> {
    let pairs = joint_pairs(truth, pred)?;

    let mut labels: Vec<f64> = pairs.iter().flat_map(|(t, p)| [*t, *p]).collect();
    labels.sort_by(|a, b| a.total_cmp(b));
    labels.dedup();

    let mut tp_total = 0usize;
    let mut err_total = 0usize;
    let mut macro_total = 0.0;
    for label in &labels {
        let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
        for (t, p) in &pairs {
            match (t == label, p == label) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }
        let denom = 2 * tp + fp + fn_;
        macro_total += if denom == 0 { 0.0 } else { 2.0 * tp as f64 / denom as f64 };
        tp_total += tp;
        err_total += fp + fn_;
    }

    let micro = 2.0 * tp_total as f64 / (2 * tp_total + err_total) as f64;
    Ok(F1Scores { micro, macro_avg: macro_total / labels.len() as f64 })
}
