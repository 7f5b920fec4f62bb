//! Discrete {zero, moderate, excess} labels from observations and
//! thresholds.

use crate::mixture::{
    errors::MixtureResult,
    validation::{batch_len, data_cells},
};
use ndarray::{Array1, ArrayView1};

/// Label of an observation of exactly zero.
pub const LABEL_ZERO: f64 = 0.0;
/// Label of a non-zero observation at or below the threshold.
pub const LABEL_MODERATE: f64 = 1.0;
/// Label of an observation strictly above the threshold.
pub const LABEL_EXCESS: f64 = 2.0;

/// Classify every cell as zero (`0`), moderate (`1`) or excess (`2`);
/// missing samples give `NaN`.
///
/// The excess test takes precedence over the zero test, and a missing
/// threshold never makes a label `NaN` (the cell is simply not excess).
pub fn classify_excess(
    samples: ArrayView1<'_, f64>, thresholds: ArrayView1<'_, f64>,
) -> MixtureResult<Array1<f64>> {
    let n = batch_len(&[samples.len(), thresholds.len()]);
    let samples = data_cells(samples, n, "samples")?;
    let thresholds = data_cells(thresholds, n, "threshold")?;

    Ok(Array1::from_shape_fn(n, |i| {
        let (x, t) = (samples.at(i), thresholds.at(i));
        if x.is_nan() {
            f64::NAN
        } else if x > t {
            LABEL_EXCESS
        } else if x == 0.0 {
            LABEL_ZERO
        } else {
            LABEL_MODERATE
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn classifies_concrete_scenario() {
        let labels = classify_excess(array![0.0, 5.0, 50.0].view(), array![10.0].view()).unwrap();
        assert_eq!(labels, array![0.0, 1.0, 2.0]);
    }

    #[test]
    fn threshold_itself_is_moderate_and_nan_propagates() {
        let labels =
            classify_excess(array![10.0, f64::NAN, 3.0].view(), array![10.0, 10.0, f64::NAN].view())
                .unwrap();
        assert_eq!(labels[0], LABEL_MODERATE);
        assert!(labels[1].is_nan());
        assert_eq!(labels[2], LABEL_MODERATE);
    }

    #[test]
    fn excess_wins_over_zero_for_negative_thresholds() {
        let labels = classify_excess(array![0.0].view(), array![-1.0].view()).unwrap();
        assert_eq!(labels[0], LABEL_EXCESS);
    }

    #[test]
    fn empty_samples_give_empty_labels() {
        let labels = classify_excess(Array1::<f64>::zeros(0).view(), array![10.0].view()).unwrap();
        assert!(labels.is_empty());
    }

    #[test]
    fn infinite_threshold_never_labels_excess() {
        let labels =
            classify_excess(array![0.0, 1e9].view(), array![f64::INFINITY].view()).unwrap();
        assert_eq!(labels, array![0.0, 1.0]);
    }
}
