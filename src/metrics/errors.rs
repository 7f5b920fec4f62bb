//! metrics::errors — error type for evaluation statistics.
//!
//! Every metric first restricts its inputs to the jointly non-missing
//! entries; the errors below describe inputs for which the statistic is
//! still undefined after that step.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type MetricResult<T> = Result<T, MetricError>;

/// MetricError — failures of the comparison statistics.
///
/// Variants
/// --------
/// - `LengthMismatch { left, right }`
///   The two inputs do not have the same number of cells.
/// - `NoValidPairs`
///   No cell is non-missing in both inputs.
/// - `MissingClass { class }`
///   A class with a probability column never occurs in the labels, so its
///   one-vs-rest or one-vs-one AUC is undefined.
/// - `LabelOutOfRange { label, classes }`
///   A label is not an integer in `0..classes`.
/// - `DegenerateVariance`
///   An input of the correlation is constant over the valid cells.
/// - `ProbabilityWidth { found }`
///   The probability matrix has fewer than two class columns.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricError {
    LengthMismatch { left: usize, right: usize },
    NoValidPairs,
    MissingClass { class: usize },
    LabelOutOfRange { label: f64, classes: usize },
    DegenerateVariance,
    ProbabilityWidth { found: usize },
}

impl std::error::Error for MetricError {}

impl std::fmt::Display for MetricError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricError::LengthMismatch { left, right } => {
                write!(f, "Inputs differ in length: {left} vs {right}.")
            }
            MetricError::NoValidPairs => {
                write!(f, "No cell is non-missing in both inputs.")
            }
            MetricError::MissingClass { class } => {
                write!(f, "Class {class} never occurs in the labels.")
            }
            MetricError::LabelOutOfRange { label, classes } => {
                write!(f, "Invalid label {label}. Must be an integer in 0..{classes}.")
            }
            MetricError::DegenerateVariance => {
                write!(f, "Correlation undefined: an input has zero variance.")
            }
            MetricError::ProbabilityWidth { found } => {
                write!(f, "Need at least 2 probability columns, found {found}.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<MetricError> for PyErr {
    fn from(err: MetricError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
