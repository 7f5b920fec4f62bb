//! Errors for the parameter-constraint layer (configuration parsing and
//! raw-parameter shape checks).
//!
//! Numerical edge cases (overflow, saturation, `NaN` parameters) are handled
//! inside the transforms and never surface here; only malformed inputs and
//! unsupported configuration do.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for constraint operations that may produce [`ConstraintError`].
pub type ConstraintResult<T> = Result<T, ConstraintError>;

/// Error type for building and applying parameter constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintError {
    // ---- Configuration ----
    /// Moderate-rainfall density name not recognised.
    UnsupportedDensity { name: String },

    /// Positivity transform name not recognised.
    InvalidPositiveTransform { name: String, reason: &'static str },

    /// Continuity mode needs the threshold (and moderate parameters) to
    /// derive the GP scale.
    ContinuityWithoutThreshold,

    /// Continuity mode needs an initial density per cell.
    MissingInitialDensity,

    // ---- Shapes ----
    /// Raw network output has the wrong number of columns.
    RawWidth { expected: &'static str, found: usize },

    /// A paired parameter block does not have exactly two columns.
    PairedColumns { what: &'static str, found: usize },

    /// A per-cell input does not match the batch length (and is not length 1).
    ShapeMismatch { what: &'static str, expected: usize, found: usize },
}

impl std::error::Error for ConstraintError {}

impl std::fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            ConstraintError::UnsupportedDensity { name } => {
                write!(f, "Unsupported moderate density '{name}'; only 'lognormal' is available.")
            }
            ConstraintError::InvalidPositiveTransform { name, reason } => {
                write!(f, "Invalid positivity transform '{name}'. {reason}")
            }
            ConstraintError::ContinuityWithoutThreshold => {
                write!(f, "Continuity mode requires per-cell thresholds to derive the GP scale.")
            }
            ConstraintError::MissingInitialDensity => {
                write!(f, "Continuity mode requires an initial density for every cell.")
            }
            // ---- Shapes ----
            ConstraintError::RawWidth { expected, found } => {
                write!(f, "Raw network output must have {expected} columns; got {found}.")
            }
            ConstraintError::PairedColumns { what, found } => {
                write!(f, "{what} must have exactly 2 columns; got {found}.")
            }
            ConstraintError::ShapeMismatch { what, expected, found } => {
                write!(f, "{what} has length {found}; expected {expected} (or 1 to broadcast).")
            }
        }
    }
}

/// Convert a [`ConstraintError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<ConstraintError> for PyErr {
    fn from(err: ConstraintError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
