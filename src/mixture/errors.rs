//! Errors for the mixture aggregator, thresholds and engine.
//!
//! Shape problems and constraint configuration problems originate in
//! [`crate::constraints`] and are wrapped as [`MixtureError::Constraint`] so
//! the engine surfaces a single error type.
use crate::constraints::ConstraintError;
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for mixture operations that may produce [`MixtureError`].
pub type MixtureResult<T> = Result<T, MixtureError>;

/// Error type for mixture evaluation and engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum MixtureError {
    /// Error from parameter constraints or per-cell shape validation.
    Constraint(ConstraintError),

    /// A numeric option is outside its valid range.
    InvalidOption { name: &'static str, value: f64, reason: &'static str },

    /// Options that cannot be used together.
    IncompatibleOptions { reason: &'static str },
}

impl std::error::Error for MixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MixtureError::Constraint(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for MixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MixtureError::Constraint(err) => {
                write!(f, "{err}")
            }
            MixtureError::InvalidOption { name, value, reason } => {
                write!(f, "Invalid option {name} = {value}: {reason}")
            }
            MixtureError::IncompatibleOptions { reason } => {
                write!(f, "Incompatible options: {reason}")
            }
        }
    }
}

impl From<ConstraintError> for MixtureError {
    fn from(err: ConstraintError) -> MixtureError {
        MixtureError::Constraint(err)
    }
}

/// Convert a [`MixtureError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<MixtureError> for PyErr {
    fn from(err: MixtureError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
