//! Python-boundary helpers: array extraction and option parsing for the
//! `_hurdle_gpd` extension module.

use crate::constraints::{ConstraintOptions, ModerateDensity, PositiveTransform};
use ndarray::Array2;
use numpy::{
    IntoPyArray,    // Array/Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1, PyReadonlyArray2,
};
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};
use std::str::FromStr;

/// Accept a 1-D float64 ndarray, a pandas Series, or a sequence of floats.
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr_ro);
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(series_ro);
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Accept a 2-D float64 ndarray, a pandas DataFrame, or a sequence of
/// equal-length float rows.
pub fn extract_f64_matrix<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray2<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro);
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro);
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or sequence of float64 rows",
        )
    })?;
    let ncols = rows.first().map_or(0, Vec::len);
    let nrows = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let matrix = Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|_| PyValueError::new_err("all rows must have the same length"))?;
    Ok(matrix.into_pyarray(py).readonly())
}

/// Optional 1-D array argument.
pub fn extract_optional_array<'py>(
    py: Python<'py>, raw_data: Option<&Bound<'py, PyAny>>,
) -> PyResult<Option<PyReadonlyArray1<'py, f64>>> {
    raw_data.map(|raw| extract_f64_array(py, raw)).transpose()
}

/// Build [`ConstraintOptions`] from Python keyword arguments; `None` selects
/// the default for each field.
pub fn extract_constraint_options(
    positive: Option<&str>, density: Option<&str>, continuity: Option<bool>,
) -> PyResult<ConstraintOptions> {
    let positive = match positive {
        Some(name) => PositiveTransform::from_str(name)?,
        None => PositiveTransform::default(),
    };
    let moderate = match density {
        Some(name) => ModerateDensity::from_str(name)?,
        None => ModerateDensity::default(),
    };
    Ok(ConstraintOptions::new(positive, moderate, continuity.unwrap_or(false)))
}
