//! Shape validation and broadcasting for per-cell inputs.
//!
//! Every batch operation takes its length from one primary input; the other
//! per-cell inputs must either match that length or have length 1, in which
//! case the single value is shared by every cell.

use crate::constraints::errors::{ConstraintError, ConstraintResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Read-only per-cell accessor over a length-`n` or length-1 view.
#[derive(Debug, Clone, Copy)]
pub struct Cells<'a, A> {
    data: ArrayView1<'a, A>,
    shared: bool,
}

impl<'a, A: Copy> Cells<'a, A> {
    /// Validate `data` against the batch length `n`.
    ///
    /// # Errors
    /// - [`ConstraintError::ShapeMismatch`] unless `data.len()` is `n` or `1`.
    pub fn new(data: ArrayView1<'a, A>, n: usize, what: &'static str) -> ConstraintResult<Self> {
        match data.len() {
            len if len == n => Ok(Cells { data, shared: false }),
            1 => Ok(Cells { data, shared: true }),
            found => Err(ConstraintError::ShapeMismatch { what, expected: n, found }),
        }
    }

    /// Value for cell `i`.
    #[inline]
    pub fn at(&self, i: usize) -> A {
        if self.shared { self.data[0] } else { self.data[i] }
    }
}

/// Ensure a paired parameter block has exactly two columns.
pub fn check_pairs<A>(pairs: &ArrayView2<'_, A>, what: &'static str) -> ConstraintResult<()> {
    match pairs.ncols() {
        2 => Ok(()),
        found => Err(ConstraintError::PairedColumns { what, found }),
    }
}

/// Split an `(n, 2)` block into its two columns.
pub fn split_pairs<A: Copy>(
    pairs: ArrayView2<'_, A>, what: &'static str,
) -> ConstraintResult<(Array1<A>, Array1<A>)> {
    check_pairs(&pairs, what)?;
    Ok((pairs.column(0).to_owned(), pairs.column(1).to_owned()))
}

/// Stack two equally long columns into an `(n, 2)` block.
pub fn join_pairs<A: Copy>(first: &Array1<A>, second: &Array1<A>) -> Array2<A> {
    let n = first.len().min(second.len());
    Array2::from_shape_fn((n, 2), |(i, j)| if j == 0 { first[i] } else { second[i] })
}

/// Number of rows shared by several paired blocks.
pub fn common_rows<A>(blocks: &[(&ArrayView2<'_, A>, &'static str)]) -> ConstraintResult<usize> {
    let Some((first, _)) = blocks.first() else {
        return Ok(0);
    };
    let n = first.nrows();
    for &(block, what) in blocks {
        check_pairs(block, what)?;
        if block.nrows() != n {
            return Err(ConstraintError::ShapeMismatch { what, expected: n, found: block.nrows() });
        }
    }
    Ok(n)
}
