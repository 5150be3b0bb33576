//! Linear algebra utilities.
//!
//! Newton steps are solved through the singular value decomposition so that
//! an ill-conditioned Jacobian degrades to a least-squares step instead of
//! blowing up.

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, SVD};

/// Singular values below `max_singular_value * RELATIVE_CUTOFF` are treated as zero.
pub const RELATIVE_CUTOFF: f64 = 1e-12;

fn decompose(matrix: &DMatrix<f64>) -> MathResult<(SVD<f64, nalgebra::Dyn, nalgebra::Dyn>, f64)> {
    if matrix.is_empty() {
        return Err(MathError::invalid_input("empty matrix"));
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("matrix has non-finite entries"));
    }

    let svd = SVD::new(matrix.clone(), true, true);
    let largest = svd.singular_values.max();
    if largest <= f64::MIN_POSITIVE {
        return Err(MathError::SingularMatrix);
    }
    Ok((svd, largest * RELATIVE_CUTOFF))
}

/// Computes the Moore-Penrose pseudo-inverse of a matrix.
///
/// # Errors
///
/// Returns `MathError::SingularMatrix` if every singular value is zero.
pub fn pseudo_inverse(matrix: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    let (svd, cutoff) = decompose(matrix)?;
    svd.pseudo_inverse(cutoff)
        .map_err(|e| MathError::invalid_input(format!("pseudo-inverse failed: {e}")))
}

/// Ratio of the largest to the smallest singular value.
///
/// Infinite for a rank-deficient matrix.
pub fn condition_number(matrix: &DMatrix<f64>) -> MathResult<f64> {
    let (svd, _) = decompose(matrix)?;
    let smallest = svd.singular_values.min();
    if smallest == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(svd.singular_values.max() / smallest)
}
