//! Dense matrix inversion with a conditioning guard.

use nalgebra::DMatrix;

use super::error::{NumericError, NumericResult};

/// Reciprocal 2-norm condition number `sigma_min / sigma_max`.
///
/// Zero for a zero matrix or one with an exactly zero singular value.
pub fn reciprocal_condition(matrix: &DMatrix<f64>) -> f64 {
    let singular = matrix.clone().singular_values();
    let max = singular.iter().copied().fold(0.0, f64::max);
    if max == 0.0 || !max.is_finite() {
        return 0.0;
    }
    let min = singular.iter().copied().fold(f64::INFINITY, f64::min);
    min / max
}

/// Invert a square matrix.
///
/// Fails with [`NumericError::IllConditioned`] when the reciprocal
/// condition number is below machine epsilon, so an inverse dominated by
/// rounding noise is never returned.
pub fn invert(matrix: &DMatrix<f64>) -> NumericResult<DMatrix<f64>> {
    if !matrix.is_square() {
        return Err(NumericError::DimensionMismatch {
            expected: matrix.nrows(),
            actual: matrix.ncols(),
        });
    }
    if matrix.nrows() == 0 {
        return Ok(DMatrix::zeros(0, 0));
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(NumericError::NonFinite("matrix entry".to_string()));
    }

    let rcond = reciprocal_condition(matrix);
    if rcond < f64::EPSILON {
        return Err(NumericError::IllConditioned { rcond });
    }

    matrix
        .clone()
        .lu()
        .try_inverse()
        .ok_or(NumericError::IllConditioned { rcond })
}
