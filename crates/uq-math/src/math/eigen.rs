//! Symmetric tridiagonal eigendecomposition.
//!
//! Only the eigenvalues and the first component of each normalized
//! eigenvector are returned: that is all Golub-Welsch needs to turn a
//! Jacobi matrix into quadrature abscissas and weights.

use nalgebra::{DMatrix, SymmetricEigen};

use super::error::{NumericError, NumericResult};

/// Eigenvalues (ascending) and first eigenvector components.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalEigen {
    pub values: Vec<f64>,
    pub first_components: Vec<f64>,
}

/// Decompose the symmetric tridiagonal matrix with main diagonal `diag`
/// (length n) and off-diagonal `off` (length n-1).
pub fn tridiagonal_eigen(diag: &[f64], off: &[f64]) -> NumericResult<TridiagonalEigen> {
    let n = diag.len();
    if off.len() != n.saturating_sub(1) {
        return Err(NumericError::DimensionMismatch {
            expected: n.saturating_sub(1),
            actual: off.len(),
        });
    }
    if n == 0 {
        return Ok(TridiagonalEigen {
            values: Vec::new(),
            first_components: Vec::new(),
        });
    }
    if let Some(bad) = diag.iter().chain(off).copied().find(|v| !v.is_finite()) {
        return Err(NumericError::NonFinite(format!("jacobi matrix entry {bad}")));
    }

    let matrix = DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            diag[i]
        } else if i + 1 == j {
            off[i]
        } else if j + 1 == i {
            off[j]
        } else {
            0.0
        }
    });

    let eigen = SymmetricEigen::try_new(matrix, f64::EPSILON, 0)
        .ok_or_else(|| NumericError::NonFinite("eigen iteration did not converge".to_string()))?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

    Ok(TridiagonalEigen {
        values: order.iter().map(|&i| eigen.eigenvalues[i]).collect(),
        first_components: order.iter().map(|&i| eigen.eigenvectors[(0, i)]).collect(),
    })
}
