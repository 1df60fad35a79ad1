//! Tridiagonal (bandwidth 1/1) linear solves.
//!
//! Gaussian elimination with partial pivoting following the LAPACK `gtsv`
//! scheme: row interchanges introduce a second superdiagonal, so the
//! factorization never needs more than three bands plus one fill-in band.

use super::error::{NumericError, NumericResult};

/// Solve `A x = rhs` for tridiagonal `A`.
///
/// `sub` and `sup` hold the sub- and super-diagonal (length n-1), `diag` the
/// main diagonal (length n). A pivot whose magnitude does not exceed
/// `f64::EPSILON * ||A||_inf` is reported as [`NumericError::Singular`].
pub fn solve_tridiagonal(
    sub: &[f64],
    diag: &[f64],
    sup: &[f64],
    rhs: &[f64],
) -> NumericResult<Vec<f64>> {
    let n = diag.len();
    if rhs.len() != n {
        return Err(NumericError::DimensionMismatch {
            expected: n,
            actual: rhs.len(),
        });
    }
    if n == 0 {
        return Ok(Vec::new());
    }
    let off = n - 1;
    if sub.len() != off {
        return Err(NumericError::DimensionMismatch {
            expected: off,
            actual: sub.len(),
        });
    }
    if sup.len() != off {
        return Err(NumericError::DimensionMismatch {
            expected: off,
            actual: sup.len(),
        });
    }

    let values = sub.iter().chain(diag).chain(sup).chain(rhs);
    if let Some(bad) = values.copied().find(|v| !v.is_finite()) {
        return Err(NumericError::NonFinite(format!("tridiagonal entry {bad}")));
    }

    let threshold = f64::EPSILON * inf_norm(sub, diag, sup);

    let mut d = diag.to_vec();
    let mut dl = sub.to_vec();
    let mut du = sup.to_vec();
    let mut du2 = vec![0.0; n.saturating_sub(2)];
    let mut b = rhs.to_vec();

    for i in 0..off {
        if d[i].abs() >= dl[i].abs() {
            // No interchange.
            if d[i].abs() <= threshold {
                return Err(NumericError::Singular { index: i });
            }
            let factor = dl[i] / d[i];
            d[i + 1] -= factor * du[i];
            b[i + 1] -= factor * b[i];
            dl[i] = 0.0;
        } else {
            // Interchange rows i and i+1.
            let factor = d[i] / dl[i];
            d[i] = dl[i];
            let temp = d[i + 1];
            d[i + 1] = du[i] - factor * temp;
            if i + 1 < off {
                du2[i] = du[i + 1];
                du[i + 1] = -factor * du2[i];
            }
            du[i] = temp;
            let bi = b[i];
            b[i] = b[i + 1];
            b[i + 1] = bi - factor * b[i + 1];
        }
    }

    if let Some(index) = d.iter().position(|p| p.abs() <= threshold) {
        return Err(NumericError::Singular { index });
    }

    let mut x = vec![0.0; n];
    x[n - 1] = b[n - 1] / d[n - 1];
    if n > 1 {
        x[n - 2] = (b[n - 2] - du[n - 2] * x[n - 1]) / d[n - 2];
    }
    for i in (0..n.saturating_sub(2)).rev() {
        x[i] = (b[i] - du[i] * x[i + 1] - du2[i] * x[i + 2]) / d[i];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(NumericError::NonFinite("tridiagonal solution".to_string()));
    }
    Ok(x)
}

fn inf_norm(sub: &[f64], diag: &[f64], sup: &[f64]) -> f64 {
    let n = diag.len();
    (0..n)
        .map(|i| {
            let left = if i > 0 { sub[i - 1].abs() } else { 0.0 };
            let right = if i + 1 < n { sup[i].abs() } else { 0.0 };
            left + diag[i].abs() + right
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residual(sub: &[f64], diag: &[f64], sup: &[f64], x: &[f64], rhs: &[f64]) -> f64 {
        let n = diag.len();
        (0..n)
            .map(|i| {
                let mut row = diag[i] * x[i];
                if i > 0 {
                    row += sub[i - 1] * x[i - 1];
                }
                if i + 1 < n {
                    row += sup[i] * x[i + 1];
                }
                (row - rhs[i]).abs()
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn solves_diagonally_dominant_system() {
        let sub = [1.0, 1.0, 1.0];
        let diag = [4.0, 4.0, 4.0, 4.0];
        let sup = [1.0, 1.0, 1.0];
        let rhs = [5.0, 6.0, 6.0, 5.0];
        let x = solve_tridiagonal(&sub, &diag, &sup, &rhs).unwrap();
        for v in &x {
            assert!((v - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn pivots_past_zero_diagonal() {
        // [[0, 1], [1, 0]] x = [2, 3] => x = [3, 2]
        let x = solve_tridiagonal(&[1.0], &[0.0, 0.0], &[1.0], &[2.0, 3.0]).unwrap();
        assert!((x[0] - 3.0).abs() < 1e-15);
        assert!((x[1] - 2.0).abs() < 1e-15);
    }

    #[test]
    fn pivoting_system_with_fill_in() {
        let sub = [3.0, 2.0, 5.0, 1.0];
        let diag = [0.5, 0.1, 4.0, 0.2, 3.0];
        let sup = [1.0, 2.0, 1.5, 2.5];
        let rhs = [1.0, -2.0, 0.5, 4.0, 3.0];
        let x = solve_tridiagonal(&sub, &diag, &sup, &rhs).unwrap();
        assert!(residual(&sub, &diag, &sup, &x, &rhs) < 1e-12);
    }

    #[test]
    fn zero_diagonal_odd_size_is_singular() {
        // Odd-sized symmetric tridiagonal with zero diagonal has a zero eigenvalue.
        let off = [0.5, 0.6, 0.7, 0.8];
        let diag = [0.0; 5];
        let rhs = [0.0, 0.0, 0.0, 0.0, 1.0];
        let err = solve_tridiagonal(&off, &diag, &off, &rhs).unwrap_err();
        assert!(matches!(err, NumericError::Singular { .. }));
    }

    #[test]
    fn single_entry_system() {
        let x = solve_tridiagonal(&[], &[2.0], &[], &[3.0]).unwrap();
        assert_eq!(x, vec![1.5]);
        assert!(solve_tridiagonal(&[], &[0.0], &[], &[3.0]).is_err());
    }

    #[test]
    fn rejects_band_length_mismatch() {
        let err = solve_tridiagonal(&[1.0], &[1.0, 1.0, 1.0], &[1.0, 1.0], &[1.0; 3]).unwrap_err();
        assert_eq!(
            err,
            NumericError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn empty_system_is_empty_solution() {
        assert!(solve_tridiagonal(&[], &[], &[], &[]).unwrap().is_empty());
    }
}
