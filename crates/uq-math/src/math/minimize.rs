//! Bounded scalar minimization.
//!
//! Brent's method restricted to a closed interval: golden-section steps
//! interleaved with successive parabolic interpolation. The endpoints are
//! never evaluated, only approached to within the absolute tolerance.

use super::error::{NumericError, NumericResult};

/// Default absolute tolerance on the minimizer location.
pub const DEFAULT_XTOL: f64 = 1e-5;

/// Default cap on objective evaluations.
pub const DEFAULT_MAX_EVALUATIONS: usize = 500;

const SQRT_EPS: f64 = 1.483_239_697_419_132_6e-8; // sqrt(2.2e-16)
const GOLDEN_MEAN: f64 = 0.381_966_011_250_105_1; // (3 - sqrt(5)) / 2

/// Result of a bounded minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedMinimum {
    /// Location of the minimum found.
    pub x: f64,
    /// Objective value at `x`.
    pub fx: f64,
    /// Number of objective evaluations used.
    pub evaluations: usize,
    /// False when the evaluation cap was hit before the tolerance was met.
    pub converged: bool,
}

/// Minimize `f` over `[lower, upper]`.
///
/// Fails with [`NumericError::InvalidInterval`] when the bounds are not
/// finite or `lower > upper`. A degenerate interval returns its single
/// point after one evaluation.
pub fn fminbound<F>(
    mut f: F,
    lower: f64,
    upper: f64,
    xtol: f64,
    max_evaluations: usize,
) -> NumericResult<BoundedMinimum>
where
    F: FnMut(f64) -> f64,
{
    if !lower.is_finite() || !upper.is_finite() || lower > upper {
        return Err(NumericError::InvalidInterval { lower, upper });
    }

    let mut a = lower;
    let mut b = upper;
    let mut fulc = a + GOLDEN_MEAN * (b - a);
    let mut nfc = fulc;
    let mut xf = fulc;
    let mut rat = 0.0_f64;
    let mut e = 0.0_f64;
    let mut fx = f(xf);
    let mut evaluations = 1;
    let mut ffulc = fx;
    let mut fnfc = fx;
    let mut xm = 0.5 * (a + b);
    let mut tol1 = SQRT_EPS * xf.abs() + xtol / 3.0;
    let mut tol2 = 2.0 * tol1;
    let mut converged = true;

    while (xf - xm).abs() > tol2 - 0.5 * (b - a) {
        let mut golden = true;

        if e.abs() > tol1 {
            golden = false;
            let mut r = (xf - nfc) * (fx - ffulc);
            let mut q = (xf - fulc) * (fx - fnfc);
            let mut p = (xf - fulc) * q - (xf - nfc) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            r = e;
            e = rat;

            let acceptable = p.abs() < (0.5 * q * r).abs() && p > q * (a - xf) && p < q * (b - xf);
            if acceptable {
                rat = p / q;
                let x = xf + rat;
                if (x - a) < tol2 || (b - x) < tol2 {
                    rat = tol1 * sign_or_one(xm - xf);
                }
            } else {
                golden = true;
            }
        }

        if golden {
            e = if xf >= xm { a - xf } else { b - xf };
            rat = GOLDEN_MEAN * e;
        }

        let x = xf + sign_or_one(rat) * rat.abs().max(tol1);
        let fu = f(x);
        evaluations += 1;

        if fu <= fx {
            if x >= xf {
                a = xf;
            } else {
                b = xf;
            }
            fulc = nfc;
            ffulc = fnfc;
            nfc = xf;
            fnfc = fx;
            xf = x;
            fx = fu;
        } else {
            if x < xf {
                a = x;
            } else {
                b = x;
            }
            if fu <= fnfc || nfc == xf {
                fulc = nfc;
                ffulc = fnfc;
                nfc = x;
                fnfc = fu;
            } else if fu <= ffulc || fulc == xf || fulc == nfc {
                fulc = x;
                ffulc = fu;
            }
        }

        xm = 0.5 * (a + b);
        tol1 = SQRT_EPS * xf.abs() + xtol / 3.0;
        tol2 = 2.0 * tol1;

        if evaluations >= max_evaluations {
            converged = false;
            break;
        }
    }

    Ok(BoundedMinimum {
        x: xf,
        fx,
        evaluations,
        converged,
    })
}

fn sign_or_one(v: f64) -> f64 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}
