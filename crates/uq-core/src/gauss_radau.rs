//! Gauss-Radau rules: Gaussian quadrature with one abscissa fixed in advance.
//!
//! The last diagonal entry of the Jacobi matrix is modified (Golub 1973) so
//! that the fixed point becomes one of its eigenvalues; the remaining nodes
//! and all weights then follow from the usual Golub-Welsch step.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uq_common::{Error, Result};
use uq_math::{solve_tridiagonal, NumericError};

use crate::combine::combine_rules;
use crate::distribution::Distribution;
use crate::quadrature::QuadratureRule;
use crate::recurrence::{
    coefficients_to_quadrature, construct_recurrence_coefficients, RecurrenceCoefficients,
    RecurrenceOptions,
};

/// Relative distance within which the computed node nearest the fixed point
/// is replaced by the fixed point.
pub const DEFAULT_SNAP_TOLERANCE: f64 = 1e-8;

/// Where the fixed abscissa sits in each dimension.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedPoint {
    /// Lower bound of each dimension's support.
    #[default]
    Lower,
    /// The same value in every dimension.
    Scalar(f64),
    PerDimension(Vec<f64>),
}

impl FixedPoint {
    /// One fixed point per dimension of `dist`.
    pub fn resolve(&self, dist: &dyn Distribution) -> Result<Vec<f64>> {
        match self {
            FixedPoint::Lower => Ok(dist.range().0),
            FixedPoint::Scalar(value) => Ok(vec![*value; dist.dim()]),
            FixedPoint::PerDimension(values) => {
                if values.len() != dist.dim() {
                    return Err(Error::DimensionMismatch {
                        expected: dist.dim(),
                        actual: values.len(),
                    });
                }
                Ok(values.clone())
            }
        }
    }
}

/// Modify `coefficients` so that `fixed_point` is an eigenvalue of the
/// Jacobi matrix. Only the last alpha changes.
pub fn radau_jacobi(
    coefficients: &RecurrenceCoefficients,
    fixed_point: f64,
) -> Result<RecurrenceCoefficients> {
    if coefficients.len() < 2 {
        return Err(Error::InvalidRecurrence(format!(
            "Radau modification needs at least 2 coefficients, got {}",
            coefficients.len()
        )));
    }
    let alpha = coefficients.alpha();
    let beta = coefficients.beta();
    let m = coefficients.len() - 1;

    let off: Vec<f64> = beta[1..m].iter().map(|b| b.sqrt()).collect();
    let diag: Vec<f64> = alpha[..m].iter().map(|a| a - fixed_point).collect();
    let mut rhs = vec![0.0; m];
    rhs[m - 1] = beta[m];

    let delta = solve_tridiagonal(&off, &diag, &off, &rhs).map_err(|e| match e {
        NumericError::Singular { .. } | NumericError::NonFinite(_) => Error::IllegalFixedPoint {
            value: fixed_point,
        },
        other => Error::Numerical(other.to_string()),
    })?;

    let last = fixed_point + delta[m - 1];
    if !last.is_finite() {
        return Err(Error::IllegalFixedPoint { value: fixed_point });
    }
    let mut modified = alpha.to_vec();
    modified[m] = last;
    RecurrenceCoefficients::new(modified, beta.to_vec())
}

/// Gauss-Radau rule with `2 * order` nodes per dimension.
pub fn generate_gauss_radau(
    order: usize,
    dist: &dyn Distribution,
    fixed_point: &FixedPoint,
    options: &RecurrenceOptions,
) -> Result<QuadratureRule> {
    generate_gauss_radau_with_tolerance(order, dist, fixed_point, options, DEFAULT_SNAP_TOLERANCE)
}

/// As [`generate_gauss_radau`], with an explicit snapping tolerance
/// (0 disables snapping).
pub fn generate_gauss_radau_with_tolerance(
    order: usize,
    dist: &dyn Distribution,
    fixed_point: &FixedPoint,
    options: &RecurrenceOptions,
    snap_tolerance: f64,
) -> Result<QuadratureRule> {
    let fixed = fixed_point.resolve(dist)?;
    if order == 0 {
        return QuadratureRule::new(fixed.iter().map(|&x| vec![x]).collect(), vec![1.0]);
    }

    let degree = order
        .checked_mul(2)
        .map(|nodes| nodes - 1)
        .ok_or_else(|| Error::InvalidArgument(format!("Radau order {order} is too large")))?;
    let coefficients = construct_recurrence_coefficients(degree, dist, options)?;
    let modified = coefficients
        .iter()
        .zip(&fixed)
        .enumerate()
        .map(|(dim, (coeffs, &fp))| {
            let result = radau_jacobi(coeffs, fp)?;
            debug!(
                dim,
                fixed_point = fp,
                alpha_last = result.alpha()[result.len() - 1],
                "radau modification"
            );
            Ok(result)
        })
        .collect::<Result<Vec<_>>>()?;

    let (mut abscissas, weights) = coefficients_to_quadrature(&modified)?;
    for (row, &fp) in abscissas.iter_mut().zip(&fixed) {
        snap_to_fixed_point(row, fp, snap_tolerance);
    }

    let rule = combine_rules(&abscissas, &weights)?;
    info!(
        order,
        dim = rule.dim(),
        nodes = rule.len(),
        "generated Gauss-Radau rule"
    );
    Ok(rule)
}

fn snap_to_fixed_point(row: &mut [f64], fixed_point: f64, tolerance: f64) {
    let nearest = row
        .iter_mut()
        .min_by(|a, b| (**a - fixed_point).abs().total_cmp(&(**b - fixed_point).abs()));
    if let Some(x) = nearest {
        if (*x - fixed_point).abs() <= tolerance * fixed_point.abs().max(1.0) {
            *x = fixed_point;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{Joint, Marginal};

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() <= tol, "{actual:?} != {expected:?}");
        }
    }

    fn uniform(lower: f64, upper: f64) -> Marginal {
        Marginal::uniform(lower, upper).unwrap()
    }

    #[test]
    fn uniform_order_four_reference() {
        let rule = generate_gauss_radau(
            4,
            &uniform(-1.0, 1.0),
            &FixedPoint::Lower,
            &RecurrenceOptions::default(),
        )
        .unwrap();
        assert_close(
            &rule.abscissas()[0],
            &[-1.0, -0.887, -0.64, -0.295, 0.094, 0.468, 0.771, 0.955],
            5e-3,
        );
        assert_close(
            rule.weights(),
            &[0.016, 0.093, 0.152, 0.188, 0.196, 0.174, 0.125, 0.057],
            1e-3,
        );
        assert_eq!(rule.abscissas()[0][0], -1.0);
    }

    #[test]
    fn beta_reference_orders() {
        let dist = Marginal::beta(2.0, 2.0, -1.0, 1.0).unwrap();
        let options = RecurrenceOptions::default();

        let rule = generate_gauss_radau(0, &dist, &FixedPoint::Lower, &options).unwrap();
        assert_eq!(rule.abscissas(), &[vec![-1.0]]);
        assert_eq!(rule.weights(), &[1.0]);

        let rule = generate_gauss_radau(1, &dist, &FixedPoint::Lower, &options).unwrap();
        assert_close(&rule.abscissas()[0], &[-1.0, 0.2], 5e-3);
        assert_close(rule.weights(), &[0.17, 0.83], 5e-3);

        let rule = generate_gauss_radau(2, &dist, &FixedPoint::Lower, &options).unwrap();
        assert_close(&rule.abscissas()[0], &[-1.0, -0.51, 0.13, 0.71], 5e-3);
        assert_close(rule.weights(), &[0.02, 0.33, 0.48, 0.17], 5e-3);
    }

    #[test]
    fn bivariate_reference() {
        let dist = Joint::independent(vec![
            uniform(0.0, 1.0),
            Marginal::beta(4.0, 5.0, 0.0, 1.0).unwrap(),
        ])
        .unwrap();
        let rule =
            generate_gauss_radau(1, &dist, &FixedPoint::Lower, &RecurrenceOptions::default())
                .unwrap();
        assert_close(&rule.abscissas()[0], &[0.0, 0.0, 0.667, 0.667], 1e-3);
        assert_close(&rule.abscissas()[1], &[0.0, 0.5, 0.0, 0.5], 1e-3);
        assert_close(rule.weights(), &[0.028, 0.222, 0.083, 0.667], 1e-3);
    }

    #[test]
    fn fixed_point_sweep_contains_fixed_point() {
        let dist = uniform(-1.0, 1.0);
        for i in 0..6 {
            let fp = -1.0 + 0.4 * i as f64;
            let rule = generate_gauss_radau(
                3,
                &dist,
                &FixedPoint::Scalar(fp),
                &RecurrenceOptions::default(),
            )
            .unwrap();
            assert_eq!(rule.len(), 6);
            assert!(rule.abscissas()[0].contains(&fp), "fp {fp}: {rule:?}");
            assert!((rule.weight_sum() - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn centre_fixed_point_is_illegal() {
        let err = generate_gauss_radau(
            3,
            &uniform(-1.0, 1.0),
            &FixedPoint::Scalar(0.0),
            &RecurrenceOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::IllegalFixedPoint { value } if value == 0.0));
        assert_eq!(err.code(), 30);
    }

    #[test]
    fn illegal_fixed_point_in_one_dimension_aborts() {
        let dist = Joint::independent(vec![uniform(0.0, 1.0), uniform(-1.0, 1.0)]).unwrap();
        let err = generate_gauss_radau(
            3,
            &dist,
            &FixedPoint::PerDimension(vec![0.0, 0.0]),
            &RecurrenceOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::IllegalFixedPoint { value } if value == 0.0));
    }

    #[test]
    fn oversized_order_is_rejected() {
        let err = generate_gauss_radau(
            usize::MAX,
            &uniform(0.0, 1.0),
            &FixedPoint::Lower,
            &RecurrenceOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn order_zero_is_fixed_point() {
        let dist = Joint::independent(vec![uniform(0.0, 1.0), uniform(2.0, 3.0)]).unwrap();
        let rule = generate_gauss_radau(
            0,
            &dist,
            &FixedPoint::PerDimension(vec![0.25, 2.5]),
            &RecurrenceOptions::default(),
        )
        .unwrap();
        assert_eq!(rule.node(0), vec![0.25, 2.5]);
        assert_eq!(rule.weights(), &[1.0]);
    }

    #[test]
    fn per_dimension_length_checked() {
        let err = generate_gauss_radau(
            2,
            &uniform(0.0, 1.0),
            &FixedPoint::PerDimension(vec![0.0, 1.0]),
            &RecurrenceOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[test]
    fn radau_jacobi_changes_only_last_alpha() {
        let dist = Marginal::normal(0.0, 1.0).unwrap();
        let coeffs =
            &construct_recurrence_coefficients(3, &dist, &RecurrenceOptions::default()).unwrap()[0];
        let modified = radau_jacobi(coeffs, -2.0).unwrap();
        assert_eq!(&modified.alpha()[..3], &coeffs.alpha()[..3]);
        assert_eq!(modified.beta(), coeffs.beta());
        assert_ne!(modified.alpha()[3], coeffs.alpha()[3]);
    }

    #[test]
    fn radau_jacobi_needs_two_coefficients() {
        let coeffs = RecurrenceCoefficients::new(vec![0.0], vec![1.0]).unwrap();
        assert!(matches!(
            radau_jacobi(&coeffs, 0.0),
            Err(Error::InvalidRecurrence(_))
        ));
    }

    #[test]
    fn dependent_joint_fails_before_rule() {
        use crate::distribution::JointComponent;
        let dist = Joint::new(vec![
            JointComponent::independent(uniform(0.0, 1.0)),
            JointComponent::shifted(uniform(0.0, 1.0), 0),
        ])
        .unwrap();
        let err = generate_gauss_radau(2, &dist, &FixedPoint::Lower, &RecurrenceOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Dependency(_)));
    }

    #[test]
    fn snapping_respects_tolerance() {
        let mut row = vec![-1.0 + 1e-12, 0.5];
        snap_to_fixed_point(&mut row, -1.0, DEFAULT_SNAP_TOLERANCE);
        assert_eq!(row[0], -1.0);

        let mut row = vec![-0.9, 0.5];
        snap_to_fixed_point(&mut row, -1.0, DEFAULT_SNAP_TOLERANCE);
        assert_eq!(row[0], -0.9);
    }
}
