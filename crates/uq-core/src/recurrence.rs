//! Three-term recurrence coefficients of monic orthogonal polynomials.
//!
//! `p_{k+1}(x) = (x - α_k) p_k(x) - β_k p_{k-1}(x)` with `p_0 = 1`,
//! `p_{-1} = 0`, and `β_0` the zeroth moment of the weight.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uq_common::{Error, RecurrenceAlgorithm, Result, SubRule};
use uq_config::RecurrenceSettings;
use uq_math::tridiagonal_eigen;

use crate::distribution::{Distribution, Marginal};
use crate::subrules::sub_rule;

/// Validated recurrence coefficients `(α_0..α_n, β_0..β_n)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceCoefficients {
    alpha: Vec<f64>,
    beta: Vec<f64>,
}

impl RecurrenceCoefficients {
    /// Requires equal non-zero lengths, finite entries, and `β_i > 0`.
    pub fn new(alpha: Vec<f64>, beta: Vec<f64>) -> Result<Self> {
        if alpha.len() != beta.len() {
            return Err(Error::InvalidRecurrence(format!(
                "alpha has {} entries but beta has {}",
                alpha.len(),
                beta.len()
            )));
        }
        if alpha.is_empty() {
            return Err(Error::InvalidRecurrence(
                "no coefficients".to_string(),
            ));
        }
        if let Some(bad) = alpha.iter().chain(&beta).find(|v| !v.is_finite()) {
            return Err(Error::InvalidRecurrence(format!(
                "non-finite coefficient {bad}"
            )));
        }
        if let Some((idx, b)) = beta.iter().enumerate().find(|(_, &b)| b <= 0.0) {
            return Err(Error::InvalidRecurrence(format!(
                "beta[{idx}] = {b} must be positive"
            )));
        }
        Ok(RecurrenceCoefficients { alpha, beta })
    }

    pub fn alpha(&self) -> &[f64] {
        &self.alpha
    }

    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.alpha, self.beta)
    }

    /// Orthonormal polynomials `q_0(x)..q_{len-1}(x)`.
    pub fn orthonormal(&self, x: f64) -> Vec<f64> {
        let n = self.len();
        let mut values = Vec::with_capacity(n);
        let mut prev = 0.0;
        let mut cur = 1.0 / self.beta[0].sqrt();
        values.push(cur);
        for k in 0..n.saturating_sub(1) {
            let lagged = if k == 0 { 0.0 } else { self.beta[k].sqrt() * prev };
            let next = ((x - self.alpha[k]) * cur - lagged) / self.beta[k + 1].sqrt();
            prev = cur;
            cur = next;
            values.push(cur);
        }
        values
    }
}

/// How coefficients are obtained when a family has no closed form, or when
/// discretization is requested explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceOptions {
    pub rule: SubRule,
    /// Minimum number of auxiliary samples.
    pub accuracy: usize,
    pub algorithm: RecurrenceAlgorithm,
}

impl Default for RecurrenceOptions {
    fn default() -> Self {
        RecurrenceOptions {
            rule: SubRule::Fejer,
            accuracy: 100,
            algorithm: RecurrenceAlgorithm::Analytical,
        }
    }
}

impl From<&RecurrenceSettings> for RecurrenceOptions {
    fn from(settings: &RecurrenceSettings) -> Self {
        RecurrenceOptions {
            rule: settings.rule,
            accuracy: settings.accuracy,
            algorithm: settings.algorithm,
        }
    }
}

/// Coefficients up to polynomial `degree` (so `degree + 1` pairs) for each
/// dimension of `dist`.
pub fn construct_recurrence_coefficients(
    degree: usize,
    dist: &dyn Distribution,
    options: &RecurrenceOptions,
) -> Result<Vec<RecurrenceCoefficients>> {
    if options.accuracy == 0 {
        return Err(Error::InvalidArgument(
            "recurrence accuracy must be at least 1".to_string(),
        ));
    }
    dist.marginals()?
        .into_iter()
        .map(|marginal| marginal_recurrence(degree, marginal, options))
        .collect()
}

fn marginal_recurrence(
    degree: usize,
    marginal: &Marginal,
    options: &RecurrenceOptions,
) -> Result<RecurrenceCoefficients> {
    let count = degree + 1;
    if options.algorithm == RecurrenceAlgorithm::Analytical {
        if let Some((alpha, beta)) = analytical_recurrence(marginal, count) {
            return RecurrenceCoefficients::new(alpha, beta);
        }
        debug!(
            family = marginal.family(),
            "no closed-form recurrence; discretizing"
        );
    }

    let points = options.accuracy.max(2 * count);
    let (nodes, weights) = discretize(marginal, options.rule, points)?;
    match options.algorithm {
        RecurrenceAlgorithm::Lanczos => discretized_lanczos(count, &nodes, &weights),
        RecurrenceAlgorithm::Analytical | RecurrenceAlgorithm::Stieltjes => {
            discretized_stieltjes(count, &nodes, &weights)
        }
    }
}

/// Closed-form coefficients for the classical families, affinely mapped.
pub fn analytical_recurrence(marginal: &Marginal, count: usize) -> Option<(Vec<f64>, Vec<f64>)> {
    let mut alpha = Vec::with_capacity(count);
    let mut beta = Vec::with_capacity(count);
    match *marginal {
        Marginal::Uniform { lower, upper } => {
            let center = 0.5 * (lower + upper);
            let half = 0.5 * (upper - lower);
            for k in 0..count {
                alpha.push(center);
                let kf = k as f64;
                beta.push(if k == 0 {
                    1.0
                } else {
                    half * half * kf * kf / (4.0 * kf * kf - 1.0)
                });
            }
        }
        Marginal::Normal { mu, sigma } => {
            for k in 0..count {
                alpha.push(mu);
                beta.push(if k == 0 { 1.0 } else { sigma * sigma * k as f64 });
            }
        }
        Marginal::Beta {
            alpha: a,
            beta: b,
            lower,
            upper,
        } => {
            // Jacobi weight (1-t)^ja (1+t)^jb on [-1, 1]
            let ja = b - 1.0;
            let jb = a - 1.0;
            let sum = ja + jb;
            let center = 0.5 * (lower + upper);
            let half = 0.5 * (upper - lower);
            for k in 0..count {
                let kf = k as f64;
                let s = 2.0 * kf + sum;
                let a_t = if k == 0 {
                    (jb - ja) / (sum + 2.0)
                } else {
                    (jb * jb - ja * ja) / (s * (s + 2.0))
                };
                let b_t = match k {
                    0 => 1.0,
                    1 => 4.0 * (1.0 + ja) * (1.0 + jb) / ((2.0 + sum).powi(2) * (3.0 + sum)),
                    _ => {
                        4.0 * kf * (kf + ja) * (kf + jb) * (kf + sum)
                            / (s * s * (s + 1.0) * (s - 1.0))
                    }
                };
                alpha.push(center + half * a_t);
                beta.push(if k == 0 { 1.0 } else { half * half * b_t });
            }
        }
        Marginal::Gamma { shape, scale } => laguerre(shape, scale, count, &mut alpha, &mut beta),
        Marginal::Exponential { scale } => laguerre(1.0, scale, count, &mut alpha, &mut beta),
        Marginal::Triangular { .. } => return None,
    }
    Some((alpha, beta))
}

fn laguerre(shape: f64, scale: f64, count: usize, alpha: &mut Vec<f64>, beta: &mut Vec<f64>) {
    for k in 0..count {
        let kf = k as f64;
        alpha.push(scale * (2.0 * kf + shape));
        beta.push(if k == 0 {
            1.0
        } else {
            scale * scale * kf * (kf + shape - 1.0)
        });
    }
}

/// Auxiliary nodes on the support with density-weighted, normalized weights.
fn discretize(marginal: &Marginal, rule: SubRule, points: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    let samples = sub_rule(rule, points)?.mapped(marginal.lower(), marginal.upper());
    let mut weights = Vec::with_capacity(points);
    for (&x, &w) in samples.nodes.iter().zip(&samples.weights) {
        let density = marginal.density(x);
        if !density.is_finite() {
            return Err(Error::UnsupportedRecurrence(format!(
                "{marginal} density is not finite at auxiliary node {x}; choose another rule"
            )));
        }
        weights.push(w * density);
    }
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(Error::UnsupportedRecurrence(format!(
            "{marginal} has no mass on the auxiliary rule"
        )));
    }
    for w in &mut weights {
        *w /= total;
    }
    Ok((samples.nodes, weights))
}

/// Stieltjes procedure on a discrete measure.
pub fn discretized_stieltjes(
    count: usize,
    nodes: &[f64],
    weights: &[f64],
) -> Result<RecurrenceCoefficients> {
    check_discrete(count, nodes, weights)?;
    let mut alpha = Vec::with_capacity(count);
    let mut beta = Vec::with_capacity(count);
    let mut prev = vec![0.0; nodes.len()];
    let mut cur = vec![1.0; nodes.len()];
    let mut prev_norm = 1.0;
    for k in 0..count {
        let norm: f64 = weights.iter().zip(&cur).map(|(w, p)| w * p * p).sum();
        let first: f64 = weights
            .iter()
            .zip(nodes)
            .zip(&cur)
            .map(|((w, x), p)| w * x * p * p)
            .sum();
        alpha.push(first / norm);
        beta.push(if k == 0 { norm } else { norm / prev_norm });

        let next: Vec<f64> = nodes
            .iter()
            .zip(&cur)
            .zip(&prev)
            .map(|((x, p), q)| (x - alpha[k]) * p - beta[k] * q)
            .collect();
        prev = std::mem::replace(&mut cur, next);
        prev_norm = norm;
    }
    RecurrenceCoefficients::new(alpha, beta)
}

/// Lanczos procedure on a discrete measure, with Rutishauser-Kahan-Pal-Walker
/// updating.
pub fn discretized_lanczos(
    count: usize,
    nodes: &[f64],
    weights: &[f64],
) -> Result<RecurrenceCoefficients> {
    check_discrete(count, nodes, weights)?;
    let size = nodes.len();
    let mut p0 = nodes.to_vec();
    let mut p1 = vec![0.0; size];
    p1[0] = weights[0];
    for n in 0..size - 1 {
        let mut pn = weights[n + 1];
        let mut gam = 1.0;
        let mut sig = 0.0;
        let mut t = 0.0;
        let xlam = nodes[n + 1];
        for k in 0..=n + 1 {
            let rho = p1[k] + pn;
            let tmp = gam * rho;
            let tsig = sig;
            if rho <= 0.0 {
                gam = 1.0;
                sig = 0.0;
            } else {
                gam = p1[k] / rho;
                sig = pn / rho;
            }
            let tk = sig * (p0[k] - xlam) - gam * t;
            p0[k] -= tk - t;
            t = tk;
            pn = if sig <= 0.0 { tsig * p1[k] } else { t * t / sig };
            p1[k] = tmp;
        }
    }
    p0.truncate(count);
    p1.truncate(count);
    RecurrenceCoefficients::new(p0, p1)
}

fn check_discrete(count: usize, nodes: &[f64], weights: &[f64]) -> Result<()> {
    if nodes.len() != weights.len() {
        return Err(Error::DimensionMismatch {
            expected: nodes.len(),
            actual: weights.len(),
        });
    }
    if count == 0 || count > nodes.len() {
        return Err(Error::UnsupportedRecurrence(format!(
            "{count} coefficients requested from a {}-point measure",
            nodes.len()
        )));
    }
    Ok(())
}

/// Golub-Welsch: eigenvalues of each Jacobi matrix are the abscissas and
/// `β_0` times the squared first eigenvector components are the weights.
pub fn coefficients_to_quadrature(
    coefficients: &[RecurrenceCoefficients],
) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>)> {
    let mut abscissas = Vec::with_capacity(coefficients.len());
    let mut weights = Vec::with_capacity(coefficients.len());
    for coeffs in coefficients {
        let off: Vec<f64> = coeffs.beta[1..].iter().map(|b| b.sqrt()).collect();
        let eigen =
            tridiagonal_eigen(&coeffs.alpha, &off).map_err(|e| Error::Numerical(e.to_string()))?;
        let beta0 = coeffs.beta[0];
        weights.push(
            eigen
                .first_components
                .iter()
                .map(|v| beta0 * v * v)
                .collect(),
        );
        abscissas.push(eigen.values);
    }
    Ok((abscissas, weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Joint;
    use crate::subrules::clenshaw_curtis;

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() <= tol, "{actual:?} != {expected:?}");
        }
    }

    fn legendre_betas(count: usize) -> Vec<f64> {
        (0..count)
            .map(|k| {
                let k = k as f64;
                if k == 0.0 {
                    1.0
                } else {
                    k * k / (4.0 * k * k - 1.0)
                }
            })
            .collect()
    }

    #[test]
    fn rejects_invalid_coefficients() {
        assert!(matches!(
            RecurrenceCoefficients::new(vec![0.0, 0.0], vec![1.0, 0.0]),
            Err(Error::InvalidRecurrence(_))
        ));
        assert!(matches!(
            RecurrenceCoefficients::new(vec![0.0], vec![1.0, 1.0]),
            Err(Error::InvalidRecurrence(_))
        ));
        assert!(matches!(
            RecurrenceCoefficients::new(vec![], vec![]),
            Err(Error::InvalidRecurrence(_))
        ));
    }

    #[test]
    fn discretized_procedures_match_legendre() {
        let samples = clenshaw_curtis(101);
        let weights: Vec<f64> = samples.weights.iter().map(|w| w / 2.0).collect();
        let expected = legendre_betas(5);

        let s = discretized_stieltjes(5, &samples.nodes, &weights).unwrap();
        assert_close(s.beta(), &expected, 1e-12);
        assert_close(s.alpha(), &[0.0; 5], 1e-12);

        let l = discretized_lanczos(5, &samples.nodes, &weights).unwrap();
        assert_close(l.beta(), &expected, 1e-12);
        assert_close(l.alpha(), &[0.0; 5], 1e-12);
    }

    #[test]
    fn analytical_beta_matches_stieltjes() {
        let dist = Marginal::beta(2.0, 3.0, -1.0, 2.0).unwrap();
        let analytical =
            construct_recurrence_coefficients(4, &dist, &RecurrenceOptions::default()).unwrap();
        for algorithm in [RecurrenceAlgorithm::Stieltjes, RecurrenceAlgorithm::Lanczos] {
            let options = RecurrenceOptions {
                algorithm,
                ..RecurrenceOptions::default()
            };
            let discrete = construct_recurrence_coefficients(4, &dist, &options).unwrap();
            assert_close(discrete[0].alpha(), analytical[0].alpha(), 1e-10);
            assert_close(discrete[0].beta(), analytical[0].beta(), 1e-10);
        }
    }

    #[test]
    fn analytical_moments_are_mean_and_variance() {
        let cases = [
            (Marginal::uniform(2.0, 6.0).unwrap(), 4.0, 16.0 / 12.0),
            (Marginal::normal(1.0, 3.0).unwrap(), 1.0, 9.0),
            (Marginal::gamma(2.5, 2.0).unwrap(), 5.0, 10.0),
            (Marginal::exponential(0.5).unwrap(), 0.5, 0.25),
            (Marginal::beta(2.0, 2.0, -1.0, 1.0).unwrap(), 0.0, 0.2),
        ];
        for (dist, mean, var) in cases {
            let coeffs = &construct_recurrence_coefficients(
                1,
                &dist,
                &RecurrenceOptions::default(),
            )
            .unwrap()[0];
            assert!((coeffs.alpha()[0] - mean).abs() < 1e-12, "{dist}");
            assert!((coeffs.beta()[1] - var).abs() < 1e-12, "{dist}");
            assert_eq!(coeffs.beta()[0], 1.0);
        }
    }

    #[test]
    fn triangular_falls_back_to_discretization() {
        let (lower, mode, upper) = (0.0, 0.3, 2.0);
        let dist = Marginal::triangular(lower, mode, upper).unwrap();
        let options = RecurrenceOptions {
            accuracy: 1000,
            ..RecurrenceOptions::default()
        };
        let coeffs = &construct_recurrence_coefficients(2, &dist, &options).unwrap()[0];
        let mean = (lower + mode + upper) / 3.0;
        let var = (lower * lower + mode * mode + upper * upper
            - lower * mode
            - lower * upper
            - mode * upper)
            / 18.0;
        assert_eq!(coeffs.len(), 3);
        assert!((coeffs.alpha()[0] - mean).abs() < 1e-4);
        assert!((coeffs.beta()[1] - var).abs() < 1e-4);
    }

    #[test]
    fn dependent_joint_is_rejected() {
        use crate::distribution::JointComponent;
        let joint = Joint::new(vec![
            JointComponent::independent(Marginal::uniform(0.0, 1.0).unwrap()),
            JointComponent::shifted(Marginal::uniform(0.0, 1.0).unwrap(), 0),
        ])
        .unwrap();
        let err = construct_recurrence_coefficients(2, &joint, &RecurrenceOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Dependency(_)));
    }

    #[test]
    fn zero_accuracy_is_rejected() {
        let options = RecurrenceOptions {
            accuracy: 0,
            ..RecurrenceOptions::default()
        };
        let dist = Marginal::uniform(0.0, 1.0).unwrap();
        assert!(matches!(
            construct_recurrence_coefficients(1, &dist, &options),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn too_many_coefficients_for_measure() {
        assert!(matches!(
            discretized_stieltjes(4, &[0.0, 1.0], &[0.5, 0.5]),
            Err(Error::UnsupportedRecurrence(_))
        ));
    }

    #[test]
    fn gauss_rule_from_hermite() {
        let dist = Marginal::normal(0.0, 1.0).unwrap();
        let coeffs = construct_recurrence_coefficients(2, &dist, &RecurrenceOptions::default())
            .unwrap();
        let (x, w) = coefficients_to_quadrature(&coeffs).unwrap();
        let root3 = 3.0_f64.sqrt();
        assert_close(&x[0], &[-root3, 0.0, root3], 1e-12);
        assert_close(&w[0], &[1.0 / 6.0, 2.0 / 3.0, 1.0 / 6.0], 1e-12);
    }

    #[test]
    fn orthonormal_basis_values() {
        let dist = Marginal::uniform(-1.0, 1.0).unwrap();
        let coeffs = &construct_recurrence_coefficients(2, &dist, &RecurrenceOptions::default())
            .unwrap()[0];
        // Normalized Legendre: sqrt(2k+1) P_k(x)
        let x: f64 = 0.3;
        let p2 = 0.5 * (3.0 * x * x - 1.0);
        assert_close(
            &coeffs.orthonormal(x),
            &[1.0, 3.0_f64.sqrt() * x, 5.0_f64.sqrt() * p2],
            1e-13,
        );
    }
}
