//! Auxiliary rules on `[-1, 1]` used to discretize a weight function.

use std::f64::consts::PI;

use uq_common::{Error, Result, SubRule};
use uq_math::tridiagonal_eigen;

/// Nodes and weights on `[-1, 1]` with weights summing to 2.
#[derive(Debug, Clone, PartialEq)]
pub struct SubRuleSamples {
    pub nodes: Vec<f64>,
    pub weights: Vec<f64>,
}

impl SubRuleSamples {
    /// Affinely map onto `[lower, upper]`, scaling weights by the Jacobian.
    pub fn mapped(mut self, lower: f64, upper: f64) -> Self {
        let center = 0.5 * (lower + upper);
        let half = 0.5 * (upper - lower);
        for x in &mut self.nodes {
            *x = center + half * *x;
        }
        for w in &mut self.weights {
            *w *= half;
        }
        self
    }
}

/// `n`-point rule of the chosen kind.
pub fn sub_rule(rule: SubRule, n: usize) -> Result<SubRuleSamples> {
    if n == 0 {
        return Err(Error::InvalidArgument(
            "auxiliary rule needs at least one point".to_string(),
        ));
    }
    match rule {
        SubRule::Fejer => Ok(fejer(n)),
        SubRule::ClenshawCurtis => Ok(clenshaw_curtis(n)),
        SubRule::Legendre => gauss_legendre(n),
    }
}

/// Clenshaw-Curtis with `n` points, endpoints included.
pub fn clenshaw_curtis(n: usize) -> SubRuleSamples {
    if n == 1 {
        return SubRuleSamples {
            nodes: vec![0.0],
            weights: vec![2.0],
        };
    }
    let order = n - 1;
    let m = order as f64;
    let mut nodes = Vec::with_capacity(n);
    let mut weights = Vec::with_capacity(n);
    for j in 0..=order {
        let theta = j as f64 * PI / m;
        nodes.push(-theta.cos());

        let mut s = 0.0;
        for k in 1..=order / 2 {
            let b = if 2 * k == order { 1.0 } else { 2.0 };
            s += b / (4.0 * (k * k) as f64 - 1.0) * (2.0 * k as f64 * theta).cos();
        }
        let c = if j == 0 || j == order { 1.0 } else { 2.0 };
        weights.push(c / m * (1.0 - s));
    }
    SubRuleSamples { nodes, weights }
}

/// Fejér's second rule with `n` interior points.
pub fn fejer(n: usize) -> SubRuleSamples {
    let big = (n + 1) as f64;
    let mut nodes = Vec::with_capacity(n);
    let mut weights = Vec::with_capacity(n);
    for j in 1..=n {
        let theta = j as f64 * PI / big;
        nodes.push(-theta.cos());
        let s: f64 = (1..=(n + 2) / 2)
            .map(|k| {
                let odd = (2 * k - 1) as f64;
                (odd * theta).sin() / odd
            })
            .sum();
        weights.push(4.0 * theta.sin() / big * s);
    }
    SubRuleSamples { nodes, weights }
}

/// Gauss-Legendre with `n` points via the Legendre Jacobi matrix.
pub fn gauss_legendre(n: usize) -> Result<SubRuleSamples> {
    let diag = vec![0.0; n];
    let off: Vec<f64> = (1..n)
        .map(|k| {
            let k = k as f64;
            (k * k / (4.0 * k * k - 1.0)).sqrt()
        })
        .collect();
    let eigen = tridiagonal_eigen(&diag, &off).map_err(|e| Error::Numerical(e.to_string()))?;
    Ok(SubRuleSamples {
        nodes: eigen.values,
        weights: eigen
            .first_components
            .iter()
            .map(|v| 2.0 * v * v)
            .collect(),
    })
}
