//! Tensor products of per-dimension rules.

use crate::quadrature::QuadratureRule;
use uq_common::{Error, Result};

/// Cartesian product of `arrays`, first array varying slowest. Each row of
/// the result is one combination.
pub fn combine(arrays: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut rows: Vec<Vec<f64>> = vec![Vec::with_capacity(arrays.len())];
    for array in arrays {
        rows = rows
            .iter()
            .flat_map(|prefix| {
                array.iter().map(move |&value| {
                    let mut row = prefix.clone();
                    row.push(value);
                    row
                })
            })
            .collect();
    }
    rows
}

/// Tensor-product rule from per-dimension abscissas and weights.
pub fn combine_rules(abscissas: &[Vec<f64>], weights: &[Vec<f64>]) -> Result<QuadratureRule> {
    if abscissas.len() != weights.len() {
        return Err(Error::DimensionMismatch {
            expected: abscissas.len(),
            actual: weights.len(),
        });
    }
    for (x, w) in abscissas.iter().zip(weights) {
        if x.len() != w.len() {
            return Err(Error::DimensionMismatch {
                expected: x.len(),
                actual: w.len(),
            });
        }
    }

    let nodes = combine(abscissas);
    let dim = abscissas.len();
    let mut rows = vec![Vec::with_capacity(nodes.len()); dim];
    for node in &nodes {
        for (row, &value) in rows.iter_mut().zip(node) {
            row.push(value);
        }
    }
    let products = combine(weights)
        .into_iter()
        .map(|parts| parts.into_iter().product())
        .collect();
    QuadratureRule::new(rows, products)
}
