//! Multivariate quadrature rules.

use serde::{Deserialize, Serialize};
use uq_common::{Error, Result};

/// Abscissas as `dim` rows of `len` coordinates, with one weight per node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadratureRule {
    abscissas: Vec<Vec<f64>>,
    weights: Vec<f64>,
}

impl QuadratureRule {
    /// Every abscissa row must have one entry per weight.
    pub fn new(abscissas: Vec<Vec<f64>>, weights: Vec<f64>) -> Result<Self> {
        if abscissas.is_empty() {
            return Err(Error::InvalidArgument(
                "quadrature rule needs at least one dimension".to_string(),
            ));
        }
        if let Some(row) = abscissas.iter().find(|row| row.len() != weights.len()) {
            return Err(Error::DimensionMismatch {
                expected: weights.len(),
                actual: row.len(),
            });
        }
        Ok(QuadratureRule { abscissas, weights })
    }

    pub fn dim(&self) -> usize {
        self.abscissas.len()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn abscissas(&self) -> &[Vec<f64>] {
        &self.abscissas
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Coordinates of node `i`.
    pub fn node(&self, i: usize) -> Vec<f64> {
        self.abscissas.iter().map(|row| row[i]).collect()
    }

    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// `Σ w_i f(x_i)`.
    pub fn integrate<F>(&self, mut f: F) -> f64
    where
        F: FnMut(&[f64]) -> f64,
    {
        let mut point = vec![0.0; self.dim()];
        let mut total = 0.0;
        for (i, w) in self.weights.iter().enumerate() {
            for (slot, row) in point.iter_mut().zip(&self.abscissas) {
                *slot = row[i];
            }
            total += w * f(&point);
        }
        total
    }

    pub fn into_parts(self) -> (Vec<Vec<f64>>, Vec<f64>) {
        (self.abscissas, self.weights)
    }
}
