//! Failure modes of the numerical kernels.

use thiserror::Error;

/// Result alias for numerical kernels.
pub type NumericResult<T> = Result<T, NumericError>;

/// Numerical kernel failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    #[error("matrix is singular (zero pivot at row {index})")]
    Singular { index: usize },

    #[error("matrix is ill-conditioned (reciprocal condition {rcond:e})")]
    IllConditioned { rcond: f64 },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid search interval [{lower}, {upper}]")]
    InvalidInterval { lower: f64, upper: f64 },

    #[error("non-finite value encountered: {0}")]
    NonFinite(String),
}
