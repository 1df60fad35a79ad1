//! Error types for uq-quad.
//!
//! Every failure of the quadrature generators surfaces as one of these
//! variants. Errors carry:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints (whether different inputs can succeed)
//!
//! There is no retry or partial-result mode: a generator either returns a
//! complete rule or one of these errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for uq-quad operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed caller input (orders, per-dimension lists).
    Input,
    /// Distribution definition or structure.
    Distribution,
    /// Numerical breakdown in a generator.
    Numerical,
    /// Recurrence coefficient construction.
    Recurrence,
    /// Settings file errors.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Distribution => write!(f, "distribution"),
            ErrorCategory::Numerical => write!(f, "numerical"),
            ErrorCategory::Recurrence => write!(f, "recurrence"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for uq-quad.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("dimension mismatch: expected {expected} entries, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // Distribution errors (20-29)
    #[error("dependent distribution not supported: {0}")]
    Dependency(String),

    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("raw moment unavailable: {0}")]
    UnsupportedMoment(String),

    // Numerical errors (30-39)
    #[error("illegal Radau fixed point: {value}")]
    IllegalFixedPoint { value: f64 },

    #[error("singular Leja basis matrix: {0}")]
    SingularBasis(String),

    #[error("numerical failure: {0}")]
    Numerical(String),

    // Recurrence errors (40-49)
    #[error("invalid recurrence coefficients: {0}")]
    InvalidRecurrence(String),

    #[error("cannot construct recurrence: {0}")]
    UnsupportedRecurrence(String),

    // Configuration errors (50-59)
    #[error("configuration error: {0}")]
    Config(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Input errors
    /// - 20-29: Distribution errors
    /// - 30-39: Numerical errors
    /// - 40-49: Recurrence errors
    /// - 50-59: Configuration errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::DimensionMismatch { .. } => 10,
            Error::InvalidArgument(_) => 11,
            Error::Dependency(_) => 20,
            Error::InvalidDistribution(_) => 21,
            Error::UnsupportedMoment(_) => 22,
            Error::IllegalFixedPoint { .. } => 30,
            Error::SingularBasis(_) => 31,
            Error::Numerical(_) => 32,
            Error::InvalidRecurrence(_) => 40,
            Error::UnsupportedRecurrence(_) => 41,
            Error::Config(_) => 50,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::DimensionMismatch { .. } | Error::InvalidArgument(_) => ErrorCategory::Input,

            Error::Dependency(_) | Error::InvalidDistribution(_) | Error::UnsupportedMoment(_) => {
                ErrorCategory::Distribution
            }

            Error::IllegalFixedPoint { .. } | Error::SingularBasis(_) | Error::Numerical(_) => {
                ErrorCategory::Numerical
            }

            Error::InvalidRecurrence(_) | Error::UnsupportedRecurrence(_) => {
                ErrorCategory::Recurrence
            }

            Error::Config(_) => ErrorCategory::Config,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether the caller can succeed by changing its inputs.
    ///
    /// Nothing is retried internally; a recoverable error means a different
    /// fixed point, order, node set or setting may work.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::DimensionMismatch { .. } => true,
            Error::InvalidArgument(_) => true,

            // Structural: the method is undefined for this distribution
            Error::Dependency(_) => false,
            Error::InvalidDistribution(_) => true,
            Error::UnsupportedMoment(_) => false,

            // Choose another fixed point / lower order
            Error::IllegalFixedPoint { .. } => true,
            Error::SingularBasis(_) => true,
            Error::Numerical(_) => false,

            Error::InvalidRecurrence(_) => false,
            Error::UnsupportedRecurrence(_) => true,

            Error::Config(_) => true,

            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_fall_in_category_ranges() {
        let cases: Vec<(Error, ErrorCategory)> = vec![
            (
                Error::DimensionMismatch {
                    expected: 2,
                    actual: 3,
                },
                ErrorCategory::Input,
            ),
            (Error::Dependency("x".into()), ErrorCategory::Distribution),
            (
                Error::IllegalFixedPoint { value: 0.0 },
                ErrorCategory::Numerical,
            ),
            (Error::SingularBasis("x".into()), ErrorCategory::Numerical),
            (
                Error::UnsupportedRecurrence("x".into()),
                ErrorCategory::Recurrence,
            ),
            (Error::Config("x".into()), ErrorCategory::Config),
        ];
        for (err, category) in cases {
            assert_eq!(err.category(), category, "{}", err);
            let base = match category {
                ErrorCategory::Input => 10,
                ErrorCategory::Distribution => 20,
                ErrorCategory::Numerical => 30,
                ErrorCategory::Recurrence => 40,
                ErrorCategory::Config => 50,
                ErrorCategory::Io => 60,
            };
            assert!((base..base + 10).contains(&err.code()), "{}", err);
        }
    }

    #[test]
    fn illegal_fixed_point_message_carries_value() {
        let err = Error::IllegalFixedPoint { value: 0.0 };
        assert_eq!(err.to_string(), "illegal Radau fixed point: 0");
        assert!(err.is_recoverable());
    }

    #[test]
    fn dependency_is_not_recoverable() {
        assert!(!Error::Dependency("joint".into()).is_recoverable());
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert_eq!(err.code(), 60);
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn category_display() {
        assert_eq!(ErrorCategory::Numerical.to_string(), "numerical");
        assert_eq!(ErrorCategory::Distribution.to_string(), "distribution");
    }
}
