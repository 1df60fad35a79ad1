//! Numerical primitives for uq-quad.
//!
//! Special functions for the supported weight families plus the small
//! linear-algebra and optimization kernels the quadrature generators need.

pub mod math;

pub use math::banded::solve_tridiagonal;
pub use math::beta::*;
pub use math::dense::{invert, reciprocal_condition};
pub use math::eigen::{tridiagonal_eigen, TridiagonalEigen};
pub use math::error::{NumericError, NumericResult};
pub use math::gamma::*;
pub use math::minimize::{fminbound, BoundedMinimum, DEFAULT_MAX_EVALUATIONS, DEFAULT_XTOL};
pub use math::normal::*;
pub use math::stable::*;
