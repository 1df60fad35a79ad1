//! uq-quad core: quadrature rules against probability weight functions.
//!
//! - Gauss-Radau rules with a caller-chosen fixed abscissa
//! - Nested Leja rules built by greedy node insertion
//! - Distribution, recurrence and tensor-product layers shared by both generators

pub mod combine;
pub mod distribution;
pub mod exit_codes;
pub mod gauss_radau;
pub mod leja;
pub mod logging;
pub mod quadrature;
pub mod recurrence;
pub mod subrules;

pub use combine::{combine, combine_rules};
pub use distribution::{Dependence, Distribution, Joint, JointComponent, Marginal};
pub use gauss_radau::{generate_gauss_radau, radau_jacobi, FixedPoint};
pub use leja::{build_leja_nodes, generate_leja, solve_leja_weights, LejaOptions, Order};
pub use quadrature::QuadratureRule;
pub use recurrence::{
    coefficients_to_quadrature, construct_recurrence_coefficients, RecurrenceCoefficients,
    RecurrenceOptions,
};
pub use uq_common::{Error, Result};
