//! uq-quad common types and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - The error taxonomy of the quadrature generators
//! - Recurrence and auxiliary-rule selectors
//! - Output format specifications

pub mod error;
pub mod output;
pub mod selectors;

pub use error::{Error, ErrorCategory, Result};
pub use output::OutputFormat;
pub use selectors::{RecurrenceAlgorithm, SubRule};
