//! Core math modules.

pub mod banded;
pub mod beta;
pub mod dense;
pub mod eigen;
pub mod error;
pub mod gamma;
pub mod minimize;
pub mod normal;
pub mod stable;
