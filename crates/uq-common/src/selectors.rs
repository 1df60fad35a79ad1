//! Selectors for recurrence construction.
//!
//! `SubRule` picks the auxiliary rule used to discretize a weight function;
//! `RecurrenceAlgorithm` picks how coefficients are derived from it.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Auxiliary quadrature rule used to discretize a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubRule {
    /// Fejér's second rule: Chebyshev extrema, endpoints excluded.
    #[default]
    Fejer,
    /// Clenshaw-Curtis: Chebyshev extrema, endpoints included.
    ClenshawCurtis,
    /// Gauss-Legendre on the support.
    Legendre,
}

impl std::fmt::Display for SubRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubRule::Fejer => write!(f, "fejer"),
            SubRule::ClenshawCurtis => write!(f, "clenshaw-curtis"),
            SubRule::Legendre => write!(f, "legendre"),
        }
    }
}

impl std::str::FromStr for SubRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fejer" | "f" => Ok(SubRule::Fejer),
            "clenshaw-curtis" | "clenshaw_curtis" | "c" => Ok(SubRule::ClenshawCurtis),
            "legendre" | "gauss-legendre" | "g" => Ok(SubRule::Legendre),
            _ => Err(format!("unknown sub-rule: {}", s)),
        }
    }
}

/// How three-term recurrence coefficients are constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurrenceAlgorithm {
    /// Closed form when the distribution family has one, otherwise
    /// discretized Stieltjes.
    #[default]
    Analytical,
    /// Discretized Stieltjes procedure.
    Stieltjes,
    /// Discretized Lanczos procedure.
    Lanczos,
}

impl std::fmt::Display for RecurrenceAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceAlgorithm::Analytical => write!(f, "analytical"),
            RecurrenceAlgorithm::Stieltjes => write!(f, "stieltjes"),
            RecurrenceAlgorithm::Lanczos => write!(f, "lanczos"),
        }
    }
}

impl std::str::FromStr for RecurrenceAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "analytical" | "" => Ok(RecurrenceAlgorithm::Analytical),
            "stieltjes" | "discretized-stieltjes" => Ok(RecurrenceAlgorithm::Stieltjes),
            "lanczos" => Ok(RecurrenceAlgorithm::Lanczos),
            _ => Err(format!("unknown recurrence algorithm: {}", s)),
        }
    }
}
