//! Typed settings for quad.json.
//!
//! Every section and field is optional in the file; missing values fall
//! back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uq_common::{RecurrenceAlgorithm, SubRule};

use crate::validate::{validate_settings, ValidationError, ValidationResult};

/// Root of quad.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadSettings {
    pub schema_version: String,
    pub recurrence: RecurrenceSettings,
    pub leja: LejaSettings,
    pub radau: RadauSettings,
}

impl Default for QuadSettings {
    fn default() -> Self {
        QuadSettings {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            recurrence: RecurrenceSettings::default(),
            leja: LejaSettings::default(),
            radau: RadauSettings::default(),
        }
    }
}

/// Recurrence coefficient construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurrenceSettings {
    /// Auxiliary rule used when coefficients are discretized.
    pub rule: SubRule,
    /// Number of auxiliary samples for discretized construction.
    pub accuracy: usize,
    pub algorithm: RecurrenceAlgorithm,
}

impl Default for RecurrenceSettings {
    fn default() -> Self {
        RecurrenceSettings {
            rule: SubRule::Fejer,
            accuracy: 100,
            algorithm: RecurrenceAlgorithm::Analytical,
        }
    }
}

/// Leja node search and weight solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LejaSettings {
    /// Absolute tolerance of the bounded minimizer.
    pub xtol: f64,
    /// Objective evaluation cap per sub-interval search.
    pub max_evaluations: usize,
    /// Auxiliary samples per node for the discretized basis fallback.
    pub auxiliary_factor: usize,
    pub auxiliary_rule: SubRule,
}

impl Default for LejaSettings {
    fn default() -> Self {
        LejaSettings {
            xtol: 1e-5,
            max_evaluations: 500,
            auxiliary_factor: 100,
            auxiliary_rule: SubRule::ClenshawCurtis,
        }
    }
}

/// Gauss-Radau post-processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadauSettings {
    /// Relative distance within which the computed eigenvalue nearest the
    /// fixed point is replaced by the fixed point itself.
    pub snap_tolerance: f64,
}

impl Default for RadauSettings {
    fn default() -> Self {
        RadauSettings {
            snap_tolerance: 1e-8,
        }
    }
}

impl QuadSettings {
    /// Parse and validate settings from a JSON file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ValidationError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Parse and validate settings from a JSON string.
    pub fn from_json(content: &str) -> ValidationResult<Self> {
        let settings: QuadSettings = serde_json::from_str(content)
            .map_err(|e| ValidationError::ParseError(e.to_string()))?;
        validate_settings(&settings)?;
        Ok(settings)
    }
}
