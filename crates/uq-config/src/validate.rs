//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::settings::QuadSettings;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

impl From<ValidationError> for uq_common::Error {
    fn from(err: ValidationError) -> Self {
        uq_common::Error::Config(err.to_string())
    }
}

/// Validate settings semantically.
pub fn validate_settings(settings: &QuadSettings) -> ValidationResult<()> {
    let major = |v: &str| v.split('.').next().map(str::to_owned);
    if major(&settings.schema_version) != major(crate::CONFIG_SCHEMA_VERSION) {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    validate_count("recurrence.accuracy", settings.recurrence.accuracy)?;

    validate_positive("leja.xtol", settings.leja.xtol)?;
    validate_count("leja.max_evaluations", settings.leja.max_evaluations)?;
    validate_count("leja.auxiliary_factor", settings.leja.auxiliary_factor)?;

    let snap = settings.radau.snap_tolerance;
    if !snap.is_finite() || snap < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "radau.snap_tolerance".to_string(),
            message: format!("Must be finite and >= 0, got {}", snap),
        });
    }

    Ok(())
}

fn validate_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be finite and > 0, got {}", value),
        });
    }
    Ok(())
}

fn validate_count(field: &str, value: usize) -> ValidationResult<()> {
    if value == 0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "Must be at least 1".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        validate_settings(&QuadSettings::default()).unwrap();
    }

    #[test]
    fn zero_xtol_rejected() {
        let mut settings = QuadSettings::default();
        settings.leja.xtol = 0.0;
        let err = validate_settings(&settings).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "leja.xtol"));
        assert_eq!(err.code(), 65);
    }

    #[test]
    fn zero_accuracy_rejected() {
        let mut settings = QuadSettings::default();
        settings.recurrence.accuracy = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn negative_snap_tolerance_rejected() {
        let mut settings = QuadSettings::default();
        settings.radau.snap_tolerance = -1.0;
        assert!(validate_settings(&settings).is_err());
        settings.radau.snap_tolerance = 0.0;
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn minor_version_bump_accepted() {
        let mut settings = QuadSettings::default();
        settings.schema_version = "1.4.0".to_string();
        assert!(validate_settings(&settings).is_ok());
        settings.schema_version = "2.0.0".to_string();
        let err = validate_settings(&settings).unwrap_err();
        assert_eq!(err.code(), 66);
    }

    #[test]
    fn converts_to_config_error() {
        let err: uq_common::Error = ValidationError::ParseError("bad".into()).into();
        assert_eq!(err.category(), uq_common::ErrorCategory::Config);
    }
}
