//! uq-quad configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for quad.json
//! - Config resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{load_settings, resolve_config, ConfigPath, ConfigSource};
pub use settings::{LejaSettings, QuadSettings, RadauSettings, RecurrenceSettings};
pub use validate::{validate_settings, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
