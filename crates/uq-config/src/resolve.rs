//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path → system path → defaults.

use std::path::{Path, PathBuf};

use crate::settings::QuadSettings;
use crate::validate::ValidationResult;

/// Discovered settings file.
#[derive(Debug, Clone, Default)]
pub struct ConfigPath {
    /// Path to quad.json (or None if not found).
    pub path: Option<PathBuf>,

    /// Where the path came from (for diagnostics).
    pub source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/uq-quad/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "UQ_QUAD_CONFIG";
pub const ENV_CONFIG_DIR: &str = "UQ_QUAD_CONFIG_DIR";

/// Standard config file name.
pub const CONFIG_FILENAME: &str = "quad.json";

/// Application name for XDG directories.
const APP_NAME: &str = "uq-quad";

/// Resolve the settings file path.
///
/// 1. Explicit CLI path (if it exists)
/// 2. UQ_QUAD_CONFIG
/// 3. UQ_QUAD_CONFIG_DIR + quad.json
/// 4. XDG config directory (~/.config/uq-quad/)
/// 5. System config (/etc/uq-quad/)
/// 6. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPath {
    if let Some(path) = cli_path {
        if path.exists() {
            return found(path.to_path_buf(), ConfigSource::CliArgument);
        }
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::XdgConfig);
        }
    }

    let system_path = system_config_dir().join(CONFIG_FILENAME);
    if system_path.exists() {
        return found(system_path, ConfigSource::SystemConfig);
    }

    ConfigPath::default()
}

fn found(path: PathBuf, source: ConfigSource) -> ConfigPath {
    ConfigPath {
        path: Some(path),
        source,
    }
}

/// Resolve, read, and validate settings in one step.
///
/// A CLI path that does not exist is an error rather than a silent fallback.
pub fn load_settings(cli_path: Option<&Path>) -> ValidationResult<(QuadSettings, ConfigPath)> {
    if let Some(path) = cli_path {
        if !path.exists() {
            return Err(crate::ValidationError::IoError(format!(
                "{}: no such file",
                path.display()
            )));
        }
    }
    let resolved = resolve_config(cli_path);
    let settings = match &resolved.path {
        Some(path) => QuadSettings::from_file(path)?,
        None => QuadSettings::default(),
    };
    Ok((settings, resolved))
}

/// Get the XDG config directory for uq-quad.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
