//! No-mock configuration validation + resolution tests.
//!
//! Covers:
//! - quad.json parsing and validation from real files
//! - Resolution order (CLI > env > config dir > XDG)

use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tempfile::TempDir;
use uq_common::{RecurrenceAlgorithm, SubRule};
use uq_config::resolve::{load_settings, resolve_config, ConfigSource};
use uq_config::{QuadSettings, ValidationError};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const ENV_KEYS: &[&str] = &["UQ_QUAD_CONFIG", "UQ_QUAD_CONFIG_DIR", "XDG_CONFIG_HOME"];

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let mut saved = Vec::with_capacity(keys.len());
        for key in keys {
            saved.push(env::var(key).ok());
            env::remove_var(key);
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (idx, key) in self.keys.iter().enumerate() {
            match self.saved.get(idx).and_then(|v| v.as_ref()) {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .expect("env lock poisoned");
    f()
}

fn write_settings(dir: &Path, accuracy: usize) {
    fs::create_dir_all(dir).expect("create config dir");
    let body = format!(
        r#"{{"schema_version": "1.0.0", "recurrence": {{"accuracy": {accuracy}, "rule": "clenshaw-curtis"}}}}"#
    );
    fs::write(dir.join("quad.json"), body).expect("write quad.json");
}

#[test]
fn test_valid_file_parses() {
    let temp = TempDir::new().expect("temp dir");
    write_settings(temp.path(), 250);
    let settings = QuadSettings::from_file(&temp.path().join("quad.json")).expect("valid settings");
    assert_eq!(settings.recurrence.accuracy, 250);
    assert_eq!(settings.recurrence.rule, SubRule::ClenshawCurtis);
    assert_eq!(settings.recurrence.algorithm, RecurrenceAlgorithm::Analytical);
}

#[test]
fn test_invalid_value_rejected() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("quad.json");
    fs::write(&path, r#"{"leja": {"max_evaluations": 0}}"#).expect("write");
    let err = QuadSettings::from_file(&path).expect_err("zero evaluations should fail");
    assert!(matches!(err, ValidationError::InvalidValue { .. }));
}

#[test]
fn test_unknown_rule_is_parse_error() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("quad.json");
    fs::write(&path, r#"{"recurrence": {"rule": "simpson"}}"#).expect("write");
    let err = QuadSettings::from_file(&path).expect_err("unknown rule should fail");
    assert!(matches!(err, ValidationError::ParseError(_)));
}

#[test]
fn test_resolve_config_cli_over_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);

        let temp = TempDir::new().expect("temp dir");
        let cli_dir = temp.path().join("cli");
        let env_dir = temp.path().join("env");
        write_settings(&cli_dir, 10);
        write_settings(&env_dir, 20);

        env::set_var(
            "UQ_QUAD_CONFIG",
            env_dir.join("quad.json").display().to_string(),
        );
        env::set_var("UQ_QUAD_CONFIG_DIR", env_dir.display().to_string());

        let cli_path = cli_dir.join("quad.json");
        let resolved = resolve_config(Some(&cli_path));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(resolved.path.unwrap(), cli_path);

        let (settings, _) = load_settings(Some(&cli_path)).expect("load");
        assert_eq!(settings.recurrence.accuracy, 10);
    });
}

#[test]
fn test_resolve_config_env_over_config_dir() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);

        let temp = TempDir::new().expect("temp dir");
        let env_dir = temp.path().join("env");
        let config_dir = temp.path().join("config_dir");
        write_settings(&env_dir, 20);
        write_settings(&config_dir, 30);

        env::set_var(
            "UQ_QUAD_CONFIG",
            env_dir.join("quad.json").display().to_string(),
        );
        env::set_var("UQ_QUAD_CONFIG_DIR", config_dir.display().to_string());

        let resolved = resolve_config(None);
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.path.unwrap(), env_dir.join("quad.json"));
    });
}

#[test]
fn test_resolve_config_dir_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);

        let temp = TempDir::new().expect("temp dir");
        let config_dir = temp.path().join("config_dir");
        write_settings(&config_dir, 30);
        env::set_var("UQ_QUAD_CONFIG_DIR", config_dir.display().to_string());

        let (settings, resolved) = load_settings(None).expect("load");
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(settings.recurrence.accuracy, 30);
    });
}

#[test]
fn test_resolve_config_xdg_fallback() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);

        let temp = TempDir::new().expect("temp dir");
        let xdg_dir = temp.path().join("xdg");
        let app_dir = xdg_dir.join("uq-quad");
        write_settings(&app_dir, 40);

        env::set_var("XDG_CONFIG_HOME", xdg_dir.display().to_string());

        let resolved = resolve_config(None);
        assert_eq!(resolved.source, ConfigSource::XdgConfig);
        assert_eq!(resolved.path.unwrap(), app_dir.join("quad.json"));
    });
}
