//! Integration-level unit tests for the SettingsEngine public API.
//!
//! These tests exercise the SettingsEngine through its public trait interface,
//! validating default loading, value persistence, and reset behavior.

use learnhub::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use learnhub::types::errors::SettingsError;
use learnhub::types::settings::ClientSettings;
use serde_json::json;
use tempfile::TempDir;

/// Helper: create a SettingsEngine backed by a temp directory that lives for the
/// duration of the test (the caller holds the `TempDir` handle).
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

/// Without a config file the built-in defaults are used.
#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.api.base_url, "http://localhost:8080/api");
    assert_eq!(settings.display.untitled_placeholder, "Untitled");
}

/// `set_value` persists immediately; a fresh engine sees the change.
#[test]
fn test_set_value_persists_to_disk() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    engine
        .set_value("api.base_url", json!("https://learnhub.example/api"))
        .unwrap();
    engine.set_value("display.tag_preview_limit", json!(5)).unwrap();

    let mut reopened = engine_in_temp(&dir);
    let settings = reopened.load().unwrap();
    assert_eq!(settings.api.base_url, "https://learnhub.example/api");
    assert_eq!(settings.display.tag_preview_limit, 5);
}

#[test]
fn test_set_value_unknown_key() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let result = engine.set_value("api.retries", json!(3));
    assert!(matches!(result, Err(SettingsError::InvalidKey(_))));

    let result = engine.set_value("", json!(3));
    assert!(matches!(result, Err(SettingsError::InvalidKey(_))));
}

#[test]
fn test_set_value_wrong_type_leaves_settings_unchanged() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let result = engine.set_value("api.timeout_secs", json!("soon"));

    assert!(matches!(result, Err(SettingsError::InvalidValue(_))));
    assert_eq!(engine.get_settings().api.timeout_secs, 30);
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.set_value("logging.filter", json!("debug")).unwrap();

    engine.reset().unwrap();

    assert_eq!(*engine.get_settings(), ClientSettings::default());
    let mut reopened = engine_in_temp(&dir);
    assert_eq!(reopened.load().unwrap(), ClientSettings::default());
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
    let mut engine = engine_in_temp(&dir);

    assert!(matches!(
        engine.load(),
        Err(SettingsError::SerializationError(_))
    ));
}

/// A file written before `tag_preview_limit` existed still loads.
#[test]
fn test_missing_tag_preview_limit_uses_default() {
    let dir = TempDir::new().unwrap();
    let legacy = json!({
        "api": {"base_url": "http://x/api", "timeout_secs": 10},
        "logging": {"filter": "warn"},
        "display": {"untitled_placeholder": "(no title)"}
    });
    std::fs::write(dir.path().join("settings.json"), legacy.to_string()).unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();
    assert_eq!(settings.display.tag_preview_limit, 3);
    assert_eq!(settings.display.untitled_placeholder, "(no title)");
}

/// Save creates missing parent directories.
#[test]
fn test_save_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b").join("settings.json");
    let engine = SettingsEngine::new(Some(nested.to_string_lossy().to_string()));

    engine.save().unwrap();
    assert!(nested.exists());
}
