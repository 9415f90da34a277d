//! Unit tests for the Tagmark settings engine.

use std::fs;
use std::path::PathBuf;

use tagmark::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tagmark::types::errors::SettingsError;
use tagmark::types::settings::ServerSettings;
use tempfile::TempDir;

fn engine_for(dir: &TempDir, contents: Option<&str>) -> SettingsEngine {
    let path = dir.path().join("config.json");
    if let Some(c) = contents {
        fs::write(&path, c).unwrap();
    }
    SettingsEngine::new(Some(path.to_string_lossy().to_string()))
}

#[test]
fn test_defaults() {
    let s = ServerSettings::default();
    assert_eq!(s.bind_address, "0.0.0.0");
    assert_eq!(s.port, 3000);
    assert_eq!(s.title_timeout_secs, 5);
    assert!(s.username.is_empty() && s.password.is_empty());
}

#[test]
fn test_partial_file_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    let mut engine = engine_for(&tmp, Some(r#"{"port": 8080, "username": "me", "password": "pw"}"#));
    let s = engine.load().unwrap();
    assert_eq!(s.port, 8080);
    assert_eq!(s.username, "me");
    assert_eq!(s.bind_address, "0.0.0.0");
    assert_eq!(engine.get_settings(), &s);
}

#[test]
fn test_empty_file_gives_defaults() {
    let tmp = TempDir::new().unwrap();
    let mut engine = engine_for(&tmp, Some("   \n"));
    assert_eq!(engine.load().unwrap(), ServerSettings::default());
}

#[test]
fn test_malformed_file_is_error() {
    let tmp = TempDir::new().unwrap();
    let mut engine = engine_for(&tmp, Some("{\"port\": \"eighty\"}"));
    match engine.load() {
        Err(SettingsError::SerializationError(_)) => {}
        other => panic!("expected SerializationError, got {:?}", other),
    }
}

#[test]
fn test_db_path_from_settings() {
    let tmp = TempDir::new().unwrap();
    let mut engine = engine_for(&tmp, Some(r#"{"db_file": "/srv/tagmark/db.json"}"#));
    engine.load().unwrap();
    assert_eq!(engine.db_path(), PathBuf::from("/srv/tagmark/db.json"));
}

#[test]
fn test_db_path_default_is_db_json() {
    let tmp = TempDir::new().unwrap();
    let mut engine = engine_for(&tmp, None);
    engine.load().unwrap();
    assert_eq!(engine.db_path().file_name().unwrap(), "db.json");
}

#[test]
fn test_config_path_override() {
    let engine = SettingsEngine::new(Some("/etc/tagmark.json".to_string()));
    assert_eq!(engine.get_config_path(), "/etc/tagmark.json");
}
