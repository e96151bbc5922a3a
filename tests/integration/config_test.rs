//! Config Storage Integration Tests

use std::fs;

use tempfile::TempDir;

use project_launcher::storage::ConfigService;
use project_launcher::{AppConfig, SettingsUpdate, StrategyMode};

#[test]
fn test_open_creates_default_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let service = ConfigService::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(service.get_config(), &AppConfig::default());

    let on_disk: AppConfig = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, AppConfig::default());
}

#[test]
fn test_update_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut service = ConfigService::open(&path).unwrap();
    service
        .update_config(SettingsUpdate {
            model: Some("gemini-2.5-pro".to_string()),
            strategy_mode: Some(StrategyMode::ManifestoAndTasks),
            ..SettingsUpdate::default()
        })
        .unwrap();

    let reopened = ConfigService::open(&path).unwrap();
    assert_eq!(reopened.get_config().model, "gemini-2.5-pro");
    assert_eq!(reopened.get_config().strategy_mode, StrategyMode::ManifestoAndTasks);
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"min_analysis_delay_ms": 250}"#).unwrap();

    let service = ConfigService::open(&path).unwrap();
    assert_eq!(service.get_config().min_analysis_delay_ms, 250);
    assert_eq!(service.get_config().model, AppConfig::default().model);
}

#[test]
fn test_invalid_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"max_tokens": 0}"#).unwrap();

    let err = ConfigService::open(&path).unwrap_err();
    assert!(err.to_string().contains("max_tokens"));
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut service = ConfigService::open(&path).unwrap();
    service
        .update_config(SettingsUpdate {
            min_analysis_delay_ms: Some(10),
            ..SettingsUpdate::default()
        })
        .unwrap();
    service.reset().unwrap();

    assert_eq!(service.get_config(), &AppConfig::default());
    let reopened = ConfigService::open(&path).unwrap();
    assert_eq!(reopened.get_config().min_analysis_delay_ms, 2000);
}
