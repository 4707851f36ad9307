use attendance_tracker::config::{Backend, Config, load_from_path, save_to_path};
use attendance_tracker::store::StorageScope;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_valid() {
    let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
    let config_content = r#"
        [storage]
        backend = "remote"
        scope = "month"

        [remote]
        url = "https://script.example.com/exec"

        [google]
        client_id = "abc.apps.googleusercontent.com"
        timezone = "Asia/Tokyo"

        [pay]
        hourly_rate = 3000.0
    "#;
    temp_file.write_all(config_content.as_bytes()).unwrap();

    let config = load_from_path(temp_file.path()).expect("Failed to load valid config");

    assert_eq!(config.storage.backend, Backend::Remote);
    assert_eq!(config.storage.scope, StorageScope::Month);
    assert_eq!(config.remote_url().unwrap(), "https://script.example.com/exec");
    assert_eq!(config.google.calendar_id, "primary");
    assert_eq!(config.google.timezone, "Asia/Tokyo");
    assert_eq!(config.pay.hourly_rate, 3000.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_config_defaults() {
    let temp_file = NamedTempFile::with_suffix(".toml").unwrap();

    let config = load_from_path(temp_file.path()).expect("Empty config should use defaults");

    assert_eq!(config.storage.backend, Backend::Local);
    assert_eq!(config.storage.scope, StorageScope::All);
    assert_eq!(config.pay.hourly_rate, 2500.0);
    assert_eq!(config.google.redirect_port, 8085);
    assert!(config.validate().is_ok());
}

#[test]
fn test_remote_backend_without_url_fails_validation() {
    let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
    temp_file
        .write_all(b"[storage]\nbackend = \"remote\"\n")
        .unwrap();

    let config = load_from_path(temp_file.path()).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_save_and_reload() {
    let temp_file = NamedTempFile::with_suffix(".toml").unwrap();
    let mut config = Config::default();
    config.set_value("pay.hourly_rate", "1800").unwrap();
    config.set_value("storage.scope", "month").unwrap();

    save_to_path(&config, temp_file.path()).unwrap();
    let reloaded = load_from_path(temp_file.path()).unwrap();

    assert_eq!(reloaded.pay.hourly_rate, 1800.0);
    assert_eq!(reloaded.storage.scope, StorageScope::Month);
}
