use std::fs;

use fob_config::{ConfigDiscovery, ConfigError, RawConfig};

#[test]
fn resolves_entry_relative_path_from_toml() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("fob.toml"), "entry = \"src/index.ts\"\n").unwrap();

    let discovery = ConfigDiscovery::new(dir.path(), dir.path());
    let config = discovery.load(RawConfig::default()).unwrap();
    assert_eq!(config.entry, std::path::PathBuf::from("src/index.ts"));
}

#[test]
fn cli_entry_wins_over_toml_entry() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("fob.toml"), "entry = \"src/index.ts\"\n").unwrap();

    let discovery = ConfigDiscovery::new(dir.path(), dir.path());
    let overrides = RawConfig {
        entry: Some(std::path::PathBuf::from("src/main.ts")),
        ..Default::default()
    };
    let config = discovery.load(overrides).unwrap();
    assert_eq!(config.entry, std::path::PathBuf::from("src/main.ts"));
}

#[test]
fn package_json_without_fob_field_falls_back_to_defaults_only() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("package.json"), r#"{"name":"demo"}"#).unwrap();

    let discovery = ConfigDiscovery::new(dir.path(), dir.path());
    let overrides = RawConfig {
        entry: Some(std::path::PathBuf::from("src/index.ts")),
        ..Default::default()
    };
    let config = discovery.load(overrides).unwrap();
    assert_eq!(config.watch_debounce_ms, 250);
}

#[test]
fn malformed_toml_is_an_invalid_value_error() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("fob.toml"), "entry = [unterminated\n").unwrap();

    let discovery = ConfigDiscovery::new(dir.path(), dir.path());
    let err = discovery.load(RawConfig::default()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}
