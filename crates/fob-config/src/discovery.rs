//! File-based config discovery for CLI use (§4.12).
//!
//! Searches for a project configuration file in conventional locations, parses it strictly
//! (unknown keys are a hard error, never silently ignored) and merges it with built-in
//! defaults and caller-supplied CLI overrides into a resolved `BundleConfig`.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::model::{self, BundleConfig, RawConfig};

/// File-based configuration discovery rooted at a project directory.
pub struct ConfigDiscovery {
    root: PathBuf,
    compiler_root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>, compiler_root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            compiler_root: compiler_root.as_ref().to_path_buf(),
        }
    }

    /// Find a project configuration file, preferring `fob.toml` over `package.json#fob`.
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join("fob.toml");
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed.get("fob").is_some_and(|v| !v.is_null()) {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Resolve a `BundleConfig`, overlaying (in increasing priority) built-in defaults, the
    /// discovered project file, and `cli_overrides`.
    pub fn load(&self, cli_overrides: RawConfig) -> Result<BundleConfig> {
        let defaults = model::builtin_defaults(&self.root, &self.compiler_root);

        let file_layer = match self.find() {
            Some(path) => self.load_file(&path)?,
            None => RawConfig::default(),
        };

        let merged = defaults.overlay(file_layer).overlay(cli_overrides);

        let entry = merged.entry.ok_or_else(|| {
            ConfigError::invalid_value(
                "entry",
                "specify an entry point with --entry or a `fob.toml` / package.json `fob` field",
            )
        })?;
        let project_modules_dir = merged
            .project_modules_dir
            .expect("built-in default always sets project_modules_dir");
        let compiler_modules_dir = merged
            .compiler_modules_dir
            .expect("built-in default always sets compiler_modules_dir");
        let shim_dir = merged
            .shim_dir
            .unwrap_or_else(|| model::resolve_shim_dir(&compiler_modules_dir, &project_modules_dir));

        Ok(BundleConfig {
            project_root: self.root.clone(),
            entry,
            shim_dir,
            project_modules_dir,
            compiler_modules_dir,
            source_maps: merged
                .source_maps
                .expect("built-in default always sets source_maps"),
            compression: merged
                .compression
                .expect("built-in default always sets compression"),
            watch_debounce_ms: merged
                .watch_debounce_ms
                .expect("built-in default always sets watch_debounce_ms"),
        })
    }

    fn load_file(&self, path: &Path) -> Result<RawConfig> {
        if path.file_name() == Some(OsStr::new("package.json")) {
            return self.load_package_json(path);
        }

        Figment::new()
            .merge(Toml::file(path))
            .extract()
            .map_err(convert_figment_error)
    }

    fn load_package_json(&self, path: &Path) -> Result<RawConfig> {
        let content = fs::read_to_string(path)?;
        let parsed: Value = serde_json::from_str(&content)
            .map_err(|e| ConfigError::invalid_value("package.json", e.to_string()))?;

        let fob_value = parsed
            .get("fob")
            .ok_or_else(|| ConfigError::invalid_value("fob", "add a 'fob' field to package.json"))?;
        if fob_value.is_null() {
            return Err(ConfigError::invalid_value(
                "fob",
                "the 'fob' field cannot be null",
            ));
        }

        Figment::new()
            .merge(Serialized::defaults(fob_value))
            .extract()
            .map_err(convert_figment_error)
    }
}

fn convert_figment_error(e: figment::Error) -> ConfigError {
    let message = e.to_string();
    if let Some(key) = extract_backtick(&message, "unknown field") {
        return ConfigError::UnknownKey { key };
    }
    ConfigError::invalid_value("configuration", message)
}

fn extract_backtick(message: &str, marker: &str) -> Option<String> {
    let idx = message.find(marker)?;
    let rest = &message[idx + marker.len()..];
    let start = rest.find('`')? + 1;
    let end = rest[start..].find('`')? + start;
    Some(rest[start..end].to_string())
}
