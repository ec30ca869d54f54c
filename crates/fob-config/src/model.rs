//! The resolved `BundleConfig` and the raw, partially-specified schema used at each layer of
//! the merge (§4.12).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceMapMode {
    Included,
    Omitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompressionMode {
    None,
    TerserLike,
}

/// Every field the bundling needs, fully resolved: built-in defaults overlaid by a discovered
/// project file, overlaid in turn by explicit CLI flags (§4.12).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    pub project_root: PathBuf,
    pub entry: PathBuf,
    pub shim_dir: PathBuf,
    pub project_modules_dir: PathBuf,
    pub compiler_modules_dir: PathBuf,
    pub source_maps: SourceMapMode,
    pub compression: CompressionMode,
    pub watch_debounce_ms: u64,
}

/// The schema accepted in `fob.toml` / `package.json#fob` and on the CLI overlay: every field
/// optional so a layer only ever supplies what it wants to override. Unrecognized keys are a
/// hard error rather than silently ignored (§4.12).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct RawConfig {
    pub entry: Option<PathBuf>,
    pub shim_dir: Option<PathBuf>,
    pub project_modules_dir: Option<PathBuf>,
    pub compiler_modules_dir: Option<PathBuf>,
    pub source_maps: Option<SourceMapMode>,
    pub compression: Option<CompressionMode>,
    pub watch_debounce_ms: Option<u64>,
}

impl RawConfig {
    /// Overlay `other`'s present fields onto `self`, `other` winning (§4.12 priority order).
    pub fn overlay(mut self, other: RawConfig) -> RawConfig {
        if other.entry.is_some() {
            self.entry = other.entry;
        }
        if other.shim_dir.is_some() {
            self.shim_dir = other.shim_dir;
        }
        if other.project_modules_dir.is_some() {
            self.project_modules_dir = other.project_modules_dir;
        }
        if other.compiler_modules_dir.is_some() {
            self.compiler_modules_dir = other.compiler_modules_dir;
        }
        if other.source_maps.is_some() {
            self.source_maps = other.source_maps;
        }
        if other.compression.is_some() {
            self.compression = other.compression;
        }
        if other.watch_debounce_ms.is_some() {
            self.watch_debounce_ms = other.watch_debounce_ms;
        }
        self
    }
}

/// Built-in defaults (§4.12 item 1), before any project file or CLI flag is applied.
///
/// `shim_dir` is left unset here: its default is existence-based (§4.3, "the compiler's
/// installed modules directory if it exists, else the project's") and is resolved against the
/// real filesystem by `resolve_shim_dir` after the rest of the layers have settled.
pub fn builtin_defaults(project_root: &Path, compiler_root: &Path) -> RawConfig {
    RawConfig {
        entry: None,
        shim_dir: None,
        project_modules_dir: Some(project_root.join("node_modules")),
        compiler_modules_dir: Some(compiler_root.join("node_modules")),
        source_maps: Some(SourceMapMode::Included),
        compression: Some(CompressionMode::None),
        watch_debounce_ms: Some(250),
    }
}

/// The compiler's installed modules directory if it exists on disk, else the project's (§4.3).
pub fn resolve_shim_dir(compiler_modules_dir: &Path, project_modules_dir: &Path) -> PathBuf {
    if compiler_modules_dir.exists() {
        compiler_modules_dir.to_path_buf()
    } else {
        project_modules_dir.to_path_buf()
    }
}
