//! Module-kind detection: walk upward from a file looking for the `package.json` that
//! governs it, and read its `type` field.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::fs::ProjectFs;

/// The fields of `package.json` the resolver and the module-kind detector care about.
/// Other metadata (scripts, dependency lists, …) is out of scope for this bundler.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageDescriptor {
    #[serde(default, rename = "type")]
    pub type_field: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
}

impl PackageDescriptor {
    /// The entry file to use when resolving a bare import of this package's directory:
    /// `module` takes precedence over `main`, falling back to `index.js`.
    pub fn entry_file(&self) -> &str {
        self.module
            .as_deref()
            .or(self.main.as_deref())
            .unwrap_or("index.js")
    }

    pub fn is_modern(&self) -> bool {
        self.type_field.as_deref() == Some("module")
    }
}

/// Legacy (CommonJS-shaped) vs. modern (ESM) module classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Legacy,
    Modern,
}

/// Read `dir/package.json`, if present, and parse it. Malformed descriptors are treated
/// the same as an absent one — the detector only cares about the `type` field, and a file
/// that fails to parse carries no enforceable module kind.
fn read_descriptor(dir: &Path, fs: &dyn ProjectFs) -> PackageDescriptor {
    let candidate = dir.join("package.json");
    fs.read_to_string(&candidate)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_default()
}

/// Find the nearest ancestor `package.json`, walking from `file`'s directory upward,
/// stopping at the first one found (or at the filesystem root) — a descriptor that exists
/// but fails to parse still stops the walk, it is just treated as carrying no `type` field.
pub fn find_descriptor(file: &Path, fs: &dyn ProjectFs) -> Option<(PathBuf, PackageDescriptor)> {
    let mut dir = file.parent()?;
    loop {
        if fs.exists(&dir.join("package.json")) {
            return Some((dir.to_path_buf(), read_descriptor(dir, fs)));
        }
        dir = dir.parent()?;
    }
}

/// Classify `file` as legacy or modern per §4.2: a file with no ancestor descriptor, or
/// whose nearest descriptor's `type` is anything other than `"module"`, is legacy.
pub fn module_kind(file: &Path, fs: &dyn ProjectFs) -> ModuleKind {
    match find_descriptor(file, fs) {
        Some((_, desc)) if desc.is_modern() => ModuleKind::Modern,
        _ => ModuleKind::Legacy,
    }
}
