//! The `Module` record: `{kind, path, file}` from §3. Created once by the closure loop or
//! as a compiled entrypoint, never mutated after insertion.

use std::path::PathBuf;
use std::sync::Arc;

use crate::package_json::ModuleKind;

/// A resolved, on-disk module discovered by the closure loop.
#[derive(Debug, Clone)]
pub struct Module {
    pub kind: ModuleKind,
    pub path: PathBuf,
    /// The compiled (always-JS) source text, shared cheaply once read.
    pub source: Arc<str>,
}

impl Module {
    pub fn new(kind: ModuleKind, path: PathBuf, source: impl Into<Arc<str>>) -> Self {
        Self {
            kind,
            path,
            source: source.into(),
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.kind == ModuleKind::Legacy
    }
}
