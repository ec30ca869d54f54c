//! The Asset Table (§3): coordinated, insertion-ordered mappings accumulated over the course
//! of one bundling. No `externalSources` cache is kept here: the Watch Coordinator throws
//! this whole structure away and rebuilds it from scratch on every rebundle rather than
//! invalidating individual entries, so there is never a stale read to serve from a cache
//! (see `watch.rs`).

use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;

/// `(asset-name -> bytes)` plus the provenance, alias and worklist bookkeeping the closure
/// loop needs. Every asset name is portable, begins with `/`, and is unique (enforced by
/// the map itself — `insert` always overwrites, matching the override-order requirement
/// for the second, legacy-to-modern, compile pass).
#[derive(Debug, Default)]
pub struct AssetTable {
    /// `assetName -> bytes`, insertion-ordered; emission order is computed separately
    /// (§4.9) rather than relying on this order directly.
    pub output: IndexMap<String, Vec<u8>>,
    /// `assetName -> absoluteHostPath`.
    pub origins: IndexMap<String, PathBuf>,
    /// `assetName -> specifier`, present only for assets that need an alias.
    pub aliases: IndexMap<String, String>,
    /// `specifierOrPath -> requesterModule`, insertion-ordered worklist.
    pub pending_modules: IndexMap<String, PathBuf>,
    /// Dedup set; includes both the bare specifier and `.js`-suffixed forms of compiled
    /// entrypoints to prevent re-entry (§3).
    pub processed_modules: FxHashSet<String>,
    pub json_files: IndexSet<PathBuf>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an asset's bytes and provenance.
    pub fn insert_asset(&mut self, name: impl Into<String>, bytes: Vec<u8>, origin: PathBuf) {
        let name = name.into();
        self.output.insert(name.clone(), bytes);
        self.origins.insert(name, origin);
    }

    pub fn insert_alias(&mut self, asset_name: impl Into<String>, specifier: impl Into<String>) {
        self.aliases.insert(asset_name.into(), specifier.into());
    }

    /// Queue a specifier for the closure loop unless it has already been processed.
    pub fn enqueue(&mut self, specifier: impl Into<String>, requester: PathBuf) {
        let specifier = specifier.into();
        if !self.processed_modules.contains(&specifier) && !self.pending_modules.contains_key(&specifier) {
            self.pending_modules.insert(specifier, requester);
        }
    }

    /// Pop the first-inserted pending entry, in insertion order.
    pub fn pop_pending(&mut self) -> Option<(String, PathBuf)> {
        self.pending_modules.shift_remove_index(0)
    }

    pub fn mark_processed(&mut self, specifier: impl Into<String>) {
        self.processed_modules.insert(specifier.into());
    }

    pub fn is_closed(&self) -> bool {
        self.pending_modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_asset_overwrites_in_place() {
        let mut t = AssetTable::new();
        t.insert_asset("/a.js", b"first".to_vec(), PathBuf::from("/p/a.ts"));
        t.insert_asset("/a.js", b"second".to_vec(), PathBuf::from("/p/a.ts"));
        assert_eq!(t.output.get("/a.js"), Some(&b"second".to_vec()));
        assert_eq!(t.output.len(), 1);
    }

    #[test]
    fn enqueue_is_idempotent_once_processed() {
        let mut t = AssetTable::new();
        t.mark_processed("left-pad");
        t.enqueue("left-pad", PathBuf::from("/p/a.js"));
        assert!(t.pending_modules.is_empty());
    }

    #[test]
    fn pending_drains_in_insertion_order() {
        let mut t = AssetTable::new();
        t.enqueue("a", PathBuf::from("/p/x.js"));
        t.enqueue("b", PathBuf::from("/p/x.js"));
        assert_eq!(t.pop_pending().unwrap().0, "a");
        assert_eq!(t.pop_pending().unwrap().0, "b");
        assert!(t.is_closed());
    }
}
