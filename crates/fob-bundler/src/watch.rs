//! The Watch Coordinator (§4.11): debounced, single-flight rebuilding driven by a native
//! filesystem watcher.
//!
//! This implementation resolves §9's invalidation question by going further than "clear
//! `processedModules` wholesale": every rebundle calls `bundle()`, which constructs a brand
//! new `AssetTable` outright rather than patching an existing one. There is no per-asset
//! invalidation and no `externalSources` read-through cache to invalidate — each rebundle
//! reads every file it needs straight from disk. This trades the possible speedup of
//! incremental recompilation for a coordinator with no stale-cache failure mode to get
//! wrong; revisit if bundling a large project on every keystroke-triggered rebuild proves
//! too slow in practice.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::closure::{bundle, BundleOptions, Entrypoint};
use crate::compile::{LegacyTransformer, TypeScriptCompiler};
use crate::diagnostics::DiagnosticSink;
use crate::{artifact, Error};
use fob_graph::ProjectFs;

const DEBOUNCE: Duration = Duration::from_millis(250);

/// One change delivered by the native filesystem watcher, already filtered to paths under
/// the project root and outside the shim/module directories and dotfiles.
#[derive(Debug, Clone)]
pub struct FileChange {
    pub path: PathBuf,
}

/// Installs a recursive `notify` watcher rooted at the project, filtering the same way the
/// host crate's own development-mode watcher filters `node_modules` and hidden paths.
pub struct ProjectWatcher {
    _watcher: RecommendedWatcher,
}

impl ProjectWatcher {
    pub fn start(root: PathBuf) -> Result<(Self, mpsc::UnboundedReceiver<FileChange>), Error> {
        let (tx, rx) = mpsc::unbounded_channel();
        let root_for_filter = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else { return };
            if !matches!(
                event.kind,
                EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
            ) {
                return;
            }
            for path in event.paths {
                if should_ignore(&path, &root_for_filter) {
                    continue;
                }
                let _ = tx.send(FileChange { path });
            }
        })
        .map_err(|e| Error::CompileFailed(format!("failed to start file watcher: {e}")))?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| Error::CompileFailed(format!("failed to watch {}: {e}", root.display())))?;

        Ok((Self { _watcher: watcher }, rx))
    }
}

fn should_ignore(path: &Path, root: &Path) -> bool {
    let Ok(rel) = path.strip_prefix(root) else {
        return true;
    };
    for component in rel.components() {
        if let Some(name) = component.as_os_str().to_str() {
            if name == "node_modules" || (name.starts_with('.') && name != "." && name != "..") {
                return true;
            }
        }
    }
    false
}

/// Drives the `{dirty, pending, timer}` state machine from §4.11 to completion: single-flight
/// execution, at-most-one queued follow-up, and debounced coalescing of change bursts.
pub struct WatchCoordinator {
    options: BundleOptions,
    entrypoint: Entrypoint,
}

impl WatchCoordinator {
    pub fn new(options: BundleOptions) -> Result<Self, Error> {
        let entrypoint = Entrypoint::new(&options.entry, &options.project_root)?;
        Ok(Self { options, entrypoint })
    }

    /// Run until `changes` closes. `on_update` is invoked with a freshly serialized artifact
    /// after every successful bundling; `on_diagnostics` after every bundling, successful or
    /// not, per §4.13.
    pub async fn run(
        &self,
        mut changes: mpsc::UnboundedReceiver<FileChange>,
        compiler: &dyn TypeScriptCompiler,
        legacy: &dyn LegacyTransformer,
        fs: &dyn ProjectFs,
        mut on_update: impl FnMut(Vec<u8>),
        mut on_diagnostics: impl FnMut(&DiagnosticSink),
    ) {
        let mut dirty = true;
        let mut in_flight = false;
        let mut timer_armed = true;

        // Schedule the first bundle for the next tick rather than waiting out a full
        // debounce window on startup.
        let sleep = tokio::time::sleep(Duration::from_secs(0));
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                received = changes.recv() => {
                    match received {
                        Some(_change) => {
                            dirty = true;
                            if !in_flight && !timer_armed {
                                sleep.as_mut().reset(tokio::time::Instant::now() + DEBOUNCE);
                                timer_armed = true;
                            }
                        }
                        None => break,
                    }
                }
                () = &mut sleep, if timer_armed => {
                    timer_armed = false;
                    if in_flight {
                        continue;
                    }
                    in_flight = true;
                    dirty = false;

                    let mut sink = DiagnosticSink::new();
                    let result = bundle(&self.options, compiler, legacy, fs, &mut sink).await;
                    on_diagnostics(&sink);
                    match result {
                        Ok(table) => {
                            let artifact = artifact::serialize(&table, &self.entrypoint.output);
                            on_update(artifact);
                        }
                        Err(err) => {
                            tracing::error!(error = %err, "watch bundling failed, awaiting next invalidation");
                        }
                    }

                    in_flight = false;
                    if dirty {
                        sleep.as_mut().reset(tokio::time::Instant::now());
                        timer_armed = true;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_node_modules_and_dotfiles() {
        let root = PathBuf::from("/p");
        assert!(should_ignore(&PathBuf::from("/p/node_modules/x/index.js"), &root));
        assert!(should_ignore(&PathBuf::from("/p/.git/HEAD"), &root));
        assert!(!should_ignore(&PathBuf::from("/p/src/index.ts"), &root));
    }

    #[test]
    fn ignores_paths_outside_root() {
        assert!(should_ignore(&PathBuf::from("/elsewhere/x.ts"), &PathBuf::from("/p")));
    }
}
