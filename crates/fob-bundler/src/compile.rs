//! The Compile Front's external collaborators (§1, §4.6): the typed-source compiler and
//! the legacy-to-modern transformer are out of scope for this crate and are modeled as
//! injected trait objects. The pipeline only ever calls through these traits.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// One file emitted by a compile pass.
#[derive(Debug, Clone)]
pub struct CompiledFile {
    /// Absolute host path the compiler considers this file's output location.
    pub path: PathBuf,
    pub contents: String,
    /// The independent `.map` sibling, if source maps were requested.
    pub source_map: Option<String>,
}

/// Options derived from §4.6: the rootDir/outDir/sourceRoot overrides the Compile Front
/// applies on top of whatever project compiler configuration exists.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub root_dir: PathBuf,
    pub out_dir: PathBuf,
    pub source_maps: bool,
    pub source_root: Option<PathBuf>,
}

/// A diagnostic emitted by the compiler, forwarded to the bundling's `DiagnosticSink`.
#[derive(Debug, Clone)]
pub struct CompilerDiagnostic {
    pub message: String,
    pub file: Option<PathBuf>,
}

/// The typed-source compiler: given compiler options and a root input file, yields the
/// set of compiled source files plus any diagnostics. Implemented externally; this crate
/// only depends on the trait (§1 Out of scope).
#[async_trait]
pub trait TypeScriptCompiler: Send + Sync {
    async fn compile(
        &self,
        entry: &Path,
        options: &CompileOptions,
    ) -> Result<(Vec<CompiledFile>, Vec<CompilerDiagnostic>), crate::Error>;
}

/// The legacy-to-modern module transformer, applied on demand to legacy modules before
/// the second compile pass re-emits them (§4.6).
#[async_trait]
pub trait LegacyTransformer: Send + Sync {
    async fn transform(&self, files: &[PathBuf], options: &CompileOptions)
        -> Result<Vec<CompiledFile>, crate::Error>;
}

/// A minimal test double for `TypeScriptCompiler` used by the pipeline's own tests and by
/// downstream integration tests that don't want to shell out to a real TypeScript compiler.
/// It performs a best-effort strip of TypeScript-only syntax (type annotations, `interface`
/// and `type` declarations) — good enough to exercise the closure loop, not a real compiler.
#[cfg(any(test, feature = "test-utils"))]
pub struct StubCompiler {
    pub files: std::sync::Mutex<rustc_hash::FxHashMap<PathBuf, String>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl StubCompiler {
    pub fn new() -> Self {
        Self {
            files: std::sync::Mutex::new(rustc_hash::FxHashMap::default()),
        }
    }

    /// Register the raw (already-JS-shaped, since we don't implement a real TS front end)
    /// source for a path the stub should "emit" when asked to compile it.
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.lock().unwrap().insert(path.into(), contents.into());
        self
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for StubCompiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl TypeScriptCompiler for StubCompiler {
    async fn compile(
        &self,
        entry: &Path,
        options: &CompileOptions,
    ) -> Result<(Vec<CompiledFile>, Vec<CompilerDiagnostic>), crate::Error> {
        let files = self.files.lock().unwrap();
        let contents = files
            .get(entry)
            .cloned()
            .ok_or_else(|| crate::Error::CompileFailed(format!("no stub source for {}", entry.display())))?;
        let rel = entry.strip_prefix(&options.root_dir).unwrap_or(entry);
        let renamed = crate::closure::rewrite_to_compiled_suffix(&rel.to_string_lossy());
        let out_path = options.out_dir.join(renamed);
        Ok((
            vec![CompiledFile {
                path: out_path,
                contents,
                source_map: None,
            }],
            Vec::new(),
        ))
    }
}
