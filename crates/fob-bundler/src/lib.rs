//! Fob bundler - the closure-driven single-artifact bundler for the frida-compile target
//! runtime. Turns a typed-source entrypoint into one self-contained text artifact
//! embedding every reachable module, JSON data module and (optionally) source map.

pub mod artifact;
pub mod asset_table;
pub mod closure;
pub mod compile;
pub mod diagnostics;
pub mod error;
pub mod json_module;
pub mod post_process;
pub mod watch;

pub use asset_table::AssetTable;
pub use closure::{bundle, BundleOptions, CompressionMode, Entrypoint, SourceMapMode};
pub use compile::{CompileOptions, CompiledFile, CompilerDiagnostic, LegacyTransformer, TypeScriptCompiler};
pub use diagnostics::{Diagnostic, DiagnosticLevel, DiagnosticSink, RenderedDiagnostic};
pub use error::{Error, Result};
pub use watch::{FileChange, ProjectWatcher, WatchCoordinator};

#[cfg(any(test, feature = "test-utils"))]
pub use compile::StubCompiler;
