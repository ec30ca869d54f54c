//! Concrete `TypeScriptCompiler` / `LegacyTransformer` adapters that shell out to an
//! external tool (§1: the compiler and the legacy transformer are out of scope for the
//! bundling pipeline itself — the CLI binary's job is only to wire *some* implementation in).
//!
//! `ProcessCompiler` invokes a configurable command (default `tsc`) against a scratch output
//! directory and reads the emitted files back; `ProcessLegacyTransformer` invokes a
//! configurable command per legacy file and reads the rewritten source from stdout.
//! `NoLegacyTransformer` is the default when no such command is configured — most projects
//! never touch a legacy module, so it only needs to fail loudly the one time it's asked to.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fob_bundler::{CompileOptions, CompiledFile, CompilerDiagnostic, Error, LegacyTransformer, TypeScriptCompiler};
use tokio::process::Command;

/// Shells out to an external TypeScript compiler binary (`tsc` by default).
pub struct ProcessCompiler {
    command: String,
    extra_args: Vec<String>,
}

impl ProcessCompiler {
    pub fn new(command: impl Into<String>, extra_args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            extra_args,
        }
    }
}

impl Default for ProcessCompiler {
    fn default() -> Self {
        Self::new("tsc", Vec::new())
    }
}

#[async_trait]
impl TypeScriptCompiler for ProcessCompiler {
    async fn compile(
        &self,
        entry: &Path,
        options: &CompileOptions,
    ) -> Result<(Vec<CompiledFile>, Vec<CompilerDiagnostic>), Error> {
        let staging = tempfile::tempdir()
            .map_err(|e| Error::CompileFailed(format!("failed to create compile staging dir: {e}")))?;

        let mut args = vec![
            "--outDir".to_string(),
            staging.path().display().to_string(),
            "--rootDir".to_string(),
            options.root_dir.display().to_string(),
            "--module".to_string(),
            "esnext".to_string(),
            "--target".to_string(),
            "esnext".to_string(),
            "--moduleResolution".to_string(),
            "bundler".to_string(),
        ];
        if options.source_maps {
            args.push("--sourceMap".to_string());
            if let Some(root) = &options.source_root {
                args.push("--sourceRoot".to_string());
                args.push(root.display().to_string());
            }
        }
        args.extend(self.extra_args.iter().cloned());
        args.push(entry.display().to_string());

        let output = Command::new(&self.command)
            .args(&args)
            .output()
            .await
            .map_err(|e| Error::CompileFailed(format!("failed to run `{}`: {e}", self.command)))?;

        let mut diagnostics = Vec::new();
        if !output.stderr.is_empty() {
            diagnostics.push(CompilerDiagnostic {
                message: String::from_utf8_lossy(&output.stderr).into_owned(),
                file: None,
            });
        }
        if !output.status.success() {
            return Err(Error::CompileFailed(format!(
                "`{}` exited with {}",
                self.command, output.status
            )));
        }

        let files = collect_compiled_files(staging.path(), staging.path())
            .map_err(|e| Error::CompileFailed(format!("failed to read compiled output: {e}")))?;

        Ok((files, diagnostics))
    }
}

/// Walk the staging directory and pair every `.js` file with its `.js.map` sibling if one
/// was emitted, rewriting each path to the `/`-rooted symbolic form `CompileOptions.out_dir`
/// uses (§4.6).
fn collect_compiled_files(dir: &Path, root: &Path) -> std::io::Result<Vec<CompiledFile>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            out.extend(collect_compiled_files(&path, root)?);
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("js") {
            continue;
        }
        let rel = path.strip_prefix(root).unwrap_or(&path);
        let symbolic = PathBuf::from("/").join(rel);
        let contents = std::fs::read_to_string(&path)?;
        let map_path = path.with_extension("js.map");
        let source_map = map_path.is_file().then(|| std::fs::read_to_string(&map_path)).transpose()?;
        out.push(CompiledFile {
            path: symbolic,
            contents,
            source_map,
        });
    }
    Ok(out)
}

/// No legacy transformer is configured by default; most projects never trigger it, since
/// `bundle()` only invokes `transform` when at least one legacy module was actually
/// discovered (§4.6).
pub struct NoLegacyTransformer;

#[async_trait]
impl LegacyTransformer for NoLegacyTransformer {
    async fn transform(
        &self,
        files: &[PathBuf],
        _options: &CompileOptions,
    ) -> Result<Vec<CompiledFile>, Error> {
        Err(Error::CompileFailed(format!(
            "{} legacy module(s) require re-transformation but no --legacy-transform-cmd was configured: {}",
            files.len(),
            files.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
        )))
    }
}

/// Shells out to an external command once per legacy file, feeding it the absolute path as
/// an argument and reading the rewritten modern source from stdout.
pub struct ProcessLegacyTransformer {
    command: String,
}

impl ProcessLegacyTransformer {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }
}

#[async_trait]
impl LegacyTransformer for ProcessLegacyTransformer {
    async fn transform(
        &self,
        files: &[PathBuf],
        options: &CompileOptions,
    ) -> Result<Vec<CompiledFile>, Error> {
        let mut out = Vec::with_capacity(files.len());
        for file in files {
            let output = Command::new(&self.command)
                .arg(file)
                .output()
                .await
                .map_err(|e| Error::CompileFailed(format!("failed to run `{}`: {e}", self.command)))?;
            if !output.status.success() {
                return Err(Error::CompileFailed(format!(
                    "`{}` exited with {} transforming {}",
                    self.command,
                    output.status,
                    file.display()
                )));
            }
            let contents = String::from_utf8(output.stdout).map_err(|e| {
                Error::CompileFailed(format!("`{}` produced non-UTF8 output: {e}", self.command))
            })?;
            let symbolic = fob_graph::path::derive_asset_name(file, &options.root_dir, &options.root_dir)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/").join(file.file_name().unwrap_or_default()));
            out.push(CompiledFile {
                path: symbolic,
                contents,
                source_map: None,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_compiled_files_finds_nested_js_and_map() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/index.js"), "export const a = 1;").unwrap();
        std::fs::write(dir.path().join("src/index.js.map"), "{}").unwrap();

        let files = collect_compiled_files(dir.path(), dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("/src/index.js"));
        assert_eq!(files[0].source_map.as_deref(), Some("{}"));
    }
}
