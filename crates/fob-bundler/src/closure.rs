//! The Closure Loop (§4.8) and the `BundleOptions`/`Entrypoint` types that drive it.
//!
//! `bundle()` is the single entry point the CLI and the Watch Coordinator both call: it
//! runs one bundling to completion (or failure) and returns a populated `AssetTable`.

use std::path::{Path, PathBuf};

use fob_graph::{
    module::Module, package_json::module_kind, path, resolver, walker, DiscoveredSpecifier,
    ProjectFs, ShimRegistry,
};
use path_clean::PathClean;
use rustc_hash::FxHashMap;

use crate::asset_table::AssetTable;
use crate::compile::{CompileOptions, LegacyTransformer, TypeScriptCompiler};
use crate::diagnostics::DiagnosticSink;
use crate::post_process;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMapMode {
    Included,
    Omitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    None,
    TerserLike,
}

/// Everything the bundling needs to know about where things live and which flags are on.
#[derive(Debug, Clone)]
pub struct BundleOptions {
    pub project_root: PathBuf,
    /// Absolute host path to the typed-source entrypoint.
    pub entry: PathBuf,
    pub shim_dir: PathBuf,
    pub project_modules_dir: PathBuf,
    pub compiler_modules_dir: PathBuf,
    pub compiler_root: PathBuf,
    pub source_maps: SourceMapMode,
    pub compression: CompressionMode,
}

/// `{input, output}` from §3.
#[derive(Debug, Clone)]
pub struct Entrypoint {
    pub input: PathBuf,
    pub output: String,
}

impl Entrypoint {
    pub fn new(entry: &Path, project_root: &Path) -> Result<Self, Error> {
        if !entry.starts_with(project_root) {
            return Err(Error::InvalidEntrypoint {
                entry: entry.to_path_buf(),
                root: project_root.to_path_buf(),
            });
        }
        let rel = entry.strip_prefix(project_root).expect("checked above");
        let output = path::asset_name(&rewrite_to_compiled_suffix(&path::to_portable(rel)));
        Ok(Self {
            input: entry.to_path_buf(),
            output,
        })
    }
}

pub(crate) fn rewrite_to_compiled_suffix(portable: &str) -> String {
    for ext in [".ts", ".tsx", ".mts", ".cts"] {
        if let Some(stem) = portable.strip_suffix(ext) {
            return format!("{stem}.js");
        }
    }
    portable.to_string()
}

/// Run one bundling to completion. Returns the populated asset table or the first fatal
/// error encountered (§7); the table is never partially published on failure.
#[tracing::instrument(skip(options, compiler, legacy, fs, sink), fields(entry = %options.entry.display()))]
pub async fn bundle(
    options: &BundleOptions,
    compiler: &dyn TypeScriptCompiler,
    legacy: &dyn LegacyTransformer,
    fs: &dyn ProjectFs,
    sink: &mut DiagnosticSink,
) -> Result<AssetTable, Error> {
    let entrypoint = Entrypoint::new(&options.entry, &options.project_root)?;

    let mut table = AssetTable::new();
    let shims = ShimRegistry::new(options.shim_dir.clone());
    let resolver_config = resolver::ResolverConfig {
        project_root: options.project_root.clone(),
        compiler_root: options.compiler_root.clone(),
        project_modules_dir: options.project_modules_dir.clone(),
        compiler_modules_dir: options.compiler_modules_dir.clone(),
    };

    let compile_options = CompileOptions {
        root_dir: options.project_root.clone(),
        out_dir: PathBuf::from("/"),
        source_maps: options.source_maps == SourceMapMode::Included,
        source_root: (options.source_maps == SourceMapMode::Included)
            .then(|| options.project_root.clone()),
    };

    let mut modules: FxHashMap<PathBuf, Module> = FxHashMap::default();

    let (compiled, diagnostics) = compiler.compile(&entrypoint.input, &compile_options).await?;
    sink.extend_compiler(diagnostics);

    for file in &compiled {
        let asset_name = path::asset_name(&path::to_portable(&file.path));
        insert_compiled_asset(&mut table, &asset_name, file);

        // `file.path` is the portable `/`-rooted asset name the compiler reported (§4.6's
        // out_dir convention), not a real host path; sibling relative imports (JSON, further
        // typed sources outside this compile pass) still live next to the original source, so
        // resolve them against the equivalent real path under the project root.
        let host_path = host_path_for_compiled(&file.path, &options.project_root);
        let kind = module_kind(&host_path, fs);
        let module = Module::new(kind, file.path.clone(), file.contents.as_str());
        table.mark_processed(asset_name.clone());
        table.mark_processed(bare_variant(&asset_name));
        enqueue_from_source(&mut table, &file.contents, &host_path);
        modules.insert(file.path.clone(), module);
    }

    let mut missing = Vec::new();
    while let Some((specifier, requester)) = table.pop_pending() {
        let _span = tracing::debug_span!("closure_step", specifier = %specifier).entered();
        table.mark_processed(specifier.clone());
        match resolver::resolve(&specifier, &requester, &shims, &resolver_config, fs) {
            resolver::Resolution::Missing => missing.push(specifier),
            resolver::Resolution::Found(resolved) => {
                let content = fs
                    .read_to_string(&resolved.path)
                    .map_err(|e| Error::ReadFailure(resolved.path.clone(), e))?;
                let asset_name = resolved
                    .asset_name
                    .clone()
                    .ok_or_else(|| Error::UnexpectedFilePath(resolved.path.clone()))?;

                table.insert_asset(asset_name.clone(), content.clone().into_bytes(), resolved.path.clone());
                if let Some(spec) = &resolved.alias {
                    table.insert_alias(asset_name.clone(), spec.clone());
                }

                let kind = module_kind(&resolved.path, fs);
                modules.insert(
                    resolved.path.clone(),
                    Module::new(kind, resolved.path.clone(), content.as_str()),
                );
                enqueue_from_source(&mut table, &content, &resolved.path);
            }
        }
    }

    if !missing.is_empty() {
        // the loop has already drained to completion; this failure surfaces afterward.
        return Err(Error::UnresolvedDependencies(missing));
    }

    flush_json_files(&mut table, &options.project_root, &options.compiler_root, fs)?;

    let legacy_paths: Vec<PathBuf> = modules
        .values()
        .filter(|m| m.is_legacy())
        .map(|m| m.path.clone())
        .collect();

    if !legacy_paths.is_empty() {
        sink.warn(format!(
            "re-transforming {} legacy module(s) to modern form",
            legacy_paths.len()
        ));
        let rewritten = legacy.transform(&legacy_paths, &compile_options).await?;
        for file in &rewritten {
            let asset_name = path::derive_asset_name(&file.path, &options.project_root, &options.compiler_root)
                .unwrap_or_else(|| path::asset_name(&path::to_portable(&file.path)));
            // second write wins (§5, §9): overwrite unconditionally.
            insert_compiled_asset(&mut table, &asset_name, file);
        }
    }

    post_process::apply(
        &mut table,
        options.compression,
        options.source_maps == SourceMapMode::Included,
    );

    Ok(table)
}

fn insert_compiled_asset(table: &mut AssetTable, asset_name: &str, file: &crate::compile::CompiledFile) {
    table.insert_asset(asset_name.to_string(), file.contents.clone().into_bytes(), file.path.clone());
    if let Some(map) = &file.source_map {
        table.insert_asset(format!("{asset_name}.map"), map.clone().into_bytes(), file.path.clone());
    }
}

/// Map a compiler-reported portable asset path back to the real host path it was compiled
/// from, so relative specifiers discovered inside it can be resolved against the real
/// project tree.
fn host_path_for_compiled(virtual_path: &Path, project_root: &Path) -> PathBuf {
    let rel = virtual_path.strip_prefix("/").unwrap_or(virtual_path);
    project_root.join(rel)
}

fn bare_variant(asset_name: &str) -> String {
    asset_name.trim_start_matches('/').to_string()
}

fn enqueue_from_source(table: &mut AssetTable, source: &str, requester: &Path) {
    for spec in walker::walk_specifiers(source) {
        match &spec {
            DiscoveredSpecifier::Relative(raw) => {
                let dir = requester.parent().unwrap_or(Path::new(""));
                let resolved = dir.join(raw).clean();
                if spec.is_json() {
                    table.json_files.insert(resolved);
                } else {
                    let key = resolved.to_string_lossy().into_owned();
                    table.enqueue(key, requester.to_path_buf());
                }
            }
            DiscoveredSpecifier::Bare(raw) => {
                if spec.is_json() {
                    // A bare specifier ending in .json is unusual but handled the same way:
                    // it is recorded for direct emission rather than pushed onto the worklist.
                    table.json_files.insert(PathBuf::from(raw));
                } else {
                    table.enqueue(raw.clone(), requester.to_path_buf());
                }
            }
        }
    }
}

fn flush_json_files(
    table: &mut AssetTable,
    project_root: &Path,
    compiler_root: &Path,
    fs: &dyn ProjectFs,
) -> Result<(), Error> {
    let paths: Vec<PathBuf> = table.json_files.iter().cloned().collect();
    for path in paths {
        let asset_name = path::derive_asset_name(&path, project_root, compiler_root)
            .ok_or_else(|| Error::UnexpectedFilePath(path.clone()))?;
        if table.output.contains_key(&asset_name) {
            continue;
        }
        let content = fs
            .read_to_string(&path)
            .map_err(|e| Error::ReadFailure(path.clone(), e))?;
        table.insert_asset(asset_name, content.into_bytes(), path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrypoint_rewrites_typed_suffix() {
        let e = Entrypoint::new(Path::new("/p/src/index.ts"), Path::new("/p")).unwrap();
        assert_eq!(e.output, "/src/index.js");
    }

    #[test]
    fn entrypoint_outside_root_is_rejected() {
        let err = Entrypoint::new(Path::new("/other/index.ts"), Path::new("/p")).unwrap_err();
        assert!(matches!(err, Error::InvalidEntrypoint { .. }));
    }
}
