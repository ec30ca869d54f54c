//! `build` and `watch` subcommand implementations (§4.14): resolve configuration, wire up
//! the external compiler/transformer adapters, and drive `fob_bundler`.

mod build;
mod watch;

pub use build::run as build;
pub use watch::run as watch;

use std::path::{Path, PathBuf};

use fob_bundler::{BundleOptions, CompressionMode, SourceMapMode};
use fob_config::{BundleConfig, ConfigDiscovery, RawConfig};

use crate::cli::BundleArgs;
use crate::compiler::{NoLegacyTransformer, ProcessCompiler, ProcessLegacyTransformer};
use crate::error::{CliError, Result};

/// Resolve the project's configuration from discovery + CLI overrides (§4.12's three-tier
/// precedence, implemented inside `fob_config`).
pub(crate) fn resolve_config(args: &BundleArgs) -> Result<BundleConfig> {
    let project_root = match &args.project {
        Some(p) => p.canonicalize().unwrap_or_else(|_| p.clone()),
        None => std::env::current_dir()?,
    };

    let overrides = RawConfig {
        entry: args.entry.clone().map(|e| resolve_against(&project_root, &e)),
        shim_dir: None,
        project_modules_dir: None,
        compiler_modules_dir: None,
        source_maps: args.no_source_maps.then_some(fob_config::SourceMapMode::Omitted),
        compression: args.compress.then_some(fob_config::CompressionMode::TerserLike),
        watch_debounce_ms: None,
    };

    let discovery = ConfigDiscovery::new(project_root, crate::env::compiler_root());
    discovery.load(overrides).map_err(CliError::from)
}

fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Map `fob_config`'s resolved configuration onto `fob_bundler::BundleOptions`. The two
/// crates define their own `SourceMapMode`/`CompressionMode` (neither depends on the other),
/// so the variants are translated one by one rather than shared.
pub(crate) fn to_bundle_options(config: &BundleConfig, compiler_root: PathBuf) -> BundleOptions {
    BundleOptions {
        project_root: config.project_root.clone(),
        entry: resolve_against(&config.project_root, &config.entry),
        shim_dir: config.shim_dir.clone(),
        project_modules_dir: config.project_modules_dir.clone(),
        compiler_modules_dir: config.compiler_modules_dir.clone(),
        compiler_root,
        source_maps: match config.source_maps {
            fob_config::SourceMapMode::Included => SourceMapMode::Included,
            fob_config::SourceMapMode::Omitted => SourceMapMode::Omitted,
        },
        compression: match config.compression {
            fob_config::CompressionMode::None => CompressionMode::None,
            fob_config::CompressionMode::TerserLike => CompressionMode::TerserLike,
        },
    }
}

/// Default artifact path (§4.14): the entry's asset name under the project root, suffixed
/// `.frida.js`.
pub(crate) fn default_output_path(project_root: &Path, entry: &Path) -> PathBuf {
    let rel = entry.strip_prefix(project_root).unwrap_or(entry);
    let portable = fob_graph::path::to_portable(rel);
    let with_suffix = match portable.rsplit_once('.') {
        Some((stem, _ext)) => format!("{stem}.frida.js"),
        None => format!("{portable}.frida.js"),
    };
    project_root.join(fob_graph::path::to_native(&with_suffix))
}

pub(crate) fn build_compiler(args: &BundleArgs) -> ProcessCompiler {
    ProcessCompiler::new(args.compiler_cmd.clone(), Vec::new())
}

pub(crate) fn build_legacy_transformer(args: &BundleArgs) -> Box<dyn fob_bundler::LegacyTransformer> {
    match &args.legacy_transform_cmd {
        Some(cmd) => Box::new(ProcessLegacyTransformer::new(cmd.clone())),
        None => Box::new(NoLegacyTransformer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_path_suffixes_frida_js() {
        let root = PathBuf::from("/project");
        let entry = PathBuf::from("/project/src/index.ts");
        assert_eq!(
            default_output_path(&root, &entry),
            PathBuf::from("/project").join("src").join("index.frida.js")
        );
    }
}
