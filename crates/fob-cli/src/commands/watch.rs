//! `watch` subcommand (§4.14): start the Watch Coordinator and rewrite the artifact on every
//! successful rebundle, running until interrupted.

use fob_bundler::{DiagnosticSink, ProjectWatcher, WatchCoordinator};
use fob_graph::NativeFs;

use crate::cli::BundleArgs;
use crate::error::{CliError, Result};
use crate::{commands, ui};

pub async fn run(args: &BundleArgs) -> Result<()> {
    let config = commands::resolve_config(args)?;
    let compiler_root = crate::env::compiler_root();
    let options = commands::to_bundle_options(&config, compiler_root);

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| commands::default_output_path(&options.project_root, &options.entry));

    let coordinator = WatchCoordinator::new(options.clone()).map_err(CliError::from)?;
    let (_watcher, changes) = ProjectWatcher::start(options.project_root.clone()).map_err(CliError::from)?;

    let compiler = commands::build_compiler(args);
    let legacy = commands::build_legacy_transformer(args);
    let fs = NativeFs;

    ui::info(&format!(
        "watching {} (entry: {})",
        options.project_root.display(),
        options.entry.display()
    ));
    let spinner = ui::Spinner::new("waiting for changes");

    coordinator
        .run(
            changes,
            &compiler,
            legacy.as_ref(),
            &fs,
            |bytes| {
                let byte_count = bytes.len();
                if let Err(e) = std::fs::write(&output_path, &bytes) {
                    ui::error(&format!("failed to write {}: {e}", output_path.display()));
                    return;
                }
                spinner.set_message(&format!(
                    "wrote {} ({byte_count} bytes), waiting for changes",
                    output_path.display()
                ));
            },
            |sink: &DiagnosticSink| ui::print_diagnostics(sink),
        )
        .await;

    Ok(())
}
