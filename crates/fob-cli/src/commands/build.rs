//! `build` subcommand (§4.14): one bundling to completion, then write the artifact.

use fob_bundler::{artifact, DiagnosticSink, Entrypoint};
use fob_graph::NativeFs;

use crate::cli::BundleArgs;
use crate::error::{CliError, Result};
use crate::{commands, ui};

pub async fn run(args: &BundleArgs) -> Result<()> {
    let config = commands::resolve_config(args)?;
    let compiler_root = crate::env::compiler_root();
    let options = commands::to_bundle_options(&config, compiler_root);

    let entrypoint = Entrypoint::new(&options.entry, &options.project_root)?;
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| commands::default_output_path(&options.project_root, &options.entry));

    let compiler = commands::build_compiler(args);
    let legacy = commands::build_legacy_transformer(args);
    let fs = NativeFs;

    let mut sink = DiagnosticSink::new();
    let result = fob_bundler::bundle(&options, &compiler, legacy.as_ref(), &fs, &mut sink).await;
    ui::print_diagnostics(&sink);

    let table = result.map_err(CliError::from)?;
    let bytes = artifact::serialize(&table, &entrypoint.output);
    let byte_count = bytes.len();
    let asset_count = table.output.len();

    tokio::fs::write(&output_path, &bytes).await.map_err(CliError::from)?;

    ui::success(&format!(
        "wrote {} ({} assets, {} bytes, {} diagnostic(s))",
        output_path.display(),
        asset_count,
        byte_count,
        sink.iter().count(),
    ));

    Ok(())
}
