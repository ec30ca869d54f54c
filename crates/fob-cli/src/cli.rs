//! Command-line interface definition (§4.14).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// frida-compile - single-artifact bundler for the frida-compile target runtime
#[derive(Parser, Debug)]
#[command(name = "frida-compile", version, about = "Bundles a typed-source project into one self-contained artifact")]
pub struct Cli {
    /// Enable verbose (debug-level) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one bundling to completion and write the artifact
    Build(BundleArgs),
    /// Start the Watch Coordinator and rewrite the artifact on every change
    Watch(BundleArgs),
}

/// Flags shared by `build` and `watch` (§4.14).
#[derive(Parser, Debug, Clone)]
pub struct BundleArgs {
    /// Project root directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Entry point, relative to the project root or absolute
    #[arg(long, value_name = "PATH")]
    pub entry: Option<PathBuf>,

    /// Output artifact path (default: entry's asset name under the project root, suffixed
    /// `.frida.js`)
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Omit source maps from the artifact
    #[arg(long)]
    pub no_source_maps: bool,

    /// Minify emitted JavaScript and fuse the resulting source map
    #[arg(long)]
    pub compress: bool,

    /// External TypeScript compiler command (default: `tsc`)
    #[arg(long, value_name = "CMD", default_value = "tsc")]
    pub compiler_cmd: String,

    /// External legacy-to-modern transform command, invoked once per legacy module
    /// discovered; if omitted, a bundling that reaches a legacy module fails outright
    #[arg(long, value_name = "CMD")]
    pub legacy_transform_cmd: Option<String>,

    /// Run `build`'s flag surface under the Watch Coordinator instead of a one-shot build
    /// (alias for invoking the `watch` subcommand, mirroring the host CLI's `dev`/`build`
    /// flag overlap)
    #[arg(long)]
    pub watch: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_parses_minimal_invocation() {
        let cli = Cli::parse_from(["frida-compile", "build", "--entry", "src/index.ts"]);
        match cli.command {
            Command::Build(args) => assert_eq!(args.entry, Some(PathBuf::from("src/index.ts"))),
            Command::Watch(_) => panic!("expected build"),
        }
    }

    #[test]
    fn watch_accepts_compress_and_no_source_maps() {
        let cli = Cli::parse_from(["frida-compile", "watch", "--compress", "--no-source-maps"]);
        match cli.command {
            Command::Watch(args) => {
                assert!(args.compress);
                assert!(args.no_source_maps);
            }
            Command::Build(_) => panic!("expected watch"),
        }
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["frida-compile", "--verbose", "--quiet", "build"]);
        assert!(result.is_err());
    }
}
