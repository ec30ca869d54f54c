//! Tracing setup (§4.15): installed exactly once, by this binary, never by the library
//! crates.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("fob_cli=debug,fob_bundler=debug,fob_config=debug,fob_graph=debug")
    } else if quiet {
        EnvFilter::new("fob_cli=error,fob_bundler=error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("fob_cli=info,fob_bundler=info,fob_config=info"))
    };

    let fmt_layer = fmt::layer().with_target(false).compact();

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
