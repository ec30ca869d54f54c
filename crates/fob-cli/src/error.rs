//! Top-level CLI error type and its mapping to exit codes (§6, §7).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] fob_config::ConfigError),

    #[error("{0}")]
    Bundling(#[from] fob_bundler::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Exit code per §6: `1` for a fatal bundling error, `2` for a configuration/argument
    /// error. `CliError` is never constructed on a success path, so there is no `0` arm here.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Bundling(_) => 1,
            CliError::Config(_) | CliError::InvalidArgument(_) | CliError::Io(_) => 2,
        }
    }
}

/// Render a `CliError` as a one-line `miette` diagnostic (§7). `fob_config::ConfigError`
/// already carries its own `miette::Diagnostic` impl with a help string; everything else
/// gets a plain report.
pub fn to_report(err: CliError) -> miette::Report {
    match err {
        CliError::Config(e) => miette::Report::new(e),
        other => miette::miette!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundling_error_exits_one() {
        let err = CliError::Bundling(fob_bundler::Error::CompileFailed("x".into()));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn invalid_argument_exits_two() {
        let err = CliError::InvalidArgument("missing --entry".into());
        assert_eq!(err.exit_code(), 2);
    }
}
