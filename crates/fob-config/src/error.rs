//! Error types for configuration discovery, parsing and merging.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("entry path not found: {}", path.display())]
    #[diagnostic(
        code(frida_compile::config::entry_not_found),
        help("check that the entry file exists under the project root")
    )]
    EntryNotFound { path: PathBuf },

    #[error("unknown configuration key: {key}")]
    #[diagnostic(
        code(frida_compile::config::unknown_key),
        help("remove the key or check for a typo; unknown keys are rejected rather than ignored")
    )]
    UnknownKey { key: String },

    #[error("invalid configuration value for '{field}'")]
    #[diagnostic(code(frida_compile::config::invalid_value))]
    InvalidValue {
        field: String,
        #[help]
        hint: Option<String>,
    },

    #[error("unsupported configuration format: {format}")]
    #[diagnostic(
        code(frida_compile::config::unsupported_format),
        help("supported formats: fob.toml, package.json")
    )]
    UnsupportedFormat { format: String },

    #[error("I/O error: {source}")]
    #[diagnostic(code(frida_compile::config::io_error))]
    Io {
        #[source]
        #[from]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn invalid_value(field: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            hint: Some(hint.into()),
        }
    }
}
