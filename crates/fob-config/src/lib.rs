//! Fob config - layered project configuration for the frida-compile bundler.
//!
//! Resolves a `BundleConfig` by merging, in increasing priority: built-in defaults, a
//! discovered `fob.toml` or `package.json#fob` file, and explicit CLI overrides.

pub mod discovery;
pub mod error;
pub mod model;

pub use discovery::ConfigDiscovery;
pub use error::{ConfigError, Result};
pub use model::{BundleConfig, CompressionMode, RawConfig, SourceMapMode};
