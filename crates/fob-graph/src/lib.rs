//! Fob graph - path normalization, module-kind detection and dependency resolution for
//! the frida-compile-style single-artifact bundler.
//!
//! This crate holds the leaves of the bundling pipeline (§2): everything the closure loop in
//! `fob-bundler` needs to turn one specifier into a resolved path, a module record and a list
//! of further specifiers to chase.

pub mod error;
pub mod fs;
pub mod module;
pub mod package_json;
pub mod path;
pub mod resolver;
pub mod shim;
pub mod walker;

pub use error::{GraphError, Result};
pub use fs::{NativeFs, ProjectFs};
pub use module::Module;
pub use package_json::{ModuleKind, PackageDescriptor};
pub use resolver::{Resolution, Resolved, ResolverConfig};
pub use shim::{ShimRegistry, ShimTarget};
pub use walker::{walk_specifiers, DiscoveredSpecifier};
