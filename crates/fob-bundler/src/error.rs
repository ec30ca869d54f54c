//! Error types for a single bundling (§7).

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can abort a bundling. Every variant here is fatal for the *current*
/// bundling; in watch mode the coordinator catches and logs these rather than propagating.
#[derive(Debug, Error)]
pub enum Error {
    /// The entrypoint is not located under the project root.
    #[error("entrypoint `{}` is not inside the project root `{}`", .entry.display(), .root.display())]
    InvalidEntrypoint { entry: PathBuf, root: PathBuf },

    /// One or more specifiers could not be located anywhere on disk.
    #[error("unresolved dependencies: {}", .0.join(", "))]
    UnresolvedDependencies(Vec<String>),

    /// An asset's on-disk path falls outside both the project root and the compiler root.
    #[error("path `{}` is outside the project and compiler roots", .0.display())]
    UnexpectedFilePath(PathBuf),

    /// An external source file could not be read from disk.
    #[error("failed to read `{}`: {}", .0.display(), .1)]
    ReadFailure(PathBuf, std::io::Error),

    /// Graph-layer error (path/resolver/module-kind failures) bubbled up unchanged.
    #[error(transparent)]
    Graph(#[from] fob_graph::GraphError),

    /// The typed-source compiler (an injected collaborator) failed outright.
    #[error("compile failed: {0}")]
    CompileFailed(String),

    /// The artifact's wire format was malformed when parsing it back (round-trip).
    #[error("malformed artifact: {0}")]
    MalformedArtifact(String),
}

pub type Result<T> = std::result::Result<T, Error>;
