//! Error types shared by the path, resolution and dependency-walking layers.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by `fob-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    /// An asset path lies outside every known root (project root or compiler root).
    #[error("path `{}` is outside the project and compiler roots", .0.display())]
    UnexpectedFilePath(PathBuf),

    /// A source file could not be read from disk.
    #[error("failed to read `{}`: {}", .0.display(), .1)]
    ReadFailure(PathBuf, std::io::Error),

    /// `package.json` existed but could not be parsed as JSON.
    #[error("failed to parse `{}`: {}", .0.display(), .1)]
    MalformedPackageJson(PathBuf, serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
