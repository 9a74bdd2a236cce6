//! Error types for bundling.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that end a bundling run.
///
/// Per-file read failures are not represented here; they are recovered
/// inside the run and surface as placeholder sections instead.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Traversal failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Project directory not found: {}", .0.display())]
    ProjectNotFound(PathBuf),

    #[error("Project path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to create bundle file {}: {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`BundleError`].
pub type Result<T> = std::result::Result<T, BundleError>;
