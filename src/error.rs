// src/error.rs

//! Error types for dependency resolution and staging

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that abort a resolve or deploy run
///
/// A module that cannot be located is not an error; the prober reports it
/// as `None` and the reference is dropped.
#[derive(Error, Debug)]
pub enum Error {
    /// A directory handed to the scanner does not exist
    #[error("directory {} does not exist", .0.display())]
    MissingSourceRoot(PathBuf),

    /// The QML module-library root does not exist
    #[error("QML module root {} does not exist", .0.display())]
    MissingModuleRoot(PathBuf),

    /// Failed to resolve a directory to its canonical form
    #[error("failed to resolve {}: {source}", .path.display())]
    Canonicalize { path: PathBuf, source: io::Error },

    /// Failed to read a markup source file
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Failed to walk a directory tree
    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Failed to copy a file or create a directory while staging
    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    /// A module directory to stage is not under the module root
    #[error("{} is not under module root {}", .path.display(), .root.display())]
    OutsideModuleRoot { path: PathBuf, root: PathBuf },

    /// Invalid or unreadable deployment profile
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Other I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for qmlstage operations
pub type Result<T> = std::result::Result<T, Error>;
