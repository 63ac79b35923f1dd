//! Error type for the `cookbook-meta` command.

use std::path::PathBuf;

use cookbook_metadata_core::MetadataError;
use thiserror::Error;

/// Errors surfaced by `cookbook-meta` subcommands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failure, with the path involved.
    #[error("failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Metadata validation failure.
    #[error("{0}")]
    Metadata(#[from] MetadataError),

    /// A document at `path` failed metadata validation.
    #[error("'{}': {source}", .path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: MetadataError,
    },

    /// A version did not satisfy the requested constraint.
    #[error("{version} does not satisfy {constraint}")]
    Unsatisfied { version: String, constraint: String },

    /// The cookbook directory name could not be used as a cookbook name.
    #[error("cannot derive a cookbook name from '{}'; pass --name", .0.display())]
    UnnamedCookbook(PathBuf),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for results with [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
