//! Error types for browsing operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while listing or acting on the filesystem.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Path is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BrowseError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::NotADirectory => Self::NotADirectory { path },
            _ => Self::Io { path, source },
        }
    }

    /// Short human-readable reason, used for placeholder entries.
    pub fn reason(&self) -> String {
        match self {
            Self::PermissionDenied { .. } => "permission denied".into(),
            Self::NotFound { .. } => "not found".into(),
            Self::NotADirectory { .. } => "not a directory".into(),
            Self::Io { source, .. } => source.to_string().to_lowercase(),
        }
    }
}

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range.
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Errors reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StateError {
    /// No directory is available for state files.
    #[error("No state directory available")]
    NoStateDir,

    /// I/O failure on a state file.
    #[error("State file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
