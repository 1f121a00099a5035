//! Error types for walking, parsing and configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::Stats;

/// Errors that terminate a directory walk.
#[derive(Debug, Error)]
pub enum TraversalError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walker failure without an underlying I/O error (e.g. a symlink loop).
    #[error("Walk failed at {path}: {message}")]
    Other { path: PathBuf, message: String },

    /// Walk was cancelled through a token the consumer does not own.
    #[error("Walk interrupted: {path}")]
    Interrupted { path: PathBuf },
}

impl TraversalError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Path the failure occurred at.
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied { path }
            | Self::NotFound { path }
            | Self::NotADirectory { path }
            | Self::Io { path, .. }
            | Self::Other { path, .. }
            | Self::Interrupted { path } => path,
        }
    }
}

/// A file name that does not follow the TOSEC naming grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ParseError {
    #[error("invalid file name format: {file_name}")]
    InvalidFormat { file_name: String },
}

/// Non-fatal diagnostic collected while parsing many file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    /// The file name that failed to parse.
    pub file_name: String,
    /// Why it failed.
    pub error: ParseError,
}

impl ParseFailure {
    /// Create a new parse failure.
    pub fn new(file_name: impl Into<String>, error: ParseError) -> Self {
        Self {
            file_name: file_name.into(),
            error,
        }
    }
}

/// Stats aggregation stopped because the underlying walk failed.
///
/// `partial` holds the counts accumulated before the failure.
#[derive(Debug, Error)]
#[error("stats aggregation aborted: {source}")]
pub struct StatsError {
    pub partial: Stats,
    #[source]
    pub source: TraversalError,
}

/// Errors in platform registry or folder configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Platform identifier not present in the registry.
    #[error("Unknown platform '{name}' (known: {})", .known.join(", "))]
    UnknownPlatform { name: String, known: Vec<String> },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    /// Registry file could not be read.
    #[error("Cannot read platform file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registry file is not valid JSON.
    #[error("Invalid platform file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
