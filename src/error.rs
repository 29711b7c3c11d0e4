//! Error types.
//!
//! Only [`ConfigError`] is fatal. Scan and remediation errors are logged at the
//! point they occur and the run carries on with the next entry.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Missing or malformed configuration. Aborts the run before scanning.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid target '{name}' in directory_list: {message}")]
    InvalidTarget { name: String, message: String },

    #[error("failed to read ignore file {path}: {source}")]
    IgnoreFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Per-entry failures while walking a target.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The modification time of an entry could not be read.
    #[error("unable to stat {path}, do you have permission? ({source})")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The walker failed to produce an entry.
    #[error("failed to enumerate entry: {0}")]
    Enumeration(#[from] walkdir::Error),
}

/// A delete or move that did not go through.
#[derive(Debug, Error)]
pub enum RemediationError {
    #[error("failed to delete {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to move {path} to {destination}: {source}")]
    Move {
        path: PathBuf,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to move {path}: {destination} already exists")]
    TrashOccupied { path: PathBuf, destination: PathBuf },

    #[error("{path} has no file name to move into the trash")]
    NoFileName { path: PathBuf },
}
