use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the engine.
pub type Result<T> = std::result::Result<T, SweepError>;

/// The closed set of failure kinds the engine reports.
///
/// Destructive code paths never let these escape uncaught; they end up as
/// log lines and counters. Only `LogIo` at startup aborts a run.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("cannot classify {path}: {source}")]
    Classification {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot enumerate {path}: {source}")]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete {path} after {attempts} attempts: {source}")]
    Deletion {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("log I/O on {path}: {source}")]
    LogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with status {code:?}")]
    ExternalTool { tool: String, code: Option<i32> },
}
