//! Error types for prop synchronization

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown document {0:?}")]
    UnknownDocument(PathBuf),

    #[error("Document {0:?} changed since the edit was planned")]
    StaleDocument(PathBuf),

    #[error("Invalid edit range {start}..{end} in {path:?} (document length {len})")]
    InvalidRange {
        path: PathBuf,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Overlapping edits in {0:?}")]
    OverlappingEdits(PathBuf),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;
