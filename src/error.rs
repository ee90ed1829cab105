//! Error type shared by every fallible operation in the crate.
//!
//! Matching itself never fails: a candidate that resolves to nothing is `None`
//! or [`crate::GameId::Unknown`]. Errors are reserved for I/O around the
//! catalog, the manual mapping table and the export boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SaveIdError>;

#[derive(Debug, Error)]
pub enum SaveIdError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("no catalog file found in {dir}")]
    CatalogNotFound { dir: PathBuf },

    #[error("catalog {path} is unusable: {reason}")]
    InvalidCatalog { path: PathBuf, reason: String },

    #[error("invalid identifier rule `{pattern}`: {reason}")]
    InvalidRule { pattern: String, reason: String },

    #[error("manual mapping table {path} could not be written: {reason}")]
    MappingWrite { path: PathBuf, reason: String },

    #[error("lock error: {0}")]
    Lock(String),

    #[error("`{id}` is not a canonical id in the loaded catalog")]
    UnknownCanonicalId { id: String },

    #[error("{count} file(s) have no resolved game id (first: {sample})")]
    UnresolvedFiles { count: usize, sample: String },

    #[error("reconciliation session has no pending group")]
    ReconcileFinished,
}
