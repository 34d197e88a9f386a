//! Store error types
//!
//! These never cross the public store boundary: every operation collapses
//! them into a safe default and logs the message. They exist so the cause
//! of a degraded answer is still visible in logs and tests.

use std::path::PathBuf;
use thiserror::Error;

/// Internal outcome of a storage operation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Legacy store error: {0}")]
    Legacy(#[from] rusqlite::Error),

    #[error("Invalid export data: {0}")]
    InvalidEnvelope(&'static str),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short classification used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "io",
            StoreError::Parse(_) => "parse",
            StoreError::Legacy(_) => "legacy",
            StoreError::InvalidEnvelope(_) => "envelope",
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
