//! Error types for HXL ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, tagging or writing tabular data.
#[derive(Debug, Error)]
pub enum IngestError {
    /// No row in the scanned prefix looked like a hashtag row.
    #[error("no HXL hashtag row found in the first {scanned} rows")]
    NoHashtagRow { scanned: usize },

    /// The tagger could not match enough header specs in the scanned prefix.
    #[error("tagging failed: no header row matched in the first {scanned} rows")]
    TaggingFailed { scanned: usize },

    /// Malformed `Header text#tag` mapping.
    #[error("bad tagging spec: '{0}'")]
    InvalidTagSpec(String),

    #[error("failed to open {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Model(#[from] hxl_model::ModelError),
}

/// Convenience result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
