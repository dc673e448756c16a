//! Error types for schema construction.

use thiserror::Error;

/// Configuration errors raised while building a schema or one of its tests.
///
/// Data problems found while validating are never reported here; they go
/// through the schema callback.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown datatype: '{0}'")]
    UnknownDatatype(String),

    #[error("unknown severity: '{0}' (expected 'error' or 'warning')")]
    InvalidSeverity(String),

    #[error("schema has no #valid_tag column")]
    MissingTagColumn,

    /// A rule row could not be interpreted.
    #[error("schema row {row}: {message}")]
    InvalidRule { row: usize, message: String },

    #[error("invalid regular expression '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Model(#[from] hxl_model::ModelError),

    #[error(transparent)]
    Ingest(#[from] hxl_ingest::IngestError),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
