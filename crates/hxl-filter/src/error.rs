use thiserror::Error;

/// Configuration errors raised while constructing a filter.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("badly formatted add spec: '{0}'")]
    InvalidAddSpec(String),
    #[error("badly formatted rename spec: '{0}'")]
    InvalidRenameSpec(String),
    #[error("invalid replacement pattern '{pattern}': {source}")]
    InvalidReplacement {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("replacement map has no {0} column")]
    MissingMapColumn(&'static str),
    #[error("count filter needs at least one tag pattern")]
    NoCountPatterns,
    #[error(transparent)]
    Model(#[from] hxl_model::ModelError),
}

pub type Result<T> = std::result::Result<T, FilterError>;
