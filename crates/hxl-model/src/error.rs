use thiserror::Error;

/// Errors raised while parsing model-level configuration strings.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed tag spec: '{0}'")]
    InvalidTagSpec(String),
    #[error("malformed tag pattern: '{0}'")]
    InvalidTagPattern(String),
    #[error("malformed row query: '{0}'")]
    InvalidQuery(String),
    #[error("invalid regular expression '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
