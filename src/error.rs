//! Error types for rejectgen.

use thiserror::Error;

/// Error type for rejectgen operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Download error
    #[error("download error: {0}")]
    Download(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// A rule entry in the config is missing a field or has an invalid value
    #[error("invalid rule #{index} ({name}): {reason}")]
    InvalidRuleSpec {
        index: usize,
        name: String,
        reason: String,
    },
}

/// Result type alias for rejectgen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pattern normalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Empty candidate
    #[error("empty domain pattern")]
    Empty,

    /// Candidate contains whitespace
    #[error("domain pattern contains whitespace: {0}")]
    Whitespace(String),

    /// Candidate contains characters not valid for its match kind
    #[error("invalid domain pattern: {0}")]
    InvalidHostname(String),
}
