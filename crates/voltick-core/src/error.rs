use thiserror::Error;

/// Validation and contract errors exposed by `voltick-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,

    #[error("delimiter must be a single ASCII character: '{value}'")]
    InvalidDelimiter { value: String },
    #[error("feed source cannot be empty")]
    EmptySource,

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Failures while fetching or opening a feed. These are the only fatal
/// conditions of a load; per-row problems never surface here.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read feed file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("http transport error for '{url}': {message}")]
    Transport { url: String, message: String },

    #[error("feed '{url}' answered with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("feed header could not be read: {0}")]
    Header(#[from] csv::Error),
}
