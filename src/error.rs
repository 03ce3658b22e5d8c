//! Error types for the Flickr client
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Flickr Error Enum ==
/// Unified error type for REST calls, uploads and multipart encoding.
///
/// The cache never produces one of these: a miss or an expired entry is
/// reported as `None`.
#[derive(Error, Debug)]
pub enum FlickrError {
    /// Non-200 reply to an upload or replace request
    #[error("HTTP Error {status}: {body}")]
    Http { status: u16, body: String },

    /// 5xx reply to a REST call
    #[error("HTTP Server Error {status}: {body}")]
    Server { status: u16, body: String },

    /// Flickr answered with `stat="fail"`
    #[error("{code} : {message}")]
    Api { code: i64, message: String },

    /// Multipart input that cannot be encoded safely
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// URL that cannot be split into host and path
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// No API key or secret configured
    #[error("The Flickr API keys have not been set")]
    MissingKeys,

    /// Method name absent from the method table
    #[error("Unknown Flickr API method: {0}")]
    UnknownMethod(String),

    /// Reply that parsed but did not have the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Fault raised by the HTTP transport, passed through as-is
    #[error("{0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FlickrError {
    fn from(err: reqwest::Error) -> Self {
        FlickrError::Transport(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the Flickr client.
pub type Result<T> = std::result::Result<T, FlickrError>;
