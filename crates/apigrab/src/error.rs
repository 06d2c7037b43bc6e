//! Error types for apigrab

use crate::client::redacted_url;
use std::error::Error as _;
use thiserror::Error;

/// Errors that can occur while querying an API or saving its result
#[derive(Debug, Error)]
pub enum FetchError {
    /// Tag is missing or blank
    #[error("Missing required argument: tag")]
    MissingTag,

    /// Tag cannot be used as a file name
    #[error("Invalid tag {0:?}: must not contain path separators")]
    InvalidTag(String),

    /// Title is missing or blank
    #[error("Missing required argument: title")]
    MissingTitle,

    /// No Giphy credential was supplied
    #[error("Missing Giphy API key: pass --api-key or set GIPHY_API_KEY")]
    MissingApiKey,

    /// Endpoint override is not an http(s) URL
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request or body read exceeded its deadline
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server: {detail}")]
    ConnectError {
        detail: String,
        #[source]
        source: reqwest::Error,
    },

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Server answered with a non-success status
    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Body is not valid JSON or lacks an expected field
    #[error("Unexpected response shape: {0}")]
    MalformedResponse(String),

    /// Writing the downloaded file failed
    #[error("File write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Create an error from a reqwest error
    ///
    /// Secret query parameters are redacted from the URL reqwest attaches
    /// to the error before it is stored or formatted.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let redacted = err.url().map(redacted_url);
        let err = match redacted {
            Some(url) => err.with_url(url),
            None => err,
        };

        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::ConnectError {
                detail: describe(&err),
                source: err,
            }
        } else {
            FetchError::RequestError(describe(&err))
        }
    }

    /// True if the request never produced a usable HTTP exchange
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FetchError::Timeout
                | FetchError::ConnectError { .. }
                | FetchError::RequestError(_)
                | FetchError::HttpStatus { .. }
        )
    }

    /// True if the server answered but the body had the wrong shape
    pub fn is_malformed(&self) -> bool {
        matches!(self, FetchError::MalformedResponse(_))
    }
}

/// Error message followed by its cause chain
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
