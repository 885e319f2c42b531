//! Error types for the Vigil client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the report client
///
/// HTTP error statuses are not errors here; they come back as a
/// [`RawResponse`](crate::RawResponse) for the caller to classify.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No usable HTTP response: connect error, timeout, unreadable body
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Response body is not a report-status document
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}
