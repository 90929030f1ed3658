//! Error types for upstream calls.

use thiserror::Error;

/// Failures talking to the image-generation service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// No API key was configured.
    #[error("upstream api key is not configured")]
    MissingApiKey,
    /// Transport failure (connect, timeout, body read).
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("upstream returned {status}: {message}")]
    Api { status: u16, message: String },
    /// The service answered 2xx with a body we cannot use.
    #[error("unexpected upstream response: {0}")]
    UnexpectedResponse(String),
    /// A base64 image body failed to decode.
    #[error("failed to decode image data: {0}")]
    Decode(#[from] base64::DecodeError),
}
