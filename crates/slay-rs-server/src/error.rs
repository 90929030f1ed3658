//! Error types for the HTTP layer.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use serde_json::json;
use slay_rs_gallery::GalleryError;
use slay_rs_upstream::UpstreamError;
use thiserror::Error;

/// Friendly hint attached to upstream failures.
const UPSTREAM_HINT: &str = "Oops! Something went wrong with the AI magic! Try again bestie";

/// Errors surfaced to HTTP clients as `{ success: false, error }`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("{0}")]
    InvalidInput(String),
    /// Request body over the configured limit.
    #[error("{0}")]
    PayloadTooLarge(String),
    /// The image service failed.
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: UpstreamError,
    },
    /// Unknown route.
    #[error("not found")]
    NotFound,
}

impl ApiError {
    /// Wrap an upstream failure with a short client-facing summary.
    pub fn upstream(context: &'static str, source: UpstreamError) -> Self {
        Self::Upstream { context, source }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream {
                source: UpstreamError::MissingApiKey,
                ..
            } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<GalleryError> for ApiError {
    fn from(err: GalleryError) -> Self {
        match err {
            GalleryError::InvalidInput(message) => Self::InvalidInput(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Upstream { context, source } => {
                error!("upstream failure ({context}): {source}");
                json!({
                    "success": false,
                    "error": context,
                    "details": source.to_string(),
                    "message": UPSTREAM_HINT,
                })
            }
            other => {
                warn!("request rejected (status={}): {other}", status.as_u16());
                json!({ "success": false, "error": other.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Errors starting or running the listener.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding the listen address failed.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    /// The accept loop stopped with an error.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
