pub(crate) mod gallery;
pub(crate) mod generate;
pub(crate) mod health;

use crate::error::ApiError;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

/// Decode an optional JSON body. A blank body yields `T::default()`.
pub(crate) fn optional_json<T>(body: Result<Bytes, BytesRejection>) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    let bytes = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::InvalidInput(rejection.body_text())
        }
    })?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(&bytes)
        .map_err(|err| ApiError::InvalidInput(format!("invalid JSON body: {err}")))
}
