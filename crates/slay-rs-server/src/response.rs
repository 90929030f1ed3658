//! JSON envelope shared by every route.

use axum::Json;
use serde::Serialize;

/// `{ "success": true, ...data }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

/// Wrap a serializable body in a success envelope.
pub(crate) fn success<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}
