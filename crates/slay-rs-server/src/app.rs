//! Router assembly and middleware.

use crate::error::ApiError;
use crate::routes;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use log::{error, warn};
use serde_json::json;
use slay_rs_config::{CorsConfig, ServerConfig};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Build the full application router over `state`.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(routes::health::banner))
        .route("/api/health", get(routes::health::health))
        .route("/api/girlify", post(routes::generate::girlify))
        .route("/api/generate", post(routes::generate::generate))
        .route(
            "/api/images",
            get(routes::gallery::list_all).post(routes::gallery::create),
        )
        .route("/api/images/latest", get(routes::gallery::latest_default))
        .route("/api/images/latest/{count}", get(routes::gallery::latest))
        .route("/api/stats", get(routes::gallery::stats))
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&server.cors))
}

/// CORS policy. No configured origins, or a `*` entry, mirrors every request origin.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let any_origin = cors.allow_origins.is_empty()
        || cors.allow_origins.iter().any(|origin| origin.trim() == "*");
    let origins = if any_origin {
        AllowOrigin::mirror_request()
    } else {
        let parsed: Vec<HeaderValue> = cors
            .allow_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("ignoring invalid cors origin (origin={origin})");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cors.allow_credentials)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("handler panicked: {detail}");
    let body = json!({ "success": false, "error": "Internal server error" });
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}
