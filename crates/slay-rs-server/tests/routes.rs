//! Router tests driven through `tower::ServiceExt::oneshot` with fake upstreams.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use slay_rs_config::{CorsConfig, ServerConfig, SlayConfig};
use slay_rs_gallery::BoundedRecordLog;
use slay_rs_server::{AppState, build_router};
use slay_rs_test_utils::{FailingGenerator, FixedAnalyzer, FixedGenerator, RecordingGenerator};
use slay_rs_upstream::StylePicker;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "slayboundary";

fn state_with(generator: RecordingGenerator, analyzer: FixedAnalyzer) -> AppState {
    AppState::new(
        Arc::new(BoundedRecordLog::default()),
        Arc::new(generator),
        Arc::new(analyzer),
    )
}

fn default_app() -> (Router, AppState) {
    let state = state_with(RecordingGenerator::new(), FixedAnalyzer::default());
    (build_router(state.clone(), &ServerConfig::default()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn multipart_request(field: &str, mime: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"me.png\"\r\nContent-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    Request::builder()
        .method("POST")
        .uri("/api/girlify")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn health_reports_upstream_status() {
    let state = state_with(RecordingGenerator::new(), FixedAnalyzer::default())
        .with_upstream_configured(false);
    let app = build_router(state, &ServerConfig::default());

    let (status, body) = send(&app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["openai"], json!("Not configured"));
    assert!(body.get("upstreamConfigured").is_none());
}

#[tokio::test]
async fn banner_has_timestamp() {
    let (app, _) = default_app();
    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn stored_images_are_listed_newest_first() {
    let (app, _) = default_app();

    let (status, body) = send(
        &app,
        post_json("/api/images", json!({ "imageUrl": "data:image/png;base64,AAAA" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["image"]["imageUrl"], json!("data:image/png;base64,AAAA"));
    assert_eq!(body["image"]["sequence"], json!(0));

    send(
        &app,
        post_json("/api/images", json!({ "imageUrl": "data:image/png;base64,BBBB" })),
    )
    .await;

    let (status, body) = send(&app, get("/api/images")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(2));
    assert_eq!(
        body["images"][0]["imageUrl"],
        json!("data:image/png;base64,BBBB")
    );
    assert_eq!(
        body["images"][1]["imageUrl"],
        json!("data:image/png;base64,AAAA")
    );
}

#[tokio::test]
async fn empty_payload_is_rejected() {
    let (app, state) = default_app();

    let (status, body) = send(&app, post_json("/api/images", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().is_some());

    let (status, _) = send(&app, post_json("/api/images", json!({ "imageUrl": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(state.gallery.is_empty());
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let (app, _) = default_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/images")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{imageUrl"))
        .expect("request");

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn latest_path_is_coerced() {
    let (app, state) = default_app();
    for idx in 0..12 {
        state
            .gallery
            .insert(format!("data:image/png;base64,{idx}"))
            .expect("insert");
    }

    let (_, body) = send(&app, get("/api/images/latest")).await;
    assert_eq!(body["count"], json!(10));

    let (_, body) = send(&app, get("/api/images/latest/3")).await;
    assert_eq!(body["count"], json!(3));
    assert_eq!(
        body["images"][0]["imageUrl"],
        json!("data:image/png;base64,11")
    );

    let (status, body) = send(&app, get("/api/images/latest/abc")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(10));

    let (_, body) = send(&app, get("/api/images/latest/-4")).await;
    assert_eq!(body["count"], json!(10));

    let (_, body) = send(&app, get("/api/images/latest/40")).await;
    assert_eq!(body["count"], json!(12));
}

#[tokio::test]
async fn stats_count_todays_images() {
    let (app, state) = default_app();
    state.gallery.insert("data:image/png;base64,AA").expect("insert");
    state.gallery.insert("data:image/png;base64,BB").expect("insert");

    let (status, body) = send(&app, get("/api/stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "total": 2, "today": 2 }));
}

#[tokio::test]
async fn generate_uses_seeded_style_and_stores_image() {
    let generator = RecordingGenerator::new();
    let state = state_with(generator.clone(), FixedAnalyzer::default());
    let app = build_router(state.clone(), &ServerConfig::default());

    let (status, body) = send(&app, post_json("/api/generate", json!({ "seed": 7 }))).await;

    let expected = StylePicker::pick_seeded(7).prompt();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prompt"], json!(expected));
    assert_eq!(body["imageUrl"], json!("data:image/png;base64,c2xheQ=="));
    assert_eq!(generator.prompts(), vec![expected.clone()]);

    let stored = state.gallery.list_all();
    assert_eq!(stored.len(), 1);
    assert_eq!(body["id"], json!(stored[0].id));
    assert_eq!(stored[0].prompt.as_deref(), Some(expected.as_str()));
}

#[tokio::test]
async fn generate_accepts_empty_body() {
    let state = state_with(RecordingGenerator::new(), FixedAnalyzer::default())
        .with_styles(StylePicker::new(Some(3)));
    let app = build_router(state.clone(), &ServerConfig::default());
    let request = Request::builder()
        .method("POST")
        .uri("/api/generate")
        .body(Body::empty())
        .expect("request");

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["prompt"].as_str().is_some_and(|prompt| !prompt.is_empty()));
    assert_eq!(state.gallery.len(), 1);
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let state = AppState::new(
        Arc::new(BoundedRecordLog::default()),
        Arc::new(FailingGenerator::new(500, "boom")),
        Arc::new(FixedAnalyzer::default()),
    );
    let app = build_router(state.clone(), &ServerConfig::default());

    let (status, body) = send(&app, post_json("/api/generate", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Failed to generate image"));
    assert!(body["details"].as_str().is_some_and(|details| details.contains("boom")));
    assert!(state.gallery.is_empty());
}

#[tokio::test]
async fn missing_api_key_is_service_unavailable() {
    let state = AppState::from_config(&SlayConfig::default()).expect("state");
    assert!(!state.upstream_configured);
    let app = build_router(state, &ServerConfig::default());

    let (status, body) = send(&app, post_json("/api/generate", json!({}))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn girlify_analyzes_then_generates() {
    let generator = RecordingGenerator::new();
    let analyzer = FixedAnalyzer::new("a dog sitting on grass");
    let state = state_with(generator.clone(), analyzer.clone());
    let app = build_router(state.clone(), &ServerConfig::default());

    let (status, body) = send(&app, multipart_request("image", "image/png", b"\x89PNG")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["imageUrl"], json!("data:image/png;base64,c2xheQ=="));
    assert!(body["message"].as_str().is_some_and(|message| message.starts_with("Slay queen")));

    let uploads = analyzer.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].mime_type, "image/png");
    assert_eq!(uploads[0].file_name.as_deref(), Some("me.png"));
    assert_eq!(uploads[0].bytes, b"\x89PNG".to_vec());

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("a dog sitting on grass"));
    assert_eq!(state.gallery.len(), 1);
}

#[tokio::test]
async fn girlify_requires_image_field() {
    let (app, state) = default_app();

    let (status, body) = send(&app, multipart_request("avatar", "image/png", b"\x89PNG")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("No image file provided"));
    assert!(state.gallery.is_empty());
}

#[tokio::test]
async fn girlify_rejects_non_images_and_empty_files() {
    let (app, _) = default_app();

    let (status, _) = send(&app, multipart_request("image", "text/plain", b"hello")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, multipart_request("image", "image/png", b"")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn girlify_upstream_failure_reports_context() {
    let state = AppState::new(
        Arc::new(BoundedRecordLog::default()),
        Arc::new(FixedGenerator::default()),
        Arc::new(FailingGenerator::default()),
    );
    let app = build_router(state, &ServerConfig::default());

    let (status, body) = send(&app, multipart_request("image", "image/jpeg", b"\xff\xd8")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], json!("Failed to girlify image"));
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let (_, state) = default_app();
    let server = ServerConfig {
        max_upload_bytes: 64,
        ..ServerConfig::default()
    };
    let app = build_router(state.clone(), &server);
    let payload = format!("data:image/png;base64,{}", "A".repeat(256));

    let (status, body) = send(&app, post_json("/api/images", json!({ "imageUrl": payload }))).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], json!(false));
    assert!(state.gallery.is_empty());
}

#[tokio::test]
async fn unknown_route_is_json_not_found() {
    let (app, _) = default_app();
    let (status, body) = send(&app, get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "not found" }));
}

#[tokio::test]
async fn cors_mirrors_origin_with_credentials() {
    let (app, _) = default_app();
    let request = Request::builder()
        .uri("/api/health")
        .header(header::ORIGIN, "https://slay.example")
        .body(Body::empty())
        .expect("request");

    let response = app.oneshot(request).await.expect("response");

    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("https://slay.example")
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|value| value.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn wildcard_origin_is_mirrored() {
    let (_, state) = default_app();
    let server = ServerConfig {
        cors: CorsConfig {
            allow_origins: vec!["https://slay.example".to_string(), "*".to_string()],
            allow_credentials: true,
        },
        ..ServerConfig::default()
    };
    let app = build_router(state, &server);
    let request = Request::builder()
        .uri("/api/health")
        .header(header::ORIGIN, "https://other.example")
        .body(Body::empty())
        .expect("request");

    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("https://other.example")
    );
}

#[tokio::test]
async fn listed_origins_only_allow_those_origins() {
    let (_, state) = default_app();
    let server = ServerConfig {
        cors: CorsConfig {
            allow_origins: vec!["https://slay.example".to_string()],
            allow_credentials: true,
        },
        ..ServerConfig::default()
    };
    let app = build_router(state, &server);
    let request = Request::builder()
        .uri("/api/health")
        .header(header::ORIGIN, "https://other.example")
        .body(Body::empty())
        .expect("request");

    let response = app.oneshot(request).await.expect("response");

    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn revised_prompt_is_stored_with_the_image() {
    let state = AppState::new(
        Arc::new(BoundedRecordLog::default()),
        Arc::new(FixedGenerator::default().with_revised_prompt("a glossy chrome portrait")),
        Arc::new(FixedAnalyzer::default()),
    );
    let app = build_router(state.clone(), &ServerConfig::default());

    let (status, body) = send(&app, post_json("/api/generate", json!({ "seed": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prompt"], json!("a glossy chrome portrait"));

    let (status, _) = send(&app, multipart_request("image", "image/png", b"\x89PNG")).await;
    assert_eq!(status, StatusCode::OK);

    let stored: Vec<Option<String>> = state
        .gallery
        .list_all()
        .iter()
        .map(|record| record.prompt.clone())
        .collect();
    assert_eq!(
        stored,
        vec![
            Some("a glossy chrome portrait".to_string()),
            Some("a glossy chrome portrait".to_string()),
        ]
    );
}
