#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use tower::ServiceExt;

use setcrm_api::config::ServerConfig;
use setcrm_api::router::build_app_router;
use setcrm_api::state::AppState;
use setcrm_db::store::Stores;

/// Build a test `ServerConfig` with defaults and media directories under `dir`.
pub fn test_config(dir: &Path) -> ServerConfig {
    let mut config = ServerConfig::from_lookup(|_| None).expect("default config is valid");
    config.host = "127.0.0.1".to_string();
    config.port = 0;
    config.upload_dir = dir.join("voice");
    config.recordings_dir = dir.join("recordings");
    config
}

/// Build the full application router (same middleware stack as production)
/// over the given stores.
pub fn build_test_app_with(stores: Stores, config: ServerConfig) -> Router {
    build_app_router(AppState::new(stores, config))
}

/// Router over the seeded demo data.
pub fn build_test_app(dir: &Path) -> Router {
    build_test_app_with(Stores::seeded_memory(Utc::now()), test_config(dir))
}

/// Router over empty stores.
pub fn build_empty_app(dir: &Path) -> Router {
    build_test_app_with(Stores::memory(), test_config(dir))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PUT, uri, body).await
}

// ---------------------------------------------------------------------------
// Body helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response) -> Vec<u8> {
    let collected = response.into_body().collect().await.unwrap();
    collected.to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Assert the status and return the JSON body.
pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
