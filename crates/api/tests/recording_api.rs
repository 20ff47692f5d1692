//! Integration tests for the recording catalog and media access.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_bytes, body_json, expect_json, get, send};

fn ids(json: &serde_json::Value) -> Vec<i64> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

/// Write the media file of seeded recording 1 into the test's recordings dir.
fn write_recording_one(dir: &std::path::Path, contents: &[u8]) {
    let recordings = dir.join("recordings");
    std::fs::create_dir_all(&recordings).unwrap();
    std::fs::write(recordings.join("recording_20240115_093000.mp4"), contents).unwrap();
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_defaults_to_first_page_of_ten() {
    let dir = tempfile::tempdir().unwrap();
    let json = expect_json(
        get(common::build_test_app(dir.path()), "/api/recordings").await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(json["total"], 5);
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 10);
    assert_eq!(json["total_pages"], 1);
    assert_eq!(ids(&json), vec![3, 2, 1, 4, 5]);
}

#[tokio::test]
async fn list_pages_and_clamps() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let json = body_json(get(app.clone(), "/api/recordings?page=2&limit=2").await).await;
    assert_eq!(json["total_pages"], 3);
    assert_eq!(ids(&json), vec![1, 4]);

    let json = body_json(get(app.clone(), "/api/recordings?page=9&limit=2").await).await;
    assert_eq!(json["total"], 5);
    assert!(json["data"].as_array().unwrap().is_empty());

    let json = body_json(get(app, "/api/recordings?page=0&limit=1000").await).await;
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 100);
}

#[tokio::test]
async fn list_searches_cnic_and_filters_status() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let json = body_json(get(app.clone(), "/api/recordings?search=12345").await).await;
    assert_eq!(json["total"], 2);
    assert_eq!(ids(&json), vec![1, 5]);

    let json = body_json(get(app.clone(), "/api/recordings?status=in_progress").await).await;
    assert_eq!(ids(&json), vec![3]);
    assert_eq!(json["data"][0]["end_time"], serde_json::Value::Null);

    let response = get(app, "/api/recordings?status=paused").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_returns_record_or_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let json = expect_json(get(app.clone(), "/api/recordings/2").await, StatusCode::OK).await;
    assert_eq!(json["data"]["cnic"], "98765-4321098-7");
    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(json["data"]["duration"], 30);

    let response = get(app, "/api/recordings/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Playback and download
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stream_describes_completed_recordings_only() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let response = get(app.clone(), "/api/recordings/1/stream").await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["stream_url"], "/api/recordings/1/file");
    assert_eq!(json["data"]["file_name"], "recording_20240115_093000.mp4");
    assert_eq!(json["data"]["duration"], 45);
    assert_eq!(json["data"]["content_type"], "video/mp4");

    // In progress and failed recordings are not playable.
    for id in [3, 5] {
        let response = get(app.clone(), &format!("/api/recordings/{id}/stream")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn download_reports_size_when_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let json = body_json(get(app.clone(), "/api/recordings/1/download").await).await;
    assert_eq!(
        json["data"]["download_url"],
        "/api/recordings/1/file?download=true"
    );
    assert_eq!(json["data"]["file_size"], serde_json::Value::Null);

    write_recording_one(dir.path(), b"0123456789");
    let json = body_json(get(app.clone(), "/api/recordings/1/download").await).await;
    assert_eq!(json["data"]["file_size"], 10);

    let response = get(app, "/api/recordings/3/download").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn file_is_served_with_range_support() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let response = get(app.clone(), "/api/recordings/1/file").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    write_recording_one(dir.path(), b"0123456789");

    let response = get(app.clone(), "/api/recordings/1/file").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"0123456789");

    let request = Request::builder()
        .uri("/api/recordings/1/file")
        .header("range", "bytes=2-4")
        .body(Body::empty())
        .unwrap();
    let response = send(app.clone(), request).await;
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(body_bytes(response).await, b"234");

    let response = get(app, "/api/recordings/1/file?download=true").await;
    let disposition = response.headers()["content-disposition"].to_str().unwrap();
    assert!(disposition.starts_with("attachment"));
}
