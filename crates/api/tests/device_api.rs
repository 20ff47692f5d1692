//! Integration tests for the device registry.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, expect_json, get, post_json, put_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_and_trims_input() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_empty_app(dir.path());

    let response = post_json(
        app.clone(),
        "/api/devices",
        json!({ "ip_address": " 10.1.1.1 ", "device_name": " Lobby Camera " }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["ip_address"], "10.1.1.1");
    assert_eq!(json["data"]["device_name"], "Lobby Camera");
    assert!(json["data"]["id"].is_i64());
    assert!(json["data"]["created_on"].is_string());

    let id = json["data"]["id"].as_i64().unwrap();
    let response = get(app, &format!("/api/devices/{id}")).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["device_name"], "Lobby Camera");
}

#[tokio::test]
async fn create_requires_both_fields() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_empty_app(dir.path());

    let response = post_json(app, "/api/devices", json!({ "device_name": "No IP" })).await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("ip_address"));
}

#[tokio::test]
async fn create_treats_null_name_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_empty_app(dir.path());

    let response = post_json(
        app,
        "/api/devices",
        json!({ "ip_address": "10.0.0.9", "device_name": null }),
    )
    .await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "device_name is required");
}

#[tokio::test]
async fn create_rejects_malformed_ip() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_empty_app(dir.path());

    let response = post_json(
        app,
        "/api/devices",
        json!({ "ip_address": "999.1.1.1", "device_name": "Bad" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_registered_ip_is_409() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let response = post_json(
        app,
        "/api/devices",
        json!({ "ip_address": "192.168.1.101", "device_name": "Duplicate" }),
    )
    .await;
    let json = expect_json(response, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(
        json["error"],
        "A device with this IP address already exists"
    );
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_searches_name_and_ip() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let json = body_json(get(app.clone(), "/api/devices").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let json = body_json(get(app.clone(), "/api/devices?search=CAMERA").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json = body_json(get(app, "/api/devices?search=192.168.1.102").await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["device_name"], "Main Hall Recorder");
}

#[tokio::test]
async fn missing_device_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let response = get(common::build_test_app(dir.path()), "/api/devices/999").await;
    let json = expect_json(response, StatusCode::NOT_FOUND).await;
    assert_eq!(json["error"], "Device with id 999 not found");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_changes_only_provided_fields() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let body = json!({ "device_name": "Front Desk" });
    let response = put_json(app, "/api/devices/1", body).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["device_name"], "Front Desk");
    assert_eq!(json["data"]["ip_address"], "192.168.1.101");
}

#[tokio::test]
async fn update_to_another_devices_ip_is_409() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let body = json!({ "ip_address": "192.168.1.102" });
    let response = put_json(app, "/api/devices/1", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn update_rejects_blank_name_and_missing_device() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let body = json!({ "device_name": "   " });
    let response = put_json(app.clone(), "/api/devices/1", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(app, "/api/devices/999", json!({ "device_name": "Ghost" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_mistyped_field_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let response = put_json(app, "/api/devices/1", json!({ "device_name": 7 })).await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_acknowledges_then_404s() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let json = expect_json(delete(app.clone(), "/api/devices/2").await, StatusCode::OK).await;
    assert_eq!(
        json["data"],
        json!({ "success": true, "message": "Device deleted successfully" })
    );

    let response = delete(app.clone(), "/api/devices/2").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(get(app, "/api/devices").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}
