//! Upload and health API integration tests.
//!
//! Run with: `cargo test -p blobdrop-api --test files_test`

mod helpers;

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS,
    ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use helpers::{create_test_config, file_form, setup_test_app, setup_test_app_with};
use serde_json::Value;

const UPLOAD: &str = "/api/files/upload";

#[tokio::test]
async fn test_health_reports_limits() {
    let app = setup_test_app();

    let response = app.client().get("/api/files/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["maxFileSize"], 2_097_152);
    assert_eq!(
        json["allowedTypes"],
        serde_json::json!(["image/jpeg", "image/png", "image/gif"])
    );
    assert!(json["timestamp"].is_string());
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_upload_image() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(UPLOAD)
        .multipart(file_form("photo.png", "image/png", vec![1u8; 512_000]))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["fileName"], "photo_20240601120000.png");
    assert!(json["url"]
        .as_str()
        .unwrap()
        .ends_with("/tprofiletest/photo_20240601120000.png"));
    assert_eq!(json["fileSize"], 512_000);
    assert_eq!(json["contentType"], "image/png");
    assert!(json["uploadedAt"].is_string());

    let stored = app.store.get("photo_20240601120000.png").unwrap();
    assert_eq!(stored.data.len(), 512_000);
    assert_eq!(stored.content_type, "image/png");
}

#[tokio::test]
async fn test_mixed_case_content_type_is_accepted() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(UPLOAD)
        .multipart(file_form("Cat.JPG", "image/JPEG", vec![1u8; 64]))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    // multipart parsing lowercases the part's mime type
    assert_eq!(json["contentType"], "image/jpeg");
    assert_eq!(json["fileName"], "Cat_20240601120000.JPG");
}

#[tokio::test]
async fn test_missing_file_is_rejected() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_text("description", "profile picture");
    let response = app.client().post(UPLOAD).multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "No file provided.");
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_empty_file_is_rejected() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(UPLOAD)
        .multipart(file_form("photo.png", "image/png", Vec::new()))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["message"], "No file provided.");
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_oversized_file_is_rejected() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(UPLOAD)
        .multipart(file_form("big.jpg", "image/jpeg", vec![0u8; 2_097_153]))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(
        json["message"],
        "File size exceeds the maximum limit of 2MB."
    );
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_file_at_limit_is_accepted() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(UPLOAD)
        .multipart(file_form("big.jpg", "image/jpeg", vec![0u8; 2_097_152]))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["fileSize"], 2_097_152);
}

#[tokio::test]
async fn test_disallowed_content_type_never_reaches_storage() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(UPLOAD)
        .multipart(file_form(
            "virus.png",
            "application/octet-stream",
            vec![0x4d, 0x5a, 0x90, 0x00],
        ))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["message"], "Only JPG, PNG, and GIF images are allowed.");
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_content_type_with_parameters_is_rejected() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(UPLOAD)
        .multipart(file_form("photo.png", "image/png; x=y", vec![1u8; 10]))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["message"], "Only JPG, PNG, and GIF images are allowed.");
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_dot_only_file_name_is_stored_with_empty_base() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(UPLOAD)
        .multipart(file_form(".png", "image/png", vec![1u8; 10]))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["fileName"], "_20240601120000.png");
}

#[tokio::test]
async fn test_disallowed_extension_is_rejected() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(UPLOAD)
        .multipart(file_form("photo.bmp", "image/png", vec![1u8; 10]))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(
        json["message"],
        "Invalid file extension. Only .jpg, .jpeg, .png, and .gif are allowed."
    );
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_same_name_in_same_second_gets_token() {
    let app = setup_test_app();

    let first = app
        .client()
        .post(UPLOAD)
        .multipart(file_form("same.jpg", "image/jpeg", vec![1u8; 10]))
        .await;
    let second = app
        .client()
        .post(UPLOAD)
        .multipart(file_form("same.jpg", "image/jpeg", vec![2u8; 10]))
        .await;

    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(second.status_code(), StatusCode::OK);
    let first: Value = first.json();
    let second: Value = second.json();
    assert_eq!(first["fileName"], "same_20240601120000.jpg");

    let second_name = second["fileName"].as_str().unwrap();
    let token = second_name
        .strip_prefix("same_20240601120000_")
        .and_then(|rest| rest.strip_suffix(".jpg"))
        .expect("token-suffixed name");
    assert_eq!(token.len(), 32);

    // Both objects survive
    assert_eq!(app.store.get("same_20240601120000.jpg").unwrap().data[0], 1);
    assert_eq!(app.store.get(second_name).unwrap().data[0], 2);
}

#[tokio::test]
async fn test_existing_object_is_not_overwritten() {
    let app = setup_test_app();
    app.store.seed("avatar_20240601120000.gif");

    let response = app
        .client()
        .post(UPLOAD)
        .multipart(file_form("avatar.gif", "image/gif", b"GIF89a".to_vec()))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    let name = json["fileName"].as_str().unwrap();
    assert_ne!(name, "avatar_20240601120000.gif");
    assert!(name.starts_with("avatar_20240601120000_"));
    assert!(app.store.get("avatar_20240601120000.gif").unwrap().data.is_empty());
}

#[tokio::test]
async fn test_storage_failure_hides_internal_text() {
    let app = setup_test_app();
    app.store.fail_puts("connection reset by peer (os error 104)");

    let response = app
        .client()
        .post(UPLOAD)
        .multipart(file_form("photo.png", "image/png", vec![1u8; 100]))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Failed to upload file to blob storage.");
    assert!(json.get("detailedError").is_none());
    assert!(!response.text().contains("connection reset"));
}

#[tokio::test]
async fn test_storage_failure_detail_when_enabled() {
    let mut config = create_test_config();
    config.show_detailed_errors = true;
    let app = setup_test_app_with(config);
    app.store.fail_exists("403 AuthorizationFailure");

    let response = app
        .client()
        .post(UPLOAD)
        .multipart(file_form("photo.png", "image/png", vec![1u8; 100]))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(
        json["message"],
        "Failed to check blob storage for an existing file."
    );
    assert!(json["detailedError"]
        .as_str()
        .unwrap()
        .contains("403 AuthorizationFailure"));
    assert_eq!(app.store.put_calls(), 0);
}

#[tokio::test]
async fn test_multiple_file_fields_are_rejected() {
    let app = setup_test_app();

    let form = MultipartForm::new()
        .add_part(
            "file",
            Part::bytes(vec![1u8; 10])
                .file_name("a.png")
                .mime_type("image/png"),
        )
        .add_part(
            "file",
            Part::bytes(vec![1u8; 10])
                .file_name("b.png")
                .mime_type("image/png"),
        );
    let response = app.client().post(UPLOAD).multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["message"], "Invalid multipart request body.");
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_first_named_part_used_without_file_field() {
    let app = setup_test_app();

    let form = MultipartForm::new()
        .add_text("description", "profile picture")
        .add_part(
            "image",
            Part::bytes(vec![1u8; 10])
                .file_name("me.png")
                .mime_type("image/png"),
        );
    let response = app.client().post(UPLOAD).multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["fileName"], "me_20240601120000.png");
}

#[tokio::test]
async fn test_non_multipart_body_is_rejected() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(UPLOAD)
        .json(&serde_json::json!({ "file": "photo.png" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Invalid multipart request body.");
}

#[tokio::test]
async fn test_custom_route_prefix() {
    let mut config = create_test_config();
    config.route_prefix = "/v2/images".to_string();
    let app = setup_test_app_with(config);

    let response = app
        .client()
        .post("/v2/images/upload")
        .multipart(file_form("photo.png", "image/png", vec![1u8; 10]))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app.client().get("/api/files/health").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_for_configured_origin() {
    let app = setup_test_app();

    let response = app
        .client()
        .method(Method::OPTIONS, UPLOAD)
        .add_header(ORIGIN, HeaderValue::from_static("http://localhost:3000"))
        .add_header(
            ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .add_header(
            ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("x-requested-with"),
        )
        .await;

    let headers = response.headers();
    assert_eq!(
        headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");
}

#[tokio::test]
async fn test_cors_ignores_unknown_origin() {
    let app = setup_test_app();

    let response = app
        .client()
        .method(Method::OPTIONS, UPLOAD)
        .add_header(ORIGIN, HeaderValue::from_static("https://evil.example"))
        .add_header(
            ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .await;

    assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_openapi_served_outside_production() {
    let app = setup_test_app();
    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert!(json["paths"].get("/api/files/upload").is_some());

    let mut config = create_test_config();
    config.environment = "production".to_string();
    let app = setup_test_app_with(config);
    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
