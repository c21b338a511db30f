//! Gallery ingestion integration tests.
//!
//! Run with: `cargo test -p galleria-api --test gallery_upload_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{fixtures, setup_test_app, setup_test_app_with_token};
use serde_json::json;

fn upload_form(kind: &str, part_name: &str, file_name: &str, mime: &str, bytes: Vec<u8>) -> MultipartForm {
    MultipartForm::new()
        .add_text("type", kind.to_string())
        .add_part(
            part_name.to_string(),
            Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_type(mime.to_string()),
        )
        .add_text("categoryId", "7")
        .add_text("category_name", "Weddings")
        .add_text("userId", "user-1")
        .add_text("caption", "sunset over the pier")
}

#[tokio::test]
async fn test_upload_color_landscape_image() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/admin/gallery")
        .multipart(upload_form(
            "image",
            "image",
            "a.jpg",
            "image/jpeg",
            fixtures::color_jpeg(320, 200),
        ))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<serde_json::Value>(), json!({"status": "success"}));

    let records = app.store.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.owner_id, "user-1");
    assert_eq!(record.category_id, "7");
    assert_eq!(record.category_name, "Weddings");
    assert_eq!(record.width_px, 320);
    assert_eq!(record.height_px, 200);
    assert_eq!(record.orientation.as_deref(), Some("landscape"));
    assert_eq!(record.is_black_and_white, Some(false));
    assert_eq!(record.caption, "sunset over the pier");
    assert!(record.is_active);
    assert!(record.asset_url.contains("gallery/Weddings/"));
    assert!(record.asset_public_id.is_some());
    assert_eq!(app.stored_asset_count(), 1);
}

#[tokio::test]
async fn test_upload_grayscale_portrait_image() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/admin/gallery")
        .multipart(upload_form(
            "image",
            "image",
            "b.jpg",
            "image/jpeg",
            fixtures::gray_jpeg(100, 200),
        ))
        .await;

    assert_eq!(response.status_code(), 200);
    let record = &app.store.records()[0];
    assert_eq!(record.orientation.as_deref(), Some("portrait"));
    assert_eq!(record.is_black_and_white, Some(true));
}

#[tokio::test]
async fn test_upload_video_skips_classification() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/admin/gallery")
        .multipart(upload_form(
            "video",
            "video",
            "clip.mp4",
            "video/mp4",
            fixtures::video_bytes(),
        ))
        .await;

    assert_eq!(response.status_code(), 200);
    let record = &app.store.records()[0];
    assert_eq!(record.width_px, 0);
    assert_eq!(record.height_px, 0);
    assert!(record.orientation.is_none());
    assert!(record.is_black_and_white.is_none());
    assert!(record.asset_public_id.is_none());
    assert!(record.asset_url.ends_with(".mp4"));
}

#[tokio::test]
async fn test_missing_file_part_is_rejected() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("type", "image")
        .add_text("categoryId", "7")
        .add_text("category_name", "Weddings")
        .add_text("userId", "user-1");
    let response = app.client().post("/api/admin/gallery").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"error": "No file provided"})
    );
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_missing_type_field_is_rejected() {
    let app = setup_test_app().await;

    // A file part alone must not be bound to any kind.
    let form = MultipartForm::new()
        .add_part(
            "image".to_string(),
            Part::bytes(fixtures::color_jpeg(32, 32))
                .file_name("a.jpg".to_string())
                .mime_type("image/jpeg".to_string()),
        )
        .add_text("categoryId", "7")
        .add_text("category_name", "Weddings")
        .add_text("userId", "user-1");
    let response = app.client().post("/api/admin/gallery").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"error": "No file provided"})
    );
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_unknown_type_value_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/admin/gallery")
        .multipart(upload_form(
            "audio",
            "image",
            "a.jpg",
            "image/jpeg",
            fixtures::color_jpeg(32, 32),
        ))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"error": "No file provided"})
    );
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_missing_category_fields_are_server_error() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("type", "image")
        .add_part(
            "image".to_string(),
            Part::bytes(fixtures::color_jpeg(32, 32))
                .file_name("a.jpg".to_string())
                .mime_type("image/jpeg".to_string()),
        )
        .add_text("userId", "user-1");
    let response = app.client().post("/api/admin/gallery").multipart(form).await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"error": "Error processing request"})
    );
    assert!(app.store.is_empty());
    assert_eq!(app.stored_asset_count(), 0);
}

#[tokio::test]
async fn test_mismatched_part_name_counts_as_no_file() {
    let app = setup_test_app().await;

    // Declared as image but the file arrives under the video part.
    let response = app
        .client()
        .post("/api/admin/gallery")
        .multipart(upload_form(
            "image",
            "video",
            "a.jpg",
            "image/jpeg",
            fixtures::color_jpeg(32, 32),
        ))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"error": "No file provided"})
    );
}

#[tokio::test]
async fn test_undecodable_image_is_server_error() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/admin/gallery")
        .multipart(upload_form(
            "image",
            "image",
            "broken.jpg",
            "image/jpeg",
            fixtures::garbage_bytes(),
        ))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"error": "Error processing request"})
    );
    assert!(app.store.is_empty());
    assert_eq!(app.stored_asset_count(), 0);
}

#[tokio::test]
async fn test_insert_failure_removes_stored_asset() {
    let app = setup_test_app().await;
    app.store.fail_inserts(true);

    let response = app
        .client()
        .post("/api/admin/gallery")
        .multipart(upload_form(
            "image",
            "image",
            "a.jpg",
            "image/jpeg",
            fixtures::color_jpeg(64, 64),
        ))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"error": "Error processing request"})
    );
    assert!(app.store.is_empty());
    // The uploaded binary must not outlive the failed record.
    assert_eq!(app.stored_asset_count(), 0);
}

#[tokio::test]
async fn test_admin_token_required_when_configured() {
    let app = setup_test_app_with_token(Some("secret-token")).await;

    let response = app.client().get("/api/admin/categories").await;
    assert_eq!(response.status_code(), 401);

    let response = app
        .client()
        .get("/api/admin/categories")
        .add_header("x-admin-token", "secret-token")
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_upload_with_admin_token() {
    let app = setup_test_app_with_token(Some("secret-token")).await;

    let response = app
        .client()
        .post("/api/admin/gallery")
        .add_header("x-admin-token", "secret-token")
        .multipart(upload_form(
            "image",
            "image",
            "a.jpg",
            "image/jpeg",
            fixtures::color_jpeg(32, 32),
        ))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.store.len(), 1);
}
