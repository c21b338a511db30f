//! Gallery ingestion endpoint.
//!
//! Accepts one media file per request as multipart form data, stores the
//! binary on the asset host, classifies images (dimensions, orientation,
//! black-and-white) and persists a single media record. The database write
//! is the last step; a failed insert rolls back the stored asset.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use galleria_core::models::{MediaKind, NewMediaRecord, Orientation};
use galleria_core::AppError;
use galleria_processing::{decode_image, scan_black_and_white};
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
}

struct FilePart {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct UploadForm {
    declared_kind: Option<MediaKind>,
    image: Option<FilePart>,
    video: Option<FilePart>,
    category_id: Option<String>,
    category_name: Option<String>,
    user_id: Option<String>,
    caption: String,
}

/// Image properties derived server-side from the uploaded bytes.
struct ImageTraits {
    width_px: i32,
    height_px: i32,
    orientation: Option<Orientation>,
    is_black_and_white: Option<bool>,
}

impl ImageTraits {
    fn for_video() -> Self {
        ImageTraits {
            width_px: 0,
            height_px: 0,
            orientation: None,
            is_black_and_white: None,
        }
    }
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, HttpAppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "type" => {
                form.declared_kind = MediaKind::parse(&field.text().await?);
            }
            "image" | "video" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?.to_vec();
                let part = FilePart {
                    file_name,
                    content_type,
                    bytes,
                };
                if name == "image" {
                    form.image = Some(part);
                } else {
                    form.video = Some(part);
                }
            }
            "categoryId" => form.category_id = Some(field.text().await?),
            "category_name" => form.category_name = Some(field.text().await?),
            "userId" => form.user_id = Some(field.text().await?),
            "caption" => form.caption = field.text().await?,
            _ => {
                tracing::debug!(field = %name, "Ignoring unknown form field");
            }
        }
    }

    Ok(form)
}

// A missing category or uploader field renders as the generic server
// failure; only the absent file part gets its own 400.
fn required(value: Option<String>, field: &str) -> Result<String, HttpAppError> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| {
        HttpAppError(AppError::Internal(format!(
            "Missing required field: {}",
            field
        )))
    })
}

async fn classify_image(bytes: Vec<u8>) -> Result<ImageTraits, HttpAppError> {
    let traits = tokio::task::spawn_blocking(move || {
        let img = decode_image(&bytes)?;
        let width = img.width();
        let height = img.height();
        let (is_bw, scanned) = scan_black_and_white(&img);
        tracing::debug!(width, height, is_bw, scanned, "Classified uploaded image");
        Ok::<_, galleria_processing::TranscodeError>(ImageTraits {
            width_px: width as i32,
            height_px: height as i32,
            orientation: Some(Orientation::from_dimensions(width, height)),
            is_black_and_white: Some(is_bw),
        })
    })
    .await
    .map_err(|e| HttpAppError(AppError::Internal(format!("Classification task failed: {e}"))))?
    .map_err(|e| HttpAppError(AppError::MediaConversion(e.to_string())))?;

    Ok(traits)
}

/// Handle `POST /api/admin/gallery`.
#[tracing::instrument(skip(state, multipart), fields(operation = "gallery_upload"))]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let form = read_form(multipart).await?;

    // The declared kind selects the file part. With no parseable `type`
    // there is nothing to bind, so both a missing kind and a mismatched
    // part count as no file.
    let kind = form
        .declared_kind
        .ok_or_else(|| HttpAppError(AppError::BadRequest("No file provided".to_string())))?;
    let file = match kind {
        MediaKind::Image => form.image,
        MediaKind::Video => form.video,
    }
    .filter(|f| !f.bytes.is_empty())
    .ok_or_else(|| HttpAppError(AppError::BadRequest("No file provided".to_string())))?;

    let category_id = required(form.category_id, "categoryId")?;
    let category_name = required(form.category_name, "category_name")?;
    let user_id = required(form.user_id, "userId")?;

    let traits = match kind {
        MediaKind::Image => classify_image(file.bytes.clone()).await?,
        MediaKind::Video => ImageTraits::for_video(),
    };

    let folder = format!("gallery/{}", category_name);
    let public_id = Utc::now().timestamp_millis().to_string();
    let stored = state
        .assets
        .upload(&folder, &public_id, &file.content_type, file.bytes)
        .await?;

    tracing::info!(
        file = %file.file_name,
        kind = %kind.as_str(),
        public_id = %stored.public_id,
        "Stored gallery asset"
    );

    let record = NewMediaRecord {
        owner_id: user_id,
        category_id,
        category_name,
        asset_url: stored.url.clone(),
        asset_public_id: match kind {
            MediaKind::Image => Some(stored.public_id.clone()),
            MediaKind::Video => None,
        },
        media_kind: kind,
        orientation: traits.orientation,
        width_px: traits.width_px,
        height_px: traits.height_px,
        caption: form.caption,
        is_active: true,
        is_black_and_white: traits.is_black_and_white,
    };

    match state.media.create_record(record).await {
        Ok(row) => {
            tracing::info!(id = %row.id, category = %row.category_name, "Persisted media record");
            Ok(Json(UploadResponse { status: "success" }))
        }
        Err(e) => {
            // The asset must not outlive a failed record.
            if let Err(cleanup) = state.assets.delete(&stored.public_id).await {
                tracing::warn!(
                    public_id = %stored.public_id,
                    error = %cleanup,
                    "Failed to remove orphaned asset after insert failure"
                );
            }
            Err(HttpAppError(e))
        }
    }
}
