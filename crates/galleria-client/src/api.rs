//! HTTP client for the gallery ingestion endpoint.

use async_trait::async_trait;
use galleria_core::models::MediaKind;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// One fully prepared media item, ready to submit.
#[derive(Debug, Clone)]
pub struct Submission {
    pub media_kind: MediaKind,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub caption: String,
    pub category_id: String,
    pub category_name: String,
    pub uploader_id: String,
}

/// Errors from a single submission.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// The ingestion endpoint as the dispatcher sees it. The HTTP client is the
/// production implementation; tests substitute doubles.
#[async_trait]
pub trait IngestEndpoint: Send + Sync {
    async fn ingest(&self, submission: Submission) -> Result<(), IngestError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the Galleria admin API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    admin_token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, admin_token: Option<String>) -> Self {
        ApiClient {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            admin_token,
        }
    }

    fn build_form(submission: &Submission) -> Result<Form, IngestError> {
        // The file part is named after its kind so the server can tell
        // images and videos apart without sniffing.
        let part_name = match submission.media_kind {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        };
        let part = Part::bytes(submission.bytes.clone())
            .file_name(submission.file_name.clone())
            .mime_str(&submission.content_type)
            .map_err(|e| IngestError::Transport(e.to_string()))?;

        Ok(Form::new()
            .text("type", submission.media_kind.as_str())
            .part(part_name.to_string(), part)
            .text("categoryId", submission.category_id.clone())
            .text("category_name", submission.category_name.clone())
            .text("userId", submission.uploader_id.clone())
            .text("caption", submission.caption.clone()))
    }
}

#[async_trait]
impl IngestEndpoint for ApiClient {
    async fn ingest(&self, submission: Submission) -> Result<(), IngestError> {
        let url = format!("{}/api/admin/gallery", self.base_url);
        let form = Self::build_form(&submission)?;

        let mut request = self.client.post(&url).multipart(form);
        if let Some(token) = &self.admin_token {
            request = request.header("x-admin-token", token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IngestError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Upload failed")
                .to_string(),
        };
        Err(IngestError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
