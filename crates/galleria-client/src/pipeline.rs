//! The operator upload pipeline: intake, transcoding, staging and the
//! sequential dispatcher.
//!
//! Files enter through `add_files`, which validates the batch, converts HEIC
//! payloads, recompresses images and stages the results with local preview
//! handles. `commit` then submits every uploadable staged item one at a time,
//! tolerating per-item failures, and clears the staging area only when the
//! whole batch went through.

use std::sync::Arc;

use galleria_core::models::{CategorySelection, FieldError, FileUpload, MediaKind};
use galleria_processing::{
    compress_image, default_heic_converter, is_heic_filename, jpeg_file_name, CompressionOptions,
    HeicConverter, IntakeLimits, IntakeValidator,
};

use crate::api::{IngestEndpoint, Submission};
use crate::preview::PreviewHandle;
use crate::progress::ProgressTracker;
use crate::staging::{MediaId, ProcessedFile, StagedMedia, StagingArea};

const HEIC_FAILURE_MESSAGE: &str = "Failed to convert HEIC file";

/// Tunables for the pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub limits: IntakeLimits,
    pub compression: CompressionOptions,
}

/// Preconditions that stop a commit before anything is dispatched.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommitError {
    #[error("Please select files to upload")]
    NoFiles,

    #[error("Please select a category")]
    NoCategory,

    #[error("User session expired. Please log in again")]
    NoSession,
}

/// Summary of a dispatch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub succeeded: usize,
    pub failed: usize,
    /// Items left out of the run because of an earlier processing error.
    pub skipped: usize,
    /// Whether the staging area was cleared after the run.
    pub cleared: bool,
    /// Post-upload navigation target, set only on a fully clean run.
    pub redirect: Option<String>,
    pub messages: Vec<String>,
}

/// Client-side upload pipeline.
pub struct UploadPipeline {
    validator: IntakeValidator,
    compression: CompressionOptions,
    heic: Arc<dyn HeicConverter>,
    staging: StagingArea,
    tracker: ProgressTracker,
}

impl UploadPipeline {
    pub fn new(options: PipelineOptions) -> Self {
        UploadPipeline {
            validator: IntakeValidator::new(options.limits),
            compression: options.compression,
            heic: default_heic_converter(),
            staging: StagingArea::new(),
            tracker: ProgressTracker::new(),
        }
    }

    /// Substitute the HEIC converter, mainly for failure-injecting doubles.
    pub fn with_heic_converter(mut self, converter: Arc<dyn HeicConverter>) -> Self {
        self.heic = converter;
        self
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Validate and process a batch of candidate files into the staging
    /// area. Returns the validation messages for everything rejected; files
    /// that fail HEIC conversion are still staged, marked errored.
    pub async fn add_files(&mut self, incoming: Vec<FileUpload>) -> Vec<FieldError> {
        let result = self.validator.partition(
            self.staging.len(),
            self.staging.total_bytes(),
            incoming,
        );

        for file in result.accepted {
            let item = self.process_file(file).await;
            if let Err(e) = self.staging.insert(item) {
                // Ids are random; a collision within a session is a bug.
                tracing::error!(error = %e, "Failed to stage processed file");
            }
        }

        result.errors
    }

    async fn process_file(&self, file: FileUpload) -> StagedMedia {
        let kind = MediaKind::from_content_type(&file.content_type).unwrap_or(MediaKind::Image);
        let mut item = StagedMedia::new(file, kind);

        if kind == MediaKind::Video {
            item.preview = make_preview(&item.original.bytes, &item.id);
            return item;
        }

        // HEIC first, so the compressor always sees a decodable format.
        let mut working = None;
        if is_heic_filename(&item.original.file_name) {
            let converter = Arc::clone(&self.heic);
            let bytes = item.original.bytes.clone();
            let converted = tokio::task::spawn_blocking(move || converter.convert_to_jpeg(&bytes))
                .await
                .unwrap_or_else(|e| {
                    Err(galleria_processing::TranscodeError::HeicConversion(
                        e.to_string(),
                    ))
                });
            match converted {
                Ok(jpeg) => {
                    working = Some(ProcessedFile {
                        file_name: jpeg_file_name(&item.original.file_name),
                        content_type: "image/jpeg".to_string(),
                        bytes: jpeg,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        file = %item.original.file_name,
                        error = %e,
                        "HEIC conversion failed"
                    );
                    item.error = Some(HEIC_FAILURE_MESSAGE.to_string());
                    return item;
                }
            }
        }

        let source_bytes: Vec<u8> = match &working {
            Some(p) => p.bytes.clone(),
            None => item.original.bytes.to_vec(),
        };
        let opts = self.compression;
        let compressed =
            tokio::task::spawn_blocking(move || compress_image(&source_bytes, &opts)).await;

        match compressed {
            Ok(Ok(compressed)) => {
                let file_name = working
                    .as_ref()
                    .map(|p| p.file_name.clone())
                    .unwrap_or_else(|| item.original.file_name.clone());
                item.preview = make_preview(&compressed.bytes, &item.id);
                item.processed = Some(ProcessedFile {
                    file_name,
                    content_type: compressed.content_type.to_string(),
                    bytes: compressed.bytes,
                });
            }
            Ok(Err(e)) => {
                // Compression is best-effort; fall back to the pre-compression
                // bytes (converted JPEG for HEIC, otherwise the original).
                tracing::warn!(
                    file = %item.original.file_name,
                    error = %e,
                    "Image compression failed, using uncompressed bytes"
                );
                item.processed = working;
                let (bytes, _, _) = item.upload_payload();
                let bytes = bytes.to_vec();
                item.preview = make_preview(&bytes, &item.id);
            }
            Err(e) => {
                tracing::warn!(
                    file = %item.original.file_name,
                    error = %e,
                    "Image compression task failed, using uncompressed bytes"
                );
                item.processed = working;
                let (bytes, _, _) = item.upload_payload();
                let bytes = bytes.to_vec();
                item.preview = make_preview(&bytes, &item.id);
            }
        }

        item
    }

    /// Remove one staged item, releasing its preview.
    pub fn remove(&mut self, id: &MediaId) -> bool {
        self.staging.remove(id)
    }

    pub fn update_caption(
        &mut self,
        id: &MediaId,
        caption: &str,
    ) -> Result<(), crate::staging::StagingError> {
        self.staging.update_caption(id, caption)
    }

    /// Drop all staged items and tracked progress.
    pub fn clear(&mut self) {
        self.staging.clear();
        self.tracker.reset();
    }

    /// Dispatch every uploadable staged item, sequentially and in staging
    /// order. A failed item is marked errored and the run continues. The
    /// staging area is cleared only when nothing failed and nothing was
    /// skipped.
    pub async fn commit(
        &mut self,
        endpoint: &dyn IngestEndpoint,
        category: Option<&CategorySelection>,
        uploader_id: Option<&str>,
    ) -> Result<BatchOutcome, CommitError> {
        if self.staging.is_empty() {
            return Err(CommitError::NoFiles);
        }
        let category = category.ok_or(CommitError::NoCategory)?;
        let uploader_id = uploader_id.ok_or(CommitError::NoSession)?;

        let submissions: Vec<(MediaId, Submission)> = self
            .staging
            .uploadable()
            .map(|item| {
                let (bytes, content_type, file_name) = item.upload_payload();
                (
                    item.id.clone(),
                    Submission {
                        media_kind: item.media_kind,
                        file_name: file_name.to_string(),
                        content_type: content_type.to_string(),
                        bytes: bytes.to_vec(),
                        caption: item.caption.clone(),
                        category_id: category.id.clone(),
                        category_name: category.name.clone(),
                        uploader_id: uploader_id.to_string(),
                    },
                )
            })
            .collect();

        let skipped = self.staging.len() - submissions.len();
        let ids: Vec<MediaId> = submissions.iter().map(|(id, _)| id.clone()).collect();
        self.tracker.initialize(&ids);

        let mut succeeded = 0usize;
        let mut failed = 0usize;
        for (id, submission) in submissions {
            self.tracker.update(&id, 0);
            match endpoint.ingest(submission).await {
                Ok(()) => {
                    self.tracker.mark_completed(&id);
                    succeeded += 1;
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Upload failed");
                    self.tracker.mark_error(&id, e.to_string());
                    self.staging.set_error(&id, e.to_string());
                    failed += 1;
                }
            }
        }

        let cleared = failed == 0 && skipped == 0;
        let redirect = if cleared {
            Some(format!("/admin/gallery/category/{}", category.name))
        } else {
            None
        };

        let mut messages = Vec::new();
        if succeeded > 0 {
            messages.push(format!("Successfully uploaded {} file(s)", succeeded));
        }
        if failed > 0 {
            messages.push(format!("Failed to upload {} file(s)", failed));
        }

        if cleared {
            self.staging.clear();
        }

        Ok(BatchOutcome {
            succeeded,
            failed,
            skipped,
            cleared,
            redirect,
            messages,
        })
    }
}

impl Default for UploadPipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}

fn make_preview(bytes: &[u8], id: &MediaId) -> Option<PreviewHandle> {
    match PreviewHandle::from_bytes(bytes) {
        Ok(handle) => Some(handle),
        Err(e) => {
            // A missing thumbnail does not block the upload.
            tracing::warn!(id = %id, error = %e, "Failed to write preview file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::IngestError;
    use async_trait::async_trait;
    use galleria_processing::TranscodeError;
    use std::io::Cursor;
    use std::sync::Mutex;

    fn category() -> CategorySelection {
        CategorySelection {
            id: "cat-1".to_string(),
            name: "Weddings".to_string(),
        }
    }

    fn jpeg_upload(name: &str, width: u32, height: u32) -> FileUpload {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            image::Rgb([90, 120, 60]),
        ));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
        FileUpload::new(name, "image/jpeg", out.into_inner())
    }

    fn video_upload(name: &str) -> FileUpload {
        FileUpload::new(name, "video/mp4", vec![0u8; 2048])
    }

    struct FailingHeicConverter;

    impl HeicConverter for FailingHeicConverter {
        fn convert_to_jpeg(&self, _data: &[u8]) -> Result<Vec<u8>, TranscodeError> {
            Err(TranscodeError::HeicConversion("corrupt payload".to_string()))
        }
    }

    /// Endpoint double recording submissions, with per-filename failures.
    #[derive(Default)]
    struct MockEndpoint {
        submitted: Mutex<Vec<Submission>>,
        fail_names: Vec<String>,
    }

    impl MockEndpoint {
        fn failing(names: &[&str]) -> Self {
            MockEndpoint {
                submitted: Mutex::new(Vec::new()),
                fail_names: names.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn submitted_names(&self) -> Vec<String> {
            self.submitted
                .lock()
                .unwrap()
                .iter()
                .map(|s| s.file_name.clone())
                .collect()
        }
    }

    #[async_trait]
    impl IngestEndpoint for MockEndpoint {
        async fn ingest(&self, submission: Submission) -> Result<(), IngestError> {
            let fail = self.fail_names.contains(&submission.file_name);
            self.submitted.lock().unwrap().push(submission);
            if fail {
                Err(IngestError::Rejected {
                    status: 500,
                    message: "Error processing request".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_add_files_stages_and_compresses_images() {
        let mut pipeline = UploadPipeline::default();
        let errors = pipeline
            .add_files(vec![jpeg_upload("a.jpg", 4032, 3024)])
            .await;
        assert!(errors.is_empty());
        assert_eq!(pipeline.staging().len(), 1);

        let item = pipeline.staging().iter().next().unwrap();
        let processed = item.processed.as_ref().unwrap();
        assert_eq!(processed.content_type, "image/jpeg");
        let img = image::load_from_memory(&processed.bytes).unwrap();
        assert!(img.width() <= 2016);
        assert!(img.height() <= 1512);
        assert!(item.preview.is_some());
    }

    #[tokio::test]
    async fn test_add_files_rejects_invalid_and_keeps_valid() {
        let mut pipeline = UploadPipeline::default();
        let errors = pipeline
            .add_files(vec![
                jpeg_upload("ok.jpg", 100, 100),
                FileUpload::new("bad.exe", "image/jpeg", vec![0u8; 10]),
            ])
            .await;
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("bad.exe"));
        assert_eq!(pipeline.staging().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_heic_is_staged_with_error_and_never_dispatched() {
        let mut pipeline =
            UploadPipeline::default().with_heic_converter(Arc::new(FailingHeicConverter));

        let errors = pipeline
            .add_files(vec![
                jpeg_upload("a.jpg", 200, 100),
                FileUpload::new("b.heic", "image/heic", vec![1u8; 64]),
                video_upload("c.mp4"),
            ])
            .await;
        assert!(errors.is_empty());
        assert_eq!(pipeline.staging().len(), 3);

        let heic = pipeline
            .staging()
            .iter()
            .find(|m| m.original.file_name == "b.heic")
            .unwrap();
        assert_eq!(heic.error.as_deref(), Some("Failed to convert HEIC file"));

        let endpoint = MockEndpoint::default();
        let outcome = pipeline
            .commit(&endpoint, Some(&category()), Some("user-1"))
            .await
            .unwrap();

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed, 0);
        assert_eq!(outcome.skipped, 1);
        assert!(!outcome.cleared);
        assert!(outcome.redirect.is_none());
        assert_eq!(endpoint.submitted_names(), vec!["a.jpg", "c.mp4"]);
        // The errored item stays staged for the operator to deal with.
        assert_eq!(pipeline.staging().len(), 3);
    }

    #[tokio::test]
    async fn test_commit_success_clears_staging_and_redirects() {
        let mut pipeline = UploadPipeline::default();
        pipeline
            .add_files(vec![jpeg_upload("a.jpg", 64, 64), video_upload("b.mp4")])
            .await;

        let preview_paths: Vec<_> = pipeline
            .staging()
            .iter()
            .filter_map(|m| m.preview.as_ref().map(|p| p.path_buf()))
            .collect();
        assert_eq!(preview_paths.len(), 2);

        let endpoint = MockEndpoint::default();
        let outcome = pipeline
            .commit(&endpoint, Some(&category()), Some("user-1"))
            .await
            .unwrap();

        assert_eq!(outcome.succeeded, 2);
        assert!(outcome.cleared);
        assert_eq!(
            outcome.redirect.as_deref(),
            Some("/admin/gallery/category/Weddings")
        );
        assert_eq!(
            outcome.messages,
            vec!["Successfully uploaded 2 file(s)".to_string()]
        );
        assert!(pipeline.staging().is_empty());
        assert!(preview_paths.iter().all(|p| !p.exists()));
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_everything_staged() {
        let mut pipeline = UploadPipeline::default();
        pipeline
            .add_files(vec![
                jpeg_upload("a.jpg", 64, 64),
                jpeg_upload("b.jpg", 64, 64),
                jpeg_upload("c.jpg", 64, 64),
                jpeg_upload("d.jpg", 64, 64),
            ])
            .await;

        let endpoint = MockEndpoint::failing(&["b.jpg"]);
        let outcome = pipeline
            .commit(&endpoint, Some(&category()), Some("user-1"))
            .await
            .unwrap();

        assert_eq!(outcome.succeeded, 3);
        assert_eq!(outcome.failed, 1);
        assert!(!outcome.cleared);
        assert!(outcome.redirect.is_none());
        assert_eq!(
            outcome.messages,
            vec![
                "Successfully uploaded 3 file(s)".to_string(),
                "Failed to upload 1 file(s)".to_string()
            ]
        );
        assert_eq!(pipeline.staging().len(), 4);
        // 3 completed at 100, 1 errored at 0
        assert_eq!(pipeline.tracker().overall(), 75);

        let failed = pipeline
            .staging()
            .iter()
            .find(|m| m.original.file_name == "b.jpg")
            .unwrap();
        assert!(failed.error.is_some());
    }

    #[tokio::test]
    async fn test_commit_preconditions() {
        let mut pipeline = UploadPipeline::default();
        let endpoint = MockEndpoint::default();

        assert_eq!(
            pipeline
                .commit(&endpoint, Some(&category()), Some("user-1"))
                .await,
            Err(CommitError::NoFiles)
        );

        pipeline.add_files(vec![jpeg_upload("a.jpg", 32, 32)]).await;
        assert_eq!(
            pipeline.commit(&endpoint, None, Some("user-1")).await,
            Err(CommitError::NoCategory)
        );
        assert_eq!(
            pipeline.commit(&endpoint, Some(&category()), None).await,
            Err(CommitError::NoSession)
        );
        assert!(endpoint.submitted_names().is_empty());
    }

    #[tokio::test]
    async fn test_video_passes_through_unmodified() {
        let mut pipeline = UploadPipeline::default();
        pipeline.add_files(vec![video_upload("clip.mp4")]).await;

        let item = pipeline.staging().iter().next().unwrap();
        assert_eq!(item.media_kind, MediaKind::Video);
        assert!(item.processed.is_none());
        let (bytes, content_type, name) = item.upload_payload();
        assert_eq!(bytes.len(), 2048);
        assert_eq!(content_type, "video/mp4");
        assert_eq!(name, "clip.mp4");
    }
}
