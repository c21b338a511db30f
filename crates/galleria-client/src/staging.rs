//! The staging area: the operator-facing collection of pending media.
//!
//! An ordered collection keyed by `MediaId` with unique ids enforced on
//! insert and no reordering. Removing or clearing releases the associated
//! preview handles; an in-flight upload for a removed item finishes on its
//! own and its result is simply not applied back.

use galleria_core::models::{validate_caption, FileUpload, MediaKind};

use crate::preview::PreviewHandle;

/// Locally generated identifier for a staged item, collision-free within a
/// session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaId(String);

impl MediaId {
    pub fn generate() -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        MediaId(id[..9].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The transcoded/compressed form of a staged file, when processing
/// succeeded.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// One staged media item.
#[derive(Debug)]
pub struct StagedMedia {
    pub id: MediaId,
    pub original: FileUpload,
    pub processed: Option<ProcessedFile>,
    pub preview: Option<PreviewHandle>,
    pub caption: String,
    pub media_kind: MediaKind,
    /// Processing error (e.g. a failed HEIC conversion). Items with this set
    /// are never dispatched.
    pub error: Option<String>,
    pub validation_errors: Vec<String>,
}

impl StagedMedia {
    pub fn new(original: FileUpload, media_kind: MediaKind) -> Self {
        StagedMedia {
            id: MediaId::generate(),
            original,
            processed: None,
            preview: None,
            caption: String::new(),
            media_kind,
            error: None,
            validation_errors: Vec::new(),
        }
    }

    pub fn is_uploadable(&self) -> bool {
        self.error.is_none()
    }

    /// The bytes, content type and filename to submit: processed when
    /// available, otherwise the original.
    pub fn upload_payload(&self) -> (&[u8], &str, &str) {
        match &self.processed {
            Some(p) => (&p.bytes, &p.content_type, &p.file_name),
            None => (
                &self.original.bytes,
                &self.original.content_type,
                &self.original.file_name,
            ),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StagingError {
    #[error("Duplicate media id: {0}")]
    DuplicateId(String),

    #[error("No staged media with id {0}")]
    NotFound(String),
}

/// Ordered collection of staged media items.
#[derive(Debug, Default)]
pub struct StagingArea {
    items: Vec<StagedMedia>,
}

impl StagingArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item, enforcing id uniqueness.
    pub fn insert(&mut self, item: StagedMedia) -> Result<(), StagingError> {
        if self.items.iter().any(|m| m.id == item.id) {
            return Err(StagingError::DuplicateId(item.id.to_string()));
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove an item by id, releasing its preview handle. Returns whether
    /// anything was removed.
    pub fn remove(&mut self, id: &MediaId) -> bool {
        let Some(index) = self.items.iter().position(|m| &m.id == id) else {
            return false;
        };
        let item = self.items.remove(index);
        if let Some(preview) = item.preview {
            if let Err(e) = preview.release() {
                tracing::warn!(id = %item.id, error = %e, "Failed to release preview handle");
            }
        }
        true
    }

    /// Update an item's caption, re-validating the length policy. Validation
    /// messages are stored on the item, not returned as an error.
    pub fn update_caption(&mut self, id: &MediaId, caption: &str) -> Result<(), StagingError> {
        let item = self
            .items
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| StagingError::NotFound(id.to_string()))?;
        item.caption = caption.to_string();
        item.validation_errors = match validate_caption(caption) {
            Ok(()) => Vec::new(),
            Err(e) => vec![e.message],
        };
        Ok(())
    }

    /// Annotate an item with a submission error.
    pub fn set_error(&mut self, id: &MediaId, message: impl Into<String>) {
        if let Some(item) = self.items.iter_mut().find(|m| &m.id == id) {
            item.error = Some(message.into());
        }
    }

    /// Remove everything, releasing every preview handle.
    pub fn clear(&mut self) {
        for item in self.items.drain(..) {
            if let Some(preview) = item.preview {
                if let Err(e) = preview.release() {
                    tracing::warn!(id = %item.id, error = %e, "Failed to release preview handle");
                }
            }
        }
    }

    pub fn get(&self, id: &MediaId) -> Option<&StagedMedia> {
        self.items.iter().find(|m| &m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StagedMedia> {
        self.items.iter()
    }

    /// Items eligible for dispatch: everything without an error state.
    pub fn uploadable(&self) -> impl Iterator<Item = &StagedMedia> {
        self.items.iter().filter(|m| m.is_uploadable())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Combined byte size of the original files, for batch-limit checks.
    pub fn total_bytes(&self) -> usize {
        self.items.iter().map(|m| m.original.size()).sum()
    }
}
