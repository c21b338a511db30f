use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Maximum caption length for a staged media item.
pub const MAX_CAPTION_LEN: usize = 500;

/// A raw file as selected by the operator: declared name, MIME type and bytes.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        FileUpload {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Lowercased extension of the declared filename, if any.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

/// A field-level validation message, surfaced to the operator as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a caption against the length policy.
pub fn validate_caption(caption: &str) -> Result<(), FieldError> {
    if caption.chars().count() > MAX_CAPTION_LEN {
        return Err(FieldError::new(
            "caption",
            format!("Caption must be at most {} characters", MAX_CAPTION_LEN),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lowercased() {
        let f = FileUpload::new("photo.HEIC", "image/heic", vec![1, 2, 3]);
        assert_eq!(f.extension().as_deref(), Some("heic"));
    }

    #[test]
    fn test_extension_missing() {
        let f = FileUpload::new("noextension", "image/jpeg", vec![]);
        assert_eq!(f.extension(), None);
    }

    #[test]
    fn test_caption_at_limit_ok() {
        let caption = "a".repeat(500);
        assert!(validate_caption(&caption).is_ok());
    }

    #[test]
    fn test_caption_over_limit_rejected() {
        let caption = "a".repeat(501);
        let err = validate_caption(&caption).unwrap_err();
        assert_eq!(err.field, "caption");
    }
}
