//! Asset host abstraction for the Galleria ingestion pipeline.
//!
//! The remote asset host stores uploaded binaries and hands back a canonical
//! URL plus a host-side identifier that can be used for later deletion.
//! Backends implement the [`AssetHost`] trait; the filesystem backend serves
//! development and tests, the S3 backend (feature `storage-s3`) serves
//! deployments behind an S3-compatible provider.
//!
//! **Key format:** assets live under `{folder}/{public_id}{ext}`, where the
//! folder is derived from the gallery category name.

#[cfg(feature = "storage-local")]
mod local;
#[cfg(feature = "storage-s3")]
mod s3;
mod traits;

#[cfg(feature = "storage-local")]
pub use local::LocalAssetHost;
#[cfg(feature = "storage-s3")]
pub use s3::S3AssetHost;
pub use traits::{AssetHost, StorageError, StorageResult, StoredAsset};

/// File extension for a content type, used when composing asset keys.
pub(crate) fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type.to_lowercase().as_str() {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/webp" => ".webp",
        "image/gif" => ".gif",
        "video/mp4" => ".mp4",
        "video/webm" => ".webm",
        "video/x-msvideo" => ".avi",
        "video/quicktime" => ".mov",
        _ => "",
    }
}
