//! Asset host trait
//!
//! All asset-host backends must implement this trait. The ingestion endpoint
//! works against it without coupling to a specific provider.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Invalid asset key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// What the asset host hands back after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// Publicly accessible canonical URL.
    pub url: String,
    /// Host-side identifier; kept in the media record for later deletion.
    pub public_id: String,
}

/// Remote asset host contract.
///
/// Every write is a fresh insert keyed by `{folder}/{public_id}`; this
/// pipeline never updates an existing asset.
#[async_trait]
pub trait AssetHost: Send + Sync {
    /// Upload raw bytes under `folder` with the given public id.
    async fn upload(
        &self,
        folder: &str,
        public_id: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredAsset>;

    /// Delete an asset by its host-side public id.
    async fn delete(&self, public_id: &str) -> StorageResult<()>;

    /// Check whether an asset exists.
    async fn exists(&self, public_id: &str) -> StorageResult<bool>;
}
