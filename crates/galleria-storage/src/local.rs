//! Local filesystem asset host, used in development and tests.

use crate::traits::{AssetHost, StorageError, StorageResult, StoredAsset};
use crate::extension_for_content_type;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Filesystem-backed asset host
#[derive(Clone)]
pub struct LocalAssetHost {
    base_path: PathBuf,
    base_url: String,
}

impl LocalAssetHost {
    /// Create a new LocalAssetHost instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for asset storage (e.g., "/var/lib/galleria/assets")
    /// * `base_url` - Base URL for serving assets (e.g., "http://localhost:3000/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create asset directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalAssetHost {
            base_path,
            base_url,
        })
    }

    /// Convert an asset key to a filesystem path, rejecting traversal
    /// sequences that could escape the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Asset key contains invalid characters".to_string(),
            ));
        }
        Ok(self.base_path.join(key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AssetHost for LocalAssetHost {
    async fn upload(
        &self,
        folder: &str,
        public_id: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredAsset> {
        let key = format!(
            "{}/{}{}",
            folder.trim_matches('/'),
            public_id,
            extension_for_content_type(content_type)
        );
        let path = self.key_to_path(&key)?;
        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        file.write_all(&data)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        tracing::debug!(key = %key, bytes = data.len(), "Stored asset on local filesystem");

        Ok(StoredAsset {
            url: self.generate_url(&key),
            public_id: key,
        })
    }

    async fn delete(&self, public_id: &str) -> StorageResult<()> {
        let path = self.key_to_path(public_id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(public_id.to_string()))
            }
            Err(e) => Err(StorageError::DeleteFailed(e.to_string())),
        }
    }

    async fn exists(&self, public_id: &str) -> StorageResult<bool> {
        let path = self.key_to_path(public_id)?;
        Ok(fs::try_exists(&path).await?)
    }
}
