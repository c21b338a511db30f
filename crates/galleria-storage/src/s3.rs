//! S3-compatible asset host.
//!
//! Built on `object_store`; credentials come from the environment via
//! `AmazonS3Builder::from_env`, so a missing configuration fails at startup
//! when the host is constructed, never per request.

use crate::extension_for_content_type;
use crate::traits::{AssetHost, StorageError, StorageResult, StoredAsset};
use async_trait::async_trait;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};

/// S3 asset host
#[derive(Clone)]
pub struct S3AssetHost {
    store: std::sync::Arc<AmazonS3>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
}

impl S3AssetHost {
    /// Create a new S3AssetHost instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible
    ///   providers (e.g., "http://localhost:9000" for MinIO)
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3AssetHost {
            store: std::sync::Arc::new(store),
            bucket,
            region,
            endpoint_url,
        })
    }

    /// Public URL for an object key. Path-style for custom endpoints,
    /// virtual-hosted-style for AWS proper.
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}

#[async_trait]
impl AssetHost for S3AssetHost {
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
        let path = ObjectPath::from(key.clone());

        self.store
            .put(&path, PutPayload::from(data))
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        tracing::debug!(key = %key, bucket = %self.bucket, "Stored asset on S3");

        Ok(StoredAsset {
            url: self.generate_url(&key),
            public_id: key,
        })
    }

    async fn delete(&self, public_id: &str) -> StorageResult<()> {
        let path = ObjectPath::from(public_id.to_string());
        self.store.delete(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StorageError::NotFound(public_id.to_string()),
            other => StorageError::DeleteFailed(other.to_string()),
        })
    }

    async fn exists(&self, public_id: &str) -> StorageResult<bool> {
        let path = ObjectPath::from(public_id.to_string());
        match self.store.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }
}
