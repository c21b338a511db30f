//! Configuration module
//!
//! Environment-driven configuration for the Galleria server. Media limits
//! default to the gallery policy (10 MiB per file, 20 files / 100 MiB per
//! batch) and can be overridden per deployment.

use std::env;

use crate::AppError;

// Gallery intake policy defaults
const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;
const MAX_BATCH_FILES: usize = 20;
const MAX_BATCH_SIZE_BYTES: usize = 100 * 1024 * 1024;
const JPEG_QUALITY: u8 = 95;
const MAX_IMAGE_WIDTH: u32 = 2016;
const MAX_IMAGE_HEIGHT: u32 = 1512;
const SERVER_PORT: u16 = 3000;

/// Server and pipeline configuration, loaded from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub environment: String,
    /// Shared secret for the admin upload routes. `None` disables the check
    /// (development only).
    pub admin_token: Option<String>,
    // Asset host configuration. Missing values are a startup error, never a
    // per-request error.
    pub asset_store_path: String,
    pub asset_base_url: String,
    // Intake policy
    pub max_file_size_bytes: usize,
    pub max_batch_files: usize,
    pub max_batch_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub blocked_extensions: Vec<String>,
    // Image normalization
    pub jpeg_quality: u8,
    pub max_image_width: u32,
    pub max_image_height: u32,
}

fn env_string(key: &str) -> Result<String, AppError> {
    env::var(key).map_err(|_| AppError::Internal(format!("{} must be set", key)))
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_list(key: &str, default: &[&str]) -> Vec<String> {
    env::var(key)
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_else(|_| default.iter().map(|s| (*s).to_string()).collect())
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `DATABASE_URL`, `ASSET_STORE_PATH` and `ASSET_BASE_URL` are required;
    /// everything else has a default.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Config {
            server_port: env_parse("SERVER_PORT", SERVER_PORT),
            database_url: env_string("DATABASE_URL")?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            admin_token: env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
            asset_store_path: env_string("ASSET_STORE_PATH")?,
            asset_base_url: env_string("ASSET_BASE_URL")?,
            max_file_size_bytes: env_parse("MAX_FILE_SIZE_BYTES", MAX_FILE_SIZE_BYTES),
            max_batch_files: env_parse("MAX_BATCH_FILES", MAX_BATCH_FILES),
            max_batch_size_bytes: env_parse("MAX_BATCH_SIZE_BYTES", MAX_BATCH_SIZE_BYTES),
            allowed_content_types: env_list(
                "ALLOWED_CONTENT_TYPES",
                default_allowed_content_types(),
            ),
            blocked_extensions: env_list("BLOCKED_EXTENSIONS", default_blocked_extensions()),
            jpeg_quality: env_parse("JPEG_QUALITY", JPEG_QUALITY),
            max_image_width: env_parse("MAX_IMAGE_WIDTH", MAX_IMAGE_WIDTH),
            max_image_height: env_parse("MAX_IMAGE_HEIGHT", MAX_IMAGE_HEIGHT),
        })
    }

    /// Configuration for tests: local defaults, no database requirement
    /// beyond the given URL, asset host rooted at `asset_store_path`.
    pub fn for_tests(asset_store_path: impl Into<String>) -> Self {
        Config {
            server_port: 0,
            database_url: "postgres://localhost/galleria_test".to_string(),
            environment: "test".to_string(),
            admin_token: None,
            asset_store_path: asset_store_path.into(),
            asset_base_url: "http://localhost:3000/assets".to_string(),
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
            max_batch_files: MAX_BATCH_FILES,
            max_batch_size_bytes: MAX_BATCH_SIZE_BYTES,
            allowed_content_types: default_allowed_content_types()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            blocked_extensions: default_blocked_extensions()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            jpeg_quality: JPEG_QUALITY,
            max_image_width: MAX_IMAGE_WIDTH,
            max_image_height: MAX_IMAGE_HEIGHT,
        }
    }
}

/// MIME allow-list for gallery uploads. HEIC is accepted at intake so the
/// transcoder can convert it to JPEG before display.
pub fn default_allowed_content_types() -> &'static [&'static str] {
    &[
        "image/jpeg",
        "image/png",
        "image/webp",
        "image/gif",
        "image/heic",
        "video/mp4",
        "video/webm",
        "video/x-msvideo",
        "video/quicktime",
    ]
}

/// Executable-style extensions rejected regardless of declared MIME type.
pub fn default_blocked_extensions() -> &'static [&'static str] {
    &["exe", "bat", "cmd", "scr", "pif", "com"]
}
