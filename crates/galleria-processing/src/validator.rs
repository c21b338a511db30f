//! Intake validation for candidate uploads.
//!
//! Runs before any expensive work: per-file checks (filename length, MIME
//! allow-list, size, executable-extension denylist) and batch checks (count
//! and combined size, measured against what is already staged plus the
//! surviving incoming files). Per-file violations reject only the offending
//! files; a batch-level violation rejects the whole incoming batch.

use galleria_core::models::{FieldError, FileUpload};
use galleria_core::Config;

const MAX_FILENAME_LEN: usize = 255;

/// Intake policy limits.
#[derive(Debug, Clone)]
pub struct IntakeLimits {
    pub max_file_size_bytes: usize,
    pub max_batch_files: usize,
    pub max_batch_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub blocked_extensions: Vec<String>,
}

impl Default for IntakeLimits {
    fn default() -> Self {
        IntakeLimits {
            max_file_size_bytes: 10 * 1024 * 1024,
            max_batch_files: 20,
            max_batch_size_bytes: 100 * 1024 * 1024,
            allowed_content_types: galleria_core::config::default_allowed_content_types()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            blocked_extensions: galleria_core::config::default_blocked_extensions()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl IntakeLimits {
    pub fn from_config(config: &Config) -> Self {
        IntakeLimits {
            max_file_size_bytes: config.max_file_size_bytes,
            max_batch_files: config.max_batch_files,
            max_batch_size_bytes: config.max_batch_size_bytes,
            allowed_content_types: config.allowed_content_types.clone(),
            blocked_extensions: config.blocked_extensions.clone(),
        }
    }
}

/// Result of partitioning an incoming batch: files that passed per-file
/// validation, and the messages for everything that did not.
#[derive(Debug, Default)]
pub struct IntakeResult {
    pub accepted: Vec<FileUpload>,
    pub errors: Vec<FieldError>,
}

/// Candidate-file validator for the gallery intake policy.
pub struct IntakeValidator {
    limits: IntakeLimits,
}

impl IntakeValidator {
    pub fn new(limits: IntakeLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &IntakeLimits {
        &self.limits
    }

    /// Validate a single candidate file. Checks run in policy order and
    /// short-circuit on the first violation.
    pub fn validate_file(&self, file: &FileUpload) -> Result<(), FieldError> {
        if file.file_name.chars().count() > MAX_FILENAME_LEN {
            return Err(FieldError::new(
                "file",
                format!("Filename is too long (max {} characters)", MAX_FILENAME_LEN),
            ));
        }

        let content_type = file.content_type.to_lowercase();
        if !self
            .limits
            .allowed_content_types
            .iter()
            .any(|ct| ct == &content_type)
        {
            return Err(FieldError::new(
                "file",
                format!("File type {} is not allowed", file.content_type),
            ));
        }

        if file.size() > self.limits.max_file_size_bytes {
            let max_mb = self.limits.max_file_size_bytes / (1024 * 1024);
            return Err(FieldError::new(
                "file",
                format!("File is too large (max {}MB)", max_mb),
            ));
        }

        // Defense in depth alongside the MIME allow-list
        if let Some(ext) = file.extension() {
            if self.limits.blocked_extensions.iter().any(|e| e == &ext) {
                return Err(FieldError::new(
                    "file",
                    "File type not allowed for security reasons",
                ));
            }
        }

        Ok(())
    }

    /// Batch-level checks: count and combined byte size, including items
    /// already staged. A violation here rejects the entire incoming batch.
    pub fn validate_batch_limits(
        &self,
        staged_count: usize,
        staged_bytes: usize,
        incoming: &[FileUpload],
    ) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if staged_count + incoming.len() > self.limits.max_batch_files {
            errors.push(FieldError::new(
                "files",
                format!(
                    "Cannot upload more than {} files at once",
                    self.limits.max_batch_files
                ),
            ));
        }

        let incoming_bytes: usize = incoming.iter().map(FileUpload::size).sum();
        if staged_bytes + incoming_bytes > self.limits.max_batch_size_bytes {
            let max_mb = self.limits.max_batch_size_bytes / (1024 * 1024);
            errors.push(FieldError::new(
                "files",
                format!("Total file size cannot exceed {}MB", max_mb),
            ));
        }

        errors
    }

    /// Partition an incoming batch. Per-file checks run first and their
    /// errors are listed first; batch limits are then evaluated over the
    /// files that passed, and a batch-level violation rejects everything.
    pub fn partition(
        &self,
        staged_count: usize,
        staged_bytes: usize,
        incoming: Vec<FileUpload>,
    ) -> IntakeResult {
        let mut result = IntakeResult::default();
        for (index, file) in incoming.into_iter().enumerate() {
            match self.validate_file(&file) {
                Ok(()) => result.accepted.push(file),
                Err(err) => result.errors.push(FieldError::new(
                    format!("file_{}", index),
                    format!("File \"{}\": {}", file.file_name, err.message),
                )),
            }
        }

        let batch_errors =
            self.validate_batch_limits(staged_count, staged_bytes, &result.accepted);
        if !batch_errors.is_empty() {
            result.accepted.clear();
            result.errors.extend(batch_errors);
        }
        result
    }
}

impl Default for IntakeValidator {
    fn default() -> Self {
        Self::new(IntakeLimits::default())
    }
}
