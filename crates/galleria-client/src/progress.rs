//! Per-file and aggregate progress state for an upload batch.

use crate::staging::MediaId;

/// Lifecycle state for a single tracked file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Completed,
    Error,
}

impl UploadStatus {
    /// Completed and Error are terminal; later updates must not change them.
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Error)
    }
}

/// Progress record for one file in the batch.
#[derive(Debug, Clone)]
pub struct ProgressEntry {
    pub file_id: MediaId,
    pub progress: u8,
    pub status: UploadStatus,
    pub error: Option<String>,
}

/// Tracks the files in the current dispatch run.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    entries: Vec<ProgressEntry>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all tracked state with fresh pending entries for the given
    /// files.
    pub fn initialize(&mut self, file_ids: &[MediaId]) {
        self.entries = file_ids
            .iter()
            .map(|id| ProgressEntry {
                file_id: id.clone(),
                progress: 0,
                status: UploadStatus::Pending,
                error: None,
            })
            .collect();
    }

    /// Record transfer progress for a file, moving it to Uploading. Ignored
    /// once the file is in a terminal state.
    pub fn update(&mut self, file_id: &MediaId, progress: u8) {
        if let Some(entry) = self.entry_mut(file_id) {
            if entry.status.is_terminal() {
                return;
            }
            entry.progress = progress.min(100);
            entry.status = UploadStatus::Uploading;
        }
    }

    /// Mark a file completed, forcing its progress to 100.
    pub fn mark_completed(&mut self, file_id: &MediaId) {
        if let Some(entry) = self.entry_mut(file_id) {
            entry.progress = 100;
            entry.status = UploadStatus::Completed;
            entry.error = None;
        }
    }

    /// Mark a file failed, keeping its last observed progress.
    pub fn mark_error(&mut self, file_id: &MediaId, message: impl Into<String>) {
        if let Some(entry) = self.entry_mut(file_id) {
            entry.status = UploadStatus::Error;
            entry.error = Some(message.into());
        }
    }

    /// Drop all tracked state.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, file_id: &MediaId) -> Option<&ProgressEntry> {
        self.entries.iter().find(|e| &e.file_id == file_id)
    }

    pub fn entries(&self) -> &[ProgressEntry] {
        &self.entries
    }

    /// Aggregate progress: the rounded mean of per-file progress, 0 when
    /// nothing is tracked. Errored files keep their last progress, so one
    /// failure among completed files still caps the aggregate below 100.
    pub fn overall(&self) -> u8 {
        if self.entries.is_empty() {
            return 0;
        }
        let sum: u64 = self.entries.iter().map(|e| e.progress as u64).sum();
        (sum as f64 / self.entries.len() as f64).round() as u8
    }

    fn entry_mut(&mut self, file_id: &MediaId) -> Option<&mut ProgressEntry> {
        self.entries.iter_mut().find(|e| &e.file_id == file_id)
    }
}
