//! Operator-side upload pipeline for the Galleria admin tool.
//!
//! Files flow through intake validation and transcoding into a staging area
//! the operator can edit, then a sequential dispatcher submits each staged
//! item to the ingestion endpoint while a progress tracker reports per-file
//! and aggregate state.

pub mod api;
pub mod pipeline;
pub mod preview;
pub mod progress;
pub mod staging;

pub use api::{ApiClient, IngestEndpoint, IngestError, Submission};
pub use pipeline::{BatchOutcome, CommitError, PipelineOptions, UploadPipeline};
pub use preview::PreviewHandle;
pub use progress::{ProgressEntry, ProgressTracker, UploadStatus};
pub use staging::{MediaId, ProcessedFile, StagedMedia, StagingArea, StagingError};
