//! Media processing for the Galleria upload pipeline.
//!
//! Covers the work done between file selection and submission: intake
//! validation (type/size/count policy), HEIC transcoding, lossy
//! recompression within a bounding box, and the server-side image
//! classification (dimensions, orientation, black-and-white detection).

pub mod classify;
pub mod compress;
pub mod heic;
pub mod validator;

pub use classify::{decode_image, is_black_and_white, scan_black_and_white, BW_CHANNEL_TOLERANCE};
pub use compress::{compress_image, CompressedImage, CompressionOptions};
pub use heic::{default_heic_converter, is_heic_filename, jpeg_file_name, HeicConverter};
pub use validator::{IntakeLimits, IntakeResult, IntakeValidator};

/// Errors from transcoding and classification steps.
#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("HEIC support is not enabled in this build")]
    HeicUnsupported,

    #[error("HEIC conversion failed: {0}")]
    HeicConversion(String),
}

impl From<image::ImageError> for TranscodeError {
    fn from(err: image::ImageError) -> Self {
        TranscodeError::Decode(err.to_string())
    }
}
