//! HEIC to JPEG transcoding.
//!
//! Conversion sits behind the `HeicConverter` trait so the client pipeline
//! can be exercised with failure-injecting doubles. The real decoder uses
//! libheif behind the `heif` feature; without it the converter reports the
//! format as unsupported and the item is marked errored, which matches the
//! per-item failure semantics of the pipeline (the batch continues).

use std::sync::Arc;

use crate::TranscodeError;

/// Fixed JPEG quality for HEIC conversion output.
pub const HEIC_JPEG_QUALITY: u8 = 99;

/// Converts HEIC payloads to JPEG.
pub trait HeicConverter: Send + Sync {
    fn convert_to_jpeg(&self, data: &[u8]) -> Result<Vec<u8>, TranscodeError>;
}

/// True when the filename carries a `.heic` suffix, case-insensitive.
pub fn is_heic_filename(name: &str) -> bool {
    name.to_lowercase().ends_with(".heic")
}

/// Rewrite `photo.HEIC` to `photo.jpg`, preserving the stem.
pub fn jpeg_file_name(name: &str) -> String {
    if let Some(stem) = name
        .strip_suffix(".heic")
        .or_else(|| name.strip_suffix(".HEIC"))
        .or_else(|| name.strip_suffix(".Heic"))
    {
        format!("{}.jpg", stem)
    } else {
        format!("{}.jpg", name)
    }
}

/// Default converter for this build: libheif-backed when the `heif` feature
/// is enabled, otherwise a stub that reports HEIC as unsupported.
pub fn default_heic_converter() -> Arc<dyn HeicConverter> {
    #[cfg(feature = "heif")]
    {
        Arc::new(LibheifConverter)
    }
    #[cfg(not(feature = "heif"))]
    {
        Arc::new(UnsupportedHeicConverter)
    }
}

/// Stub used when libheif is not compiled in.
pub struct UnsupportedHeicConverter;

impl HeicConverter for UnsupportedHeicConverter {
    fn convert_to_jpeg(&self, _data: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        Err(TranscodeError::HeicUnsupported)
    }
}

#[cfg(feature = "heif")]
pub struct LibheifConverter;

#[cfg(feature = "heif")]
impl HeicConverter for LibheifConverter {
    fn convert_to_jpeg(&self, data: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

        let lib_heif = LibHeif::new();
        let ctx = HeifContext::read_from_bytes(data)
            .map_err(|e| TranscodeError::HeicConversion(e.to_string()))?;
        let handle = ctx
            .primary_image_handle()
            .map_err(|e| TranscodeError::HeicConversion(e.to_string()))?;
        let decoded = lib_heif
            .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
            .map_err(|e| TranscodeError::HeicConversion(e.to_string()))?;

        let planes = decoded.planes();
        let interleaved = planes
            .interleaved
            .ok_or_else(|| TranscodeError::HeicConversion("missing RGB plane".to_string()))?;

        let width = decoded.width();
        let height = decoded.height();
        let stride = interleaved.stride;

        // Strip per-row padding before handing the buffer to the encoder.
        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        for row in 0..height as usize {
            let start = row * stride;
            rgb.extend_from_slice(&interleaved.data[start..start + width as usize * 3]);
        }

        let img = image::RgbImage::from_raw(width, height, rgb)
            .ok_or_else(|| TranscodeError::HeicConversion("invalid plane size".to_string()))?;

        let mut out = Vec::new();
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, HEIC_JPEG_QUALITY);
        encoder
            .encode_image(&img)
            .map_err(|e| TranscodeError::Encode(e.to_string()))?;
        Ok(out)
    }
}
