//! Lossy recompression of images before upload.
//!
//! Images are fitted into a bounding box (downscale only, aspect preserved)
//! and re-encoded at a quality target. PNG stays PNG to keep it lossless;
//! everything else is encoded as JPEG. Callers fall back to the original
//! bytes when compression fails.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::TranscodeError;

/// Quality and bounding-box options for image recompression.
#[derive(Debug, Clone, Copy)]
pub struct CompressionOptions {
    /// JPEG quality, 0-100.
    pub quality: u8,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        CompressionOptions {
            quality: 95,
            max_width: 2016,
            max_height: 1512,
        }
    }
}

/// Result of a compression pass.
#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Recompress an image within the bounding box. Images already inside the
/// box keep their dimensions; larger ones are downscaled preserving aspect
/// ratio.
pub fn compress_image(
    data: &[u8],
    opts: &CompressionOptions,
) -> Result<CompressedImage, TranscodeError> {
    let format = image::guess_format(data)?;
    let img = image::load_from_memory(data)?;
    let img = fit_within(img, opts.max_width, opts.max_height);
    let (width, height) = img.dimensions();

    let mut out = Cursor::new(Vec::new());
    let content_type = match format {
        ImageFormat::Png => {
            img.write_to(&mut out, ImageFormat::Png)
                .map_err(|e| TranscodeError::Encode(e.to_string()))?;
            "image/png"
        }
        _ => {
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, opts.quality);
            encoder
                .encode_image(&img.to_rgb8())
                .map_err(|e| TranscodeError::Encode(e.to_string()))?;
            "image/jpeg"
        }
    };

    Ok(CompressedImage {
        bytes: out.into_inner(),
        content_type,
        width,
        height,
    })
}

/// Downscale into the box when larger; never upscale.
fn fit_within(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_width && height <= max_height {
        return img;
    }
    img.resize(max_width, max_height, FilterType::Lanczos3)
}
