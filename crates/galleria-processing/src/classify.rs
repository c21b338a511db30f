//! Server-side image classification.
//!
//! Decodes an uploaded image and answers two questions about it: which way
//! it faces (via `Orientation::from_dimensions`) and whether it is
//! black-and-white. The B&W check is a full-resolution single pass over the
//! raw pixels, short-circuiting at the first pixel whose channels diverge.

use image::DynamicImage;

use crate::TranscodeError;

/// Per-pixel channel delta allowed before an image counts as color.
pub const BW_CHANNEL_TOLERANCE: u8 = 2;

/// Decode an image payload for classification.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, TranscodeError> {
    image::load_from_memory(data).map_err(Into::into)
}

/// Whether every pixel's RGB channels agree within the tolerance. The alpha
/// channel is ignored; fully transparent pixels are still judged by their
/// RGB values.
pub fn is_black_and_white(img: &DynamicImage) -> bool {
    scan_black_and_white(img).0
}

/// Instrumented scan: returns the classification plus the number of pixels
/// inspected before the scan terminated. A color image stops at the first
/// disqualifying pixel; a black-and-white image scans everything.
pub fn scan_black_and_white(img: &DynamicImage) -> (bool, u64) {
    let rgba = img.to_rgba8();
    let mut scanned = 0u64;

    for pixel in rgba.pixels() {
        scanned += 1;
        let [r, g, b, _a] = pixel.0;
        if r.abs_diff(g) > BW_CHANNEL_TOLERANCE
            || g.abs_diff(b) > BW_CHANNEL_TOLERANCE
            || r.abs_diff(b) > BW_CHANNEL_TOLERANCE
        {
            return (false, scanned);
        }
    }

    (true, scanned)
}
