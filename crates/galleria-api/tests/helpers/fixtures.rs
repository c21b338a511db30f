//! Media fixtures for integration tests.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

fn encode_jpeg(img: RgbImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Jpeg)
        .expect("encode jpeg");
    out.into_inner()
}

/// A solid-color JPEG, clearly not black-and-white.
pub fn color_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode_jpeg(RgbImage::from_pixel(width, height, Rgb([200, 40, 40])))
}

/// A uniform gray JPEG; every channel agrees, so it classifies as
/// black-and-white.
pub fn gray_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode_jpeg(RgbImage::from_pixel(width, height, Rgb([120, 120, 120])))
}

/// Bytes that no image decoder will accept.
pub fn garbage_bytes() -> Vec<u8> {
    vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x02, 0x03]
}

/// Placeholder video payload; the server never decodes video content.
pub fn video_bytes() -> Vec<u8> {
    vec![0u8; 4096]
}
