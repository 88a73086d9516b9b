//! Utility functions for image handling.
//!
//! The corpus core itself performs no file I/O; these helpers exist for the
//! review and evaluation tooling sitting on top of it, which needs to load
//! frame and page images referenced by the graph before rectifying screens.

use crate::core::CorpusError;
use image::{DynamicImage, ImageBuffer, RgbImage};

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// # Errors
///
/// Returns an `ImageLoad` error if the image cannot be read or decoded.
pub fn load_image(path: &std::path::Path) -> Result<RgbImage, CorpusError> {
    let img = image::open(path).map_err(CorpusError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

/// Creates an RgbImage from raw pixel data.
///
/// The data must be in RGB format (3 bytes per pixel); returns `None` when
/// the length does not match the given dimensions.
pub fn create_rgb_image(width: u32, height: u32, data: Vec<u8>) -> Option<RgbImage> {
    if data.len() != (width * height * 3) as usize {
        return None;
    }

    ImageBuffer::from_raw(width, height, data)
}
