//! Utility functions.

pub mod image;

pub use image::{create_rgb_image, dynamic_to_rgb, load_image};
