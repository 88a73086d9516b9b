//! Image processing over the corpus.
//!
//! * [`rectify`] - Perspective rectification of screen quadrilaterals

pub mod rectify;

pub use rectify::rectify;
