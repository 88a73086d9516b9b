//! Domain types shared across the corpus.
//!
//! * [`geometry`] - Integer coordinates and the named-corner quadrilateral
//! * [`labels`] - Closed screen-condition and similarity label sets

pub mod geometry;
pub mod labels;

pub use geometry::{BoundingQuadrilateral, Coordinate};
pub use labels::{ScreenCondition, Similarity, UnknownLabel};
