//! Geometric primitives for screen annotations.
//!
//! This module provides the integer coordinate and quadrilateral types used
//! to describe where a screen appears within a video frame. Both types are
//! plain immutable values; all derived facts about them are computed at
//! construction time by their consumers.

use serde::{Deserialize, Serialize};

/// A point in the 2D projection space of a video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// X-coordinate of the point, in source-frame pixels.
    pub x: i32,
    /// Y-coordinate of the point, in source-frame pixels.
    pub y: i32,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Euclidean distance to another coordinate.
    pub fn distance(&self, other: &Coordinate) -> f32 {
        ((self.x - other.x) as f32).hypot((self.y - other.y) as f32)
    }
}

/// The bounding quadrilateral of a screen on a video frame.
///
/// Corners are held in explicit named order (top-left, top-right,
/// bottom-left, bottom-right). This is not a cyclic winding order and the
/// corners are never re-sorted: each corner keeps the role its name gives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingQuadrilateral {
    /// The top-left corner.
    pub top_left: Coordinate,
    /// The top-right corner.
    pub top_right: Coordinate,
    /// The bottom-left corner.
    pub bottom_left: Coordinate,
    /// The bottom-right corner.
    pub bottom_right: Coordinate,
}

impl BoundingQuadrilateral {
    /// Creates a new quadrilateral from its four named corners.
    pub fn new(
        top_left: Coordinate,
        top_right: Coordinate,
        bottom_left: Coordinate,
        bottom_right: Coordinate,
    ) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    /// Returns whether any corner lies outside a `width`×`height` frame.
    ///
    /// A quadrilateral is beyond bounds if a left-edge corner has a negative
    /// x-coordinate, a right-edge corner has an x-coordinate at or past the
    /// frame width, a top-edge corner has a negative y-coordinate, or a
    /// bottom-edge corner has a y-coordinate at or past the frame height.
    pub fn is_beyond_bounds(&self, width: u32, height: u32) -> bool {
        self.top_left.x < 0
            || self.bottom_left.x < 0
            || self.top_right.x >= width as i32
            || self.bottom_right.x >= width as i32
            || self.top_left.y < 0
            || self.top_right.y < 0
            || self.bottom_left.y >= height as i32
            || self.bottom_right.y >= height as i32
    }
}
