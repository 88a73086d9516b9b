//! Perspective rectification of screen quadrilaterals.
//!
//! Given a frame image and the bounding quadrilateral of a screen, this
//! module computes the minimal enclosing rectangle dimensions and produces a
//! perspective-unwarped image of the screen content for inspection.

use crate::core::{CorpusError, CorpusResult};
use crate::domain::{BoundingQuadrilateral, Coordinate};
use image::{Rgb, RgbImage};
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};
use rayon::prelude::*;
use tracing::debug;

/// Determinant magnitude below which a fitted transform is rejected as
/// singular.
const SINGULARITY_EPSILON: f32 = 1e-6;

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy)]
struct Point2f {
    x: f32,
    y: f32,
}

impl Point2f {
    fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Coordinate> for Point2f {
    fn from(c: Coordinate) -> Self {
        Self::new(c.x as f32, c.y as f32)
    }
}

/// Calculates the Euclidean distance between two points.
fn distance(p1: &Point2f, p2: &Point2f) -> f32 {
    (p1.x - p2.x).hypot(p1.y - p2.y)
}

/// Produces a perspective-unwarped image of a quadrilateral region.
///
/// The output dimensions are the larger of the two opposing edge lengths in
/// each direction, truncated to whole pixels. The named corners map to the
/// corners of the output rectangle (top-left to the origin); the corners are
/// taken as given and never reordered. Output pixels whose preimage falls
/// outside the source image are zero-filled.
///
/// # Errors
///
/// Returns a geometry error if the quadrilateral collapses to a zero-size
/// rectangle, or if three of its corners are collinear so that no projective
/// transform exists.
pub fn rectify(image: &RgbImage, bounds: &BoundingQuadrilateral) -> CorpusResult<RgbImage> {
    let top_left = Point2f::from(bounds.top_left);
    let top_right = Point2f::from(bounds.top_right);
    let bottom_left = Point2f::from(bounds.bottom_left);
    let bottom_right = Point2f::from(bounds.bottom_right);

    let width_a = distance(&bottom_left, &bottom_right);
    let width_b = distance(&top_left, &top_right);
    let height_a = distance(&top_right, &bottom_right);
    let height_b = distance(&top_left, &bottom_left);

    // Truncation, not rounding: downstream comparisons depend on the exact
    // legacy pixel dimensions.
    let dst_width = width_a.max(width_b) as u32;
    let dst_height = height_a.max(height_b) as u32;
    if dst_width == 0 || dst_height == 0 {
        return Err(CorpusError::geometry(
            "quadrilateral collapses to a zero-size rectangle",
        ));
    }

    let src = [top_left, top_right, bottom_right, bottom_left];
    let dst = [
        Point2f::new(0.0, 0.0),
        Point2f::new((dst_width - 1) as f32, 0.0),
        Point2f::new((dst_width - 1) as f32, (dst_height - 1) as f32),
        Point2f::new(0.0, (dst_height - 1) as f32),
    ];
    let transform = perspective_transform(&src, &dst)?;

    debug!("rectifying a quadrilateral into {dst_width}x{dst_height}");
    warp_perspective(image, &transform, dst_width, dst_height)
}

/// Calculates the projective transform mapping four source points to four
/// destination points.
///
/// The transform has eight degrees of freedom, so four point pairs determine
/// it exactly and the fit reduces to one 8×8 linear solve.
///
/// # Errors
///
/// Returns a geometry error if the system is singular, which happens exactly
/// when three of the source points are collinear.
fn perspective_transform(src: &[Point2f; 4], dst: &[Point2f; 4]) -> CorpusResult<Matrix3<f32>> {
    let mut a = DMatrix::<f32>::zeros(8, 8);
    let mut b = DVector::<f32>::zeros(8);

    for i in 0..4 {
        let s = &src[i];
        let d = &dst[i];

        a.set_row(
            i * 2,
            &nalgebra::RowDVector::from_row_slice(&[
                s.x,
                s.y,
                1.0,
                0.0,
                0.0,
                0.0,
                -s.x * d.x,
                -s.y * d.x,
            ]),
        );
        b[i * 2] = d.x;

        a.set_row(
            i * 2 + 1,
            &nalgebra::RowDVector::from_row_slice(&[
                0.0,
                0.0,
                0.0,
                s.x,
                s.y,
                1.0,
                -s.x * d.y,
                -s.y * d.y,
            ]),
        );
        b[i * 2 + 1] = d.y;
    }

    let solution = a.lu().solve(&b).ok_or_else(|| {
        CorpusError::geometry("no projective transform exists: three corners are collinear")
    })?;

    let matrix = Matrix3::new(
        solution[0],
        solution[1],
        solution[2],
        solution[3],
        solution[4],
        solution[5],
        solution[6],
        solution[7],
        1.0,
    );
    if matrix.determinant().abs() < SINGULARITY_EPSILON {
        return Err(CorpusError::geometry(
            "projective transform is singular: three corners are nearly collinear",
        ));
    }
    Ok(matrix)
}

/// Resamples a source image through the inverse of a perspective transform.
///
/// Each output pixel is mapped back into the source image and filled with
/// the bilinearly interpolated value there; preimages outside the source
/// bounds stay black. Rows are processed in parallel.
fn warp_perspective(
    src_image: &RgbImage,
    transform: &Matrix3<f32>,
    dst_width: u32,
    dst_height: u32,
) -> CorpusResult<RgbImage> {
    let inv_matrix = transform
        .try_inverse()
        .ok_or_else(|| CorpusError::geometry("projective transform is not invertible"))?;

    let mut dst_image = RgbImage::new(dst_width, dst_height);
    let (src_width, src_height) = src_image.dimensions();
    let buffer: &mut [u8] = dst_image.as_mut();

    buffer
        .par_chunks_mut((dst_width * 3) as usize)
        .enumerate()
        .for_each(|(dst_y, row_buffer)| {
            for dst_x in 0..dst_width {
                let dst_point = Vector3::new(dst_x as f32, dst_y as f32, 1.0);
                let src_point = inv_matrix * dst_point;

                let mut final_pixel = Rgb([0, 0, 0]);
                if src_point.z.abs() > f32::EPSILON {
                    let src_x = src_point.x / src_point.z;
                    let src_y = src_point.y / src_point.z;

                    if src_x >= 0.0
                        && src_y >= 0.0
                        && src_x < (src_width - 1) as f32
                        && src_y < (src_height - 1) as f32
                    {
                        final_pixel = bilinear_interpolate(src_image, src_x, src_y);
                    }
                }

                let index = (dst_x * 3) as usize;
                row_buffer[index..index + 3].copy_from_slice(&final_pixel.0);
            }
        });

    Ok(dst_image)
}

/// Performs bilinear interpolation to get a pixel value at non-integer
/// coordinates.
fn bilinear_interpolate(image: &RgbImage, x: f32, y: f32) -> Rgb<u8> {
    let x1 = x.floor() as u32;
    let y1 = y.floor() as u32;
    let x2 = (x1 + 1).min(image.width() - 1);
    let y2 = (y1 + 1).min(image.height() - 1);

    let dx = x - x1 as f32;
    let dy = y - y1 as f32;

    let p11 = image.get_pixel(x1, y1);
    let p12 = image.get_pixel(x1, y2);
    let p21 = image.get_pixel(x2, y1);
    let p22 = image.get_pixel(x2, y2);

    let mut result = [0u8; 3];
    for (i, result_channel) in result.iter_mut().enumerate() {
        let val = (1.0 - dx) * (1.0 - dy) * p11.0[i] as f32
            + dx * (1.0 - dy) * p21.0[i] as f32
            + (1.0 - dx) * dy * p12.0[i] as f32
            + dx * dy * p22.0[i] as f32;
        *result_channel = val.round().clamp(0.0, 255.0) as u8;
    }

    Rgb(result)
}
