use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::models::{RegionBoundary, RegionMeasurement};

pub const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const MARKER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const OUTLINE_THICKNESS: i32 = 2;
pub const MARKER_RADIUS: i32 = 3;

/// Draw the region outline. Corner coordinates sit between pixels, so the
/// second pass one pixel up-left makes the line straddle the boundary.
pub fn draw_boundary(canvas: &mut RgbImage, boundary: &RegionBoundary) {
    let points = &boundary.points;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        for offset in 0..OUTLINE_THICKNESS {
            let o = offset as f32;
            draw_line_segment_mut(
                canvas,
                (a.x as f32 - o, a.y as f32 - o),
                (b.x as f32 - o, b.y as f32 - o),
                OUTLINE_COLOR,
            );
        }
    }
}

/// Filled dot at the region centroid
pub fn draw_marker(canvas: &mut RgbImage, measurement: &RegionMeasurement) {
    draw_filled_circle_mut(
        canvas,
        (measurement.x as i32, measurement.y as i32),
        MARKER_RADIUS,
        MARKER_COLOR,
    );
}
