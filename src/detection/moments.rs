use crate::models::{Frame, Point, RegionBoundary, RegionMeasurement};

/// Zeroth and first order moments of a closed polygon.
///
/// Signs follow the vertex orientation; ratios (the centroid) do not
/// depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolygonMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl PolygonMoments {
    pub fn area(&self) -> f64 {
        self.m00.abs()
    }

    /// `None` for a zero-area polygon.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 == 0.0 {
            return None;
        }
        Some((self.m10 / self.m00, self.m01 / self.m00))
    }
}

/// Polygon moments from Green's theorem (shoelace sums), accumulated in
/// integers so that zero area is detected exactly.
pub fn polygon_moments(points: &[Point]) -> PolygonMoments {
    if points.len() < 3 {
        return PolygonMoments::default();
    }

    let mut a: i64 = 0;
    let mut mx: i64 = 0;
    let mut my: i64 = 0;

    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        let (xi, yi) = (p.x as i64, p.y as i64);
        let (xj, yj) = (q.x as i64, q.y as i64);
        let cross = xi * yj - xj * yi;
        a += cross;
        mx += (xi + xj) * cross;
        my += (yi + yj) * cross;
    }

    PolygonMoments {
        m00: a as f64 / 2.0,
        m10: mx as f64 / 6.0,
        m01: my as f64 / 6.0,
    }
}

/// Measure one region: area, integer centroid and the grayscale sample at
/// the centroid.
///
/// Returns `None` for degenerate (zero-area) boundaries.
pub fn measure(boundary: &RegionBoundary, frame: &Frame) -> Option<RegionMeasurement> {
    let moments = polygon_moments(&boundary.points);
    let (cx, cy) = moments.centroid()?;

    if frame.width() == 0 || frame.height() == 0 {
        return None;
    }

    let x = (cx.trunc().max(0.0) as u32).min(frame.width() - 1);
    let y = (cy.trunc().max(0.0) as u32).min(frame.height() - 1);
    let brightness = frame.gray.get_pixel(x, y)[0];

    Some(RegionMeasurement {
        x,
        y,
        brightness,
        area: moments.area(),
    })
}
