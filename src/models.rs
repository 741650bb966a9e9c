use image::{DynamicImage, GrayImage, RgbImage};
use serde::Serialize;

/// A decoded image: grayscale samples for detection plus an aligned color
/// copy for annotation. Both views come from the same decode.
#[derive(Debug, Clone)]
pub struct Frame {
    pub gray: GrayImage,
    pub color: RgbImage,
}

impl Frame {
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        Self {
            gray: img.to_luma8(),
            color: img.to_rgb8(),
        }
    }

    /// Build a frame from grayscale samples only; the color view is the
    /// grayscale replicated across channels.
    pub fn from_gray(gray: GrayImage) -> Self {
        let color = DynamicImage::ImageLuma8(gray.clone()).to_rgb8();
        Self { gray, color }
    }

    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }
}

/// Integer vertex on the pixel-corner grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Outer contour of one connected bright region.
///
/// Vertices sit on pixel corners: pixel `(px, py)` covers the unit square
/// `[px, px + 1] x [py, py + 1]`. Only vertices where the contour changes
/// direction are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionBoundary {
    pub points: Vec<Point>,
}

impl RegionBoundary {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Inclusive-exclusive bounding box `(min_x, min_y, max_x, max_y)` in
    /// corner coordinates.
    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        let first = self.points.first()?;
        let init = (first.x, first.y, first.x, first.y);
        Some(self.points.iter().fold(init, |(min_x, min_y, max_x, max_y), p| {
            (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
        }))
    }
}

/// Centroid, brightness and area of one region, before it is tagged with
/// its source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionMeasurement {
    pub x: u32,
    pub y: u32,
    pub brightness: u8,
    pub area: f64,
}

impl RegionMeasurement {
    pub fn into_object(self, source: impl Into<String>) -> DetectedObject {
        DetectedObject {
            source: source.into(),
            x: self.x,
            y: self.y,
            brightness: self.brightness,
            area: self.area,
        }
    }
}

/// One detected bright object. Field order matches the CSV columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedObject {
    #[serde(rename = "filename")]
    pub source: String,
    pub x: u32,
    pub y: u32,
    pub brightness: u8,
    pub area: f64,
}

/// All objects of one run, sorted by brightness descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisBatch {
    objects: Vec<DetectedObject>,
}

impl AnalysisBatch {
    /// Merge per-image results (in input order) into a batch.
    ///
    /// The sort is stable, so objects of equal brightness keep their
    /// concatenation order.
    pub fn from_per_image(results: Vec<Vec<DetectedObject>>) -> Self {
        let mut objects: Vec<DetectedObject> = results.into_iter().flatten().collect();
        objects.sort_by(|a, b| b.brightness.cmp(&a.brightness));
        Self { objects }
    }

    pub fn objects(&self) -> &[DetectedObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DetectedObject> {
        self.objects.iter()
    }

    pub fn brightness_values(&self) -> Vec<f64> {
        self.objects.iter().map(|o| o.brightness as f64).collect()
    }

    pub fn area_values(&self) -> Vec<f64> {
        self.objects.iter().map(|o| o.area).collect()
    }

    pub fn into_objects(self) -> Vec<DetectedObject> {
        self.objects
    }
}

impl<'a> IntoIterator for &'a AnalysisBatch {
    type Item = &'a DetectedObject;
    type IntoIter = std::slice::Iter<'a, DetectedObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}
