use image::{GrayImage, Luma};
use spotscan::{AnalyzerConfig, DetectedObject, Frame};
use std::path::{Path, PathBuf};

/// Creates a black grayscale image of the given size.
pub fn dark_image(width: u32, height: u32) -> GrayImage {
    GrayImage::new(width, height)
}

/// Fills the `w` x `h` rectangle whose top-left pixel is `(x0, y0)`.
pub fn fill_rect(img: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32, value: u8) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            img.put_pixel(x, y, Luma([value]));
        }
    }
}

/// Creates a black frame with one filled square.
pub fn square_frame(width: u32, height: u32, x0: u32, y0: u32, size: u32, value: u8) -> Frame {
    let mut img = dark_image(width, height);
    fill_rect(&mut img, x0, y0, size, size, value);
    Frame::from_gray(img)
}

/// Analyzer settings with blurring disabled, so masks match the drawn pixels.
pub fn unblurred(threshold: u8, min_area: f64) -> AnalyzerConfig {
    AnalyzerConfig {
        blur_radius: 0,
        threshold,
        min_area,
    }
}

/// Saves a grayscale image as PNG into `dir` and returns its path.
pub fn write_png(dir: &Path, name: &str, img: &GrayImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test image");
    path
}

/// Writes a file with an image extension but garbage content.
pub fn write_corrupt_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"\x89PNG\r\n\x1a\nthis is not really a png")
        .expect("Failed to write corrupt image");
    path
}

/// Creates a DetectedObject with only the fields ordering tests care about.
pub fn make_object(source: &str, brightness: u8, area: f64) -> DetectedObject {
    DetectedObject {
        source: source.to_string(),
        x: 0,
        y: 0,
        brightness,
        area,
    }
}
