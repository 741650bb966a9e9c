use image::{GrayImage, Luma};
use imageproc::filter::separable_filter_equal;

/// Normalized 1D Gaussian with exactly `2 * radius + 1` taps.
pub fn gaussian_kernel(radius: u32, sigma: f32) -> Vec<f32> {
    let r = radius as i64;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-r..=r)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();

    let sum: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// Apply Gaussian blur to reduce noise. A zero radius or a missing sigma
/// returns an unmodified copy.
pub fn apply_blur(img: &GrayImage, radius: u32, sigma: Option<f32>) -> GrayImage {
    match sigma {
        Some(sigma) if radius > 0 && sigma > 0.0 => {
            separable_filter_equal(img, &gaussian_kernel(radius, sigma))
        }
        _ => img.clone(),
    }
}

/// Binarize with a fixed global threshold: strictly brighter pixels become
/// 255, everything else 0.
pub fn binarize(img: &GrayImage, threshold: u8) -> GrayImage {
    let mut mask = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[0] > threshold {
            mask.put_pixel(x, y, Luma([255u8]));
        }
    }
    mask
}
