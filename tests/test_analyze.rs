//! Single-image analysis: decoding, tagging, annotation and visualization output.

mod common;

use common::*;
use image::Rgb;
use spotscan::detection::annotate::{MARKER_COLOR, OUTLINE_COLOR};
use spotscan::detection::{decode_frame, source_name};

fn bright_square_image() -> image::GrayImage {
    let mut img = dark_image(60, 60);
    fill_rect(&mut img, 10, 10, 20, 20, 255);
    img
}

#[test]
fn test_analyze_tags_objects_with_filename() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = write_png(dir.path(), "stars.png", &bright_square_image());

    let objects = ImageAnalyzer::default().analyze(&path);
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].source, "stars.png");
    assert_eq!((objects[0].x, objects[0].y), (20, 20));
    assert_eq!(objects[0].brightness, 255);
    assert!(objects[0].area >= AnalyzerConfig::default().min_area);

    Ok(())
}

#[test]
fn test_analyze_is_idempotent() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let mut img = bright_square_image();
    fill_rect(&mut img, 40, 40, 12, 12, 190);
    fill_rect(&mut img, 42, 5, 8, 8, 230);
    let path = write_png(dir.path(), "field.png", &img);

    let analyzer = ImageAnalyzer::default();
    let first = analyzer.analyze(&path);
    let second = analyzer.analyze(&path);
    assert_eq!(first.len(), 3);
    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_analyze_writes_visualization() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let visual_dir = dir.path().join("visual");
    std::fs::create_dir_all(&visual_dir)?;
    let path = write_png(dir.path(), "frame.png", &bright_square_image());

    let analyzer = ImageAnalyzer::new(unblurred(150, 10.0)).with_visual_dir(&visual_dir);
    let objects = analyzer.analyze(&path);
    assert_eq!(objects.len(), 1);

    let annotated = image::open(visual_dir.join("frame.png"))?.to_rgb8();
    assert_eq!(annotated.dimensions(), (60, 60));
    // Outline along the top edge, marker at the centroid
    assert_eq!(*annotated.get_pixel(20, 10), OUTLINE_COLOR);
    assert_eq!(*annotated.get_pixel(20, 9), OUTLINE_COLOR);
    assert_eq!(*annotated.get_pixel(20, 20), MARKER_COLOR);
    // Untouched background
    assert_eq!(*annotated.get_pixel(55, 55), Rgb([0, 0, 0]));

    Ok(())
}

#[test]
fn test_corrupt_image_yields_no_objects() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let visual_dir = dir.path().join("visual");
    std::fs::create_dir_all(&visual_dir)?;
    let path = write_corrupt_image(dir.path(), "broken.png");

    assert!(decode_frame(&path).is_err());

    let analyzer = ImageAnalyzer::default().with_visual_dir(&visual_dir);
    assert!(analyzer.analyze(&path).is_empty());
    assert!(!visual_dir.join("broken.png").exists());

    Ok(())
}

#[test]
fn test_missing_image_yields_no_objects() {
    let dir = tempfile::TempDir::new().unwrap();
    let objects = ImageAnalyzer::default().analyze(&dir.path().join("nope.jpg"));
    assert!(objects.is_empty());
}

#[test]
fn test_dark_image_yields_no_objects() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let visual_dir = dir.path().join("visual");
    std::fs::create_dir_all(&visual_dir)?;
    let path = write_png(dir.path(), "night.png", &dark_image(30, 30));

    let analyzer = ImageAnalyzer::default().with_visual_dir(&visual_dir);
    assert!(analyzer.analyze(&path).is_empty());
    // Decoded images are still visualized
    assert!(visual_dir.join("night.png").exists());

    Ok(())
}

#[test]
fn test_decode_keeps_views_aligned() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = write_png(dir.path(), "aligned.png", &bright_square_image());

    let frame = decode_frame(&path)?;
    assert_eq!(frame.gray.dimensions(), frame.color.dimensions());
    assert_eq!(frame.gray.get_pixel(15, 15)[0], 255);
    assert_eq!(*frame.color.get_pixel(15, 15), Rgb([255, 255, 255]));

    Ok(())
}

#[test]
fn test_source_name_is_base_filename() {
    let path = std::path::Path::new("some/dir/IMG_0001.JPG");
    assert_eq!(source_name(path), "IMG_0001.JPG");
}
